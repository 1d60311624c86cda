use super::probe::Probe;
use super::strategy::{CurrencyRule, SiteStrategy};
use crate::models::{Store, CURRENCY_USD};

const TITLE: &[Probe] = &[Probe::text(r#"[data-test="product-title"]"#)];

const PRICE: &[Probe] = &[Probe::text(r#"[data-test="product-price"]"#)];

const ORIGINAL_PRICE: &[Probe] = &[
    Probe::text(r#"[data-test="product-price-was"]"#),
    Probe::text(r#"[data-test="product-regular-price"]"#),
];

const IMAGE: &[Probe] = &[
    Probe::image(r#"[data-test="product-image"]"#),
    Probe::image(r#"[data-test="product-image"] img"#),
];

pub fn strategy() -> SiteStrategy {
    SiteStrategy {
        store: Store::Target,
        title: TITLE,
        price: PRICE,
        original_price: ORIGINAL_PRICE,
        image: IMAGE,
        currency: CurrencyRule::fixed(CURRENCY_USD),
        price_fallback: None,
        image_fallbacks: &[],
    }
}

use super::probe::Probe;
use super::strategy::{CurrencyRule, SiteStrategy};
use crate::models::{Store, CURRENCY_USD};

const TITLE: &[Probe] = &[
    Probe::text("h1.x-item-title__mainTitle span"),
    Probe::text("h1.x-item-title__mainTitle"),
];

const PRICE: &[Probe] = &[
    Probe::text(r#"[itemprop="price"]"#),
    Probe::attrs(r#"[itemprop="price"]"#, &["content"]),
    Probe::text(".x-price-primary span"),
    Probe::text("span.notranslate"),
];

const ORIGINAL_PRICE: &[Probe] = &[
    Probe::text(".original-price"),
    Probe::text(".ux-textspans--STRIKETHROUGH"),
];

const IMAGE: &[Probe] = &[
    Probe::image("#icImg"),
    Probe::image(".ux-image-carousel-item img"),
    Probe::image(".img img"),
];

pub fn strategy() -> SiteStrategy {
    SiteStrategy {
        store: Store::Ebay,
        title: TITLE,
        price: PRICE,
        original_price: ORIGINAL_PRICE,
        image: IMAGE,
        currency: CurrencyRule::fixed(CURRENCY_USD),
        price_fallback: None,
        image_fallbacks: &[],
    }
}

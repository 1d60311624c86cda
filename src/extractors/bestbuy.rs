use super::probe::Probe;
use super::strategy::{CurrencyRule, SiteStrategy};
use crate::models::{Store, CURRENCY_USD};

const TITLE: &[Probe] = &[Probe::text(".heading-5"), Probe::text(".sku-title h1")];

const PRICE: &[Probe] = &[
    Probe::text(".priceView-customer-price span"),
    Probe::text(".priceView-purchase-price"),
];

const ORIGINAL_PRICE: &[Probe] = &[
    Probe::text(".pricing-price__regular-price"),
    Probe::text(".priceView-previous-price"),
];

const IMAGE: &[Probe] = &[Probe::image(".primary-image"), Probe::image(".primary-image img")];

pub fn strategy() -> SiteStrategy {
    SiteStrategy {
        store: Store::BestBuy,
        title: TITLE,
        price: PRICE,
        original_price: ORIGINAL_PRICE,
        image: IMAGE,
        currency: CurrencyRule::fixed(CURRENCY_USD),
        price_fallback: None,
        image_fallbacks: &[],
    }
}

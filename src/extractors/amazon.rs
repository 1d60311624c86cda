//! Amazon product pages. Amazon reshuffles its price markup often, so the
//! price chain starts at the split whole-number element and walks back
//! through the older `priceblock` and `a-offscreen` variants.

use super::probe::Probe;
use super::strategy::{CurrencyRule, ImageFallback, SiteStrategy};
use crate::models::{Store, CURRENCY_USD};

const TITLE: &[Probe] = &[
    Probe::text("#productTitle"),
    Probe::text(".product-title-word-break"),
    Probe::text(r#"[data-feature-name="title"]"#),
    Probe::text("h1"),
];

const PRICE: &[Probe] = &[
    Probe::text(".a-price-whole"),
    Probe::text(".a-price .a-offscreen"),
    Probe::text("#priceblock_ourprice"),
    Probe::text("#priceblock_dealprice"),
    Probe::text(".a-price"),
    Probe::text(".priceToPay"),
    Probe::text(r#"[data-a-color="price"] .a-offscreen"#),
    Probe::text("#corePrice_feature_div .a-price"),
];

const ORIGINAL_PRICE: &[Probe] = &[
    Probe::text(".a-text-price .a-offscreen"),
    Probe::text(".a-text-price"),
    Probe::text(".basisPrice .a-offscreen"),
    Probe::text(r#"[data-a-strike="true"]"#),
    Probe::text(".a-price.a-text-price"),
];

const HIRES_ATTRS: &[&str] = &["data-old-hires", "src", "data-a-dynamic-image"];

const IMAGE: &[Probe] = &[
    Probe::attrs("#landingImage", &["data-old-hires", "src"]),
    Probe::attrs("#imgBlkFront", HIRES_ATTRS),
    Probe::attrs("#main-image", HIRES_ATTRS),
    Probe::attrs("[data-old-hires]", HIRES_ATTRS),
    Probe::attrs(r#"[data-a-image-name="landingImage"]"#, HIRES_ATTRS),
];

pub fn strategy() -> SiteStrategy {
    SiteStrategy {
        store: Store::Amazon,
        title: TITLE,
        price: PRICE,
        original_price: ORIGINAL_PRICE,
        image: IMAGE,
        currency: CurrencyRule {
            default: CURRENCY_USD,
            from_hostname: true,
            from_page_text: true,
        },
        price_fallback: None,
        image_fallbacks: &[ImageFallback::AltMatchesTitle],
    }
}

use super::probe::{first_price, first_text, first_image, Probe};
use super::strategy::CurrencyRule;
use super::ProductExtractor;
use crate::error::ExtractError;
use crate::models::{RawCandidate, DEFAULT_CURRENCY};
use crate::page::Page;

const TITLE: &[Probe] = &[Probe::text(r#"[itemprop="name"]"#), Probe::text("h1")];

const PRICE: &[Probe] = &[
    Probe::text(r#"[itemprop="price"]"#),
    Probe::attrs(r#"[itemprop="price"]"#, &["content"]),
    Probe::text("[data-price]"),
    Probe::attrs("[data-price]", &["data-price"]),
    Probe::text(".price"),
    Probe::text(".product-price"),
];

const IMAGE: &[Probe] = &[
    Probe::attrs(r#"[itemprop="image"]"#, &["src", "data-src", "content", "href"]),
    Probe::image(".product-image img"),
    Probe::image(".product img"),
];

const CURRENCY: CurrencyRule = CurrencyRule::fixed(DEFAULT_CURRENCY);

pub struct GenericExtractor;

impl ProductExtractor for GenericExtractor {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn extract(&self, page: &Page) -> Result<Option<RawCandidate>, ExtractError> {
        extract_generic(page)
    }
}

/// Broad heuristics for unknown storefronts. Never reports an original
/// price: strike-through markup is too inconsistent without site knowledge.
pub fn extract_generic(page: &Page) -> Result<Option<RawCandidate>, ExtractError> {
    let Some(title) = first_text(page, TITLE)? else {
        return Ok(None);
    };

    let price = first_price(page, PRICE)?;
    let currency = CURRENCY.infer(page, price.as_ref().map(|found| found.text.as_str()));

    Ok(Some(RawCandidate {
        title,
        current_price: price.map(|found| found.value),
        original_price: None,
        image_url: first_image(page, IMAGE)?,
        currency,
    }))
}

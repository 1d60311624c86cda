//! Flipkart uses hashed class names that rotate between deployments, so the
//! chains end in broad patterns and a text scan for rupee amounts.

use once_cell::sync::Lazy;
use regex::Regex;

use super::probe::{PriceMatch, Probe};
use super::strategy::{CurrencyRule, ImageFallback, SiteStrategy};
use crate::error::ExtractError;
use crate::models::{Store, CURRENCY_INR};
use crate::page::{element_text, Page};

const TITLE: &[Probe] = &[
    Probe::text(".B_NuCI"),
    Probe::text("h1.yhB1nd"),
    Probe::text("span.B_NuCI"),
    Probe::text(r#"h1[class*="title"]"#),
    Probe::text("h1"),
];

const PRICE: &[Probe] = &[
    Probe::text("._30jeq3._16Jk6d"),
    Probe::text("._30jeq3"),
    Probe::text(".aMaAEs"),
    Probe::text(r#"div[class*="_30jeq3"]"#),
    Probe::text(r#"div[class*="price"]"#),
];

const ORIGINAL_PRICE: &[Probe] = &[
    Probe::text("._3I9_wc._2p6lqe"),
    Probe::text("._3I9_wc"),
    Probe::text(r#"[class*="striked"]"#),
];

const IMAGE: &[Probe] = &[
    Probe::image("._396cs4"),
    Probe::image("._2r_T1I"),
    Probe::image(r#"img[class*="product-image"]"#),
    Probe::image(".CXW8mj img"),
];

// Texts this short are price labels, not paragraphs that mention a price
const MAX_PRICE_LABEL_CHARS: usize = 15;

static PRICE_LIKE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:₹|Rs\.?|INR)?\s*\d[\d,]*(?:\.\d+)?").expect("Invalid price-like regex")
});

pub fn strategy() -> SiteStrategy {
    SiteStrategy {
        store: Store::Flipkart,
        title: TITLE,
        price: PRICE,
        original_price: ORIGINAL_PRICE,
        image: IMAGE,
        currency: CurrencyRule::fixed(CURRENCY_INR),
        price_fallback: Some(scan_short_price_labels),
        image_fallbacks: &[ImageFallback::AltMatchesTitle, ImageFallback::LargestImage],
    }
}

/// Short element texts in document order: first those carrying a rupee sign,
/// then anything price-shaped.
fn scan_short_price_labels(page: &Page) -> Result<Option<PriceMatch>, ExtractError> {
    let labels: Vec<String> = page
        .select_all("body *")?
        .iter()
        .map(element_text)
        .filter(|text| !text.is_empty() && text.chars().count() < MAX_PRICE_LABEL_CHARS)
        .collect();

    let with_rupee = labels
        .iter()
        .filter(|text| text.contains('₹'))
        .find_map(|text| PriceMatch::from_text(text));
    if with_rupee.is_some() {
        return Ok(with_rupee);
    }

    Ok(labels.iter().find_map(|text| {
        PRICE_LIKE_REGEX
            .find(text)
            .and_then(|m| PriceMatch::from_text(m.as_str()))
    }))
}

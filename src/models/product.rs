use md5::Context;
use serde::{Deserialize, Serialize};

// NewType pattern for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductKey(pub String);

/// Unvalidated result of a single extraction tier, before the dispatcher
/// attaches store and URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCandidate {
    pub title: String,
    pub current_price: Option<f64>,
    pub original_price: Option<f64>,
    pub image_url: Option<String>,
    pub currency: String,
}

impl RawCandidate {
    pub fn new(title: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            current_price: None,
            original_price: None,
            image_url: None,
            currency: currency.into(),
        }
    }
}

/// Record handed to presentation and storage collaborators.
///
/// Serialises to the camelCase message shape the popup and backend expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedProduct {
    pub title: String,
    pub current_price: Option<f64>,
    pub original_price: Option<f64>,
    pub image_url: Option<String>,
    pub currency: String,
    pub store: String,
    pub product_url: String,
}

impl ExtractedProduct {
    /// Builds the final record. The original price is kept only when it
    /// frames a discount over a known current price.
    pub fn from_candidate(candidate: RawCandidate, store: String, product_url: String) -> Self {
        let original_price = guard_original_price(candidate.current_price, candidate.original_price);

        Self {
            title: candidate.title,
            current_price: candidate.current_price,
            original_price,
            image_url: candidate.image_url,
            currency: candidate.currency,
            store,
            product_url,
        }
    }

    /// Non-empty title and a finite current price.
    pub fn is_usable(&self) -> bool {
        !self.title.trim().is_empty() && self.current_price.map_or(false, f64::is_finite)
    }

    /// Stable key derived from the product URL, used by storage.
    pub fn key(&self) -> ProductKey {
        let mut hasher = Context::new();
        hasher.consume(self.product_url.trim().as_bytes());
        ProductKey(format!("{:x}", hasher.compute()))
    }
}

pub fn guard_original_price(current: Option<f64>, original: Option<f64>) -> Option<f64> {
    match (current, original) {
        (Some(current), Some(original)) if original.is_finite() && original > current => Some(original),
        _ => None,
    }
}

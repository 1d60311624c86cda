use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::models::{ExtractedProduct, RawCandidate};
use crate::page::Page;
use crate::registry::Registry;

// Second-level labels that sit under a country TLD (amazon.co.uk, amazon.com.mx)
const SECOND_LEVEL_LABELS: &[&str] = &["co", "com", "net", "org", "ac", "gov", "edu"];

/// Picks an extraction tier for a page and finishes its candidate.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Extract the product on `page`, or `None` when there is nothing to show.
    ///
    /// A recognised storefront is authoritative: if its strategy finds no
    /// title, the page is not a product page and no other tier is consulted.
    /// Strategy errors are logged and reported as `None`.
    pub fn extract_product_info(&self, page: &Page) -> Option<ExtractedProduct> {
        let hostname = page.hostname();

        let candidate = match self.registry.lookup(hostname) {
            Some(extractor) => {
                debug!(hostname, extractor = extractor.name(), "using storefront strategy");
                match extractor.extract(page) {
                    Ok(candidate) => candidate,
                    Err(e) => {
                        warn!(hostname, extractor = extractor.name(), error = %e, "extraction failed");
                        None
                    }
                }
            }
            None => self.extract_with_fallbacks(page),
        }?;

        Some(ExtractedProduct::from_candidate(
            candidate,
            store_name(hostname),
            page.url().to_string(),
        ))
    }

    fn extract_with_fallbacks(&self, page: &Page) -> Option<RawCandidate> {
        for extractor in self.registry.fallbacks() {
            match extractor.extract(page) {
                Ok(Some(candidate)) => {
                    debug!(extractor = extractor.name(), "fallback tier produced a candidate");
                    return Some(candidate);
                }
                Ok(None) => continue,
                Err(e) => log_tier_error(extractor.name(), &e),
            }
        }
        None
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(Arc::new(Registry::storefronts()))
    }
}

fn log_tier_error(name: &str, error: &ExtractError) {
    warn!(extractor = name, error = %error, "fallback tier failed, trying next");
}

/// Display name of the store: the registrable label of the hostname with
/// its first letter upper-cased (`www.bestbuy.com` -> `Bestbuy`).
pub fn store_name(hostname: &str) -> String {
    let labels: Vec<&str> = hostname
        .trim_end_matches('.')
        .split('.')
        .filter(|label| !label.is_empty())
        .collect();

    let label = match labels.as_slice() {
        [] => return String::new(),
        [only] => *only,
        [.., name, second, tld]
            if tld.len() == 2 && SECOND_LEVEL_LABELS.contains(&second.to_ascii_lowercase().as_str()) =>
        {
            *name
        }
        [.., name, _] => *name,
    };

    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

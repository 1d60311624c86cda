use std::sync::Arc;

use crate::extractors::generic::GenericExtractor;
use crate::extractors::structured::StructuredDataExtractor;
use crate::extractors::{strategy_for, ProductExtractor};
use crate::models::Store;

struct StorefrontEntry {
    domain: &'static str,
    extractor: Arc<dyn ProductExtractor>,
}

/// Domain table and fallback tiers, built once and then only read.
///
/// Storefront domains are matched as substrings of the hostname in
/// insertion order; fallbacks run in order when no domain matches.
pub struct Registry {
    storefronts: Vec<StorefrontEntry>,
    fallbacks: Vec<Arc<dyn ProductExtractor>>,
}

impl Registry {
    pub fn empty() -> Self {
        Self {
            storefronts: Vec::new(),
            fallbacks: Vec::new(),
        }
    }

    /// All known storefronts, then structured data, then generic heuristics.
    pub fn storefronts() -> Self {
        let registry = Store::ALL.into_iter().fold(Self::empty(), |registry, store| {
            registry.with_storefront(store.domain(), Arc::new(strategy_for(store)))
        });

        registry
            .with_fallback(Arc::new(StructuredDataExtractor))
            .with_fallback(Arc::new(GenericExtractor))
    }

    pub fn with_storefront(mut self, domain: &'static str, extractor: Arc<dyn ProductExtractor>) -> Self {
        self.storefronts.push(StorefrontEntry { domain, extractor });
        self
    }

    pub fn with_fallback(mut self, extractor: Arc<dyn ProductExtractor>) -> Self {
        self.fallbacks.push(extractor);
        self
    }

    pub fn lookup(&self, hostname: &str) -> Option<&dyn ProductExtractor> {
        let hostname = hostname.to_ascii_lowercase();
        self.storefronts
            .iter()
            .find(|entry| hostname.contains(entry.domain))
            .map(|entry| entry.extractor.as_ref())
    }

    pub fn fallbacks(&self) -> impl Iterator<Item = &dyn ProductExtractor> {
        self.fallbacks.iter().map(|extractor| extractor.as_ref())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::storefronts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_hostnames_by_substring() {
        let registry = Registry::storefronts();
        assert_eq!(registry.lookup("www.amazon.com").map(|e| e.name()), Some("amazon"));
        assert_eq!(registry.lookup("smile.AMAZON.com").map(|e| e.name()), Some("amazon"));
        assert_eq!(registry.lookup("www.ebay.com.au").map(|e| e.name()), Some("ebay"));
        assert_eq!(registry.lookup("dl.flipkart.com").map(|e| e.name()), Some("flipkart"));
        assert!(registry.lookup("www.amazon.in").is_none());
        assert!(registry.lookup("example.com").is_none());
    }

    #[test]
    fn fallbacks_run_structured_before_generic() {
        let names: Vec<&str> = Registry::storefronts().fallbacks().map(|e| e.name()).collect();
        assert_eq!(names, vec!["structured-data", "generic"]);
    }

    #[test]
    fn first_registered_domain_wins() {
        let registry = Registry::empty()
            .with_storefront("shop.com", Arc::new(strategy_for(Store::Target)))
            .with_storefront("bigshop.com", Arc::new(strategy_for(Store::Newegg)));
        assert_eq!(registry.lookup("www.bigshop.com").map(|e| e.name()), Some("target"));
        assert_eq!(registry.lookup("shop.com").map(|e| e.name()), Some("target"));
    }
}

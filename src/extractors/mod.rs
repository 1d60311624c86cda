use crate::error::ExtractError;
use crate::models::RawCandidate;
use crate::page::Page;

pub mod probe;
pub mod strategy;

mod amazon;
mod bestbuy;
mod ebay;
mod flipkart;
mod newegg;
mod target;
mod walmart;

pub mod generic;
pub mod structured;

pub use generic::extract_generic;
pub use probe::{PriceMatch, Probe};
pub use strategy::{CurrencyRule, ImageFallback, SiteStrategy};
pub use structured::extract_from_structured_data;

use crate::models::Store;

/// One extraction tier. `Ok(None)` means "not a product page for me";
/// `Err` means the page had a shape the extractor could not handle.
pub trait ProductExtractor: Send + Sync {
    fn name(&self) -> &'static str;
    fn extract(&self, page: &Page) -> Result<Option<RawCandidate>, ExtractError>;
}

/// Selector table for a known storefront.
pub fn strategy_for(store: Store) -> SiteStrategy {
    match store {
        Store::Amazon => amazon::strategy(),
        Store::Ebay => ebay::strategy(),
        Store::Walmart => walmart::strategy(),
        Store::BestBuy => bestbuy::strategy(),
        Store::Target => target::strategy(),
        Store::Newegg => newegg::strategy(),
        Store::Flipkart => flipkart::strategy(),
    }
}

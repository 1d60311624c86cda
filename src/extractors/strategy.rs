use tracing::debug;

use crate::error::ExtractError;
use crate::extractors::probe::{
    first_image, first_price, first_text, image_with_alt, largest_image, PriceMatch, Probe,
};
use crate::extractors::ProductExtractor;
use crate::models::{RawCandidate, Store};
use crate::page::Page;
use crate::parsers::{currency_from_hostname, currency_from_page_text, currency_from_symbol};

/// Last-resort price search run when every price probe missed.
pub type PriceFallback = fn(&Page) -> Result<Option<PriceMatch>, ExtractError>;

/// Image searches tried, in order, after the image probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFallback {
    /// An `<img>` whose alt text equals the extracted title.
    AltMatchesTitle,
    /// The largest reasonably sized `<img>` on the page.
    LargestImage,
}

/// Currency inference. Signals are consulted in a fixed order: a symbol in
/// the matched price text, the hostname TLD, optionally glyphs anywhere in
/// the page, then the storefront's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyRule {
    pub default: &'static str,
    pub from_hostname: bool,
    pub from_page_text: bool,
}

impl CurrencyRule {
    pub const fn fixed(default: &'static str) -> Self {
        Self {
            default,
            from_hostname: true,
            from_page_text: false,
        }
    }

    pub fn infer(&self, page: &Page, price_text: Option<&str>) -> String {
        let currency = price_text
            .and_then(currency_from_symbol)
            .or_else(|| self.from_hostname.then(|| currency_from_hostname(page.hostname())).flatten())
            .or_else(|| self.from_page_text.then(|| currency_from_page_text(&page.body_text())).flatten())
            .unwrap_or(self.default);
        currency.to_string()
    }
}

/// A storefront described as data: one ordered probe chain per field plus
/// the storefront's currency rule and optional fallbacks.
#[derive(Debug, Clone, Copy)]
pub struct SiteStrategy {
    pub store: Store,
    pub title: &'static [Probe],
    pub price: &'static [Probe],
    pub original_price: &'static [Probe],
    pub image: &'static [Probe],
    pub currency: CurrencyRule,
    pub price_fallback: Option<PriceFallback>,
    pub image_fallbacks: &'static [ImageFallback],
}

impl SiteStrategy {
    fn find_price(&self, page: &Page) -> Result<Option<PriceMatch>, ExtractError> {
        if let Some(found) = first_price(page, self.price)? {
            return Ok(Some(found));
        }
        match self.price_fallback {
            Some(fallback) => {
                debug!(store = ?self.store, "price probes missed, scanning page");
                fallback(page)
            }
            None => Ok(None),
        }
    }

    fn find_image(&self, page: &Page, title: &str) -> Result<Option<String>, ExtractError> {
        if let Some(url) = first_image(page, self.image)? {
            return Ok(Some(url));
        }
        for fallback in self.image_fallbacks {
            let found = match fallback {
                ImageFallback::AltMatchesTitle => image_with_alt(page, title)?,
                ImageFallback::LargestImage => largest_image(page)?,
            };
            if found.is_some() {
                return Ok(found);
            }
        }
        Ok(None)
    }
}

impl ProductExtractor for SiteStrategy {
    fn name(&self) -> &'static str {
        self.store.key()
    }

    fn extract(&self, page: &Page) -> Result<Option<RawCandidate>, ExtractError> {
        let Some(title) = first_text(page, self.title)? else {
            debug!(store = ?self.store, "no title found, not a product page");
            return Ok(None);
        };

        let price = self.find_price(page)?;
        let original_price = first_price(page, self.original_price)?.map(|found| found.value);
        let image_url = self.find_image(page, &title)?;
        let currency = self.currency.infer(page, price.as_ref().map(|found| found.text.as_str()));

        Ok(Some(RawCandidate {
            title,
            current_price: price.map(|found| found.value),
            original_price,
            image_url,
            currency,
        }))
    }
}

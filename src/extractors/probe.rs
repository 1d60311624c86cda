use tracing::debug;

use crate::error::ExtractError;
use crate::page::{element_text, Page};
use crate::parsers::normalize_price;

/// Where a probe reads its value from once the selector matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Text,
    /// First non-empty attribute in order.
    Attrs(&'static [&'static str]),
}

/// One alternative in a field's fallback chain: a selector plus where to read.
///
/// Like `querySelector`, only the first element matching the selector is read.
/// A probe matches when that read yields a non-empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    pub selector: &'static str,
    pub source: Source,
}

pub const IMAGE_ATTRS: &[&str] = &["src", "data-src"];

impl Probe {
    pub const fn text(selector: &'static str) -> Self {
        Self {
            selector,
            source: Source::Text,
        }
    }

    pub const fn attrs(selector: &'static str, attrs: &'static [&'static str]) -> Self {
        Self {
            selector,
            source: Source::Attrs(attrs),
        }
    }

    pub const fn image(selector: &'static str) -> Self {
        Self::attrs(selector, IMAGE_ATTRS)
    }

    pub fn evaluate(&self, page: &Page) -> Result<Option<String>, ExtractError> {
        let Some(element) = page.select_first(self.selector)? else {
            return Ok(None);
        };

        let value = match self.source {
            Source::Text => Some(element_text(&element)),
            Source::Attrs(attrs) => attrs
                .iter()
                .filter_map(|attr| element.value().attr(attr))
                .map(str::trim)
                .find(|value| !value.is_empty())
                .map(str::to_string),
        };

        Ok(value.filter(|value| !value.is_empty()))
    }
}

/// A price read from the page, with the text it came from for currency hints.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceMatch {
    pub value: f64,
    pub text: String,
}

impl PriceMatch {
    pub fn from_text(text: &str) -> Option<Self> {
        normalize_price(text).map(|value| Self {
            value,
            text: text.to_string(),
        })
    }
}

/// First probe yielding a non-empty string.
pub fn first_text(page: &Page, probes: &[Probe]) -> Result<Option<String>, ExtractError> {
    for probe in probes {
        if let Some(value) = probe.evaluate(page)? {
            debug!(selector = probe.selector, "probe matched");
            return Ok(Some(value));
        }
    }
    Ok(None)
}

/// First probe whose text normalizes to a number.
pub fn first_price(page: &Page, probes: &[Probe]) -> Result<Option<PriceMatch>, ExtractError> {
    for probe in probes {
        if let Some(found) = probe.evaluate(page)?.as_deref().and_then(PriceMatch::from_text) {
            debug!(selector = probe.selector, price = found.value, "price probe matched");
            return Ok(Some(found));
        }
    }
    Ok(None)
}

/// First probe yielding an image reference, resolved to an absolute URL.
pub fn first_image(page: &Page, probes: &[Probe]) -> Result<Option<String>, ExtractError> {
    for probe in probes {
        let Some(raw) = probe.evaluate(page)? else {
            continue;
        };
        if let Some(url) = image_reference(&raw).and_then(|raw| page.resolve_url(&raw)) {
            debug!(selector = probe.selector, "image probe matched");
            return Ok(Some(url));
        }
    }
    Ok(None)
}

// Dynamic image attributes hold a JSON object keyed by URL, in document order.
fn image_reference(raw: &str) -> Option<String> {
    if raw.starts_with('{') {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(raw).ok()?;
        return map.keys().next().cloned();
    }
    Some(raw.to_string())
}

/// `<img>` whose alt text equals the product title.
pub fn image_with_alt(page: &Page, title: &str) -> Result<Option<String>, ExtractError> {
    let found = page
        .select_all("img[alt]")?
        .into_iter()
        .filter(|img| img.value().attr("alt").map(str::trim) == Some(title))
        .find_map(|img| {
            IMAGE_ATTRS
                .iter()
                .find_map(|attr| img.value().attr(attr))
                .and_then(|src| page.resolve_url(src))
        });
    Ok(found)
}

/// Largest `<img>` by declared dimensions, both sides over 100px.
pub fn largest_image(page: &Page) -> Result<Option<String>, ExtractError> {
    let dimension = |value: Option<&str>| -> u64 {
        value
            .and_then(|v| v.trim().trim_end_matches("px").parse::<u64>().ok())
            .unwrap_or(0)
    };

    let mut best: Option<(u64, String)> = None;
    for img in page.select_all("img")? {
        let width = dimension(img.value().attr("width"));
        let height = dimension(img.value().attr("height"));
        if width <= 100 || height <= 100 {
            continue;
        }
        let Some(src) = IMAGE_ATTRS.iter().find_map(|attr| img.value().attr(attr)) else {
            continue;
        };
        let area = width.saturating_mul(height);
        if best.as_ref().map_or(true, |(best_area, _)| area > *best_area) {
            if let Some(url) = page.resolve_url(src) {
                best = Some((area, url));
            }
        }
    }

    Ok(best.map(|(_, url)| url))
}

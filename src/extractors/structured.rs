//! Product metadata embedded in the page: JSON-LD blocks first, then
//! schema.org microdata. Independent of the visual markup, so it is the
//! preferred tier for storefronts without a dedicated strategy.

use scraper::ElementRef;
use serde_json::Value;
use tracing::debug;

use super::ProductExtractor;
use crate::error::ExtractError;
use crate::models::{RawCandidate, DEFAULT_CURRENCY};
use crate::page::{element_text, parse_selector, Page};
use crate::parsers::{clean_text, normalize_price};

const JSON_LD_SELECTOR: &str = r#"script[type="application/ld+json"]"#;
const MICRODATA_SCOPE_SELECTOR: &str = "[itemscope][itemtype]";

pub struct StructuredDataExtractor;

impl ProductExtractor for StructuredDataExtractor {
    fn name(&self) -> &'static str {
        "structured-data"
    }

    fn extract(&self, page: &Page) -> Result<Option<RawCandidate>, ExtractError> {
        extract_from_structured_data(page)
    }
}

/// First conforming Product entity in document order. Entities without a
/// name or a usable offer price are skipped; so are blocks that fail to parse.
pub fn extract_from_structured_data(page: &Page) -> Result<Option<RawCandidate>, ExtractError> {
    if let Some(candidate) = from_json_ld(page)? {
        return Ok(Some(candidate));
    }
    from_microdata(page)
}

fn from_json_ld(page: &Page) -> Result<Option<RawCandidate>, ExtractError> {
    for script in page.select_all(JSON_LD_SELECTOR)? {
        let content: String = script.text().collect();
        let data: Value = match serde_json::from_str(content.trim()) {
            Ok(data) => data,
            Err(e) => {
                debug!(error = %e, "skipping malformed JSON-LD block");
                continue;
            }
        };

        for entity in product_entities(&data) {
            match candidate_from_entity(entity) {
                Some(candidate) => return Ok(Some(candidate)),
                None => debug!("JSON-LD Product without name or price"),
            }
        }
    }
    Ok(None)
}

/// Product entities at the top level, in a top-level list, or in `@graph`.
fn product_entities(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().flat_map(product_entities).collect(),
        Value::Object(map) => {
            let mut found = Vec::new();
            if map.get("@type").map_or(false, type_is_product) {
                found.push(value);
            }
            if let Some(graph) = map.get("@graph") {
                found.extend(product_entities(graph));
            }
            found
        }
        _ => Vec::new(),
    }
}

fn type_is_product(value: &Value) -> bool {
    match value {
        Value::String(name) => is_product_type(name),
        Value::Array(names) => names.iter().filter_map(Value::as_str).any(is_product_type),
        _ => false,
    }
}

// "Product", "schema:Product", "https://schema.org/Product"
fn is_product_type(name: &str) -> bool {
    name.rsplit(|c: char| c == '/' || c == ':').next() == Some("Product")
}

fn candidate_from_entity(entity: &Value) -> Option<RawCandidate> {
    let title = entity
        .get("name")
        .and_then(Value::as_str)
        .map(clean_text)
        .filter(|name| !name.is_empty())?;

    let offer = match entity.get("offers")? {
        Value::Array(offers) => offers.first()?,
        offer => offer,
    };
    let price = offer
        .get("price")
        .and_then(json_price)
        .or_else(|| offer.get("lowPrice").and_then(json_price))?;

    let currency = offer
        .get("priceCurrency")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .unwrap_or(DEFAULT_CURRENCY)
        .to_string();

    Some(RawCandidate {
        title,
        current_price: Some(price),
        original_price: None,
        image_url: entity.get("image").and_then(json_image),
        currency,
    })
}

fn json_price(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => normalize_price(text),
        _ => None,
    }
}

fn json_image(value: &Value) -> Option<String> {
    match value {
        Value::String(url) => Some(url.trim().to_string()).filter(|url| !url.is_empty()),
        Value::Array(images) => images.first().and_then(json_image),
        Value::Object(map) => map.get("url").and_then(json_image),
        _ => None,
    }
}

fn from_microdata(page: &Page) -> Result<Option<RawCandidate>, ExtractError> {
    let name_selector = parse_selector(r#"[itemprop="name"]"#)?;
    let price_selector = parse_selector(r#"[itemprop="price"], [itemprop="lowPrice"]"#)?;
    let currency_selector = parse_selector(r#"[itemprop="priceCurrency"]"#)?;
    let image_selector = parse_selector(r#"[itemprop="image"]"#)?;

    for scope in page.select_all(MICRODATA_SCOPE_SELECTOR)? {
        let is_product = scope
            .value()
            .attr("itemtype")
            .map_or(false, |itemtype| itemtype.split_whitespace().any(is_product_type));
        if !is_product {
            continue;
        }

        // Brand and seller scopes carry their own "name"
        let title = scope
            .select(&name_selector)
            .filter(|prop| owning_scope_is(prop, &scope))
            .map(|prop| microdata_value(&prop))
            .find(|name| !name.is_empty());
        let price = scope
            .select(&price_selector)
            .find_map(|prop| normalize_price(&microdata_value(&prop)));

        let (Some(title), Some(price)) = (title, price) else {
            debug!("microdata Product without name or price");
            continue;
        };

        let currency = scope
            .select(&currency_selector)
            .map(|prop| microdata_value(&prop))
            .find(|code| !code.is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        let image_url = scope
            .select(&image_selector)
            .map(|prop| microdata_value(&prop))
            .find_map(|src| page.resolve_url(&src));

        return Ok(Some(RawCandidate {
            title,
            current_price: Some(price),
            original_price: None,
            image_url,
            currency,
        }));
    }

    Ok(None)
}

fn owning_scope_is(prop: &ElementRef<'_>, scope: &ElementRef<'_>) -> bool {
    prop.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().attr("itemscope").is_some())
        .map_or(false, |owner| owner.id() == scope.id())
}

fn microdata_value(prop: &ElementRef<'_>) -> String {
    let element = prop.value();
    let attr = match element.name() {
        "meta" => element.attr("content"),
        "img" | "source" => element.attr("src").or_else(|| element.attr("data-src")),
        "a" | "link" => element.attr("href"),
        _ => element.attr("content"),
    };

    match attr {
        Some(value) => clean_text(value),
        None => element_text(prop),
    }
}

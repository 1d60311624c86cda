use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::ExtractError;
use crate::parsers::clean_text;

/// A parsed document together with the location it was loaded from.
pub struct Page {
    document: Html,
    url: Url,
}

impl Page {
    pub fn parse(html: &str, url: &str) -> Result<Self, ExtractError> {
        let url = Url::parse(url).map_err(|source| ExtractError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        Ok(Self::new(Html::parse_document(html), url))
    }

    pub fn new(document: Html, url: Url) -> Self {
        Self { document, url }
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn hostname(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    pub fn select_first(&self, selector: &str) -> Result<Option<ElementRef<'_>>, ExtractError> {
        let selector = parse_selector(selector)?;
        Ok(self.document.select(&selector).next())
    }

    pub fn select_all(&self, selector: &str) -> Result<Vec<ElementRef<'_>>, ExtractError> {
        let selector = parse_selector(selector)?;
        Ok(self.document.select(&selector).collect())
    }

    /// Whitespace-collapsed text of the whole body.
    pub fn body_text(&self) -> String {
        let body = Selector::parse("body")
            .ok()
            .and_then(|selector| self.document.select(&selector).next());

        match body {
            Some(body) => element_text(&body),
            None => clean_text(&self.document.root_element().text().collect::<String>()),
        }
    }

    /// Resolve a possibly relative URL found in the page against its location.
    pub fn resolve_url(&self, raw: &str) -> Option<String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        self.url.join(raw).ok().map(|url| url.to_string())
    }
}

pub fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

pub fn element_text(element: &ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_urls_against_location() {
        let page = Page::parse("<html></html>", "https://shop.example.com/p/widget").unwrap();
        assert_eq!(
            page.resolve_url("/img/w.jpg").as_deref(),
            Some("https://shop.example.com/img/w.jpg")
        );
        assert_eq!(
            page.resolve_url("//cdn.example.com/w.jpg").as_deref(),
            Some("https://cdn.example.com/w.jpg")
        );
        assert_eq!(page.resolve_url("  "), None);
    }

    #[test]
    fn rejects_unparsable_location() {
        assert!(matches!(
            Page::parse("<html></html>", "not a url"),
            Err(ExtractError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn invalid_selector_is_an_error_not_a_panic() {
        let page = Page::parse("<p>x</p>", "https://example.com/").unwrap();
        assert!(matches!(
            page.select_first("p[["),
            Err(ExtractError::InvalidSelector { .. })
        ));
    }

    #[test]
    fn body_text_is_collapsed() {
        let page = Page::parse(
            "<html><body><p>Price:</p>\n  <span>£5</span></body></html>",
            "https://example.co.uk/",
        )
        .unwrap();
        assert_eq!(page.body_text(), "Price: £5");
        assert_eq!(page.hostname(), "example.co.uk");
    }
}

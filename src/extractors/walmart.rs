use super::probe::Probe;
use super::strategy::{CurrencyRule, SiteStrategy};
use crate::models::{Store, CURRENCY_USD};

const TITLE: &[Probe] = &[
    Probe::text(r#"h1[itemprop="name"]"#),
    Probe::text("h1.prod-title"),
    Probe::text("h1#main-title"),
];

const PRICE: &[Probe] = &[
    Probe::text(r#"[itemprop="price"]"#),
    Probe::text(".price-characteristic"),
    Probe::text(r#"[data-automation="product-price"]"#),
];

const ORIGINAL_PRICE: &[Probe] = &[
    Probe::text(".strikethrough-price"),
    Probe::text(".was-price"),
];

const IMAGE: &[Probe] = &[
    Probe::image(".prod-hero-image"),
    Probe::image(".prod-hero-image img"),
    Probe::image(r#"[data-testid="hero-image-container"] img"#),
];

pub fn strategy() -> SiteStrategy {
    SiteStrategy {
        store: Store::Walmart,
        title: TITLE,
        price: PRICE,
        original_price: ORIGINAL_PRICE,
        image: IMAGE,
        currency: CurrencyRule::fixed(CURRENCY_USD),
        price_fallback: None,
        image_fallbacks: &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::ProductExtractor;
    use crate::page::Page;

    #[test]
    fn reads_current_markup() {
        let html = r#"
            <h1 id="main-title">Great Value Whole Milk, 1 Gallon</h1>
            <span data-automation="product-price">$3.48</span>
            <span class="was-price">$3.98</span>
            <div data-testid="hero-image-container"><img src="https://i5.walmartimages.com/milk.jpeg"></div>
        "#;
        let page = Page::parse(html, "https://www.walmart.com/ip/10450114").unwrap();
        let candidate = strategy().extract(&page).unwrap().unwrap();

        assert_eq!(candidate.title, "Great Value Whole Milk, 1 Gallon");
        assert_eq!(candidate.current_price, Some(3.48));
        assert_eq!(candidate.original_price, Some(3.98));
        assert_eq!(candidate.image_url.as_deref(), Some("https://i5.walmartimages.com/milk.jpeg"));
    }

    #[test]
    fn itemprop_title_wins_over_later_variants() {
        let html = r#"
            <h1 itemprop="name">Old Layout Title</h1>
            <h1 id="main-title">New Layout Title</h1>
        "#;
        let page = Page::parse(html, "https://www.walmart.com/ip/1").unwrap();
        let candidate = strategy().extract(&page).unwrap().unwrap();
        assert_eq!(candidate.title, "Old Layout Title");
        assert_eq!(candidate.current_price, None);
    }
}

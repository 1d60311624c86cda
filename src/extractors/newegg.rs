use super::probe::Probe;
use super::strategy::{CurrencyRule, SiteStrategy};
use crate::models::{Store, CURRENCY_USD};

const TITLE: &[Probe] = &[Probe::text(".product-title")];

const PRICE: &[Probe] = &[Probe::text(".price-current"), Probe::text(".product-price")];

const ORIGINAL_PRICE: &[Probe] = &[Probe::text(".price-was")];

const IMAGE: &[Probe] = &[
    Probe::image(".product-view-img-original"),
    Probe::image(".swiper-slide-active img"),
];

pub fn strategy() -> SiteStrategy {
    SiteStrategy {
        store: Store::Newegg,
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
    fn reports_was_price_without_guarding_it() {
        // was-price lower than current: the strategy reports it, the dispatcher guards it
        let html = r#"
            <h1 class="product-title">Samsung 990 PRO 2TB NVMe</h1>
            <li class="price-current">$<strong>169</strong><sup>.99</sup></li>
            <span class="price-was">$159.99</span>
        "#;
        let page = Page::parse(html, "https://www.newegg.com/p/N82E16820147861").unwrap();
        let candidate = strategy().extract(&page).unwrap().unwrap();

        assert_eq!(candidate.current_price, Some(169.99));
        assert_eq!(candidate.original_price, Some(159.99));
        assert_eq!(candidate.image_url, None);
    }

    #[test]
    fn canadian_storefront_is_still_dollars() {
        let html = r#"<h1 class="product-title">Case Fan</h1><li class="price-current">C$19.99</li>"#;
        let page = Page::parse(html, "https://www.newegg.com/global/ca-en/p/1").unwrap();
        let candidate = strategy().extract(&page).unwrap().unwrap();
        assert_eq!(candidate.currency, "USD");
    }
}

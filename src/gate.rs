use once_cell::sync::Lazy;
use scraper::Selector;

use crate::page::Page;

static PRICE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"[data-price], .price, .product-price, [itemprop="price"]"#)
        .expect("Invalid price gate selector")
});

static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"[itemprop="name"], .product-title, .product-name, h1.title"#)
        .expect("Invalid title gate selector")
});

static ADD_TO_CART_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        r#"button[data-action="add-to-cart"], .add-to-cart, #add-to-cart, [id*="ddToCart"], [id*="addToCart"]"#,
    )
    .expect("Invalid add-to-cart gate selector")
});

/// Cheap check run before unsolicited detection: a price-shaped element plus
/// either a title-shaped element or an add-to-cart control.
pub fn is_product_page(page: &Page) -> bool {
    let document = page.document();
    let has = |selector: &Selector| document.select(selector).next().is_some();

    has(&PRICE_SELECTOR) && (has(&TITLE_SELECTOR) || has(&ADD_TO_CART_SELECTOR))
}

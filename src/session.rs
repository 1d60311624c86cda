//! Request handling between the page context and its collaborators: the
//! popup asks for an extraction explicitly, navigation asks for passive
//! detection, and the presenter shows what passive detection found.

use std::collections::HashSet;
use std::sync::Mutex;

use serde_json::{json, Value};
use tracing::{debug, info};

use crate::dispatch::Dispatcher;
use crate::gate::is_product_page;
use crate::models::ExtractedProduct;
use crate::page::Page;
use crate::parsers::format_price;

pub type TabId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// User-initiated; always attempts extraction.
    ExtractNow,
    /// Navigation finished; gated and presented only when usable.
    DetectOnNavigation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Product(ExtractedProduct),
    NothingFound,
}

impl Response {
    pub fn product(&self) -> Option<&ExtractedProduct> {
        match self {
            Response::Product(product) => Some(product),
            Response::NothingFound => None,
        }
    }

    /// Message shape answered to the popup: `{"productInfo": record | null}`.
    pub fn to_message(&self) -> Value {
        json!({ "productInfo": self.product() })
    }
}

/// Where the automatic flow ended for one navigation.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionOutcome {
    /// The gate judged this not to be a product page.
    Skipped,
    /// Extraction ran but the record was missing or unusable.
    Discarded,
    Presented(ExtractedProduct),
}

/// Seam to the in-page notification that offers the user a save action.
pub trait Presenter: Send + Sync {
    fn present(&self, product: &ExtractedProduct);
}

/// Presenter that only logs; used by the headless binaries.
pub struct TracingPresenter;

impl Presenter for TracingPresenter {
    fn present(&self, product: &ExtractedProduct) {
        let price = product
            .current_price
            .map(|price| format_price(price, &product.currency))
            .unwrap_or_else(|| "price unavailable".to_string());
        info!(store = %product.store, url = %product.product_url, "Product detected: {} ({})", product.title, price);
    }
}

pub struct Session<P: Presenter> {
    dispatcher: Dispatcher,
    presenter: P,
    detecting: Mutex<HashSet<TabId>>,
}

impl<P: Presenter> Session<P> {
    pub fn new(dispatcher: Dispatcher, presenter: P) -> Self {
        Self {
            dispatcher,
            presenter,
            detecting: Mutex::new(HashSet::new()),
        }
    }

    /// Answer a request for `tab`. Every request gets a response.
    ///
    /// A `DetectOnNavigation` arriving while another is still running for the
    /// same tab is answered `NothingFound` without extracting.
    pub fn handle(&self, tab: TabId, request: Request, page: &Page) -> Response {
        match request {
            Request::ExtractNow => match self.dispatcher.extract_product_info(page) {
                Some(product) => Response::Product(product),
                None => Response::NothingFound,
            },
            Request::DetectOnNavigation => {
                let Some(_guard) = self.begin_detection(tab) else {
                    debug!(tab, "detection already in flight, ignoring trigger");
                    return Response::NothingFound;
                };
                match self.detect(page) {
                    DetectionOutcome::Presented(product) => Response::Product(product),
                    DetectionOutcome::Skipped | DetectionOutcome::Discarded => Response::NothingFound,
                }
            }
        }
    }

    /// Idle -> gate -> extract -> present. Nothing carries over between calls.
    pub fn detect(&self, page: &Page) -> DetectionOutcome {
        if !is_product_page(page) {
            debug!(url = %page.url(), "not a product page, skipping detection");
            return DetectionOutcome::Skipped;
        }

        match self.dispatcher.extract_product_info(page) {
            Some(product) if product.is_usable() => {
                self.presenter.present(&product);
                DetectionOutcome::Presented(product)
            }
            _ => {
                debug!(url = %page.url(), "no usable product extracted");
                DetectionOutcome::Discarded
            }
        }
    }

    fn begin_detection(&self, tab: TabId) -> Option<DetectionGuard<'_>> {
        let mut detecting = self.detecting.lock().unwrap_or_else(|e| e.into_inner());
        detecting.insert(tab).then(|| DetectionGuard {
            detecting: &self.detecting,
            tab,
        })
    }
}

struct DetectionGuard<'a> {
    detecting: &'a Mutex<HashSet<TabId>>,
    tab: TabId,
}

impl Drop for DetectionGuard<'_> {
    fn drop(&mut self) {
        let mut detecting = self.detecting.lock().unwrap_or_else(|e| e.into_inner());
        detecting.remove(&self.tab);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[derive(Default, Clone)]
    struct RecordingPresenter {
        shown: Arc<Mutex<Vec<String>>>,
    }

    impl Presenter for RecordingPresenter {
        fn present(&self, product: &ExtractedProduct) {
            self.shown.lock().unwrap().push(product.title.clone());
        }
    }

    fn session() -> (Session<RecordingPresenter>, Arc<Mutex<Vec<String>>>) {
        let presenter = RecordingPresenter::default();
        let shown = presenter.shown.clone();
        (Session::new(Dispatcher::default(), presenter), shown)
    }

    const PRODUCT: &str = r#"
        <h1 class="product-title">Desk Lamp</h1>
        <span class="price">$24.00</span>
        <button class="add-to-cart">Add to cart</button>
    "#;

    const PRICELESS: &str = r#"
        <h1 class="product-title">Desk Lamp</h1>
        <span class="price">Sold out</span>
    "#;

    fn page(html: &str) -> Page {
        Page::parse(html, "https://lamps.example.com/desk-lamp").unwrap()
    }

    #[test]
    fn detection_presents_usable_products() {
        let (session, shown) = session();
        let response = session.handle(1, Request::DetectOnNavigation, &page(PRODUCT));

        assert_eq!(response.product().map(|p| p.current_price), Some(Some(24.0)));
        assert_eq!(*shown.lock().unwrap(), vec!["Desk Lamp".to_string()]);
    }

    #[test]
    fn detection_skips_non_product_pages() {
        let (session, shown) = session();
        let page = page("<h1>Blog</h1><p>Read about lamps</p>");

        assert_eq!(session.detect(&page), DetectionOutcome::Skipped);
        assert_eq!(session.handle(1, Request::DetectOnNavigation, &page), Response::NothingFound);
        assert!(shown.lock().unwrap().is_empty());
    }

    #[test]
    fn detection_discards_priceless_records_but_extract_now_returns_them() {
        let (session, shown) = session();
        let page = page(PRICELESS);

        assert_eq!(session.detect(&page), DetectionOutcome::Discarded);
        assert!(shown.lock().unwrap().is_empty());

        let response = session.handle(1, Request::ExtractNow, &page);
        let product = response.product().unwrap();
        assert_eq!(product.title, "Desk Lamp");
        assert_eq!(product.current_price, None);
    }

    #[test]
    fn extract_now_ignores_the_gate() {
        let (session, _) = session();
        // no price-shaped or add-to-cart element, so the gate would refuse
        let page = page("<h1>Travel Mug</h1>");
        assert!(!is_product_page(&page));
        assert!(session.handle(1, Request::ExtractNow, &page).product().is_some());
    }

    #[test]
    fn overlapping_detection_for_same_tab_is_ignored() {
        let (session, shown) = session();
        let page = page(PRODUCT);

        let guard = session.begin_detection(7).unwrap();
        assert_eq!(session.handle(7, Request::DetectOnNavigation, &page), Response::NothingFound);
        // other tabs and explicit requests are unaffected
        assert!(session.handle(8, Request::DetectOnNavigation, &page).product().is_some());
        assert!(session.handle(7, Request::ExtractNow, &page).product().is_some());
        drop(guard);

        assert!(session.handle(7, Request::DetectOnNavigation, &page).product().is_some());
        assert_eq!(shown.lock().unwrap().len(), 2);
    }

    #[test]
    fn message_shape() {
        assert_eq!(Response::NothingFound.to_message(), json!({ "productInfo": null }));

        let (session, _) = session();
        let message = session.handle(1, Request::ExtractNow, &page(PRODUCT)).to_message();
        assert_eq!(message["productInfo"]["title"], "Desk Lamp");
        assert_eq!(message["productInfo"]["store"], "Example");
    }
}

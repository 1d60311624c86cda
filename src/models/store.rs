use serde::{Deserialize, Serialize};

/// Storefronts with a dedicated extraction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Store {
    Amazon,
    Ebay,
    Walmart,
    BestBuy,
    Target,
    Newegg,
    Flipkart,
}

impl Store {
    /// Known storefronts in matching order.
    pub const ALL: [Store; 7] = [
        Store::Amazon,
        Store::Ebay,
        Store::Walmart,
        Store::BestBuy,
        Store::Target,
        Store::Newegg,
        Store::Flipkart,
    ];

    /// Domain string matched as a substring of the page hostname.
    pub fn domain(&self) -> &'static str {
        match self {
            Store::Amazon => "amazon.com",
            Store::Ebay => "ebay.com",
            Store::Walmart => "walmart.com",
            Store::BestBuy => "bestbuy.com",
            Store::Target => "target.com",
            Store::Newegg => "newegg.com",
            Store::Flipkart => "flipkart.com",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Store::Amazon => "amazon",
            Store::Ebay => "ebay",
            Store::Walmart => "walmart",
            Store::BestBuy => "bestbuy",
            Store::Target => "target",
            Store::Newegg => "newegg",
            Store::Flipkart => "flipkart",
        }
    }
}

pub mod product;
pub mod store;

pub use product::*;
pub use store::*;

// ISO 4217 codes emitted by the storefront strategies
pub const CURRENCY_USD: &str = "USD";
pub const CURRENCY_INR: &str = "INR";
pub const CURRENCY_EUR: &str = "EUR";
pub const CURRENCY_GBP: &str = "GBP";

pub const DEFAULT_CURRENCY: &str = CURRENCY_USD;

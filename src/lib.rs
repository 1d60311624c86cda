pub mod config;
pub mod discord;
pub mod dispatch;
pub mod error;
pub mod extractors;
pub mod gate;
pub mod models;
pub mod page;
pub mod parsers;
pub mod registry;
pub mod session;
pub mod storage;
pub mod utils;

pub use dispatch::Dispatcher;
pub use error::ExtractError;
pub use models::{ExtractedProduct, RawCandidate, Store};
pub use page::Page;
pub use session::{Request, Response, Session};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::ExtractedProduct;

mod sqlite;
pub use sqlite::SqliteStorage;

#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub price: f64,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: i64,
    pub product_url: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// A recorded price fell far enough to tell the user about it.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceDrop {
    pub title: String,
    pub store: String,
    pub product_url: String,
    pub image_url: Option<String>,
    pub currency: String,
    pub old_price: f64,
    pub new_price: f64,
    pub alert_price: Option<f64>,
    pub message: String,
}

impl PriceDrop {
    pub fn savings(&self) -> f64 {
        self.old_price - self.new_price
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// Not usable (no title or no price); nothing stored.
    Skipped,
    Created,
    Unchanged,
    PriceChanged {
        previous_price: f64,
        drop: Option<PriceDrop>,
    },
}

#[async_trait]
pub trait Storage: Send + Sync {
    async fn migrate(&self) -> Result<()>;
    async fn record_extraction(&self, product: &ExtractedProduct) -> Result<RecordOutcome>;
    async fn set_alert(&self, product_url: &str, enabled: bool, alert_price: Option<f64>) -> Result<bool>;
    async fn price_history(&self, product_url: &str) -> Result<Vec<PricePoint>>;
    async fn unread_notifications(&self) -> Result<Vec<Notification>>;
    async fn mark_notification_read(&self, id: i64) -> Result<bool>;
}

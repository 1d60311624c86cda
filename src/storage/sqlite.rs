use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

use crate::models::ExtractedProduct;
use crate::parsers::format_price;
use crate::storage::{Notification, PriceDrop, PricePoint, RecordOutcome, Storage};

// Prices closer than this are the same price
const PRICE_EPSILON: f64 = 0.005;

pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
    drop_threshold_percent: f64,
}

struct StoredProduct {
    id: i64,
    current_price: f64,
    is_alert_set: bool,
    alert_price: Option<f64>,
}

impl SqliteStorage {
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)
            .context("Failed to open SQLite database")?;

        Ok(Self::from_connection(conn))
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .context("Failed to open in-memory SQLite database")?;

        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            drop_threshold_percent: 0.0,
        }
    }

    /// Minimum drop, in percent of the previous price, reported for products
    /// with alerts enabled but no explicit alert price crossed.
    pub fn with_drop_threshold(mut self, percent: f64) -> Self {
        self.drop_threshold_percent = percent.max(0.0);
        self
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("SQLite connection mutex poisoned"))
    }

    fn detect_drop(&self, stored: &StoredProduct, product: &ExtractedProduct, new_price: f64) -> Option<PriceDrop> {
        if !stored.is_alert_set {
            return None;
        }

        let old_price = stored.current_price;
        let currency = &product.currency;

        let message = match stored.alert_price {
            Some(alert) if new_price <= alert && old_price > alert => format!(
                "Price for {} dropped to {}! (Your alert was set at {})",
                product.title,
                format_price(new_price, currency),
                format_price(alert, currency)
            ),
            _ if new_price < old_price
                && old_price > 0.0
                && (old_price - new_price) / old_price * 100.0 >= self.drop_threshold_percent =>
            {
                format!(
                    "{} is now {} at {}. You're saving {}!",
                    product.title,
                    format_price(new_price, currency),
                    product.store,
                    format_price(old_price - new_price, currency)
                )
            }
            _ => return None,
        };

        Some(PriceDrop {
            title: product.title.clone(),
            store: product.store.clone(),
            product_url: product.product_url.clone(),
            image_url: product.image_url.clone(),
            currency: currency.clone(),
            old_price,
            new_price,
            alert_price: stored.alert_price,
            message,
        })
    }
}

fn insert_history(tx: &Transaction<'_>, product_id: i64, price: f64, date: &str) -> Result<()> {
    tx.execute(
        "INSERT INTO price_history (product_id, price, date) VALUES (?1, ?2, ?3)",
        params![product_id, price, date],
    )?;
    Ok(())
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|date| date.with_timezone(&Utc))
        .with_context(|| format!("Invalid stored timestamp {}", value))
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn migrate(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                product_key TEXT NOT NULL,
                title TEXT NOT NULL,
                image_url TEXT,
                current_price REAL NOT NULL,
                original_price REAL,
                currency TEXT NOT NULL DEFAULT 'USD',
                store TEXT NOT NULL,
                product_url TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL,
                last_updated TEXT NOT NULL,
                is_alert_set INTEGER NOT NULL DEFAULT 0,
                alert_price REAL
            );

            CREATE TABLE IF NOT EXISTS price_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                product_id INTEGER NOT NULL REFERENCES products(id),
                price REAL NOT NULL,
                date TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS notifications (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                product_id INTEGER NOT NULL REFERENCES products(id),
                message TEXT NOT NULL,
                is_read INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_history_product ON price_history(product_id);
            CREATE INDEX IF NOT EXISTS idx_notifications_unread ON notifications(is_read);",
        )?;

        info!("Database migration completed");
        Ok(())
    }

    async fn record_extraction(&self, product: &ExtractedProduct) -> Result<RecordOutcome> {
        let price = match product.current_price {
            Some(price) if product.is_usable() => price,
            _ => return Ok(RecordOutcome::Skipped),
        };

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let now = Utc::now().to_rfc3339();

        let existing = tx
            .query_row(
                "SELECT id, current_price, is_alert_set, alert_price FROM products WHERE product_url = ?1",
                params![&product.product_url],
                |row| {
                    Ok(StoredProduct {
                        id: row.get(0)?,
                        current_price: row.get(1)?,
                        is_alert_set: row.get(2)?,
                        alert_price: row.get(3)?,
                    })
                },
            )
            .optional()?;

        let outcome = match existing {
            None => {
                tx.execute(
                    "INSERT INTO products (product_key, title, image_url, current_price, original_price,
                                           currency, store, product_url, created_at, last_updated)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
                    params![
                        product.key().0,
                        &product.title,
                        &product.image_url,
                        price,
                        product.original_price,
                        &product.currency,
                        &product.store,
                        &product.product_url,
                        &now
                    ],
                )?;
                insert_history(&tx, tx.last_insert_rowid(), price, &now)?;
                info!("Tracking new product {} at {}", product.title, format_price(price, &product.currency));
                RecordOutcome::Created
            }
            Some(stored) => {
                tx.execute(
                    "UPDATE products SET title = ?1, image_url = ?2, original_price = ?3, currency = ?4,
                                         store = ?5, last_updated = ?6
                     WHERE id = ?7",
                    params![
                        &product.title,
                        &product.image_url,
                        product.original_price,
                        &product.currency,
                        &product.store,
                        &now,
                        stored.id
                    ],
                )?;

                if (stored.current_price - price).abs() < PRICE_EPSILON {
                    RecordOutcome::Unchanged
                } else {
                    tx.execute(
                        "UPDATE products SET current_price = ?1 WHERE id = ?2",
                        params![price, stored.id],
                    )?;
                    insert_history(&tx, stored.id, price, &now)?;

                    let drop = self.detect_drop(&stored, product, price);
                    if let Some(drop) = &drop {
                        tx.execute(
                            "INSERT INTO notifications (product_id, message, created_at) VALUES (?1, ?2, ?3)",
                            params![stored.id, &drop.message, &now],
                        )?;
                        info!("{}", drop.message);
                    }

                    RecordOutcome::PriceChanged {
                        previous_price: stored.current_price,
                        drop,
                    }
                }
            }
        };

        tx.commit()?;
        Ok(outcome)
    }

    async fn set_alert(&self, product_url: &str, enabled: bool, alert_price: Option<f64>) -> Result<bool> {
        let conn = self.conn()?;

        let updated = conn.execute(
            "UPDATE products SET is_alert_set = ?1, alert_price = ?2 WHERE product_url = ?3",
            params![enabled, alert_price.filter(|_| enabled), product_url],
        )?;

        Ok(updated > 0)
    }

    async fn price_history(&self, product_url: &str) -> Result<Vec<PricePoint>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT h.price, h.date FROM price_history h
             JOIN products p ON p.id = h.product_id
             WHERE p.product_url = ?1
             ORDER BY h.id",
        )?;
        let rows = stmt
            .query_map(params![product_url], |row| {
                Ok((row.get::<_, f64>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(price, date)| {
                Ok(PricePoint {
                    price,
                    date: parse_timestamp(&date)?,
                })
            })
            .collect()
    }

    async fn unread_notifications(&self) -> Result<Vec<Notification>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT n.id, p.product_url, n.message, n.is_read, n.created_at FROM notifications n
             JOIN products p ON p.id = n.product_id
             WHERE n.is_read = 0
             ORDER BY n.id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, bool>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(id, product_url, message, is_read, created_at)| {
                Ok(Notification {
                    id,
                    product_url,
                    message,
                    is_read,
                    created_at: parse_timestamp(&created_at)?,
                })
            })
            .collect()
    }

    async fn mark_notification_read(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;

        let updated = conn.execute(
            "UPDATE notifications SET is_read = 1 WHERE id = ?1",
            params![id],
        )?;

        Ok(updated > 0)
    }
}

use anyhow::{Context, Result};
use ::config::{Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "price_watch";
const ENV_PREFIX: &str = "PRICE_WATCH";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub user_agent: String,
    pub check_interval_seconds: u64,
    pub database_path: String,
    pub webhook_url: Option<String>,
    pub notifications: NotificationSettings,
    pub watch: Vec<WatchTarget>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Send webhook notifications for drops and newly tracked products.
    pub push_notifications: bool,
    /// Run the product-page gate before extracting a watched page.
    pub auto_detect_products: bool,
    /// Percent of the previous price a drop must reach to be reported.
    pub price_drop_threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchTarget {
    pub url: String,
    #[serde(default)]
    pub alert_price: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36".to_string(),
            check_interval_seconds: 3600,
            database_path: "price_watch.db".to_string(),
            webhook_url: None,
            notifications: NotificationSettings::default(),
            watch: Vec::new(),
        }
    }
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            push_notifications: true,
            auto_detect_products: true,
            price_drop_threshold: 5.0,
        }
    }
}

impl Config {
    /// Defaults, then `price_watch.toml` if present, then `PRICE_WATCH__*` variables.
    pub fn load() -> Result<Self> {
        ::config::Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        ::config::Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn webhook(&self) -> Option<&str> {
        self.webhook_url
            .as_deref()
            .filter(|url| self.notifications.push_notifications && !url.trim().is_empty())
    }
}

use anyhow::Result;
use chrono::Local;
use futures::future::join_all;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info, warn};

use price_watch::config::{Config, WatchTarget};
use price_watch::discord;
use price_watch::parsers::format_price;
use price_watch::session::{Request, Response, Session, TabId, TracingPresenter};
use price_watch::storage::{PriceDrop, RecordOutcome, SqliteStorage, Storage};
use price_watch::utils::http::{create_client, fetch_html};
use price_watch::{Dispatcher, Page};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("price_watch=info".parse()?),
        )
        .init();

    info!("Starting Price Watch");

    let config = Arc::new(Config::load()?);
    if config.watch.is_empty() {
        warn!("No products configured under [[watch]], nothing to check");
    }

    let storage = Arc::new(
        SqliteStorage::new(&config.database_path)
            .await?
            .with_drop_threshold(config.notifications.price_drop_threshold),
    );
    storage.migrate().await?;

    let client = Arc::new(create_client(&config.user_agent)?);
    let session = Arc::new(Session::new(Dispatcher::default(), TracingPresenter));

    let request = if config.notifications.auto_detect_products {
        Request::DetectOnNavigation
    } else {
        Request::ExtractNow
    };

    let mut interval = interval(Duration::from_secs(config.check_interval_seconds.max(1)));

    loop {
        interval.tick().await;

        info!("--- Starting new check cycle at {} ---", Local::now().format("%Y-%m-%d %H:%M:%S"));

        let client: &Client = &client;
        let storage: &dyn Storage = &*storage;
        let session: &Session<TracingPresenter> = &session;
        let config: &Config = &config;

        // One tab per watched URL
        let checks = config.watch.iter().enumerate().map(move |(index, target)| {
            check_target(client, storage, session, config, index as TabId, target, request)
        });

        let mut drops = Vec::new();
        for result in join_all(checks).await {
            match result {
                Ok(Some(drop)) => drops.push(drop),
                Ok(None) => {}
                Err(e) => error!("Error in check task: {:#}", e),
            }
        }

        if !drops.is_empty() {
            info!("{} price drops this cycle", drops.len());
            if let Some(webhook) = config.webhook() {
                if let Err(e) = discord::send_price_drops(client, webhook, &drops).await {
                    error!("Failed to send Discord notification: {}", e);
                }
            }
        }

        info!("Check cycle completed, waiting {} seconds", config.check_interval_seconds);
    }
}

async fn check_target(
    client: &Client,
    storage: &dyn Storage,
    session: &Session<TracingPresenter>,
    config: &Config,
    tab: TabId,
    target: &WatchTarget,
    request: Request,
) -> Result<Option<PriceDrop>> {
    let html = fetch_html(client, &target.url).await?;

    // The parsed document is not Send; drop it before the next await.
    let response = {
        let page = Page::parse(&html, &target.url)?;
        session.handle(tab, request, &page)
    };

    let product = match response {
        Response::Product(product) => product,
        Response::NothingFound => {
            info!("No product found at {}", target.url);
            return Ok(None);
        }
    };

    let outcome = storage.record_extraction(&product).await?;
    if outcome != RecordOutcome::Skipped {
        storage
            .set_alert(&product.product_url, true, target.alert_price)
            .await?;
    }

    let drop = match outcome {
        RecordOutcome::Skipped => {
            info!("Price unavailable for {}", product.title);
            None
        }
        RecordOutcome::Created => {
            info!("Now tracking {} on {}", product.title, product.store);
            if let Some(webhook) = config.webhook() {
                if let Err(e) = discord::send_tracking_started(client, webhook, &product).await {
                    error!("Failed to send Discord notification: {}", e);
                }
            }
            None
        }
        RecordOutcome::Unchanged => {
            info!("No price change for {}", product.title);
            None
        }
        RecordOutcome::PriceChanged { previous_price, drop } => {
            info!(
                "Price for {} changed from {} to {}",
                product.title,
                format_price(previous_price, &product.currency),
                product
                    .current_price
                    .map(|price| format_price(price, &product.currency))
                    .unwrap_or_default()
            );
            drop
        }
    };

    Ok(drop)
}

pub mod embed;

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::models::ExtractedProduct;
use crate::storage::PriceDrop;
use embed::{drop_summary_embed, price_drop_embed, tracking_embed};

pub async fn send_price_drop(client: &Client, webhook_url: &str, drop: &PriceDrop) -> Result<()> {
    post_embed(client, webhook_url, price_drop_embed(drop), &drop.title).await
}

/// One alert for the first drop of a cycle, then a summary of the rest.
pub async fn send_price_drops(client: &Client, webhook_url: &str, drops: &[PriceDrop]) -> Result<()> {
    let Some((first, others)) = drops.split_first() else {
        return Ok(());
    };

    send_price_drop(client, webhook_url, first).await?;

    if !others.is_empty() {
        post_embed(client, webhook_url, drop_summary_embed(others), "price drop summary").await?;
    }

    Ok(())
}

pub async fn send_tracking_started(
    client: &Client,
    webhook_url: &str,
    product: &ExtractedProduct,
) -> Result<()> {
    post_embed(client, webhook_url, tracking_embed(product), &product.title).await
}

async fn post_embed(client: &Client, webhook_url: &str, embed: Value, subject: &str) -> Result<()> {
    let payload = json!({
        "embeds": [embed]
    });

    let response = client
        .post(webhook_url)
        .json(&payload)
        .send()
        .await
        .context("Failed to send Discord webhook")?;

    if response.status().is_success() {
        info!("Successfully sent Discord notification for {}", subject);
        Ok(())
    } else {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
        error!("Discord webhook failed with status {}: {}", status, error_text);
        Err(anyhow::anyhow!("Discord webhook failed: {} - {}", status, error_text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn product() -> ExtractedProduct {
        ExtractedProduct {
            title: "USB-C Hub".to_string(),
            current_price: Some(39.99),
            original_price: Some(49.99),
            image_url: None,
            currency: "USD".to_string(),
            store: "Newegg".to_string(),
            product_url: "https://www.newegg.com/p/N82E1".to_string(),
        }
    }

    #[tokio::test]
    async fn posts_embed_to_webhook() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/webhook"))
            .and(body_partial_json(json!({ "embeds": [{ "title": "USB-C Hub" }] })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let webhook = format!("{}/webhook", server.uri());
        send_tracking_started(&Client::new(), &webhook, &product())
            .await
            .unwrap();
    }

    fn drop(title: &str) -> PriceDrop {
        PriceDrop {
            title: title.to_string(),
            store: "Newegg".to_string(),
            product_url: "https://www.newegg.com/p/N82E1".to_string(),
            image_url: None,
            currency: "USD".to_string(),
            old_price: 49.99,
            new_price: 39.99,
            alert_price: None,
            message: format!("{} is now $39.99 at Newegg. You're saving $10.00!", title),
        }
    }

    #[tokio::test]
    async fn several_drops_send_alert_and_summary() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "embeds": [{ "title": "USB-C Hub" }] })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "embeds": [{ "author": { "name": "Multiple Price Drops" } }] })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let drops = [drop("USB-C Hub"), drop("Keyboard"), drop("Mouse")];
        send_price_drops(&Client::new(), &server.uri(), &drops)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn single_drop_sends_no_summary() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        send_price_drops(&Client::new(), &server.uri(), &[drop("USB-C Hub")])
            .await
            .unwrap();
        send_price_drops(&Client::new(), &server.uri(), &[])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rejected_webhook_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Invalid Form Body"))
            .mount(&server)
            .await;

        let err = send_price_drop(&Client::new(), &server.uri(), &drop("USB-C Hub"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid Form Body"));
    }
}

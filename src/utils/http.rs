use anyhow::{Context, Result};
use reqwest::{Client, ClientBuilder, Response};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, warn};

pub fn create_client(user_agent: &str) -> Result<Client> {
    let client = ClientBuilder::new()
        .user_agent(user_agent)
        .cookie_store(true)
        .timeout(Duration::from_secs(25))
        .pool_max_idle_per_host(6)
        .build()?;

    Ok(client)
}

pub async fn fetch_with_retry(client: &Client, url: &str, max_retries: u32) -> Result<Response> {
    fetch_with_backoff(client, url, max_retries, Duration::from_secs(2)).await
}

/// Retries failed requests and non-success statuses, waiting `base^attempt`.
pub async fn fetch_with_backoff(
    client: &Client,
    url: &str,
    max_retries: u32,
    base_delay: Duration,
) -> Result<Response> {
    let mut attempts = 0;
    let mut last_error = None;

    while attempts < max_retries {
        match client.get(url).send().await {
            Ok(response) => {
                if response.status().is_success() {
                    return Ok(response);
                } else {
                    let status = response.status();
                    warn!("HTTP error {}: {}", status, url);
                    last_error = Some(anyhow::anyhow!("HTTP error: {}", status));
                }
            }
            Err(e) => {
                error!("Request failed for {}: {}", url, e);
                last_error = Some(e.into());
            }
        }

        attempts += 1;
        if attempts < max_retries {
            let delay = base_delay * 2u32.pow(attempts - 1);
            warn!("Retrying in {:?}... (attempt {}/{})", delay, attempts + 1, max_retries);
            sleep(delay).await;
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Max retries exceeded")))
        .context(format!("Failed to fetch {} after {} attempts", url, max_retries))
}

pub async fn fetch_html(client: &Client, url: &str) -> Result<String> {
    let response = fetch_with_retry(client, url, 3).await?;
    response
        .text()
        .await
        .with_context(|| format!("Failed to read body of {}", url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn retries_until_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/item"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/item"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let client = create_client("price-watch-test").unwrap();
        let url = format!("{}/item", server.uri());
        let response = fetch_with_backoff(&client, &url, 3, Duration::from_millis(1))
            .await
            .unwrap();
        assert_eq!(response.text().await.unwrap(), "<html></html>");
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(2)
            .mount(&server)
            .await;

        let client = create_client("price-watch-test").unwrap();
        let err = fetch_with_backoff(&client, &server.uri(), 2, Duration::from_millis(1))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("after 2 attempts"));
    }
}

use anyhow::{Context, Result};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, Retry};

use crate::config::SourcesConfig;

/// Shared HTTP client for the weather, soil and elevation services.
#[derive(Clone, Debug)]
pub struct SourceClient {
    http: reqwest::Client,
    pub config: SourcesConfig,
}

/// Install the ring crypto provider for rustls 0.23+. A provider that is
/// already installed is kept.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Create a client honoring the configured timeout
pub fn create_client(config: &SourcesConfig) -> Result<SourceClient> {
    install_crypto_provider();

    let timeout = config
        .timeout_duration()
        .with_context(|| format!("Invalid sources.timeout '{}'", config.timeout))?;

    let http = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("landslide-risk/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")?;

    Ok(SourceClient {
        http,
        config: config.clone(),
    })
}

impl SourceClient {
    /// GET `url` and decode the JSON body, retrying failures with backoff.
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(2))
            .take(self.config.retries);

        Retry::spawn(retry_strategy, || async {
            let response = self
                .http
                .get(url.clone())
                .send()
                .await
                .with_context(|| format!("Request to {} failed", url.host_str().unwrap_or("upstream")))?;
            let response = response
                .error_for_status()
                .context("Upstream returned an error status")?;
            response
                .json::<T>()
                .await
                .context("Failed to decode upstream JSON")
        })
        .await
    }
}

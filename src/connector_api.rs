//! Upstream character API connector.
//!
//! Issues one unauthenticated `GET` against `[upstream].url` and decodes the
//! body as a [`CharacterPage`]. The API paginates; only the first page is
//! requested. `info.pages` is surfaced for logging, never followed.
//!
//! # Configuration
//!
//! ```toml
//! [upstream]
//! url = "https://rickandmortyapi.com/api/character"
//! timeout_secs = 30
//! ```

use async_trait::async_trait;
use std::time::Duration;

use crate::config::UpstreamConfig;
use crate::error::{Error, Result};
use crate::models::CharacterPage;
use crate::traits::Connector;

/// HTTP connector for the public character API.
pub struct ApiConnector {
    url: String,
    client: reqwest::Client,
}

impl ApiConnector {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Fetch(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            url: config.url.clone(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Connector for ApiConnector {
    fn name(&self) -> &str {
        "rickandmortyapi"
    }

    async fn fetch_page(&self) -> Result<CharacterPage> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("GET {}: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(Error::Fetch(format!(
                "GET {} returned {}: {}",
                self.url, status, body_text
            )));
        }

        response
            .json::<CharacterPage>()
            .await
            .map_err(|e| Error::Fetch(format!("cannot decode response from {}: {}", self.url, e)))
    }
}

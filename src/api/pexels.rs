//! Pexels-compatible stock photo search.
//!
//! [Pexels API Documentation](https://www.pexels.com/api/documentation/)

use crate::api::{ImageSearch, StockPhoto, snippet};
use crate::aspect::Orientation;
use crate::config::Config;
use crate::error::ProviderError;
use crate::logw;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const PEXELS_API_BASE: &str = "https://api.pexels.com/v1";
const PROVIDER: &str = "pexels";
// Pexels caps page size at 80.
const MAX_PER_PAGE: u32 = 80;

#[derive(Debug, Clone)]
pub struct PexelsClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct PexelsSearchResponse {
    photos: Vec<StockPhoto>,
}

impl PexelsClient {
    pub fn new(client: Client, cfg: &Config) -> Self {
        Self {
            client,
            api_key: cfg.pexels_api_key.clone(),
            base_url: PEXELS_API_BASE.to_string(),
            timeout: Duration::from_secs(cfg.provider_timeout_secs),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl ImageSearch for PexelsClient {
    async fn search(
        &self,
        query: &str,
        per_page: u32,
        orientation: Option<Orientation>,
    ) -> Result<Vec<StockPhoto>, ProviderError> {
        let per_page = per_page.clamp(1, MAX_PER_PAGE).to_string();
        let mut params = vec![("query", query), ("per_page", per_page.as_str())];
        if let Some(orientation) = orientation {
            params.push(("orientation", orientation.as_str()));
        }

        let resp = self
            .client
            .get(format!("{}/search", self.base_url))
            .header("Authorization", &self.api_key)
            .header("Accept", "application/json")
            .query(&params)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        let status = resp.status();
        let raw = resp
            .text()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        if !status.is_success() {
            logw(format!("Pexels HTTP {}: {}", status.as_u16(), snippet(&raw)));
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
                message: snippet(&raw),
            });
        }

        let parsed: PexelsSearchResponse = serde_json::from_str(&raw)
            .map_err(|e| ProviderError::decode(PROVIDER, e.to_string()))?;
        Ok(parsed.photos)
    }
}

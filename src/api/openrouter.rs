use crate::api::{ChatCompletion, ChatRequest, snippet};
use crate::config::Config;
use crate::error::ProviderError;
use crate::logw;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

pub const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";
const PROVIDER: &str = "openrouter";

/// OpenRouter-compatible chat-completions client.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    referer: String,
    title: String,
    timeout: Duration,
}

impl OpenRouterClient {
    pub fn new(client: Client, cfg: &Config) -> Self {
        Self {
            client,
            api_key: cfg.openrouter_api_key.clone(),
            base_url: OPENROUTER_API_BASE.to_string(),
            model: cfg.script_model.clone(),
            referer: cfg.app_referer.clone(),
            title: cfg.app_title.clone(),
            timeout: Duration::from_secs(cfg.provider_timeout_secs),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn request_body(&self, request: &ChatRequest) -> serde_json::Value {
        json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.user},
            ],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
            "top_p": 1,
            "stream": false,
        })
    }
}

/// Pull `error.message` out of a failed response, logging type and code.
fn provider_error_message(raw: &str) -> Option<String> {
    let root: serde_json::Value = serde_json::from_str(raw).ok()?;
    let err = root.get("error")?;

    if let Some(typ) = err.get("type").and_then(|v| v.as_str()) {
        logw(format!("OpenRouter error type: {}", typ));
    }
    if let Some(code) = err.get("code") {
        logw(format!("OpenRouter error code: {}", code));
    }

    err.get("message")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

#[async_trait]
impl ChatCompletion for OpenRouterClient {
    async fn complete(&self, request: &ChatRequest) -> Result<serde_json::Value, ProviderError> {
        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(&self.request_body(request))
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
            logw(format!("OpenRouter HTTP {}", status.as_u16()));
            if !raw.is_empty() {
                logw(format!("OpenRouter raw body: {}", snippet(&raw)));
            }
            let message = provider_error_message(&raw)
                .unwrap_or_else(|| format!("API request failed with status {}", status.as_u16()));
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&raw).map_err(|e| {
            logw(format!("OpenRouter response parse failed: {}", snippet(&raw)));
            ProviderError::decode(PROVIDER, e.to_string())
        })
    }
}

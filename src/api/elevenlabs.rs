use crate::api::{SpeechSynthesis, snippet};
use crate::config::Config;
use crate::error::ProviderError;
use crate::logw;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const ELEVENLABS_API_BASE: &str = "https://api.elevenlabs.io/v1";
const PROVIDER: &str = "elevenlabs";

#[derive(Debug, Clone)]
pub struct ElevenLabsClient {
    client: Client,
    api_key: String,
    voice_id: String,
    model_id: String,
    base_url: String,
    timeout: Duration,
}

impl ElevenLabsClient {
    /// `None` when the config carries no ElevenLabs key.
    pub fn from_config(client: Client, cfg: &Config) -> Option<Self> {
        if !cfg.narration_enabled() {
            return None;
        }
        let api_key = cfg.elevenlabs_api_key.clone()?;
        Some(Self {
            client,
            api_key,
            voice_id: cfg.eleven_voice_id.clone(),
            model_id: cfg.eleven_model_id.clone(),
            base_url: ELEVENLABS_API_BASE.to_string(),
            timeout: Duration::from_secs(cfg.provider_timeout_secs),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl SpeechSynthesis for ElevenLabsClient {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ProviderError> {
        let url = format!(
            "{}/text-to-speech/{}?output_format=mp3_44100_128",
            self.base_url, self.voice_id
        );

        let body = serde_json::json!({
            "text": text,
            "model_id": self.model_id,
        });

        let resp = self
            .client
            .post(url)
            .header("xi-api-key", &self.api_key)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        let status = resp.status();
        if !status.is_success() {
            let raw = resp.text().await.unwrap_or_default();
            logw(format!("ElevenLabs TTS failed HTTP {}", status.as_u16()));
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
                message: snippet(&raw),
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;
        if bytes.is_empty() {
            return Err(ProviderError::Extraction { provider: PROVIDER });
        }
        Ok(bytes.to_vec())
    }
}

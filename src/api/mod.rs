//! Clients for the upstream providers, and the traits the pipeline uses to
//! talk to them.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

use crate::aspect::Orientation;
use crate::error::ProviderError;

pub mod elevenlabs;
pub mod openrouter;
pub mod pexels;

/// Chat-completion request: one system and one user message.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// A text-generation provider. Returns the raw response envelope; the
/// caller decides how to dig the text out of it.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<serde_json::Value, ProviderError>;
}

/// One image-search hit with its size variants (`medium`, `large2x`, ...).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StockPhoto {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub src: HashMap<String, String>,
}

#[async_trait]
pub trait ImageSearch: Send + Sync {
    async fn search(
        &self,
        query: &str,
        per_page: u32,
        orientation: Option<Orientation>,
    ) -> Result<Vec<StockPhoto>, ProviderError>;
}

#[async_trait]
pub trait SpeechSynthesis: Send + Sync {
    /// Render `text` to MP3 bytes.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ProviderError>;
}

pub(crate) fn snippet(raw: &str) -> String {
    raw.chars().take(800).collect()
}

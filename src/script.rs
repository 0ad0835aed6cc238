//! Script generation: one chat-completion call turned into a bulleted list
//! of visual beats.

use crate::api::{ChatCompletion, ChatRequest};
use crate::error::ProviderError;
use crate::{logi, logw};
use serde_json::Value;
use std::sync::Arc;

pub const BULLET: char = '•';

pub const SYSTEM_INSTRUCTION: &str = "You are a fast and efficient script writer. \
Turn the user's idea into 4-10 short, vivid bullet points that each describe one key visual moment. \
Write every bullet as a single concise sentence that could be matched to a stock photo.";

/// A named way of digging generated text out of a response envelope.
pub struct Extractor {
    pub name: &'static str,
    pub extract: fn(&Value) -> Option<&str>,
}

/// Strategies tried in order against `choices[0]`; first non-empty wins.
pub const EXTRACTORS: &[Extractor] = &[
    Extractor {
        name: "message.content",
        extract: |choice| choice.get("message")?.get("content")?.as_str(),
    },
    Extractor {
        name: "text",
        extract: |choice| choice.get("text")?.as_str(),
    },
    Extractor {
        name: "raw string",
        extract: Value::as_str,
    },
];

/// Run [`EXTRACTORS`] against the first choice of `envelope`.
pub fn extract_generated_text(envelope: &Value) -> Option<(&'static str, String)> {
    let choice = envelope.get("choices")?.as_array()?.first()?;
    EXTRACTORS.iter().find_map(|extractor| {
        (extractor.extract)(choice)
            .filter(|text| !text.trim().is_empty())
            .map(|text| (extractor.name, text.to_string()))
    })
}

/// Trim every line, drop blank ones and make sure each starts with [`BULLET`].
/// Idempotent.
pub fn normalize_bullets(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            if line.starts_with(BULLET) {
                line.to_string()
            } else {
                format!("{BULLET} {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct ScriptGenerator {
    chat: Arc<dyn ChatCompletion>,
    temperature: f64,
    max_tokens: u32,
}

impl ScriptGenerator {
    pub fn new(chat: Arc<dyn ChatCompletion>, temperature: f64, max_tokens: u32) -> Self {
        Self {
            chat,
            temperature,
            max_tokens,
        }
    }

    pub fn request_for(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            system: SYSTEM_INSTRUCTION.to_string(),
            user: format!("Create quick visual bullet points for: {}", prompt.trim()),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// Generate a bullet-formatted script for `prompt`.
    ///
    /// A response without usable text is an [`ProviderError::Extraction`],
    /// never an empty script.
    pub async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let envelope = self.chat.complete(&self.request_for(prompt)).await?;

        let Some((strategy, text)) = extract_generated_text(&envelope) else {
            logw(format!(
                "Unexpected script response format: {}",
                crate::api::snippet(&envelope.to_string())
            ));
            return Err(ProviderError::Extraction {
                provider: "openrouter",
            });
        };

        let script = normalize_bullets(&text);
        if script.is_empty() {
            return Err(ProviderError::Extraction {
                provider: "openrouter",
            });
        }

        logi(format!(
            "Script generated via {}: {} lines",
            strategy,
            script.lines().count()
        ));
        Ok(script)
    }
}

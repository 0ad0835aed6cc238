//! Server-side narration of a storyboard's captions.

use crate::api::SpeechSynthesis;
use crate::error::ProviderError;
use crate::logi;
use std::sync::Arc;

/// Longest text sent to the speech provider in one request, in bytes.
pub const MAX_NARRATION_BYTES: usize = 5_000;

fn trim_copy_utf8_safe(input: &str, max_bytes: usize) -> &str {
    if input.len() <= max_bytes {
        return input;
    }

    let mut cut = max_bytes;
    while cut > 0 && !input.is_char_boundary(cut) {
        cut -= 1;
    }
    &input[..cut]
}

/// Join captions into one narration, one sentence per caption.
pub fn narration_text<'a>(captions: impl IntoIterator<Item = &'a str>) -> String {
    captions
        .into_iter()
        .map(|caption| caption.trim().trim_start_matches('•').trim())
        .filter(|caption| !caption.is_empty())
        .map(|caption| {
            if caption.ends_with(['.', '!', '?']) {
                caption.to_string()
            } else {
                format!("{caption}.")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Clone)]
pub struct Narrator {
    speech: Arc<dyn SpeechSynthesis>,
}

impl Narrator {
    pub fn new(speech: Arc<dyn SpeechSynthesis>) -> Self {
        Self { speech }
    }

    /// Synthesize `text` to MP3, truncated to [`MAX_NARRATION_BYTES`].
    pub async fn narrate(&self, text: &str) -> Result<Vec<u8>, ProviderError> {
        let text = trim_copy_utf8_safe(text.trim(), MAX_NARRATION_BYTES);
        logi(format!("Narrating {} bytes of text", text.len()));
        self.speech.synthesize(text).await
    }
}

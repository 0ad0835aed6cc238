use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::{Json, Router, routing::post};
use serde::{Deserialize, Serialize};

use crate::aspect::AspectRatio;
use crate::error::{AppError, AppResult};
use crate::partition::PartitionMode;
use crate::routes::{non_blank, parse_body};
use crate::state::AppState;
use crate::storyboard::{StoryboardImage, StoryboardRequest};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateStoryboardRequest {
    pub script: Option<String>,
    pub image_count: Option<i64>,
    pub aspect_ratio: Option<String>,
    #[serde(default)]
    pub is_reload: bool,
}

#[derive(Debug, Serialize)]
pub struct GenerateStoryboardResponse {
    pub images: Vec<StoryboardImage>,
}

impl GenerateStoryboardRequest {
    /// Check required fields, naming every missing one in the error.
    pub fn validate(&self) -> AppResult<StoryboardRequest> {
        let script = non_blank(self.script.as_deref());
        let label = non_blank(self.aspect_ratio.as_deref());

        let mut missing = Vec::new();
        if script.is_none() {
            missing.push("script");
        }
        if self.image_count.is_none() {
            missing.push("imageCount");
        }
        if label.is_none() {
            missing.push("aspectRatio");
        }
        if !missing.is_empty() {
            return Err(AppError::BadRequest(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let image_count = self
            .image_count
            .filter(|count| *count >= 1)
            .and_then(|count| usize::try_from(count).ok())
            .ok_or_else(|| AppError::BadRequest("imageCount must be at least 1".to_string()))?;

        // Reloads reuse the caption exactly as the client holds it.
        let (script, mode) = if self.is_reload {
            (self.script.clone().unwrap_or_default(), PartitionMode::ReuseWhole)
        } else {
            (script.unwrap_or_default().to_string(), PartitionMode::Fresh)
        };

        Ok(StoryboardRequest {
            script,
            image_count,
            aspect_ratio: AspectRatio::from_label(label.unwrap_or_default()),
            mode,
        })
    }
}

/// POST /generate
///
/// Per-part misses are skipped; only an entirely empty result is a 404.
async fn generate_storyboard(
    State(state): State<AppState>,
    payload: Result<Json<GenerateStoryboardRequest>, JsonRejection>,
) -> AppResult<Json<GenerateStoryboardResponse>> {
    let request = parse_body(payload)?.validate()?;
    let images = state.images.storyboard(&request).await?;
    Ok(Json(GenerateStoryboardResponse { images }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/generate", post(generate_storyboard))
}

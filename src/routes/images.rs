use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::{Json, Router, routing::post};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::routes::{non_blank, parse_body};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateImagesRequest {
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateImagesResponse {
    pub success: bool,
    pub images: Vec<String>,
    pub message: &'static str,
}

/// POST /generate-images
///
/// Quick preview: a single search for the whole prompt.
async fn generate_images(
    State(state): State<AppState>,
    payload: Result<Json<GenerateImagesRequest>, JsonRejection>,
) -> AppResult<Json<GenerateImagesResponse>> {
    let body = parse_body(payload)?;
    let prompt = non_blank(body.prompt.as_deref())
        .ok_or_else(|| AppError::BadRequest("Invalid prompt input".to_string()))?;

    let images = state.images.preview(prompt).await?;
    if images.is_empty() {
        return Err(AppError::NotFound(
            "No images found for the given prompt".to_string(),
        ));
    }

    Ok(Json(GenerateImagesResponse {
        success: true,
        images,
        message: "Images generated successfully",
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/generate-images", post(generate_images))
}

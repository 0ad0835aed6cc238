use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::{Json, Router, routing::post};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::narration::narration_text;
use crate::routes::{non_blank, parse_body};
use crate::state::AppState;

/// Either free `text` or a list of storyboard `captions`.
#[derive(Debug, Deserialize)]
pub struct NarrateRequest {
    pub text: Option<String>,
    #[serde(default)]
    pub captions: Vec<String>,
}

/// POST /narrate
async fn narrate(
    State(state): State<AppState>,
    payload: Result<Json<NarrateRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let body = parse_body(payload)?;

    let text = match non_blank(body.text.as_deref()) {
        Some(text) => text.to_string(),
        None => narration_text(body.captions.iter().map(String::as_str)),
    };
    if text.is_empty() {
        return Err(AppError::BadRequest("Text is required".to_string()));
    }

    let narrator = state
        .narrator
        .as_ref()
        .ok_or_else(|| AppError::Unavailable("Narration is not configured".to_string()))?;

    let audio = narrator.narrate(&text).await?;
    Ok(([(CONTENT_TYPE, "audio/mpeg")], audio))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/narrate", post(narrate))
}

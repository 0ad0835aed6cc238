use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::{Json, Router, routing::post};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::routes::{non_blank, parse_body};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateScriptRequest {
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateScriptResponse {
    pub script: String,
}

/// POST /generate-script
///
/// One upstream call; any failure aborts the request.
async fn generate_script(
    State(state): State<AppState>,
    payload: Result<Json<GenerateScriptRequest>, JsonRejection>,
) -> AppResult<Json<GenerateScriptResponse>> {
    let body = parse_body(payload)?;
    let prompt = non_blank(body.prompt.as_deref())
        .ok_or_else(|| AppError::BadRequest("Prompt is required".to_string()))?;

    let script = state.scripts.generate(prompt).await?;
    Ok(Json(GenerateScriptResponse { script }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/generate-script", post(generate_script))
}

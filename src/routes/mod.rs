use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::rejection::JsonRejection;

use crate::error::{AppError, AppResult};
use crate::router::with_deadline;
use crate::state::AppState;

pub mod health;
pub mod images;
pub mod narration;
pub mod script;
pub mod storyboard;

/// All API routes, mounted under `/api` by the router builder.
///
/// ```text
/// POST /generate-script    prompt -> bulleted script
/// POST /generate           script -> captioned images
/// POST /generate-images    prompt -> preview image URLs
/// POST /narrate            text   -> audio/mpeg
/// ```
///
/// Everything except `/generate` runs under `deadline`.
pub fn api_routes(deadline: Duration) -> Router<AppState> {
    let single_call = Router::new()
        .merge(script::router())
        .merge(images::router())
        .merge(narration::router());

    with_deadline(single_call, deadline).merge(storyboard::router())
}

/// Unwrap a JSON body, turning extractor rejections into our 400 shape.
pub(crate) fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// `Some(trimmed)` for a present, non-blank string field.
pub(crate) fn non_blank(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|value| !value.is_empty())
}

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use http_body_util::BodyExt;
use tower::ServiceExt;

use storyboard_studio::api::{
    ChatCompletion, ChatRequest, ImageSearch, SpeechSynthesis, StockPhoto,
};
use storyboard_studio::aspect::Orientation;
use storyboard_studio::config::Config;
use storyboard_studio::error::ProviderError;
use storyboard_studio::narration::Narrator;
use storyboard_studio::router::build_app_router;
use storyboard_studio::script::ScriptGenerator;
use storyboard_studio::state::AppState;
use storyboard_studio::storyboard::ImageResolver;

/// Minimal config with placeholder credentials.
pub fn test_config() -> Config {
    serde_json::from_value(serde_json::json!({
        "openrouter_api_key": "sk-or-test",
        "pexels_api_key": "px-test",
        "host": "127.0.0.1",
        "port": 0,
        "cors_origins": ["http://localhost:3000"],
    }))
    .unwrap()
}

pub fn photo(id: u64, variants: &[(&str, &str)]) -> StockPhoto {
    StockPhoto {
        id,
        alt: None,
        src: variants
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

/// Canned search outcomes keyed by query; unknown queries get no hits.
#[derive(Default)]
pub struct StubSearch {
    outcomes: HashMap<String, Result<Vec<StockPhoto>, u16>>,
    latency: Option<Duration>,
    pub calls: Mutex<Vec<(String, u32, Option<Orientation>)>>,
}

impl StubSearch {
    pub fn hit(mut self, query: &str, photo: StockPhoto) -> Self {
        self.outcomes.insert(query.to_string(), Ok(vec![photo]));
        self
    }

    pub fn hits(mut self, query: &str, photos: Vec<StockPhoto>) -> Self {
        self.outcomes.insert(query.to_string(), Ok(photos));
        self
    }

    pub fn fail(mut self, query: &str, status: u16) -> Self {
        self.outcomes.insert(query.to_string(), Err(status));
        self
    }

    /// Sleep this long before answering each search.
    pub fn slow(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(query, _, _)| query.clone())
            .collect()
    }
}

#[async_trait]
impl ImageSearch for StubSearch {
    async fn search(
        &self,
        query: &str,
        per_page: u32,
        orientation: Option<Orientation>,
    ) -> Result<Vec<StockPhoto>, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), per_page, orientation));

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        match self.outcomes.get(query) {
            Some(Ok(photos)) => Ok(photos.clone()),
            Some(Err(status)) => Err(ProviderError::Status {
                provider: "stub",
                status: *status,
                message: "stubbed failure".into(),
            }),
            None => Ok(Vec::new()),
        }
    }
}

/// Replies with a fixed envelope or a fixed HTTP failure.
pub struct StubChat {
    reply: Result<serde_json::Value, u16>,
    latency: Option<Duration>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl StubChat {
    pub fn replying(envelope: serde_json::Value) -> Self {
        Self {
            reply: Ok(envelope),
            latency: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            reply: Err(status),
            latency: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn slow(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }
}

#[async_trait]
impl ChatCompletion for StubChat {
    async fn complete(&self, request: &ChatRequest) -> Result<serde_json::Value, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match &self.reply {
            Ok(envelope) => Ok(envelope.clone()),
            Err(status) => Err(ProviderError::Status {
                provider: "stub",
                status: *status,
                message: "stubbed failure".into(),
            }),
        }
    }
}

#[derive(Default)]
pub struct StubSpeech {
    pub texts: Mutex<Vec<String>>,
}

#[async_trait]
impl SpeechSynthesis for StubSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ProviderError> {
        self.texts.lock().unwrap().push(text.to_string());
        Ok(b"ID3fake-mp3".to_vec())
    }
}

pub fn test_state(
    chat: Arc<StubChat>,
    search: Arc<StubSearch>,
    speech: Option<Arc<StubSpeech>>,
) -> AppState {
    AppState {
        config: Arc::new(test_config()),
        scripts: Arc::new(ScriptGenerator::new(chat, 0.7, 300)),
        images: Arc::new(ImageResolver::new(search)),
        narrator: speech.map(|speech| Arc::new(Narrator::new(speech))),
    }
}

/// The production router wired to the given stubs.
pub fn build_test_app(state: AppState) -> Router {
    build_app_router(state, &test_config())
}

/// Like [`build_test_app`] with a one-second request deadline.
pub fn build_test_app_with_short_deadline(state: AppState) -> Router {
    let mut config = test_config();
    config.request_timeout_secs = 1;
    build_app_router(state, &config)
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_raw(app: Router, uri: &str, body: &'static str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

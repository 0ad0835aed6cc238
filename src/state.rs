use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

use crate::api::elevenlabs::ElevenLabsClient;
use crate::api::openrouter::OpenRouterClient;
use crate::api::pexels::PexelsClient;
use crate::config::Config;
use crate::narration::Narrator;
use crate::script::ScriptGenerator;
use crate::storyboard::ImageResolver;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; nothing in it is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub scripts: Arc<ScriptGenerator>,
    pub images: Arc<ImageResolver>,
    /// `None` when no speech provider is configured.
    pub narrator: Option<Arc<Narrator>>,
}

impl AppState {
    /// Wire the live provider clients from `config`.
    pub fn from_config(config: Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;

        let chat = OpenRouterClient::new(client.clone(), &config);
        let search = PexelsClient::new(client.clone(), &config);
        let narrator = ElevenLabsClient::from_config(client, &config)
            .map(|speech| Arc::new(Narrator::new(Arc::new(speech))));

        Ok(Self {
            scripts: Arc::new(ScriptGenerator::new(
                Arc::new(chat),
                config.script_temperature,
                config.script_max_tokens,
            )),
            images: Arc::new(ImageResolver::new(Arc::new(search))),
            narrator,
            config: Arc::new(config),
        })
    }
}

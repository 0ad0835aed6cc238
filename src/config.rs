use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub openrouter_api_key: String,
    pub pexels_api_key: String,
    #[serde(default)]
    pub elevenlabs_api_key: Option<String>,
    #[serde(default = "default_voice_id")]
    pub eleven_voice_id: String,
    #[serde(default = "default_eleven_model_id")]
    pub eleven_model_id: String,

    #[serde(default = "default_script_model")]
    pub script_model: String,
    #[serde(default = "default_script_temperature")]
    pub script_temperature: f64,
    #[serde(default = "default_script_max_tokens")]
    pub script_max_tokens: u32,
    #[serde(default = "default_app_referer")]
    pub app_referer: String,
    #[serde(default = "default_app_title")]
    pub app_title: String,

    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,
}

fn default_voice_id() -> String {
    "JBFqnCBsd6RMkjVDRZzb".to_string()
}

fn default_eleven_model_id() -> String {
    "eleven_multilingual_v2".to_string()
}

fn default_script_model() -> String {
    "openai/gpt-3.5-turbo".to_string()
}

fn default_script_temperature() -> f64 {
    0.7
}

fn default_script_max_tokens() -> u32 {
    300
}

fn default_app_referer() -> String {
    "http://localhost:3000".to_string()
}

fn default_app_title() -> String {
    "Script Generation App".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_provider_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Read a JSON config file. Missing optional keys take their defaults.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Build the configuration from environment variables.
    ///
    /// | Env Var                 | Default                  |
    /// |-------------------------|--------------------------|
    /// | `OPENROUTER_API_KEY`    | required                 |
    /// | `PEXELS_API_KEY`        | required                 |
    /// | `ELEVENLABS_API_KEY`    | unset (narration off)    |
    /// | `ELEVEN_VOICE_ID`       | `JBFqnCBsd6RMkjVDRZzb`   |
    /// | `ELEVEN_MODEL_ID`       | `eleven_multilingual_v2` |
    /// | `SCRIPT_MODEL`          | `openai/gpt-3.5-turbo`   |
    /// | `SCRIPT_TEMPERATURE`    | `0.7`                    |
    /// | `SCRIPT_MAX_TOKENS`     | `300`                    |
    /// | `APP_REFERER`           | `http://localhost:3000`  |
    /// | `APP_TITLE`             | `Script Generation App`  |
    /// | `HOST`                  | `0.0.0.0`                |
    /// | `PORT`                  | `3000`                   |
    /// | `CORS_ORIGINS`          | `http://localhost:3000`  |
    /// | `REQUEST_TIMEOUT_SECS`  | `60`                     |
    /// | `PROVIDER_TIMEOUT_SECS` | `30`                     |
    pub fn from_env() -> Result<Self> {
        let config = Self {
            openrouter_api_key: env_or("OPENROUTER_API_KEY", String::new),
            pexels_api_key: env_or("PEXELS_API_KEY", String::new),
            elevenlabs_api_key: std::env::var("ELEVENLABS_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            eleven_voice_id: env_or("ELEVEN_VOICE_ID", default_voice_id),
            eleven_model_id: env_or("ELEVEN_MODEL_ID", default_eleven_model_id),
            script_model: env_or("SCRIPT_MODEL", default_script_model),
            script_temperature: env_parse("SCRIPT_TEMPERATURE", default_script_temperature)?,
            script_max_tokens: env_parse("SCRIPT_MAX_TOKENS", default_script_max_tokens)?,
            app_referer: env_or("APP_REFERER", default_app_referer),
            app_title: env_or("APP_TITLE", default_app_title),
            host: env_or("HOST", default_host),
            port: env_parse("PORT", default_port)?,
            cors_origins: match std::env::var("CORS_ORIGINS") {
                Ok(raw) => raw
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                Err(_) => default_cors_origins(),
            },
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", default_request_timeout_secs)?,
            provider_timeout_secs: env_parse(
                "PROVIDER_TIMEOUT_SECS",
                default_provider_timeout_secs,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from `STORYBOARD_CONFIG` or `config.json` when such a file
    /// exists, otherwise from the environment.
    pub async fn discover() -> Result<Self> {
        let path = std::env::var("STORYBOARD_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        if fs::metadata(&path).await.map(|m| m.is_file()).unwrap_or(false) {
            return Self::load(&path).await;
        }
        Self::from_env()
    }

    pub fn narration_enabled(&self) -> bool {
        self.elevenlabs_api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    fn validate(&self) -> Result<()> {
        if self.openrouter_api_key.trim().is_empty() {
            anyhow::bail!("config: openrouter_api_key missing");
        }
        if self.pexels_api_key.trim().is_empty() {
            anyhow::bail!("config: pexels_api_key missing");
        }
        Ok(())
    }
}

fn env_or(key: &str, default: fn() -> String) -> String {
    std::env::var(key).unwrap_or_else(|_| default())
}

fn env_parse<T>(key: &str, default: fn() -> T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a valid {}", std::any::type_name::<T>())),
        Err(_) => Ok(default()),
    }
}

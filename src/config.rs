use serde::Deserialize;
use std::path::PathBuf;

use crate::services::google_play_client::DEFAULT_API_BASE_URL;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub google_play: GooglePlayConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GooglePlayConfig {
    /// Path to the service-account JSON key
    #[serde(default)]
    pub key_path: Option<PathBuf>,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

impl Default for GooglePlayConfig {
    fn default() -> Self {
        Self {
            key_path: None,
            api_base_url: default_api_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Load .env file if it exists (for environment variable overrides)
        dotenvy::dotenv().ok();

        // playcheck.{yml,toml,json} is optional; env vars override it
        let config = config::Config::builder()
            .add_source(config::File::with_name("playcheck").required(false))
            .add_source(
                config::Environment::with_prefix("PLAYCHECK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

// file: src/config.rs
// description: application configuration management with toml and env support
// reference: https://docs.rs/config

use crate::client::query::{DEFAULT_EXPAND_LIMIT, DEFAULT_SEARCH_LIMIT};
use crate::error::{AlephError, Result};
use crate::utils::validation::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://aleph.occrp.org/api/2";
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const API_KEY_ENV: &str = "ALEPH_API_KEY";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QueryConfig {
    pub search_limit: u32,
    pub expand_limit: u32,
    /// Upper bound on concurrent lookups issued by the cli.
    pub concurrency: usize,
}

/// What an operation does when the body decodes but has the wrong layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Surface a shape error to the caller.
    Hard,
    /// Log a diagnostic and return an empty result.
    Soft,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub expand: FailurePolicy,
    pub similar: FailurePolicy,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            search_limit: DEFAULT_SEARCH_LIMIT,
            expand_limit: DEFAULT_EXPAND_LIMIT,
            concurrency: 4,
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            expand: FailurePolicy::Soft,
            similar: FailurePolicy::Hard,
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder
                .add_source(config::File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("ALEPH")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| AlephError::Config(e.to_string()))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| AlephError::Config(e.to_string()))?;

        config.fill_api_key(std::env::var(API_KEY_ENV).ok());

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self::default()
    }

    /// Built-in defaults plus `ALEPH_API_KEY`, for when loading failed.
    pub fn fallback() -> Self {
        let mut config = Self::default_config();
        config.fill_api_key(std::env::var(API_KEY_ENV).ok());
        config
    }

    /// Takes `key` only when no key is configured yet. Blank keys are ignored.
    pub fn fill_api_key(&mut self, key: Option<String>) {
        if self.api.api_key.is_some() {
            return;
        }
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            debug!("API key taken from {}", API_KEY_ENV);
            self.api.api_key = Some(key);
        }
    }

    pub fn validate(&self) -> Result<()> {
        Validator::validate_url(&self.api.base_url)
            .map_err(|e| AlephError::Config(e.to_string()))?;

        if self.query.search_limit == 0 || self.query.expand_limit == 0 {
            return Err(AlephError::Config(
                "query limits must be greater than 0".to_string(),
            ));
        }

        if self.query.concurrency == 0 {
            return Err(AlephError::Config(
                "concurrency must be greater than 0".to_string(),
            ));
        }

        if matches!(self.api.api_key.as_deref(), Some(key) if key.trim().is_empty()) {
            return Err(AlephError::Config("api_key must not be blank".to_string()));
        }

        Ok(())
    }
}

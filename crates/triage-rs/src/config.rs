//! Startup configuration.
//!
//! [`TriageConfig`] is built once when a binary starts and handed to the
//! constructors that need it. Nothing reads the environment after that.

use std::fmt;
use std::path::PathBuf;

use crate::{
    API_KEY_ENV, API_URL_ENV, CONSOLE_TEMPERATURE, DEFAULT_API_BASE_URL, DEFAULT_MODEL,
    DEFAULT_RESULTS_PATH, MODEL_ENV, RESULTS_PATH_ENV,
};

/// Configuration problems that stop a binary from starting.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("GROQ_API_KEY not found. Set it in a .env file or the environment.")]
    MissingApiKey,
    #[error("temperature must be between 0.0 and 2.0, got {0}")]
    InvalidTemperature(f32),
    #[error("model name must not be empty")]
    EmptyModel,
}

/// Settings for one classifier process.
#[derive(Clone)]
pub struct TriageConfig {
    /// Provider API key. Required.
    pub api_key: String,
    /// Model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,
    /// Sampling temperature, fixed for the process. Default: `0.3`.
    pub temperature: f32,
    /// Base URL of the OpenAI-compatible API. Default: [`DEFAULT_API_BASE_URL`].
    pub api_base_url: String,
    /// CSV result file. Default: [`DEFAULT_RESULTS_PATH`].
    pub results_path: PathBuf,
}

impl TriageConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: CONSOLE_TEMPERATURE,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            results_path: PathBuf::from(DEFAULT_RESULTS_PATH),
        }
    }

    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get(API_KEY_ENV).ok_or(ConfigError::MissingApiKey)?;
        let mut config = Self::new(api_key.trim());

        if let Some(model) = get(MODEL_ENV) {
            config.model = model.trim().to_string();
        }
        if let Some(url) = get(API_URL_ENV) {
            config.api_base_url = url.trim().to_string();
        }
        if let Some(path) = get(RESULTS_PATH_ENV) {
            config.results_path = PathBuf::from(path);
        }
        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_results_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.results_path = path.into();
        self
    }

    /// Check invariants the API would otherwise reject per request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidTemperature(self.temperature));
        }
        Ok(())
    }
}

impl fmt::Debug for TriageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriageConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("api_base_url", &self.api_base_url)
            .field("results_path", &self.results_path)
            .finish()
    }
}

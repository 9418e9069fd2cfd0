use std::fmt;
use std::net::SocketAddr;

use crate::error::{Result, SymptomScribeError};

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_HTTP_BIND: &str = "127.0.0.1:8501";
pub const DEFAULT_LOG_LEVEL: &str = "symptom_scribe=info,tower_http=info";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Model provider settings
#[derive(Clone)]
pub struct ModelConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub request_timeout_secs: u64,
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub model: ModelConfig,
    pub http_bind: SocketAddr,
    pub log_level: String,
    /// Fallbacks taken while loading; logged once a subscriber is installed
    pub warnings: Vec<String>,
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.0,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            http_bind: DEFAULT_HTTP_BIND
                .parse()
                .expect("default bind address should parse"),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            warnings: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from `.env` (values there override the process
    /// environment) and then from environment variables.
    ///
    /// `SYMPTOM_ENV_FILE` points at an alternative env file. A missing file
    /// is not an error; a missing `OPENAI_API_KEY` is.
    pub fn load() -> Result<Self> {
        if let Ok(env_path) = std::env::var("SYMPTOM_ENV_FILE") {
            let _ = dotenvy::from_path_override(env_path);
        } else {
            let _ = dotenvy::dotenv_override();
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        cfg.model.api_key = lookup("OPENAI_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| SymptomScribeError::Config {
                message: "OPENAI_API_KEY is not set".to_string(),
            })?;

        if let Some(model) = lookup("OPENAI_MODEL").filter(|m| !m.trim().is_empty()) {
            cfg.model.model = model.trim().to_string();
        }
        if let Some(url) = lookup("OPENAI_BASE_URL").filter(|u| !u.trim().is_empty()) {
            cfg.model.base_url = url.trim().trim_end_matches('/').to_string();
        }

        if let Some(raw) = lookup("SYMPTOM_TEMPERATURE") {
            match raw.parse::<f32>() {
                Ok(t) if t.is_finite() => cfg.model.temperature = t.clamp(0.0, 2.0),
                _ => cfg.warnings.push(format!(
                    "SYMPTOM_TEMPERATURE '{}' is not a number, using {}",
                    raw, cfg.model.temperature
                )),
            }
        }

        if let Some(raw) = lookup("SYMPTOM_REQUEST_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => cfg.model.request_timeout_secs = secs,
                _ => cfg.warnings.push(format!(
                    "SYMPTOM_REQUEST_TIMEOUT_SECS '{}' is invalid, using {}",
                    raw, DEFAULT_TIMEOUT_SECS
                )),
            }
        }

        if let Some(raw) = lookup("SYMPTOM_HTTP_BIND") {
            match raw.parse::<SocketAddr>() {
                Ok(bind) => cfg.http_bind = bind,
                Err(_) => cfg.warnings.push(format!(
                    "SYMPTOM_HTTP_BIND '{}' is not a socket address, using {}",
                    raw, cfg.http_bind
                )),
            }
        }

        if let Some(level) = lookup("RUST_LOG").filter(|l| !l.trim().is_empty()) {
            cfg.log_level = level;
        }

        Ok(cfg)
    }

    /// Emit the fallbacks recorded during loading
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            tracing::warn!("{}", warning);
        }
    }
}

#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::model::BackendKind;
use crate::utils::error::{InvoiceError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_LLAMA_SERVER_URL: &str = "http://localhost:8080/v1";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/v1";
pub const DEFAULT_OPENROUTER_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Process-wide settings. Built once at start-up and read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub llama_server_url: String,
    pub ollama_url: String,
    pub openrouter_url: String,
    pub ollama_api_key: Option<String>,
    pub openrouter_api_key: Option<String>,
    pub request_timeout_secs: u64,
    pub api: ApiSettings,
}

/// Settings only the HTTP API binary reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub bind_addr: String,
    pub backend: BackendKind,
    pub model: Option<String>,
    pub frontend_dir: String,
    pub json_logs: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            llama_server_url: DEFAULT_LLAMA_SERVER_URL.to_string(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            openrouter_url: DEFAULT_OPENROUTER_URL.to_string(),
            ollama_api_key: None,
            openrouter_api_key: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            api: ApiSettings::default(),
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            backend: BackendKind::LlamaServer,
            model: None,
            frontend_dir: "frontend".to_string(),
            json_logs: false,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Settings::default();

        let request_timeout_secs = match get("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                InvoiceError::InvalidConfigValueError {
                    field: "REQUEST_TIMEOUT_SECS".to_string(),
                    value: raw.clone(),
                    reason: "expected a whole number of seconds".to_string(),
                }
            })?,
            None => defaults.request_timeout_secs,
        };

        let backend = match get("INVOICE_API_BACKEND") {
            Some(raw) => raw.parse::<BackendKind>().map_err(|reason| {
                InvoiceError::InvalidConfigValueError {
                    field: "INVOICE_API_BACKEND".to_string(),
                    value: raw.clone(),
                    reason,
                }
            })?,
            None => defaults.api.backend,
        };

        Ok(Self {
            llama_server_url: get("LLAMA_SERVER_URL").unwrap_or(defaults.llama_server_url),
            ollama_url: get("OLLAMA_URL").unwrap_or(defaults.ollama_url),
            openrouter_url: get("OPENROUTER_URL").unwrap_or(defaults.openrouter_url),
            ollama_api_key: get("OLLAMA_API_KEY"),
            openrouter_api_key: get("OPENROUTER_API_KEY"),
            request_timeout_secs,
            api: ApiSettings {
                bind_addr: get("INVOICE_API_ADDR").unwrap_or(defaults.api.bind_addr),
                backend,
                model: get("INVOICE_API_MODEL"),
                frontend_dir: get("FRONTEND_DIR").unwrap_or(defaults.api.frontend_dir),
                json_logs: get("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
            },
        })
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("llama_server_url", &self.llama_server_url)?;
        validate_url("ollama_url", &self.ollama_url)?;
        validate_url("openrouter_url", &self.openrouter_url)?;
        validate_positive_number("request_timeout_secs", self.request_timeout_secs, 1)?;
        validate_non_empty_string("api.bind_addr", &self.api.bind_addr)?;
        Ok(())
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which model server the inferencer talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum BackendKind {
    /// llama.cpp server with a single pre-loaded model.
    #[serde(rename = "llama")]
    #[cfg_attr(feature = "cli", value(name = "llama"))]
    LlamaServer,
    Ollama,
    #[serde(rename = "openrouter")]
    #[cfg_attr(feature = "cli", value(name = "openrouter"))]
    OpenRouter,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::LlamaServer => "llama",
            BackendKind::Ollama => "ollama",
            BackendKind::OpenRouter => "openrouter",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "llama" | "llama-server" | "llamacpp" => Ok(BackendKind::LlamaServer),
            "ollama" => Ok(BackendKind::Ollama),
            "openrouter" => Ok(BackendKind::OpenRouter),
            other => Err(format!(
                "unknown backend '{}' (expected llama, ollama or openrouter)",
                other
            )),
        }
    }
}

/// How the `model` field of a completion request is filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelPolicy {
    /// The server has one model bound; the request always carries `""`.
    ServerBound,
    /// The request carries the caller's model, or this default.
    Explicit(String),
}

impl ModelPolicy {
    pub fn resolve(&self, requested: Option<&str>) -> String {
        match self {
            ModelPolicy::ServerBound => String::new(),
            ModelPolicy::Explicit(default_model) => requested
                .filter(|m| !m.is_empty())
                .unwrap_or(default_model.as_str())
                .to_string(),
        }
    }
}

/// Resolved connection settings for one backend.
#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub kind: BackendKind,
    pub base_url: String,
    pub credential: Option<String>,
    pub model_policy: ModelPolicy,
}

/// Answer of the detection call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetectionResult {
    pub invoice: bool,
}

/// Fields extracted from an invoice. Every key is present in the JSON form,
/// any of them may be null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InvoiceProperties {
    pub invoice_date: Option<String>,
    pub total_amount: Option<f64>,
    pub currency: Option<String>,
}

impl InvoiceProperties {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "invoice_date": self.invoice_date,
            "total_amount": self.total_amount,
            "currency": self.currency,
        })
    }
}

/// Terminal state of a workflow run.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    NotInvoice,
    Invoice(InvoiceProperties),
}

impl Outcome {
    /// Payload the CLI prints: the properties, or `{"invoice": false}`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Outcome::Invoice(props) => props.to_json(),
            Outcome::NotInvoice => serde_json::json!({ "invoice": false }),
        }
    }
}

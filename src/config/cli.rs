use crate::adapters::BackendOverrides;
use crate::config::Settings;
use crate::domain::model::BackendKind;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "invoice-extract")]
#[command(about = "Extract date, total amount and currency from an invoice image")]
pub struct CliArgs {
    /// Backend to use
    #[arg(value_enum)]
    pub backend: BackendKind,

    /// Path to invoice image
    pub image_path: PathBuf,

    /// Model (required for openrouter/ollama)
    #[arg(long)]
    pub model: Option<String>,

    /// Server URL, overrides the configured URL of the selected backend
    #[arg(long)]
    pub url: Option<String>,

    /// API key, overrides the environment
    #[arg(long)]
    pub api_key: Option<String>,

    /// TOML settings file used instead of the environment
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable detailed debug output
    #[arg(long)]
    pub debug: bool,
}

impl CliArgs {
    pub fn overrides(&self) -> BackendOverrides {
        BackendOverrides {
            url: self.url.clone(),
            model: self.model.clone(),
            credential: self.api_key.clone(),
        }
    }

    pub fn load_settings(&self) -> Result<Settings> {
        match &self.config {
            Some(path) => Settings::from_toml_file(path),
            None => Settings::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_args() {
        let args =
            CliArgs::try_parse_from(["invoice-extract", "llama", "test_invoice.jpg"]).unwrap();

        assert_eq!(args.backend, BackendKind::LlamaServer);
        assert_eq!(args.image_path, PathBuf::from("test_invoice.jpg"));
        assert!(args.model.is_none());
        assert!(!args.debug);
    }

    #[test]
    fn test_parse_all_flags() {
        let args = CliArgs::try_parse_from([
            "invoice-extract",
            "openrouter",
            "scan.png",
            "--model",
            "some-model",
            "--url",
            "http://custom:9000/v1",
            "--api-key",
            "sk-or-flag",
            "--debug",
        ])
        .unwrap();

        assert_eq!(args.backend, BackendKind::OpenRouter);
        assert!(args.debug);

        let overrides = args.overrides();
        assert_eq!(overrides.model.as_deref(), Some("some-model"));
        assert_eq!(overrides.url.as_deref(), Some("http://custom:9000/v1"));
        assert_eq!(overrides.credential.as_deref(), Some("sk-or-flag"));
    }

    #[test]
    fn test_unknown_backend_rejected() {
        assert!(CliArgs::try_parse_from(["invoice-extract", "vllm", "scan.png"]).is_err());
    }

    #[test]
    fn test_image_path_required() {
        assert!(CliArgs::try_parse_from(["invoice-extract", "ollama"]).is_err());
    }
}

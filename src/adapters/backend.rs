use crate::adapters::chat::ChatCompletionsClient;
use crate::adapters::{LlamaServerInferencer, OllamaInferencer, OpenRouterInferencer};
use crate::config::Settings;
use crate::domain::model::{BackendKind, BackendSettings, ModelPolicy};
use crate::domain::ports::Inferencer;
use crate::utils::error::{InvoiceError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_required_field, validate_url};

/// llama.cpp's server accepts any key; the client still sends one.
pub const LLAMA_SERVER_PLACEHOLDER_KEY: &str = "not-needed";

/// Per-invocation overrides, typically from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct BackendOverrides {
    pub url: Option<String>,
    pub model: Option<String>,
    pub credential: Option<String>,
}

/// Work out base URL, credential and model policy for `kind`. Fails before
/// any network call when a required credential or model is missing.
pub fn resolve_backend(
    kind: BackendKind,
    settings: &Settings,
    overrides: &BackendOverrides,
) -> Result<BackendSettings> {
    let url_override = overrides.url.clone().filter(|u| !u.trim().is_empty());
    let credential_override = overrides.credential.clone().filter(|c| !c.is_empty());

    let resolved = match kind {
        BackendKind::LlamaServer => BackendSettings {
            kind,
            base_url: url_override.unwrap_or_else(|| settings.llama_server_url.clone()),
            credential: Some(
                credential_override.unwrap_or_else(|| LLAMA_SERVER_PLACEHOLDER_KEY.to_string()),
            ),
            model_policy: ModelPolicy::ServerBound,
        },
        BackendKind::Ollama => BackendSettings {
            kind,
            base_url: url_override.unwrap_or_else(|| settings.ollama_url.clone()),
            credential: credential_override.or_else(|| settings.ollama_api_key.clone()),
            model_policy: ModelPolicy::Explicit(required_model(kind, overrides)?),
        },
        BackendKind::OpenRouter => {
            let credential = credential_override
                .or_else(|| settings.openrouter_api_key.clone())
                .ok_or_else(|| InvoiceError::MissingCredential {
                    backend: kind.to_string(),
                    env_var: "OPENROUTER_API_KEY".to_string(),
                })?;
            BackendSettings {
                kind,
                base_url: url_override.unwrap_or_else(|| settings.openrouter_url.clone()),
                credential: Some(credential),
                model_policy: ModelPolicy::Explicit(required_model(kind, overrides)?),
            }
        }
    };

    validate_url("base_url", &resolved.base_url)?;
    Ok(resolved)
}

fn required_model(kind: BackendKind, overrides: &BackendOverrides) -> Result<String> {
    let field = format!("model (required for the {} backend)", kind);
    let model = validate_required_field(&field, &overrides.model)?;
    validate_non_empty_string(&field, model)?;
    Ok(model.clone())
}

/// Build the inferencer for `kind`.
pub fn make_inferencer(
    kind: BackendKind,
    settings: &Settings,
    overrides: &BackendOverrides,
) -> Result<Box<dyn Inferencer>> {
    let backend = resolve_backend(kind, settings, overrides)?;
    tracing::debug!("Using {} backend at {}", backend.kind, backend.base_url);

    let default_model = match backend.model_policy {
        ModelPolicy::Explicit(model) => model,
        ModelPolicy::ServerBound => String::new(),
    };
    let chat = ChatCompletionsClient::new(
        backend.base_url,
        backend.credential,
        settings.request_timeout(),
    )?;

    let inferencer: Box<dyn Inferencer> = match kind {
        BackendKind::LlamaServer => Box::new(LlamaServerInferencer::new(chat)),
        BackendKind::Ollama => Box::new(OllamaInferencer::new(chat, default_model)),
        BackendKind::OpenRouter => Box::new(OpenRouterInferencer::new(chat, default_model)),
    };
    Ok(inferencer)
}

use crate::adapters::chat::ChatCompletionsClient;
use crate::domain::model::{BackendKind, ModelPolicy};
use crate::domain::ports::{Inferencer, ResponseFormat};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// llama.cpp `llama-server`. It serves the one model it was started with, so
/// the request never names a model.
pub struct LlamaServerInferencer {
    chat: ChatCompletionsClient,
}

impl LlamaServerInferencer {
    pub fn new(chat: ChatCompletionsClient) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl Inferencer for LlamaServerInferencer {
    fn kind(&self) -> BackendKind {
        BackendKind::LlamaServer
    }

    fn base_url(&self) -> &str {
        self.chat.base_url()
    }

    async fn generate(
        &self,
        prompt: &str,
        image_path: &Path,
        response_format: &ResponseFormat,
        model: Option<&str>,
    ) -> Result<String> {
        if let Some(requested) = model.filter(|m| !m.is_empty()) {
            tracing::debug!("Ignoring model '{}' for llama server backend", requested);
        }
        let model = ModelPolicy::ServerBound.resolve(model);
        self.chat
            .complete(&model, prompt, image_path, response_format)
            .await
    }
}

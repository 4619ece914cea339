use crate::adapters::chat::ChatCompletionsClient;
use crate::domain::model::{BackendKind, ModelPolicy};
use crate::domain::ports::{Inferencer, ResponseFormat};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Ollama through its OpenAI-compatible `/v1` endpoint.
pub struct OllamaInferencer {
    chat: ChatCompletionsClient,
    model: ModelPolicy,
}

impl OllamaInferencer {
    pub fn new(chat: ChatCompletionsClient, default_model: String) -> Self {
        Self {
            chat,
            model: ModelPolicy::Explicit(default_model),
        }
    }
}

#[async_trait]
impl Inferencer for OllamaInferencer {
    fn kind(&self) -> BackendKind {
        BackendKind::Ollama
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
        let model = self.model.resolve(model);
        self.chat
            .complete(&model, prompt, image_path, response_format)
            .await
    }
}

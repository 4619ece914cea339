use crate::adapters::chat::ChatCompletionsClient;
use crate::domain::model::{BackendKind, ModelPolicy};
use crate::domain::ports::{Inferencer, ResponseFormat};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Hosted models on OpenRouter. Needs an API key and a model id such as
/// `google/gemini-2.0-flash-001`.
pub struct OpenRouterInferencer {
    chat: ChatCompletionsClient,
    model: ModelPolicy,
}

impl OpenRouterInferencer {
    pub fn new(chat: ChatCompletionsClient, default_model: String) -> Self {
        Self {
            chat,
            model: ModelPolicy::Explicit(default_model),
        }
    }
}

#[async_trait]
impl Inferencer for OpenRouterInferencer {
    fn kind(&self) -> BackendKind {
        BackendKind::OpenRouter
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

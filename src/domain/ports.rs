use crate::domain::model::BackendKind;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::path::Path;

/// A schema-constrained response format, serialized as the OpenAI
/// `json_schema` response format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: &'static str,
    pub json_schema: JsonSchemaSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonSchemaSpec {
    pub name: &'static str,
    pub strict: bool,
    pub schema: serde_json::Value,
}

impl ResponseFormat {
    pub fn json_schema(name: &'static str, schema: serde_json::Value) -> Self {
        Self {
            format_type: "json_schema",
            json_schema: JsonSchemaSpec {
                name,
                strict: true,
                schema,
            },
        }
    }
}

/// Sends one multimodal completion request and hands back the raw message text.
#[async_trait]
pub trait Inferencer: Send + Sync {
    fn kind(&self) -> BackendKind;

    fn base_url(&self) -> &str;

    /// `model` overrides the configured model where the backend allows it.
    async fn generate(
        &self,
        prompt: &str,
        image_path: &Path,
        response_format: &ResponseFormat,
        model: Option<&str>,
    ) -> Result<String>;
}

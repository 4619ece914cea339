use crate::core::encoder::{encode_image, image_data_url};
use crate::domain::ports::ResponseFormat;
use crate::utils::error::{InvoiceError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: &'a ResponseFormat,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Thin client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    client: Client,
    base_url: String,
    credential: Option<String>,
}

impl ChatCompletionsClient {
    pub fn new(base_url: String, credential: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            credential,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Sends the prompt and the image as one user message at temperature 0 and
    /// returns `choices[0].message.content` untouched.
    pub async fn complete(
        &self,
        model: &str,
        prompt: &str,
        image_path: &Path,
        response_format: &ResponseFormat,
    ) -> Result<String> {
        let image = encode_image(image_path).await?;

        let request = ChatCompletionRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text { text: prompt },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image_data_url(&image),
                        },
                    },
                ],
            }],
            response_format,
            temperature: 0.0,
        };

        let endpoint = self.endpoint();
        tracing::debug!(
            "Making completion request to: {} (model: '{}', format: {})",
            endpoint,
            model,
            response_format.json_schema.name
        );

        let mut builder = self.client.post(&endpoint).json(&request);
        if let Some(credential) = &self.credential {
            builder = builder.bearer_auth(credential);
        }
        let response = builder.send().await?;

        let status = response.status();
        tracing::debug!("Completion response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InvoiceError::HttpStatusError {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(InvoiceError::EmptyCompletion)
    }
}

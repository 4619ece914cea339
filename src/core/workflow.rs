use crate::core::prompts::{
    invoice_detection_response_format, invoice_properties_response_format,
    INVOICE_DETECTION_PROMPT, INVOICE_PROPERTIES_PROMPT,
};
use crate::domain::model::{DetectionResult, InvoiceProperties, Outcome};
use crate::domain::ports::Inferencer;
use crate::utils::error::{InvoiceError, Result};
use std::path::Path;
use std::sync::Arc;

const PROPERTY_KEYS: [&str; 3] = ["invoice_date", "total_amount", "currency"];

/// Detect, then extract. The second call only happens for invoices.
#[derive(Clone)]
pub struct InvoiceWorkflow {
    inferencer: Arc<dyn Inferencer>,
    model: Option<String>,
}

impl InvoiceWorkflow {
    pub fn new(inferencer: Arc<dyn Inferencer>) -> Self {
        Self {
            inferencer,
            model: None,
        }
    }

    /// Model requested on both calls. Backends bound to one model ignore it.
    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    pub async fn run(&self, image_path: &Path) -> Result<Outcome> {
        if !tokio::fs::try_exists(image_path).await? {
            return Err(InvoiceError::ImageNotFound {
                path: image_path.display().to_string(),
            });
        }

        let detection = self.detect(image_path).await?;
        if !detection.invoice {
            tracing::info!("Image is not an invoice: {}", image_path.display());
            return Ok(Outcome::NotInvoice);
        }

        tracing::info!("Invoice detected, extracting properties");
        let properties = self.extract(image_path).await?;
        Ok(Outcome::Invoice(properties))
    }

    pub async fn detect(&self, image_path: &Path) -> Result<DetectionResult> {
        let content = self
            .inferencer
            .generate(
                INVOICE_DETECTION_PROMPT,
                image_path,
                &invoice_detection_response_format(),
                self.model.as_deref(),
            )
            .await?;
        tracing::debug!("Detection response: {}", content);

        parse_detection(&content)
    }

    pub async fn extract(&self, image_path: &Path) -> Result<InvoiceProperties> {
        let content = self
            .inferencer
            .generate(
                INVOICE_PROPERTIES_PROMPT,
                image_path,
                &invoice_properties_response_format(),
                self.model.as_deref(),
            )
            .await?;
        tracing::debug!("Extraction response: {}", content);

        parse_properties(&content)
    }
}

/// Some servers wrap structured output in a markdown fence despite the schema.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

pub fn parse_detection(content: &str) -> Result<DetectionResult> {
    serde_json::from_str(strip_code_fence(content))
        .map_err(|e| InvoiceError::malformed(format!("invoice detection: {}", e), content))
}

pub fn parse_properties(content: &str) -> Result<InvoiceProperties> {
    let value: serde_json::Value = serde_json::from_str(strip_code_fence(content))
        .map_err(|e| InvoiceError::malformed(format!("invoice properties: {}", e), content))?;

    let object = value.as_object().ok_or_else(|| {
        InvoiceError::malformed("invoice properties: expected a JSON object", content)
    })?;
    if let Some(missing) = PROPERTY_KEYS.iter().find(|key| !object.contains_key(**key)) {
        return Err(InvoiceError::malformed(
            format!("invoice properties: missing field `{}`", missing),
            content,
        ));
    }

    serde_json::from_value(value)
        .map_err(|e| InvoiceError::malformed(format!("invoice properties: {}", e), content))
}

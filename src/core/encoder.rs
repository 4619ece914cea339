use crate::utils::error::{InvoiceError, Result};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use std::io::ErrorKind;
use std::path::Path;

/// Reads the whole image and returns it as standard padded base64.
pub async fn encode_image(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => InvoiceError::ImageNotFound {
            path: path.display().to_string(),
        },
        _ => InvoiceError::IoError(e),
    })?;

    tracing::debug!("Encoded image {} ({} bytes)", path.display(), bytes.len());
    Ok(BASE64_STANDARD.encode(bytes))
}

/// `data:` URL for an encoded image, as embedded in the chat message.
pub fn image_data_url(encoded: &str) -> String {
    format!("data:image/jpeg;base64,{}", encoded)
}

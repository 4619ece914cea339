use thiserror::Error;

#[derive(Error, Debug)]
pub enum InvoiceError {
    #[error("Image not found: {path}")]
    ImageNotFound { path: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unsupported media type: {content_type}")]
    UnsupportedMediaType { content_type: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Completion endpoint returned {status}: {body}")]
    HttpStatusError { status: u16, body: String },

    #[error("Completion response contained no message content")]
    EmptyCompletion,

    #[error("Malformed model response: {message}")]
    MalformedResponse { message: String, content: String },

    #[error("Missing credential for {backend} backend (set {env_var})")]
    MissingCredential { backend: String, env_var: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad image or upload, rejected before any network call.
    Input,
    Configuration,
    /// The network or the completion endpoint failed.
    Transport,
    /// The model answered, but not with the JSON we asked for.
    MalformedResponse,
}

impl InvoiceError {
    pub fn malformed(message: impl Into<String>, content: impl Into<String>) -> Self {
        InvoiceError::MalformedResponse {
            message: message.into(),
            content: content.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            InvoiceError::ImageNotFound { .. }
            | InvoiceError::IoError(_)
            | InvoiceError::UnsupportedMediaType { .. } => ErrorCategory::Input,
            InvoiceError::ApiError(_)
            | InvoiceError::HttpStatusError { .. }
            | InvoiceError::EmptyCompletion => ErrorCategory::Transport,
            InvoiceError::MalformedResponse { .. } => ErrorCategory::MalformedResponse,
            InvoiceError::MissingCredential { .. }
            | InvoiceError::MissingConfigError { .. }
            | InvoiceError::InvalidConfigValueError { .. }
            | InvoiceError::ConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    /// Process exit code used by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Input => 1,
            ErrorCategory::MalformedResponse => 2,
            ErrorCategory::Transport => 3,
            ErrorCategory::Configuration => 4,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            InvoiceError::ImageNotFound { path } => format!("Could not find file '{}'", path),
            InvoiceError::IoError(e) => format!("Could not read image: {}", e),
            InvoiceError::UnsupportedMediaType { .. } => "File must be an image".to_string(),
            InvoiceError::ApiError(e) if e.is_timeout() => {
                "The model server did not answer in time".to_string()
            }
            InvoiceError::ApiError(e) if e.is_connect() => {
                "Could not connect to the model server".to_string()
            }
            InvoiceError::MalformedResponse { message, .. } => {
                format!("Failed to parse JSON response: {}", message)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            InvoiceError::ImageNotFound { .. } | InvoiceError::IoError(_) => {
                "Check the image path and file permissions"
            }
            InvoiceError::UnsupportedMediaType { .. } => "Upload a JPEG, PNG or WebP image",
            InvoiceError::ApiError(_) => {
                "Make sure the model server is running and reachable at the configured URL"
            }
            InvoiceError::HttpStatusError { status, .. } if *status == 401 || *status == 403 => {
                "Check the API key for the selected backend"
            }
            InvoiceError::HttpStatusError { .. } | InvoiceError::EmptyCompletion => {
                "Check that the selected model supports images and structured output"
            }
            InvoiceError::MalformedResponse { .. } => {
                "Try a larger model or one with JSON schema support"
            }
            InvoiceError::MissingCredential { .. } => {
                "Set the API key in the environment, a .env file or with --api-key"
            }
            InvoiceError::MissingConfigError { .. }
            | InvoiceError::InvalidConfigValueError { .. }
            | InvoiceError::ConfigError { .. } => "Review the configuration values and try again",
        }
    }
}

pub type Result<T> = std::result::Result<T, InvoiceError>;

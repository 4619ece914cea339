pub mod encoder;
pub mod prompts;
pub mod workflow;

pub use crate::domain::model::{DetectionResult, InvoiceProperties, Outcome};
pub use crate::domain::ports::{Inferencer, ResponseFormat};
pub use crate::utils::error::Result;

pub mod adapters;
#[cfg(feature = "server")]
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::{make_inferencer, BackendOverrides};
pub use config::Settings;
pub use crate::core::workflow::InvoiceWorkflow;
pub use domain::model::{BackendKind, InvoiceProperties, Outcome};
pub use domain::ports::Inferencer;
pub use utils::error::{InvoiceError, Result};

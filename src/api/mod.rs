//! HTTP API
//!
//! - POST /process  - multipart upload (field `file`), runs the invoice workflow
//! - GET  /{file}   - static frontend files, `index.html` at `/`

pub mod error;
pub mod routes;

pub use error::ApiError;
pub use routes::{router, AppState, MAX_UPLOAD_BYTES};

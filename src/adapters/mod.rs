// Adapters layer: concrete implementations for external systems (model servers).

pub mod backend;
pub mod chat;
pub mod llama_server;
pub mod ollama;
pub mod openrouter;

pub use backend::{make_inferencer, resolve_backend, BackendOverrides};
pub use chat::ChatCompletionsClient;
pub use llama_server::LlamaServerInferencer;
pub use ollama::OllamaInferencer;
pub use openrouter::OpenRouterInferencer;

//! External LLM transport: provider selection and one-shot completions.
//!
//! OpenAI and Groq share a request format. Anthropic uses its own.
//! All calls are single request/response exchanges with an enforced
//! client timeout; there is no streaming.

pub mod client;
pub mod config;
pub mod types;

pub use client::LlmClient;
pub use config::LlmConfig;
pub use types::{ChatMessage, LlmProvider};

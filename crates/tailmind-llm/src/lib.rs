//! tailmind-llm - LLM provider abstraction for the Tailmind assistant backend
//!
//! The orchestrator core treats the decision service as an opaque
//! text-completion provider. This crate defines the conversation and
//! completion types, the `LlmProvider` trait, and one concrete
//! OpenAI-compatible HTTP provider.

mod completion;
mod error;
mod message;
mod openai;
mod provider;

pub use completion::{CompletionRequest, CompletionResponse, TokenUsage};
pub use error::{Error, Result};
pub use message::{Message, MessageRole};
pub use openai::{OpenAiConfig, OpenAiProvider};
pub use provider::LlmProvider;

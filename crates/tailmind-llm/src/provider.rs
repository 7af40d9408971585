//! LLM provider trait definition
//!
//! The decision service consumed by the orchestrator is an opaque
//! text-completion provider behind this trait.

use crate::completion::{CompletionRequest, CompletionResponse};
use crate::error::Result;

/// Trait for LLM providers
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Get available models
    fn available_models(&self) -> Vec<String>;

    /// Get the default model
    fn default_model(&self) -> &str;

    /// Complete a conversation (text only)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;
}

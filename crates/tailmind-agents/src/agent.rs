//! Agent trait and output types
//!
//! Every capability handler (pet memory, document retrieval, multimodal
//! analysis, web lookup, health/nutrition, calendar, content generation,
//! email) implements this one trait. The orchestrator resolves handlers
//! by name from the registry and never probes beyond this contract.

use crate::context::AgentContext;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Output of a single agent invocation.
///
/// Handlers may return free text or a structured JSON value. The core does
/// not require a schema but recognizes a few fields (`text`, `analysis`,
/// `status`, `object_name`, `recipient`) for rendering and bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgentOutput {
    /// Free-form text
    Text(String),
    /// Structured JSON value
    Structured(serde_json::Value),
}

impl AgentOutput {
    /// Build a structured output from a JSON value
    #[must_use]
    pub fn structured(value: serde_json::Value) -> Self {
        Self::Structured(value)
    }

    /// Build a text output
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// The structured value, if this output is structured
    #[must_use]
    pub fn as_structured(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Structured(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Look up a string field in a structured output
    #[must_use]
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.as_structured()?.get(key)?.as_str()
    }
}

impl From<&str> for AgentOutput {
    fn from(content: &str) -> Self {
        Self::Text(content.to_string())
    }
}

/// Uniform invocation contract for capability handlers
#[async_trait::async_trait]
pub trait Agent: Send + Sync {
    /// Registry name of this agent (e.g. "pet_memory")
    fn name(&self) -> &str;

    /// Handle one message. May suspend on network or model latency.
    async fn invoke(&self, user_id: i64, message: &str, context: &AgentContext)
        -> Result<AgentOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_str_field_on_structured() {
        let output = AgentOutput::structured(json!({"text": "hello", "status": "sent"}));
        assert_eq!(output.str_field("text"), Some("hello"));
        assert_eq!(output.str_field("status"), Some("sent"));
        assert_eq!(output.str_field("missing"), None);
    }

    #[test]
    fn test_str_field_on_text() {
        let output = AgentOutput::text("plain");
        assert_eq!(output.str_field("text"), None);
        assert!(output.as_structured().is_none());
    }

    #[test]
    fn test_untagged_serialization() {
        let text = AgentOutput::text("hi");
        assert_eq!(serde_json::to_string(&text).unwrap(), "\"hi\"");

        let structured = AgentOutput::structured(json!({"a": 1}));
        assert_eq!(serde_json::to_string(&structured).unwrap(), r#"{"a":1}"#);
    }
}

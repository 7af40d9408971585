//! Registry - agent registration and lookup
//!
//! Agents are registered once at startup and resolved by name at dispatch
//! time. The registry is shared read-only across turns.

use crate::agent::Agent;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Canonical capability names of the assistant. The registry accepts any
/// name; this list documents the vocabulary the supervisor prompt and the
/// finalizer classification are written against.
pub const CANONICAL_AGENTS: &[&str] = &[
    "pet_memory",
    "document_rag",
    "multimodal",
    "web_search",
    "health_nutrition",
    "calendar",
    "content_generation",
    "email",
];

/// Name-keyed registry of capability handlers
#[derive(Default)]
pub struct AgentRegistry {
    agents: HashMap<String, Arc<dyn Agent>>,
}

impl AgentRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent under its own name
    pub fn register(&mut self, agent: Arc<dyn Agent>) -> Result<()> {
        let name = agent.name().to_string();
        if self.agents.contains_key(&name) {
            return Err(Error::AlreadyRegistered(name));
        }
        debug!(agent = %name, "Agent registered");
        self.agents.insert(name, agent);
        Ok(())
    }

    /// Look up an agent by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Agent>> {
        self.agents.get(name).cloned()
    }

    /// Whether an agent is registered under this name
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.agents.contains_key(name)
    }

    /// Registered agent names, sorted for stable prompts and logs
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.agents.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered agents
    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentOutput;
    use crate::context::AgentContext;

    struct EchoAgent;

    #[async_trait::async_trait]
    impl Agent for EchoAgent {
        fn name(&self) -> &str {
            "echo"
        }

        async fn invoke(
            &self,
            _user_id: i64,
            message: &str,
            _context: &AgentContext,
        ) -> Result<AgentOutput> {
            Ok(AgentOutput::text(message))
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = AgentRegistry::new();
        registry.register(Arc::new(EchoAgent)).unwrap();

        assert!(registry.contains("echo"));
        assert!(registry.get("echo").is_some());
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = AgentRegistry::new();
        registry.register(Arc::new(EchoAgent)).unwrap();
        let err = registry.register(Arc::new(EchoAgent)).unwrap_err();
        assert!(matches!(err, Error::AlreadyRegistered(name) if name == "echo"));
    }

    #[tokio::test]
    async fn test_invoke_through_registry() {
        let mut registry = AgentRegistry::new();
        registry.register(Arc::new(EchoAgent)).unwrap();

        let agent = registry.get("echo").unwrap();
        let output = agent
            .invoke(1, "hello", &AgentContext::default())
            .await
            .unwrap();
        assert!(matches!(output, AgentOutput::Text(ref t) if t == "hello"));
    }
}

//! tailmind-core - Turn orchestration engine for the Tailmind backend
//!
//! The core of the assistant: a supervisor-driven control loop that routes
//! each turn across the registered capability handlers and synthesizes one
//! user-facing response. Handler internals, the HTTP layer, persistence and
//! authentication live outside this crate.

mod error;
pub mod orchestrator;

pub use error::{Error, Result};
pub use orchestrator::{
    AgentResult, ChatMessage, ChatRole, GeneratedFile, NextStep, Orchestrator, OrchestratorConfig,
    TurnInput, TurnMetadata, TurnResult, TurnState,
};

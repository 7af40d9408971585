//! tailmind-agents - Capability handler boundary for the Tailmind backend
//!
//! Defines the uniform invocation contract every capability handler
//! implements, the per-call context, and the name-keyed registry the
//! orchestrator resolves handlers from. Handler internals (storage,
//! retrieval, speech, calendar APIs) live behind this boundary and are
//! out of scope for the core.

mod agent;
mod context;
mod error;
mod registry;

pub use agent::{Agent, AgentOutput};
pub use context::{AgentContext, ChatSettings, UploadedFile};
pub use error::{Error, Result};
pub use registry::{AgentRegistry, CANONICAL_AGENTS};

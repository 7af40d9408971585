//! Turn state - the mutable record threaded through every step
//!
//! One `TurnState` is created per turn, owned exclusively by the run in
//! progress, and discarded when the turn ends. Field ownership during the
//! turn is auditable by component:
//!
//! - Supervisor mutates `next_agent` and `shared_context` (and appends its
//!   own entries to `agent_results` for degraded/gated outcomes)
//! - Capability adapter appends to `agent_results` and `generated_files`,
//!   and writes `shared_context`
//! - Finalizer sets `final_response` and `next_agent`
//!
//! Nothing deletes entries; all collections are append-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tailmind_agents::{AgentOutput, ChatSettings, UploadedFile};
use uuid::Uuid;

use super::config::TurnInput;

/// Reserved result name for entries recorded by the supervisor itself
/// (decision-service failures, feature-gate explanations).
pub const SUPERVISOR_AGENT: &str = "supervisor";

/// Role of a conversation entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// End user
    User,
    /// Assistant
    Assistant,
}

/// One entry of the conversation history passed into a turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Sender role
    pub role: ChatRole,
    /// Message text
    pub content: String,
    /// Files attached to this message
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<UploadedFile>,
}

impl ChatMessage {
    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            files: Vec::new(),
        }
    }

    /// Create an assistant message
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            files: Vec::new(),
        }
    }

    /// Attach file descriptors
    #[must_use]
    pub fn with_files(mut self, files: Vec<UploadedFile>) -> Self {
        self.files = files;
        self
    }

    /// Message text with attached filenames appended, the form the decision
    /// service and handlers see.
    #[must_use]
    pub fn content_with_files(&self) -> String {
        if self.files.is_empty() {
            return self.content.clone();
        }
        let names: Vec<&str> = self.files.iter().map(|f| f.filename.as_str()).collect();
        format!("{}\n\n[Attached files: {}]", self.content, names.join(", "))
    }
}

/// One recorded agent invocation (or supervisor-level outcome)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResult {
    /// Agent name (or `SUPERVISOR_AGENT`)
    pub agent: String,
    /// What the agent returned
    pub output: AgentOutput,
    /// Whether the invocation failed
    pub error: bool,
    /// When the result was recorded
    pub timestamp: DateTime<Utc>,
}

impl AgentResult {
    /// Record a successful invocation
    #[must_use]
    pub fn ok(agent: impl Into<String>, output: AgentOutput) -> Self {
        Self {
            agent: agent.into(),
            output,
            error: false,
            timestamp: Utc::now(),
        }
    }

    /// Record a failed invocation
    #[must_use]
    pub fn failed(agent: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            output: AgentOutput::text(message),
            error: true,
            timestamp: Utc::now(),
        }
    }
}

/// Normalized descriptor of an artifact a handler stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// Artifact kind (image, audio, document, report, ...)
    pub kind: String,
    /// Object-store key
    pub object_name: String,
    /// Size in bytes, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// The raw structured output the descriptor was extracted from
    pub metadata: serde_json::Value,
}

/// Routing pointer set by the supervisor and consumed by the scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextStep {
    /// Dispatch the named capability
    Agent(String),
    /// Proceed to the finalizer
    Finish,
}

/// Turn-scoped mutable state (see module docs for field ownership)
#[derive(Debug)]
pub struct TurnState {
    /// Turn id for log correlation
    pub turn_id: Uuid,
    /// Conversation history (immutable input)
    pub messages: Vec<ChatMessage>,
    /// User id (immutable input)
    pub user_id: i64,
    /// Chat id (immutable input)
    pub chat_id: i64,
    /// Files uploaded with the turn (immutable input)
    pub uploaded_files: Vec<UploadedFile>,
    /// Chat settings, normalized at construction (immutable input)
    pub chat_settings: ChatSettings,
    /// Append-only, insertion-ordered invocation results. The supervisor
    /// enforces at most one entry per capability name.
    pub agent_results: Vec<AgentResult>,
    /// Append-only artifact descriptors
    pub generated_files: Vec<GeneratedFile>,
    /// Cross-handler scratch notes
    pub shared_context: HashMap<String, String>,
    /// Routing pointer; `None` before the first decision
    pub next_agent: Option<NextStep>,
    /// Set once by the finalizer; the turn is terminal afterwards
    pub final_response: Option<String>,
}

impl TurnState {
    /// Build turn state from run inputs
    #[must_use]
    pub fn new(turn_id: Uuid, input: TurnInput) -> Self {
        Self {
            turn_id,
            messages: input.messages,
            user_id: input.user_id,
            chat_id: input.chat_id,
            uploaded_files: input.uploaded_files,
            chat_settings: input.chat_settings.normalized(),
            agent_results: Vec::new(),
            generated_files: Vec::new(),
            shared_context: HashMap::new(),
            next_agent: None,
            final_response: None,
        }
    }

    /// Latest user message, with attached filenames appended
    #[must_use]
    pub fn last_user_message(&self) -> String {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(ChatMessage::content_with_files)
            .unwrap_or_default()
    }

    /// Latest assistant message in the conversation history
    #[must_use]
    pub fn last_assistant_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::Assistant)
            .map(|m| m.content.as_str())
    }

    /// Names of capabilities already invoked this turn, in call order
    #[must_use]
    pub fn called_agents(&self) -> Vec<&str> {
        self.agent_results
            .iter()
            .filter(|r| r.agent != SUPERVISOR_AGENT)
            .map(|r| r.agent.as_str())
            .collect()
    }

    /// Whether a capability was already invoked this turn
    #[must_use]
    pub fn has_called(&self, agent: &str) -> bool {
        self.agent_results.iter().any(|r| r.agent == agent)
    }

    /// Number of capability invocations so far (supervisor entries excluded)
    #[must_use]
    pub fn invocation_count(&self) -> usize {
        self.called_agents().len()
    }
}

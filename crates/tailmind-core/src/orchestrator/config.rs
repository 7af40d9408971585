//! Orchestrator configuration and turn input

use tailmind_agents::{ChatSettings, UploadedFile};

use super::state::ChatMessage;

/// Input for one turn
#[derive(Debug, Clone)]
pub struct TurnInput {
    /// Conversation history, oldest first
    pub messages: Vec<ChatMessage>,
    /// Chat settings
    pub chat_settings: ChatSettings,
    /// Files uploaded with this turn
    pub uploaded_files: Vec<UploadedFile>,
    /// Chat id
    pub chat_id: i64,
    /// User id
    pub user_id: i64,
}

impl TurnInput {
    /// Create a new turn input
    #[must_use]
    pub fn new(
        messages: Vec<ChatMessage>,
        chat_settings: ChatSettings,
        uploaded_files: Vec<UploadedFile>,
        chat_id: i64,
        user_id: i64,
    ) -> Self {
        Self {
            messages,
            chat_settings,
            uploaded_files,
            chat_id,
            user_id,
        }
    }
}

/// Configuration for the orchestrator
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Circuit breaker: maximum agent invocations per turn
    pub max_iterations: usize,
    /// How many uploaded files to preview in the supervisor prompt
    pub file_preview_limit: usize,
    /// Character budget for prior-result summaries in the decision prompt
    pub summary_preview_chars: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            file_preview_limit: 5,
            summary_preview_chars: 400,
        }
    }
}

impl OrchestratorConfig {
    /// Create a new configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the iteration cap
    #[must_use]
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Set the uploaded-file preview bound
    #[must_use]
    pub fn with_file_preview_limit(mut self, limit: usize) -> Self {
        self.file_preview_limit = limit;
        self
    }

    /// Set the summary preview budget
    #[must_use]
    pub fn with_summary_preview_chars(mut self, chars: usize) -> Self {
        self.summary_preview_chars = chars;
        self
    }
}

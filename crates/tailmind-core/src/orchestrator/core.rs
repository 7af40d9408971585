//! Orchestrator core structure and run entry point
//!
//! One long-lived `Orchestrator` is constructed at process startup and
//! passed by reference to request handlers. A turn-level mutex serializes
//! turns on the instance: one turn fully completes (or fails) before the
//! next begins.

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tailmind_agents::AgentRegistry;
use tailmind_llm::LlmProvider;
use tokio::sync::Mutex;
use tracing::{error, info};
use uuid::Uuid;

use crate::error::{Error, Result};

use super::config::{OrchestratorConfig, TurnInput};
use super::state::{GeneratedFile, TurnState, SUPERVISOR_AGENT};

/// Generic apology for faults that escape every containment layer.
const FATAL_TURN_MESSAGE: &str =
    "Sorry, something went wrong while processing your request. Please try again.";

/// Per-turn metadata returned with the response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnMetadata {
    /// Capabilities that completed without error, in call order
    pub agents_used: Vec<String>,
    /// Total capability invocations this turn
    pub total_agents_called: usize,
    /// Present only when the turn ended on an unexpected internal fault
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of one turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResult {
    /// Final response text
    pub text: String,
    /// Turn metadata
    pub metadata: TurnMetadata,
    /// Artifacts produced by handlers this turn
    pub generated_files: Vec<GeneratedFile>,
    /// Wall-clock duration of the turn in milliseconds
    pub duration_ms: u64,
}

/// The turn orchestration engine
pub struct Orchestrator {
    pub(super) provider: Arc<dyn LlmProvider>,
    pub(super) registry: Arc<AgentRegistry>,
    pub(super) config: OrchestratorConfig,
    /// Serializes turns on this instance
    turn_lock: Mutex<()>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("provider", &self.provider.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Create a new orchestrator. Rejects configurations under which no
    /// capability could ever run.
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        registry: Arc<AgentRegistry>,
        config: OrchestratorConfig,
    ) -> Result<Self> {
        if config.max_iterations == 0 {
            return Err(Error::Configuration(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        info!(
            provider = provider.name(),
            agents = registry.len(),
            max_iterations = config.max_iterations,
            "Orchestrator initialized"
        );
        Ok(Self {
            provider,
            registry,
            config,
            turn_lock: Mutex::new(()),
        })
    }

    /// Registered capability names
    #[must_use]
    pub fn agent_names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// The decision-service provider name
    #[must_use]
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Run one turn to completion.
    ///
    /// Never returns an error for handler or decision-service failures;
    /// those degrade into the response text. A fault escaping all
    /// containment yields a generic failure result, and the instance stays
    /// usable for subsequent turns.
    #[tracing::instrument(skip(self, input), fields(chat = input.chat_id, user = input.user_id))]
    pub async fn run(&self, input: TurnInput) -> TurnResult {
        let start_time = std::time::Instant::now();
        let turn_id = Uuid::new_v4();

        info!(
            turn_id = %turn_id,
            messages = input.messages.len(),
            files = input.uploaded_files.len(),
            "Turn started"
        );

        let _turn = self.turn_lock.lock().await;

        let mut state = TurnState::new(turn_id, input);
        let outcome = AssertUnwindSafe(self.drive(&mut state)).catch_unwind().await;

        let duration_ms = start_time.elapsed().as_millis() as u64;

        match outcome {
            Ok(()) => {
                let agents_used: Vec<String> = state
                    .agent_results
                    .iter()
                    .filter(|r| !r.error && r.agent != SUPERVISOR_AGENT)
                    .map(|r| r.agent.clone())
                    .collect();
                let total_agents_called = state.invocation_count();

                info!(
                    turn_id = %turn_id,
                    agents = ?agents_used,
                    total = total_agents_called,
                    duration_ms = duration_ms,
                    generated_files = state.generated_files.len(),
                    "Turn completed"
                );

                TurnResult {
                    text: state
                        .final_response
                        .unwrap_or_else(|| EMPTY_RESPONSE_MESSAGE.to_string()),
                    metadata: TurnMetadata {
                        agents_used,
                        total_agents_called,
                        error: None,
                    },
                    generated_files: state.generated_files,
                    duration_ms,
                }
            }
            Err(panic) => {
                let detail = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!(turn_id = %turn_id, panic = %detail, "Turn aborted by internal fault");

                TurnResult {
                    text: FATAL_TURN_MESSAGE.to_string(),
                    metadata: TurnMetadata {
                        agents_used: Vec::new(),
                        total_agents_called: 0,
                        error: Some(detail),
                    },
                    generated_files: Vec::new(),
                    duration_ms,
                }
            }
        }
    }
}

/// Shown if a turn somehow terminates without the finalizer running.
const EMPTY_RESPONSE_MESSAGE: &str = "Processing finished without a response.";

//! Scheduler - the turn-level control-flow state machine
//!
//! One entry (the supervisor), conditional edges from the supervisor to a
//! capability or the finalizer, and a return edge from every capability back
//! to the supervisor. Strict alternation: two capabilities never run
//! back-to-back, and nothing runs concurrently within a turn.

use tracing::debug;

use super::core::Orchestrator;
use super::state::{NextStep, TurnState};

/// Scheduler phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Phase {
    /// Supervisor active
    Routing,
    /// One capability adapter active
    Dispatched(String),
    /// Finalizer active
    Finalizing,
    /// Terminal
    Done,
}

impl Orchestrator {
    /// Drive one turn from `Routing` to `Done`.
    pub(super) async fn drive(&self, state: &mut TurnState) {
        let mut phase = Phase::Routing;

        while phase != Phase::Done {
            debug!(turn_id = %state.turn_id, phase = ?phase, "Scheduler step");
            phase = match phase {
                Phase::Routing => {
                    self.supervise(state).await;
                    self.route_from_supervisor(state)
                }
                Phase::Dispatched(agent) => {
                    self.dispatch(state, &agent).await;
                    Phase::Routing
                }
                Phase::Finalizing => {
                    self.finalize(state);
                    Phase::Done
                }
                Phase::Done => Phase::Done,
            };
        }
    }

    /// Conditional edge out of the supervisor: a registered capability that
    /// the breaker still allows, otherwise the finalizer.
    fn route_from_supervisor(&self, state: &TurnState) -> Phase {
        match &state.next_agent {
            Some(NextStep::Agent(name))
                if self.registry.contains(name)
                    && state.agent_results.len() < self.config.max_iterations =>
            {
                Phase::Dispatched(name.clone())
            }
            _ => Phase::Finalizing,
        }
    }
}

//! Orchestrator - the turn orchestration engine
//!
//! Decides, per turn, which capability handlers to invoke and in what
//! order, threads working context between them, aggregates their outputs
//! into one response, and fails gracefully when a handler or the decision
//! service misbehaves.
//!
//! # Module Structure
//!
//! - `state`: turn-scoped mutable state
//! - `config`: `OrchestratorConfig` and `TurnInput`
//! - `decision`: decision text parsing
//! - `prompts`: supervisor prompt construction
//! - `supervisor`: the routing decision step
//! - `dispatch`: the capability adapter
//! - `scheduler`: the control-flow state machine
//! - `finalizer`: response aggregation and rendering
//! - `core`: the `Orchestrator` struct and run entry point

mod config;
mod core;
mod decision;
mod dispatch;
mod finalizer;
mod prompts;
mod scheduler;
mod state;
mod supervisor;


pub use config::{OrchestratorConfig, TurnInput};
pub use core::{Orchestrator, TurnMetadata, TurnResult};
pub use decision::{parse_decision, Decision, DecisionAction};
pub use state::{
    AgentResult, ChatMessage, ChatRole, GeneratedFile, NextStep, TurnState, SUPERVISOR_AGENT,
};

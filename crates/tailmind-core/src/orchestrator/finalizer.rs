//! Finalizer - turns accumulated results into one response
//!
//! Classifies results into action/info/error buckets, renders confirmations
//! first, deduplicates info segments by a 100-character prefix, suppresses
//! structured outputs already captured as artifacts, and appends warnings
//! last. Pure over turn state: rendering the same terminal state twice
//! yields identical text.

use tailmind_agents::AgentOutput;
use tracing::debug;

use super::core::Orchestrator;
use super::state::{AgentResult, GeneratedFile, NextStep, TurnState};

/// Capabilities whose results read as performed actions rather than
/// information. Hardcoded allowlist; see DESIGN.md for the extension note.
pub(crate) const ACTION_AGENTS: &[&str] = &["email", "calendar"];

/// Prefix length for info-segment deduplication.
const DEDUP_PREFIX_CHARS: usize = 100;

/// Fixed fallback when a turn produced nothing at all.
const EMPTY_TURN_MESSAGE: &str =
    "Sorry, I could not process your request. Please try again.";

/// Render one output as human-readable text.
fn render_output(output: &AgentOutput) -> String {
    if let Some(text) = output
        .str_field("text")
        .or_else(|| output.str_field("analysis"))
    {
        return text.to_string();
    }
    match output {
        AgentOutput::Text(text) => text.clone(),
        AgentOutput::Structured(value) => value.to_string(),
    }
}

/// Render an action result as a confirmation line.
fn render_action(result: &AgentResult) -> String {
    let body = match result.output.str_field("status") {
        Some(status) if result.output.str_field("text").is_none() => {
            format!("{} {}", result.agent, status)
        }
        _ => render_output(&result.output),
    };
    format!("✅ {body}")
}

/// Whether a structured output is an artifact already captured in
/// `generated_files`. Uncaptured outputs always render, whatever their
/// kind markers claim.
fn represents_artifact(output: &AgentOutput, generated_files: &[GeneratedFile]) -> bool {
    output
        .str_field("object_name")
        .is_some_and(|name| generated_files.iter().any(|f| f.object_name == name))
}

/// Render the final response from terminal turn state. Pure: no mutation,
/// identical input yields identical text.
pub(crate) fn render_final_response(state: &TurnState) -> String {
    let mut actions = Vec::new();
    let mut infos = Vec::new();
    let mut errors = Vec::new();

    for result in &state.agent_results {
        if result.error {
            errors.push(result);
        } else if ACTION_AGENTS.contains(&result.agent.as_str()) {
            actions.push(result);
        } else {
            infos.push(result);
        }
    }

    let mut parts: Vec<String> = Vec::new();

    for result in actions {
        parts.push(render_action(result));
    }

    let mut seen_prefixes: Vec<String> = Vec::new();
    for result in infos {
        if represents_artifact(&result.output, &state.generated_files) {
            continue;
        }
        let rendered = render_output(&result.output);
        if rendered.trim().is_empty() {
            continue;
        }
        let prefix: String = rendered.chars().take(DEDUP_PREFIX_CHARS).collect();
        if seen_prefixes.contains(&prefix) {
            continue;
        }
        seen_prefixes.push(prefix);
        parts.push(rendered);
    }

    for result in errors {
        parts.push(format!("⚠️ {}", render_output(&result.output)));
    }

    if parts.is_empty() {
        if state.generated_files.is_empty() {
            return EMPTY_TURN_MESSAGE.to_string();
        }
        let mut kinds: Vec<&str> = Vec::new();
        for file in &state.generated_files {
            if !kinds.contains(&file.kind.as_str()) {
                kinds.push(file.kind.as_str());
            }
        }
        return format!(
            "I've created the requested {} file(s). They are attached to this message.",
            kinds.join(", ")
        );
    }

    // Second pass: drop exact-duplicate whole segments
    let mut unique_parts: Vec<String> = Vec::new();
    for part in parts {
        if !unique_parts.contains(&part) {
            unique_parts.push(part);
        }
    }

    unique_parts.join("\n\n")
}

impl Orchestrator {
    /// Set the final response and mark the turn terminal. Mutates only
    /// `final_response` and `next_agent`.
    pub(super) fn finalize(&self, state: &mut TurnState) {
        let response = render_final_response(state);
        debug!(
            turn_id = %state.turn_id,
            results = state.agent_results.len(),
            generated_files = state.generated_files.len(),
            "Turn finalized"
        );
        state.final_response = Some(response);
        state.next_agent = Some(NextStep::Finish);
    }
}

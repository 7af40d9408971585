//! Decision parsing - from free-form decision text to a structured decision
//!
//! The decision service returns text that should contain one JSON object.
//! Parsing is a lenient pre-pass (strip one surrounding code fence) followed
//! by a strict serde parse. Any violation fails closed to `finish`: broken
//! decision text never blocks turn completion.

use serde::Deserialize;
use tracing::warn;

/// What the supervisor decided to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionAction {
    /// Invoke one more capability
    CallAgent,
    /// Stop routing and finalize
    Finish,
}

/// A parsed supervisor decision
#[derive(Debug, Clone, Deserialize)]
pub struct Decision {
    /// The action to take
    pub action: DecisionAction,
    /// Target capability, required when action is `call_agent`
    #[serde(default)]
    pub agent: Option<String>,
    /// Optional note copied into `shared_context["last_note"]`
    #[serde(default)]
    pub context_note: Option<String>,
}

impl Decision {
    /// The closed-failure sentinel: stop routing.
    #[must_use]
    pub fn finish() -> Self {
        Self {
            action: DecisionAction::Finish,
            agent: None,
            context_note: None,
        }
    }
}

/// Strip one surrounding markdown code fence (```json ... ``` or ``` ... ```)
/// if present. Anything else is returned untouched.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence line
    let body = body.strip_prefix("json").unwrap_or(body);
    body.trim()
}

/// Parse decision text into a `Decision`, failing closed to `finish`.
#[must_use]
pub fn parse_decision(text: &str) -> Decision {
    let body = strip_code_fence(text);

    let decision: Decision = match serde_json::from_str(body) {
        Ok(d) => d,
        Err(e) => {
            warn!(error = %e, "Failed to parse supervisor decision, finishing");
            return Decision::finish();
        }
    };

    // call_agent without a target is malformed
    if decision.action == DecisionAction::CallAgent
        && decision.agent.as_deref().map_or(true, str::is_empty)
    {
        warn!("Decision requested call_agent without an agent, finishing");
        return Decision::finish();
    }

    decision
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json() {
        let decision = parse_decision(r#"{"action":"call_agent","agent":"pet_memory"}"#);
        assert_eq!(decision.action, DecisionAction::CallAgent);
        assert_eq!(decision.agent.as_deref(), Some("pet_memory"));
    }

    #[test]
    fn test_fenced_json() {
        let decision =
            parse_decision("```json\n{\"action\":\"call_agent\",\"agent\":\"pet_memory\"}\n```");
        assert_eq!(decision.action, DecisionAction::CallAgent);
        assert_eq!(decision.agent.as_deref(), Some("pet_memory"));
    }

    #[test]
    fn test_bare_fence() {
        let decision = parse_decision("```\n{\"action\":\"finish\"}\n```");
        assert_eq!(decision.action, DecisionAction::Finish);
    }

    #[test]
    fn test_context_note() {
        let decision = parse_decision(
            r#"{"action":"call_agent","agent":"email","context_note":"send to the vet"}"#,
        );
        assert_eq!(decision.context_note.as_deref(), Some("send to the vet"));
    }

    #[test]
    fn test_malformed_fails_closed() {
        assert_eq!(parse_decision("not json").action, DecisionAction::Finish);
        assert_eq!(parse_decision("").action, DecisionAction::Finish);
        assert_eq!(
            parse_decision("{\"action\":\"call_agent\"").action,
            DecisionAction::Finish
        );
    }

    #[test]
    fn test_unknown_action_fails_closed() {
        let decision = parse_decision(r#"{"action":"dance"}"#);
        assert_eq!(decision.action, DecisionAction::Finish);
    }

    #[test]
    fn test_call_agent_without_target_fails_closed() {
        let decision = parse_decision(r#"{"action":"call_agent"}"#);
        assert_eq!(decision.action, DecisionAction::Finish);
        assert!(decision.agent.is_none());

        let decision = parse_decision(r#"{"action":"call_agent","agent":""}"#);
        assert_eq!(decision.action, DecisionAction::Finish);
    }
}

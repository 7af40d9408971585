//! Capability adapter - the uniform invocation boundary
//!
//! Builds the per-call context, applies the TTS enrichment pre-pass for
//! content generation, invokes the handler, and converts its outcome into
//! state mutations (`agent_results`, `generated_files`, `shared_context`).
//! Handler failures are recorded, never re-raised; control always returns
//! to the scheduler.

use tailmind_agents::{AgentContext, AgentOutput};
use tracing::{debug, info, warn};

use super::core::Orchestrator;
use super::state::{AgentResult, GeneratedFile, TurnState};

/// Keywords that mark an explicit "produce audio/speech" intent in the
/// latest user message (case-insensitive substring match).
const AUDIO_INTENT_KEYWORDS: &[&str] = &[
    "voice",
    "audio",
    "speak",
    "out loud",
    "read aloud",
    "tts",
];

/// Whether the user explicitly asked for a spoken answer.
pub(super) fn wants_audio_response(message: &str) -> bool {
    let lower = message.to_lowercase();
    AUDIO_INTENT_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Pull a speakable text out of an agent output: prefer the known
/// renderable fields, otherwise use the output verbatim.
fn speakable_text(output: &AgentOutput) -> String {
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

/// Build the enriched TTS instruction for content generation: speak the most
/// recent non-error prior result, falling back to the latest assistant
/// message when no agent ran yet. Returns `None` when there is nothing to
/// speak, in which case the raw user message is forwarded unchanged.
fn build_tts_instruction(state: &TurnState) -> Option<String> {
    let source = state
        .agent_results
        .iter()
        .rev()
        .find(|r| !r.error)
        .map(|r| speakable_text(&r.output))
        .or_else(|| state.last_assistant_message().map(str::to_string))?;

    Some(format!(
        "Convert the following text to speech:\n\n{source}\n\n\
         Pick a suitable voice and return the audio as a wav file."
    ))
}

impl Orchestrator {
    /// Invoke one capability handler and record its outcome.
    pub(super) async fn dispatch(&self, state: &mut TurnState, agent_name: &str) {
        info!(turn_id = %state.turn_id, agent = %agent_name, "Dispatching agent");

        let Some(agent) = self.registry.get(agent_name) else {
            // The scheduler only dispatches registered names; keep the turn
            // alive if that ever stops holding.
            warn!(turn_id = %state.turn_id, agent = %agent_name, "Agent not registered");
            state.agent_results.push(AgentResult::failed(
                agent_name,
                format!("agent not found: {agent_name}"),
            ));
            return;
        };

        let context = AgentContext {
            chat_id: state.chat_id,
            uploaded_files: state.uploaded_files.clone(),
            settings: state.chat_settings.clone(),
            hints: state.shared_context.clone(),
        };

        let user_message = state.last_user_message();
        let effective_message = if agent_name == "content_generation"
            && wants_audio_response(&user_message)
        {
            match build_tts_instruction(state) {
                Some(instruction) => {
                    debug!(turn_id = %state.turn_id, "Using enriched TTS instruction");
                    instruction
                }
                None => user_message,
            }
        } else {
            user_message
        };

        match agent
            .invoke(state.user_id, &effective_message, &context)
            .await
        {
            Ok(output) => {
                self.record_success(state, agent_name, output);
                info!(turn_id = %state.turn_id, agent = %agent_name, "Agent completed");
            }
            Err(e) => {
                warn!(turn_id = %state.turn_id, agent = %agent_name, error = %e, "Agent failed");
                state
                    .agent_results
                    .push(AgentResult::failed(agent_name, e.to_string()));
            }
        }
    }

    /// Record a successful invocation: the result entry, any stored artifact,
    /// and the messaging recipient note.
    fn record_success(&self, state: &mut TurnState, agent_name: &str, output: AgentOutput) {
        if let Some(object_name) = output.str_field("object_name") {
            let kind = output
                .str_field("kind")
                .or_else(|| output.str_field("content_type"))
                .unwrap_or("file")
                .to_string();
            let size = output
                .as_structured()
                .and_then(|v| v.get("size"))
                .and_then(serde_json::Value::as_u64);
            debug!(
                turn_id = %state.turn_id,
                agent = %agent_name,
                object_name = %object_name,
                kind = %kind,
                "Recorded generated artifact"
            );
            state.generated_files.push(GeneratedFile {
                kind,
                object_name: object_name.to_string(),
                size,
                metadata: output
                    .as_structured()
                    .cloned()
                    .unwrap_or(serde_json::Value::Null),
            });
        }

        if agent_name == "email" {
            if let Some(recipient) = output.str_field("recipient") {
                state
                    .shared_context
                    .insert("last_recipient".to_string(), recipient.to_string());
            }
        }

        state
            .agent_results
            .push(AgentResult::ok(agent_name, output));
    }
}

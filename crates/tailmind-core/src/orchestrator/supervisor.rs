//! Supervisor - the single-step routing decision
//!
//! Each supervisor step builds the decision conversation, calls the decision
//! service, parses and policy-gates the decision, and updates the routing
//! pointer. It mutates only `next_agent`, `shared_context`, and (for
//! degraded/gated outcomes) appends a supervisor entry to `agent_results`.
//! It never invokes a capability handler itself.

use tailmind_agents::AgentOutput;
use tailmind_llm::{CompletionRequest, Message};
use tracing::{debug, info, warn};

use super::core::Orchestrator;
use super::decision::{parse_decision, DecisionAction};
use super::prompts::{build_decision_instructions, build_supervisor_prompt};
use super::state::{AgentResult, NextStep, TurnState, SUPERVISOR_AGENT};

/// Message shown when the decision service itself is down.
const DEGRADED_SERVICE_MESSAGE: &str = "The model is currently unavailable. \
    Please try again later or pick a different model in the chat settings.";

/// Explanation recorded when web search is requested but disabled.
const WEB_SEARCH_DISABLED_MESSAGE: &str = "Web search is disabled in this chat. \
    I can answer without the internet, or you can enable web search in the chat \
    settings and ask again.";

/// Explanation recorded when content generation is requested but fully disabled.
const CONTENT_GENERATION_DISABLED_MESSAGE: &str = "Content generation and voice \
    responses are disabled in this chat. Enable them in the chat settings and I \
    can create images, charts, audio and reports.";

/// Summarize one agent output for the decision conversation.
///
/// Recognizes the known structured shapes (`status` confirmations,
/// `text`/`analysis` payloads) and falls back to a bounded prefix of the
/// serialized value.
pub(super) fn summarize_output(output: &AgentOutput, max_chars: usize) -> String {
    let preview = |s: &str| -> String { s.chars().take(max_chars).collect() };

    if let Some(status) = output.str_field("status") {
        return format!("action confirmed: {status}");
    }
    if let Some(text) = output
        .str_field("text")
        .or_else(|| output.str_field("analysis"))
    {
        return preview(text);
    }
    match output {
        AgentOutput::Text(text) => preview(text),
        AgentOutput::Structured(value) => preview(&value.to_string()),
    }
}

impl Orchestrator {
    /// One supervisor step. See module docs for the mutation contract.
    pub(super) async fn supervise(&self, state: &mut TurnState) {
        // Circuit breaker against runaway routing loops
        if state.agent_results.len() >= self.config.max_iterations {
            warn!(
                turn_id = %state.turn_id,
                results = state.agent_results.len(),
                max = self.config.max_iterations,
                "Iteration cap reached, finishing"
            );
            state.next_agent = Some(NextStep::Finish);
            return;
        }

        let called: Vec<String> = state
            .called_agents()
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        let called_refs: Vec<&str> = called.iter().map(String::as_str).collect();

        let system_prompt = build_supervisor_prompt(
            &state.chat_settings,
            &state.uploaded_files,
            &called_refs,
            &state.shared_context,
            self.config.file_preview_limit,
        );

        let mut conversation = vec![Message::system(system_prompt)];
        for result in &state.agent_results {
            conversation.push(Message::assistant(format!(
                "[{} result]\n{}",
                result.agent,
                summarize_output(&result.output, self.config.summary_preview_chars)
            )));
        }
        conversation.push(Message::user(state.last_user_message()));
        conversation.push(Message::user(build_decision_instructions(
            &state.chat_settings,
        )));

        let model = state
            .chat_settings
            .model_name
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_string());
        let mut request = CompletionRequest::new(model).with_messages(conversation);
        if let Some(temperature) = state.chat_settings.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = state.chat_settings.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        let response = match self.provider.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(turn_id = %state.turn_id, error = %e, "Decision service failed, finishing");
                state
                    .agent_results
                    .push(AgentResult::failed(SUPERVISOR_AGENT, DEGRADED_SERVICE_MESSAGE));
                state.next_agent = Some(NextStep::Finish);
                return;
            }
        };

        let decision = parse_decision(&response.content);
        debug!(turn_id = %state.turn_id, decision = ?decision, "Supervisor decision");

        match decision.action {
            DecisionAction::CallAgent => {
                let Some(agent) = decision.agent else {
                    // Unreachable after parse validation; fail closed anyway
                    state.next_agent = Some(NextStep::Finish);
                    return;
                };

                // Policy gate, evaluated before accepting the decision
                if agent == "web_search" && !state.chat_settings.web_search_enabled {
                    info!(turn_id = %state.turn_id, "web_search requested but disabled");
                    state.agent_results.push(AgentResult::ok(
                        SUPERVISOR_AGENT,
                        AgentOutput::text(WEB_SEARCH_DISABLED_MESSAGE),
                    ));
                    state.next_agent = Some(NextStep::Finish);
                    return;
                }

                if agent == "content_generation"
                    && !state.chat_settings.image_generation_enabled
                    && !state.chat_settings.voice_response_enabled
                {
                    info!(turn_id = %state.turn_id, "content_generation requested but disabled");
                    state.agent_results.push(AgentResult::ok(
                        SUPERVISOR_AGENT,
                        AgentOutput::text(CONTENT_GENERATION_DISABLED_MESSAGE),
                    ));
                    state.next_agent = Some(NextStep::Finish);
                    return;
                }

                if state.has_called(&agent) {
                    warn!(
                        turn_id = %state.turn_id,
                        agent = %agent,
                        "Agent already called, finishing to avoid a loop"
                    );
                    state.next_agent = Some(NextStep::Finish);
                    return;
                }

                if let Some(note) = decision.context_note {
                    state.shared_context.insert("last_note".to_string(), note);
                }
                info!(turn_id = %state.turn_id, agent = %agent, "Routing to agent");
                state.next_agent = Some(NextStep::Agent(agent));
            }
            DecisionAction::Finish => {
                debug!(turn_id = %state.turn_id, "Supervisor finished routing");
                state.next_agent = Some(NextStep::Finish);
            }
        }
    }
}

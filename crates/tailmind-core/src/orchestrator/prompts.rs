//! Supervisor prompt construction
//!
//! Builds the system prompt and the decision instruction block sent to the
//! decision service on every supervisor step.

use chrono::Utc;
use std::collections::HashMap;
use tailmind_agents::{ChatSettings, UploadedFile, CANONICAL_AGENTS};

/// System prompt: who the supervisor is, what agents exist, current settings,
/// uploaded files (bounded preview), already-called agents, and scratch notes.
pub(super) fn build_supervisor_prompt(
    settings: &ChatSettings,
    uploaded_files: &[UploadedFile],
    called_agents: &[&str],
    shared_context: &HashMap<String, String>,
    file_preview_limit: usize,
) -> String {
    let now = Utc::now().format("%Y-%m-%d %H:%M");

    let flag = |enabled: bool| if enabled { "enabled" } else { "disabled" };
    let settings_info = format!(
        "**Chat settings:**\n\
         - Web search: {}\n\
         - Image generation: {}\n\
         - Voice response: {}\n\
         - Model: {}",
        flag(settings.web_search_enabled),
        flag(settings.image_generation_enabled),
        flag(settings.voice_response_enabled),
        settings.model_name.as_deref().unwrap_or("default"),
    );

    let files_info = if uploaded_files.is_empty() {
        String::new()
    } else {
        let list: Vec<String> = uploaded_files
            .iter()
            .take(file_preview_limit)
            .map(|f| format!("- {} ({})", f.filename, f.file_type))
            .collect();
        format!("\n\n**Uploaded files:**\n{}", list.join("\n"))
    };

    let called_info = if called_agents.is_empty() {
        String::new()
    } else {
        format!("\n\n**Agents already called:** {}", called_agents.join(", "))
    };

    let notes_info = if shared_context.is_empty() {
        String::new()
    } else {
        let mut notes: Vec<String> = shared_context
            .iter()
            .map(|(k, v)| format!("- {k}: {v}"))
            .collect();
        notes.sort();
        format!("\n\n**Working notes:**\n{}", notes.join("\n"))
    };

    format!(
        "You are the supervisor of a multi-agent assistant for pet owners.\n\
         \n\
         **Current data:**\n\
         - Time: {now}\n\
         {settings_info}{files_info}{called_info}{notes_info}\n\
         \n\
         **Available agents (8):**\n\
         \n\
         1. **pet_memory** - pet profiles and medical records\n   \
         When: a pet is mentioned, questions about pets, medical records\n\
         2. **document_rag** - indexing and searching uploaded documents\n   \
         When: documents uploaded (PDF, DOCX, TXT, CSV, XLSX), questions about documents\n\
         3. **multimodal** - image, video and audio analysis\n   \
         When: media uploaded, OCR, transcription\n\
         4. **web_search** - internet lookup\n   \
         When: fresh information is needed AND web search is enabled\n\
         5. **health_nutrition** - health, nutrition and vaccination analysis\n   \
         When: health questions, feeding norms, food composition\n\
         6. **calendar** - calendar events\n   \
         When: creating or reviewing events, vet appointments\n\
         7. **content_generation** - images, charts, audio (TTS), reports\n   \
         When: image generation (if enabled), voice response (if enabled and requested), \
         charts and reports\n\
         8. **email** - sending email\n   \
         When: the user asks to send a letter or forward information\n\
         \n\
         **Your job:**\n\
         Analyze the request and the agent results so far. Decide whether one more agent \
         is needed or the final answer can be formed.\n\
         \n\
         **Strategy:**\n\
         - Save pet information automatically via pet_memory\n\
         - Index uploaded files via document_rag / multimodal\n\
         - Agent chains: pet_memory then health_nutrition; multimodal (OCR) then \
         health_nutrition; any agent then content_generation for TTS when a voice \
         response is enabled and requested\n\
         - Never call an agent that already ran\n\
         - When enough data is available, finish"
    )
}

/// Instruction block appended as the final user message: the decision JSON
/// contract plus the per-chat feature rules.
pub(super) fn build_decision_instructions(settings: &ChatSettings) -> String {
    let mut enabled = Vec::new();
    let mut disabled = Vec::new();

    if settings.web_search_enabled {
        enabled.push("web search (use it for anything that needs fresh data)");
    } else {
        disabled.push("web_search");
    }

    if settings.image_generation_enabled {
        enabled.push("image generation");
    } else {
        disabled.push("content_generation (image generation)");
    }

    if settings.voice_response_enabled {
        enabled.push("voice response (when the user asks for audio)");
    }

    let enabled_text = if enabled.is_empty() {
        String::new()
    } else {
        format!("\nEnabled: {}", enabled.join(", "))
    };
    let disabled_text = if disabled.is_empty() {
        String::new()
    } else {
        format!("\nDisabled: {}", disabled.join(", "))
    };

    let agent_names = CANONICAL_AGENTS
        .iter()
        .map(|name| format!("\"{name}\""))
        .collect::<Vec<_>>()
        .join(" | ");

    format!(
        "Analyze the situation and decide what to do next.\n\
         \n\
         Return JSON:\n\
         {{\n  \
         \"action\": \"call_agent\" | \"finish\",\n  \
         \"agent\": {agent_names} | null,\n  \
         \"context_note\": \"short note for the next agent\" (optional)\n\
         }}\n\
         \n\
         **Chat feature state:**{enabled_text}{disabled_text}\n\
         \n\
         **Rules:**\n\
         1. Do not call web_search when web search is disabled; explain the feature is off.\n\
         2. Do not call content_generation when both image generation and voice response \
         are disabled; explain the features are off.\n\
         3. Voice response: when the user explicitly asks for audio and voice response is \
         enabled, first gather the information, then call content_generation to turn the \
         answer into speech. Do not end with a text answer in that case.\n\
         4. Never call an agent that was already called this turn.\n\
         5. Chains are fine: gather data first, then process it with the next agent.\n\
         6. If you can answer directly, finish.\n\
         \n\
         Reply with JSON ONLY, no commentary."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_called_agents() {
        let prompt = build_supervisor_prompt(
            &ChatSettings::default(),
            &[],
            &["pet_memory", "web_search"],
            &HashMap::new(),
            5,
        );
        assert!(prompt.contains("pet_memory, web_search"));
    }

    #[test]
    fn test_prompt_bounds_file_preview() {
        let files: Vec<UploadedFile> = (0..10)
            .map(|i| UploadedFile::new(format!("file{i}.pdf"), "document"))
            .collect();
        let prompt =
            build_supervisor_prompt(&ChatSettings::default(), &files, &[], &HashMap::new(), 5);
        assert!(prompt.contains("file4.pdf"));
        assert!(!prompt.contains("file5.pdf"));
    }

    #[test]
    fn test_instructions_list_every_canonical_agent() {
        let text = build_decision_instructions(&ChatSettings::default());
        for name in CANONICAL_AGENTS {
            assert!(text.contains(name), "missing {name}");
        }
    }

    #[test]
    fn test_instructions_reflect_settings() {
        let settings = ChatSettings {
            web_search_enabled: true,
            ..ChatSettings::default()
        };
        let text = build_decision_instructions(&settings);
        assert!(text.contains("Enabled: web search"));
        assert!(text.contains("Disabled: content_generation"));
    }
}

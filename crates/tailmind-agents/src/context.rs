//! Per-call context passed to capability handlers
//!
//! The orchestrator builds one `AgentContext` per dispatch. Handlers read
//! from it; they never mutate turn state directly.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Chat-level feature configuration, loaded from the chat record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatSettings {
    /// Allow the web_search capability
    #[serde(default)]
    pub web_search_enabled: bool,
    /// Allow image generation through content_generation
    #[serde(default)]
    pub image_generation_enabled: bool,
    /// Allow voice (TTS) responses through content_generation
    #[serde(default)]
    pub voice_response_enabled: bool,
    /// Model name forwarded to the decision/generation service
    #[serde(default)]
    pub model_name: Option<String>,
    /// Sampling temperature forwarded to the decision service
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Token cap forwarded to the decision service
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl ChatSettings {
    /// Return a copy with the temperature clamped to the supported range.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut settings = self.clone();
        if let Some(temp) = settings.temperature {
            settings.temperature = Some(temp.clamp(0.0, 1.0));
        }
        settings
    }
}

/// Descriptor of a file uploaded with the turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Original file name
    pub filename: String,
    /// Coarse type (image, audio, video, document, ...)
    pub file_type: String,
    /// Object-store key, when already persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_name: Option<String>,
    /// Size in bytes, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl UploadedFile {
    /// Create a descriptor with just a name and type
    #[must_use]
    pub fn new(filename: impl Into<String>, file_type: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            file_type: file_type.into(),
            object_name: None,
            size: None,
        }
    }
}

/// Context handed to an agent for a single invocation
#[derive(Debug, Clone, Default)]
pub struct AgentContext {
    /// Chat the turn belongs to
    pub chat_id: i64,
    /// Files uploaded with the turn
    pub uploaded_files: Vec<UploadedFile>,
    /// Chat settings (read-only for handlers)
    pub settings: ChatSettings,
    /// Cross-handler notes (pet names, last recipient, ...). Opaque to the
    /// core; whatever a handler or the caller wrote is passed through.
    pub hints: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_normalized_clamps_temperature() {
        let settings = ChatSettings {
            temperature: Some(3.5),
            ..ChatSettings::default()
        };
        assert_eq!(settings.normalized().temperature, Some(1.0));

        let settings = ChatSettings {
            temperature: Some(-0.5),
            ..ChatSettings::default()
        };
        assert_eq!(settings.normalized().temperature, Some(0.0));
    }

    #[test]
    fn test_settings_deserialize_defaults() {
        let settings: ChatSettings = serde_json::from_str("{}").unwrap();
        assert!(!settings.web_search_enabled);
        assert!(settings.model_name.is_none());
    }
}

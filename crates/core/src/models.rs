use chrono::{DateTime, Utc};
use serde::Serialize;

/// The single document a session works against.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LoadedDocument {
    pub source_path: String,
    pub page_count: usize,
    pub checksum: String,
    pub cleaned_text: String,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Summary,
    Question,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub runner: String,
    pub model: String,
    pub ollama_url: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            runner: "ollama".to_string(),
            model: "gemma3".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
        }
    }
}

mod command;
mod ollama;

pub use command::CommandGenerator;
pub use ollama::OllamaHttpGenerator;

use crate::error::ModelError;
use crate::models::GeneratorConfig;
use crate::traits::TextGenerator;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Command,
    OllamaHttp,
}

/// A generator picked at runtime from configuration.
pub enum GeneratorBackend {
    Command(CommandGenerator),
    OllamaHttp(OllamaHttpGenerator),
}

impl GeneratorBackend {
    pub fn from_config(kind: BackendKind, config: &GeneratorConfig) -> Self {
        match kind {
            BackendKind::Command => {
                Self::Command(CommandGenerator::new(&config.runner, &config.model))
            }
            BackendKind::OllamaHttp => {
                Self::OllamaHttp(OllamaHttpGenerator::new(&config.ollama_url, &config.model))
            }
        }
    }
}

#[async_trait]
impl TextGenerator for GeneratorBackend {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        match self {
            Self::Command(generator) => generator.generate(prompt).await,
            Self::OllamaHttp(generator) => generator.generate(prompt).await,
        }
    }
}

use crate::error::ModelError;
use async_trait::async_trait;

/// Turns a prompt into model output.
#[async_trait]
pub trait TextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}

use crate::error::ModelError;
use crate::traits::TextGenerator;
use tracing::{debug, warn};

/// Wraps a generator for callers that only want displayable text.
pub struct ModelInvoker<G> {
    generator: G,
}

impl<G> ModelInvoker<G>
where
    G: TextGenerator + Send + Sync,
{
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        debug!(prompt_chars = prompt.len(), "invoking model");
        self.generator.generate(prompt).await
    }

    /// Never fails: errors come back as `Error: ...` or `Error running model: ...`.
    pub async fn invoke(&self, prompt: &str) -> String {
        match self.generate(prompt).await {
            Ok(output) => output,
            Err(error) => {
                warn!(%error, "model invocation failed");
                error.to_string()
            }
        }
    }
}

use crate::error::ModelError;
use crate::traits::TextGenerator;
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Runs `<runner> run <model> <prompt>` and waits for it to exit.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    runner: String,
    model: String,
}

impl CommandGenerator {
    pub fn new(runner: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            runner: runner.into(),
            model: model.into(),
        }
    }

    pub fn runner(&self) -> &str {
        &self.runner
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for CommandGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        // the prompt is a single argv entry, whitespace inside it never splits
        let output = Command::new(&self.runner)
            .arg("run")
            .arg(&self.model)
            .arg(prompt)
            .output()
            .await?;

        debug!(
            runner = %self.runner,
            model = %self.model,
            status = %output.status,
            "model process exited"
        );

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(ModelError::Failed {
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

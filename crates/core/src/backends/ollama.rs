use crate::error::ModelError;
use crate::traits::TextGenerator;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Calls a running Ollama server's `/api/generate` instead of spawning the CLI.
pub struct OllamaHttpGenerator {
    client: Arc<Client>,
    endpoint: String,
    model: String,
}

impl OllamaHttpGenerator {
    pub fn new(base_url: impl AsRef<str>, model: impl Into<String>) -> Self {
        Self {
            client: Arc::new(Client::new()),
            endpoint: generate_endpoint(base_url.as_ref()),
            model: model.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn generate_endpoint(base_url: &str) -> String {
    format!("{}/api/generate", base_url.trim_end_matches('/'))
}

fn parse_generate_response(body: &str) -> Result<String, serde_json::Error> {
    let payload: GenerateResponse = serde_json::from_str(body)?;
    Ok(payload.response.trim().to_string())
}

#[async_trait]
impl TextGenerator for OllamaHttpGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(endpoint = %self.endpoint, status = %status, "ollama responded");

        if !status.is_success() {
            return Err(ModelError::BackendResponse {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        parse_generate_response(&body).map_err(|error| ModelError::BackendResponse {
            status: status.as_u16(),
            body: format!("unreadable response: {error}"),
        })
    }
}

use crate::completion::{CompletionError, Result, TextCompletion};
use crate::models::{GenerateRequest, GenerateResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// 本地 Ollama 运行时 Provider（qwen2.5 等）
#[derive(Clone)]
pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(base_url: Option<String>, model: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| CompletionError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.unwrap_or_else(|| "http://127.0.0.1:11434".to_string()),
            model: model.unwrap_or_else(|| "qwen2.5:latest".to_string()),
        })
    }
}

#[async_trait]
impl TextCompletion for OllamaProvider {
    fn provider(&self) -> &str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str, timeout: Duration) -> Result<String> {
        let req = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };

        tracing::debug!(
            model = %self.model,
            prompt_length = prompt.len(),
            "Calling Ollama API"
        );

        let resp = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .timeout(timeout)
            .json(&req)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout
                } else {
                    CompletionError::Unavailable(e.to_string())
                }
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::error!(status, body = %body, "Ollama API request failed");
            return Err(CompletionError::Api { status, body });
        }

        let generate_resp: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| CompletionError::Decode(e.to_string()))?;

        tracing::debug!(
            response_length = generate_resp.response.len(),
            "Ollama API response received"
        );

        Ok(generate_resp.response.trim().to_string())
    }
}

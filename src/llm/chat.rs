use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::traits::ChatModel;

/// Chat client for Ollama's `/api/chat` endpoint, non-streaming.
#[derive(Clone)]
pub struct OllamaChat {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OllamaChat {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            temperature,
        }
    }
}

#[async_trait]
impl ChatModel for OllamaChat {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&json!({
                "model": self.model,
                "messages": [
                    {
                        "role": "user",
                        "content": prompt
                    }
                ],
                "stream": false,
                "options": {
                    "temperature": self.temperature
                }
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            return Err(anyhow!(
                "chat request failed: status {}, body: {}",
                status,
                error_text
            ));
        }

        let response_json: Value = response.json().await?;

        if let Some(error) = response_json.get("error") {
            return Err(anyhow!("chat API returned error: {}", error));
        }

        response_json
            .get("message")
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                let debug_json = serde_json::to_string_pretty(&response_json).unwrap_or_default();
                anyhow!("invalid chat response format: {}", debug_json)
            })
    }
}

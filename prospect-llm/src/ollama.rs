use async_trait::async_trait;
use prospect_common::{ProspectError, Result};
use serde_json::{json, Value as JsonValue};
use std::time::Duration;

use crate::traits::{LlmClient, LlmResponse};

const OLLAMA_CONNECTION_ERROR: &str =
    "No running Ollama server detected. Start it with `ollama serve`.";

/// Ollama client for local model inference.
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// Create a new client and verify the server is reachable.
    pub async fn new(base_url: String, model: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ProspectError::Config(format!("failed to create HTTP client: {e}")))?;

        let ollama = Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        };
        ollama.probe_server().await?;
        Ok(ollama)
    }

    async fn probe_server(&self) -> Result<()> {
        let url = format!("{}/api/tags", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|_| ProspectError::Config(OLLAMA_CONNECTION_ERROR.to_string()))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ProspectError::Config(OLLAMA_CONNECTION_ERROR.to_string()))
        }
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse> {
        let url = format!("{}/api/generate", self.base_url);
        let mut options = serde_json::Map::new();
        if let Some(t) = temperature {
            options.insert("temperature".into(), json!(t));
        }
        if let Some(n) = max_tokens {
            options.insert("num_predict".into(), json!(n));
        }

        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "system": system_prompt.unwrap_or_default(),
            "stream": false,
            "options": options,
        });

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProspectError::Capability(format!("Ollama request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(ProspectError::Capability(format!(
                "Ollama returned {}",
                resp.status()
            )));
        }

        let val: JsonValue = resp
            .json()
            .await
            .map_err(|e| ProspectError::Capability(format!("Ollama response decode failed: {e}")))?;

        let text = val
            .get("response")
            .and_then(|r| r.as_str())
            .unwrap_or_default()
            .to_string();

        Ok(LlmResponse {
            text,
            model: Some(self.model.clone()),
            tokens_used: val
                .get("eval_count")
                .and_then(|c| c.as_u64())
                .map(|c| c as u32),
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

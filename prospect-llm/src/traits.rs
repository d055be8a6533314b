use async_trait::async_trait;
use prospect_common::Result;
use serde::{Deserialize, Serialize};

use crate::parse::parse_string_list;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub model: Option<String>,
    pub tokens_used: Option<u32>,
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a response to the given prompt with optional system prompt.
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;

    /// Ask the model for a list of short strings (sub-queries, follow-up
    /// questions). Accepts JSON arrays, bulleted, or numbered output; an
    /// empty list is a legitimate answer, not an error.
    async fn generate_list(&self, prompt: &str, system_prompt: &str) -> Result<Vec<String>> {
        let response = self
            .generate(prompt, Some(system_prompt), Some(400), Some(0.3))
            .await?;
        tracing::debug!(target: "llm", model = self.model_name(), raw = %response.text, "llm.list_response");
        Ok(parse_string_list(&response.text))
    }
}

use async_trait::async_trait;
use prospect_common::{ProspectError, Result};
use prospect_http::{Auth, HttpClient, RequestOpts};
use serde::{Deserialize, Serialize};

use crate::traits::{LlmClient, LlmResponse};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1/";

pub struct OpenAiClient {
    client: HttpClient,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ResponsesApiRequest {
    model: String,
    input: String,
    instructions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ResponsesApiResponse {
    model: String,
    #[serde(default)]
    output: Vec<ResponseMessage>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Vec<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: Option<u32>,
}

impl OpenAiClient {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        Self::with_base_url(OPENAI_API_BASE, api_key, model)
    }

    /// Point the client at a non-default endpoint (proxies, tests).
    pub fn with_base_url(base: &str, api_key: String, model: String) -> Result<Self> {
        let client = HttpClient::new(base)
            .map_err(|e| ProspectError::Config(format!("OpenAI client init failed: {e}")))?;
        Ok(Self {
            client,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse> {
        let instructions = system_prompt
            .unwrap_or("You are a research assistant mining the web for useful sources.")
            .to_string();

        let req = ResponsesApiRequest {
            model: self.model.clone(),
            input: prompt.to_string(),
            instructions,
            max_output_tokens: max_tokens,
            temperature,
        };

        let resp: ResponsesApiResponse = self
            .client
            .post_json(
                "responses",
                &req,
                RequestOpts {
                    auth: Some(Auth::Bearer(&self.api_key)),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| ProspectError::Capability(format!("OpenAI request failed: {e}")))?;

        let text = resp
            .output
            .iter()
            .flat_map(|msg| &msg.content)
            .find(|c| c.kind == "output_text")
            .map(|c| c.text.clone())
            .unwrap_or_default();

        Ok(LlmResponse {
            text,
            model: Some(resp.model),
            tokens_used: resp.usage.and_then(|u| u.total_tokens),
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

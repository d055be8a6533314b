//! Build a research session from configuration.

use std::sync::Arc;

use anyhow::Result;
use prospect_agents::{prompts, ReaderCapability, SearcherCapability, Session, SessionLimits};
use prospect_config::{LlmConfig, ProspectConfig};
use prospect_llm::{LlmClient, OllamaClient, OpenAiClient};
use prospect_web::build_engine;

/// How many sub-queries / follow-up questions one expansion may introduce.
/// Breadth is already bounded by the budgets; this bounds fan-out.
const MAX_ITEMS_PER_EXPANSION: usize = 3;

pub async fn build_session(topic: &str, cfg: &ProspectConfig) -> Result<Session> {
    let llm: Arc<dyn LlmClient> = match &cfg.llm {
        LlmConfig::Openai {
            model,
            auth_token,
            endpoint,
        } => Arc::new(OpenAiClient::with_base_url(
            endpoint,
            auth_token.clone(),
            model.clone(),
        )?),
        LlmConfig::Ollama { model, endpoint } => {
            Arc::new(OllamaClient::new(endpoint.clone(), model.clone()).await?)
        }
    };

    let engine = build_engine(
        &cfg.search.engine,
        cfg.search.api_key.as_deref(),
        cfg.search.max_results,
    )?;

    let searcher = Arc::new(SearcherCapability::new(
        engine,
        llm.clone(),
        topic,
        cfg.prompts
            .searcher
            .as_deref()
            .unwrap_or(prompts::SEARCHER_PROMPT),
        cfg.search.fetch_pages,
        MAX_ITEMS_PER_EXPANSION,
    )?);

    let reader = Arc::new(ReaderCapability::new(
        llm,
        topic,
        cfg.prompts
            .reader
            .as_deref()
            .unwrap_or(prompts::READER_PROMPT),
        MAX_ITEMS_PER_EXPANSION,
    ));

    let session = Session::new(
        topic,
        &cfg.session.model,
        searcher,
        reader,
        SessionLimits {
            max_documents: cfg.session.max_documents,
            max_tokens: cfg.session.max_tokens,
        },
    )?;
    Ok(session)
}

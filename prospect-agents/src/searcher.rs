//! Searcher capability: query in, fresh documents and sub-queries out.

use std::sync::Arc;

use async_trait::async_trait;
use prospect_common::{ProspectError, Result};
use prospect_http::HttpClient;
use prospect_llm::LlmClient;
use prospect_tree::{Document, DocumentMeta, NodeData, SourceKind};
use prospect_web::{extract, SearchEngine, SearchHit};

use crate::capability::Capability;
use crate::prompts;

pub struct SearcherCapability {
    engine: Arc<dyn SearchEngine>,
    llm: Arc<dyn LlmClient>,
    http: HttpClient,
    system_prompt: String,
    /// Fetch each hit's page for full content; when off (or on fetch
    /// failure) the document is built from the hit's own metadata.
    fetch_pages: bool,
    max_sub_queries: usize,
}

impl SearcherCapability {
    pub fn new(
        engine: Arc<dyn SearchEngine>,
        llm: Arc<dyn LlmClient>,
        topic: &str,
        prompt_template: &str,
        fetch_pages: bool,
        max_sub_queries: usize,
    ) -> Result<Self> {
        // page fetches go through get_text_absolute, so the base is unused
        let http = HttpClient::new("https://localhost/")
            .map_err(|e| ProspectError::Config(format!("searcher http init failed: {e}")))?;
        Ok(Self {
            engine,
            llm,
            http,
            system_prompt: prompts::render(prompt_template, topic, max_sub_queries),
            fetch_pages,
            max_sub_queries,
        })
    }

    async fn document_for_hit(&self, hit: &SearchHit, query: &str) -> Result<Document> {
        if self.fetch_pages {
            match extract::collect_page(&self.http, &hit.link, query).await {
                Ok(mut meta) => {
                    // search snippets often beat on-page metadata
                    if meta.summary.trim().is_empty() {
                        meta.summary = hit.summary.clone();
                    }
                    if meta.title.trim().is_empty() {
                        meta.title = hit.title.clone();
                    }
                    return Document::from_meta(meta);
                }
                Err(e) => {
                    tracing::warn!(
                        target: "searcher",
                        url = %hit.link,
                        error = %e,
                        "searcher.page_fetch_failed; using hit metadata"
                    );
                }
            }
        }
        Document::from_meta(DocumentMeta {
            summary: hit.summary.clone(),
            title: hit.title.clone(),
            kind: Some(SourceKind::WebPage),
            source: hit.link.clone(),
            query: query.to_string(),
            ..Default::default()
        })
    }

    async fn sub_queries(&self, query: &str) -> Vec<String> {
        let prompt = format!("Research question: {query}");
        match self.llm.generate_list(&prompt, &self.system_prompt).await {
            Ok(mut items) => {
                items.truncate(self.max_sub_queries);
                items
            }
            Err(e) => {
                // documents found by the engine are still worth keeping
                tracing::warn!(target: "searcher", error = %e, "searcher.sub_query_generation_failed");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl Capability for SearcherCapability {
    async fn invoke(&self, context: &NodeData) -> Result<Option<Vec<NodeData>>> {
        let query = match context {
            NodeData::Query(q) => q,
            NodeData::Document(doc) => {
                return Err(ProspectError::Capability(format!(
                    "searcher dispatched a document node ({})",
                    doc.source
                )))
            }
        };
        if query.trim().is_empty() {
            return Ok(None);
        }

        let hits = self.engine.search(query).await?;
        let mut dataset = Vec::new();
        for hit in &hits {
            match self.document_for_hit(hit, query).await {
                Ok(doc) => dataset.push(NodeData::Document(doc)),
                // content resolution failed: the hit carries nothing usable
                Err(e) => {
                    tracing::debug!(target: "searcher", url = %hit.link, error = %e, "searcher.hit_skipped")
                }
            }
        }

        for q in self.sub_queries(query).await {
            dataset.push(NodeData::Query(q));
        }

        if dataset.is_empty() && hits.is_empty() {
            // nothing found at all: prune this branch
            return Ok(None);
        }
        Ok(Some(dataset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prospect_llm::LlmResponse;

    struct FixedEngine(Vec<SearchHit>);

    #[async_trait]
    impl SearchEngine for FixedEngine {
        async fn search(&self, _query: &str) -> Result<Vec<SearchHit>> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    struct FixedLlm(&'static str);

    #[async_trait]
    impl LlmClient for FixedLlm {
        async fn generate(
            &self,
            _prompt: &str,
            _system_prompt: Option<&str>,
            _max_tokens: Option<u32>,
            _temperature: Option<f32>,
        ) -> Result<LlmResponse> {
            Ok(LlmResponse {
                text: self.0.to_string(),
                model: None,
                tokens_used: None,
            })
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    fn hit() -> SearchHit {
        SearchHit {
            title: "T".into(),
            link: "https://a.example".into(),
            summary: "S".into(),
        }
    }

    fn searcher(llm_text: &'static str) -> SearcherCapability {
        SearcherCapability::new(
            Arc::new(FixedEngine(vec![hit()])),
            Arc::new(FixedLlm(llm_text)),
            "topic",
            prompts::SEARCHER_PROMPT,
            false,
            3,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn hits_become_documents_and_listed_answers_become_queries() {
        let cap = searcher("- deeper question");
        let out = cap
            .invoke(&NodeData::Query("q".into()))
            .await
            .unwrap()
            .expect("expansion");
        assert_eq!(out.len(), 2);
        assert!(out[0].is_document());
        assert!(matches!(&out[1], NodeData::Query(q) if q == "deeper question"));
    }

    #[tokio::test]
    async fn stop_answer_keeps_documents_without_sub_queries() {
        let cap = searcher("STOP");
        let out = cap
            .invoke(&NodeData::Query("q".into()))
            .await
            .unwrap()
            .expect("expansion");
        assert_eq!(out.len(), 1);
        assert!(out[0].is_document());
    }
}

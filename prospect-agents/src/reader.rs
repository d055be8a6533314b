//! Reader capability: mine a fetched document for follow-up questions.

use std::sync::Arc;

use async_trait::async_trait;
use prospect_common::{ProspectError, Result};
use prospect_llm::LlmClient;
use prospect_tree::NodeData;

use crate::capability::Capability;
use crate::prompts;

/// Context handed to the model is clipped so one giant page cannot blow the
/// prompt; the tree's token accounting already charged the full content.
const READER_CONTEXT_CHARS: usize = 6000;

pub struct ReaderCapability {
    llm: Arc<dyn LlmClient>,
    system_prompt: String,
    max_questions: usize,
}

impl ReaderCapability {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        topic: &str,
        prompt_template: &str,
        max_questions: usize,
    ) -> Self {
        Self {
            llm,
            system_prompt: prompts::render(prompt_template, topic, max_questions),
            max_questions,
        }
    }
}

#[async_trait]
impl Capability for ReaderCapability {
    async fn invoke(&self, context: &NodeData) -> Result<Option<Vec<NodeData>>> {
        let doc = match context {
            NodeData::Document(doc) => doc,
            NodeData::Query(q) => {
                return Err(ProspectError::Capability(format!(
                    "reader dispatched a query node ({q:?})"
                )))
            }
        };

        let content: String = doc.page_content().chars().take(READER_CONTEXT_CHARS).collect();
        let prompt = format!(
            "Source: {}\nOriginating question: {}\n\nText:\n{}",
            doc.source, doc.query, content
        );

        let resp = self
            .llm
            .generate(&prompt, Some(&self.system_prompt), Some(300), Some(0.3))
            .await?;

        if prompts::is_stop_answer(&resp.text) {
            // model judged the page irrelevant; prune it from the results
            tracing::debug!(target: "reader", source = %doc.source, "reader.stop");
            return Ok(None);
        }

        let mut questions = prospect_llm::parse_string_list(&resp.text);
        questions.truncate(self.max_questions);
        // an answer with no parseable questions keeps the document but adds
        // no leaves; only an explicit STOP discards it
        Ok(Some(questions.into_iter().map(NodeData::Query).collect()))
    }
}

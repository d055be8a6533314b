//! DuckDuckGo Instant Answer adapter. Keyless, so it is the default
//! engine; coverage is thinner than a paid web-search API.

use async_trait::async_trait;
use prospect_common::{ProspectError, Result};
use prospect_http::{HttpClient, RequestOpts};
use serde::Deserialize;
use std::borrow::Cow;

use crate::search::{SearchEngine, SearchHit};

const DDG_API_BASE: &str = "https://api.duckduckgo.com/";

pub struct DuckDuckGoSearch {
    http: HttpClient,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct InstantAnswerResponse {
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,
    #[serde(rename = "Heading", default)]
    heading: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

/// Related topics are either leaf results or named groups of them. The
/// discriminating field is required in each variant so untagged matching
/// stays unambiguous; anything else (ads, see-also stubs) falls through to
/// `Other` and is ignored.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RelatedTopic {
    Leaf {
        #[serde(rename = "FirstURL")]
        first_url: String,
        #[serde(rename = "Text", default)]
        text: String,
    },
    Group {
        #[serde(rename = "Topics")]
        topics: Vec<RelatedTopic>,
    },
    Other(serde_json::Value),
}

impl DuckDuckGoSearch {
    pub fn new(max_results: usize) -> Result<Self> {
        Self::with_base_url(DDG_API_BASE, max_results)
    }

    pub fn with_base_url(base: &str, max_results: usize) -> Result<Self> {
        let http = HttpClient::new(base)
            .map_err(|e| ProspectError::Config(format!("duckduckgo client init failed: {e}")))?;
        Ok(Self { http, max_results })
    }
}

fn flatten_topics(topics: Vec<RelatedTopic>, out: &mut Vec<SearchHit>) {
    for topic in topics {
        match topic {
            RelatedTopic::Leaf { first_url, text } => {
                if first_url.trim().is_empty() {
                    continue;
                }
                // "Title - rest of snippet" is DDG's text convention
                let (title, summary) = match text.split_once(" - ") {
                    Some((t, s)) => (t.to_string(), s.to_string()),
                    None => (text.clone(), text),
                };
                out.push(SearchHit {
                    title,
                    link: first_url,
                    summary,
                });
            }
            RelatedTopic::Group { topics } => flatten_topics(topics, out),
            RelatedTopic::Other(_) => {}
        }
    }
}

#[async_trait]
impl SearchEngine for DuckDuckGoSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let resp: InstantAnswerResponse = self
            .http
            .get_json(
                "",
                RequestOpts {
                    query: Some(vec![
                        ("q", Cow::Borrowed(query)),
                        ("format", Cow::Borrowed("json")),
                        ("no_html", Cow::Borrowed("1")),
                        ("skip_disambig", Cow::Borrowed("0")),
                    ]),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| ProspectError::Capability(format!("duckduckgo search failed: {e}")))?;

        let mut hits = Vec::new();
        if !resp.abstract_url.trim().is_empty() {
            hits.push(SearchHit {
                title: resp.heading,
                link: resp.abstract_url,
                summary: resp.abstract_text,
            });
        }
        flatten_topics(resp.related_topics, &mut hits);
        hits.truncate(self.max_results);

        tracing::info!(
            target: "web.search",
            engine = "duckduckgo",
            query = %query,
            hit_count = hits.len(),
            "search.page"
        );
        Ok(hits)
    }

    fn name(&self) -> &'static str {
        "duckduckgo"
    }
}

//! Brave Search API adapter (web vertical).

use async_trait::async_trait;
use prospect_common::{ProspectError, Result};
use prospect_http::{Auth, HttpClient, RequestOpts};
use reqwest::header::{HeaderName, HeaderValue};
use serde::Deserialize;
use std::borrow::Cow;

use crate::search::{SearchEngine, SearchHit};

const BRAVE_API_BASE: &str = "https://api.search.brave.com/";

pub struct BraveSearch {
    http: HttpClient,
    token: String,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct WebSearchApiResponse {
    #[serde(default)]
    web: Option<WebResults>,
}

#[derive(Debug, Deserialize)]
struct WebResults {
    #[serde(default)]
    results: Vec<WebResult>,
}

#[derive(Debug, Deserialize)]
struct WebResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: String,
}

impl BraveSearch {
    pub fn new(token: String, max_results: usize) -> Result<Self> {
        Self::with_base_url(BRAVE_API_BASE, token, max_results)
    }

    pub fn with_base_url(base: &str, token: String, max_results: usize) -> Result<Self> {
        let http = HttpClient::new(base)
            .map_err(|e| ProspectError::Config(format!("brave client init failed: {e}")))?;
        Ok(Self {
            http,
            token,
            max_results,
        })
    }
}

#[async_trait]
impl SearchEngine for BraveSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let count = self.max_results.to_string();
        let token = HeaderValue::from_str(&self.token)
            .map_err(|e| ProspectError::Config(format!("invalid brave token: {e}")))?;

        let resp: WebSearchApiResponse = self
            .http
            .get_json(
                "res/v1/web/search",
                RequestOpts {
                    auth: Some(Auth::Header {
                        name: HeaderName::from_static("x-subscription-token"),
                        value: token,
                    }),
                    query: Some(vec![
                        ("q", Cow::Borrowed(query)),
                        ("count", Cow::Borrowed(count.as_str())),
                    ]),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| ProspectError::Capability(format!("brave search failed: {e}")))?;

        let hits: Vec<SearchHit> = resp
            .web
            .map(|w| w.results)
            .unwrap_or_default()
            .into_iter()
            .filter(|r| !r.url.trim().is_empty())
            .take(self.max_results)
            .map(|r| SearchHit {
                title: r.title,
                link: r.url,
                summary: r.description,
            })
            .collect();

        tracing::info!(
            target: "web.search",
            engine = "brave",
            query = %query,
            hit_count = hits.len(),
            "search.page"
        );
        Ok(hits)
    }

    fn name(&self) -> &'static str {
        "brave"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn hits_are_normalized_and_unlinked_results_dropped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/res/v1/web/search"))
            .and(header("x-subscription-token", "tok"))
            .and(query_param("q", "rust arena trees"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "web": {"results": [
                    {"title": "A", "url": "https://a.example", "description": "first"},
                    {"title": "no link", "url": "", "description": "dropped"},
                    {"title": "B", "url": "https://b.example", "description": "second"}
                ]}
            })))
            .mount(&server)
            .await;

        let engine = BraveSearch::with_base_url(&server.uri(), "tok".into(), 5).unwrap();
        let hits = engine.search("rust arena trees").await.unwrap();
        let links: Vec<&str> = hits.iter().map(|h| h.link.as_str()).collect();
        assert_eq!(links, vec!["https://a.example", "https://b.example"]);
    }

    #[tokio::test]
    async fn empty_verticals_yield_no_hits() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/res/v1/web/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let engine = BraveSearch::with_base_url(&server.uri(), "tok".into(), 5).unwrap();
        assert!(engine.search("anything").await.unwrap().is_empty());
    }
}

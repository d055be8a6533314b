//! Minimal HTTP client shared by the search and LLM adapters.
//!
//! - Request options: headers, auth, query params, timeout, retries
//! - Retries network failures and 429/5xx with exponential backoff
//! - Logs request metadata with secret query params redacted; never logs
//!   auth values
//!
//! ```no_run
//! # async fn demo() -> Result<(), prospect_http::HttpError> {
//! let client = prospect_http::HttpClient::new("https://api.example.com")?;
//! let got: serde_json::Value = client
//!     .get_json("v1/items", prospect_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```

use std::borrow::Cow;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::time::sleep;

const BODY_SNIPPET_LEN: usize = 512;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}")]
    Api { status: StatusCode, message: String },
}

/// Authentication strategies supported by the client.
#[derive(Clone, Debug)]
pub enum Auth<'a> {
    /// `Authorization: Bearer <token>`
    Bearer(&'a str),
    /// Custom header (e.g. Brave's `X-Subscription-Token`)
    Header {
        name: HeaderName,
        value: HeaderValue,
    },
    None,
}

/// Per-request tuning knobs.
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub retries: Option<usize>,
    pub auth: Option<Auth<'a>>,
    pub headers: Option<HeaderMap>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>,
}

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    default_timeout: Duration,
    max_retries: usize,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(15),
            max_retries: 2,
        })
    }

    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    pub fn with_retries(mut self, n: usize) -> Self {
        self.max_retries = n;
        self
    }

    /// GET a JSON document with per-request options.
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        self.request_json::<(), T>(Method::GET, path, None, opts)
            .await
    }

    /// POST a JSON body and decode a JSON response.
    pub async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request_json(Method::POST, path, Some(body), opts).await
    }

    /// Fetch an absolute URL and return the response body as text. Used by
    /// page collection, where the target is never under our base URL.
    pub async fn get_text_absolute(
        &self,
        url: &Url,
        opts: RequestOpts<'_>,
    ) -> Result<String, HttpError> {
        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        let mut rb = self.inner.get(url.clone()).timeout(timeout);
        if let Some(hdrs) = &opts.headers {
            rb = rb.headers(hdrs.clone());
        }
        let resp = rb
            .send()
            .await
            .map_err(|e| HttpError::Network(e.to_string()))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| HttpError::Network(e.to_string()))?;
        if !status.is_success() {
            return Err(HttpError::Api {
                status,
                message: snippet(&text),
            });
        }
        Ok(text)
    }

    async fn request_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self
            .base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))?;
        let max_retries = opts.retries.unwrap_or(self.max_retries);
        let timeout = opts.timeout.unwrap_or(self.default_timeout);

        let mut attempt = 0usize;
        loop {
            let mut rb = self.inner.request(method.clone(), url.clone()).timeout(timeout);

            if let Some(q) = &opts.query {
                let pairs: Vec<(&str, &str)> = q.iter().map(|(k, v)| (*k, v.as_ref())).collect();
                rb = rb.query(&pairs);
            }
            if let Some(b) = body {
                rb = rb.json(b);
            }
            if let Some(hdrs) = &opts.headers {
                rb = rb.headers(hdrs.clone());
            }
            match &opts.auth {
                Some(Auth::Bearer(tok)) => rb = rb.bearer_auth(tok.trim()),
                Some(Auth::Header { name, value }) => rb = rb.header(name, value),
                Some(Auth::None) | None => {}
            }

            tracing::debug!(
                target: "http",
                attempt = attempt + 1,
                max_retries,
                method = %method,
                host_path = %format!("{}{}", url.domain().unwrap_or("-"), url.path()),
                query = ?redacted_query(opts.query.as_deref()),
                timeout_ms = timeout.as_millis() as u64,
                has_body = body.is_some(),
                "http.request.start"
            );

            let (retryable, err) = match rb.send().await {
                Ok(resp) => {
                    let status = resp.status();
                    match resp.text().await {
                        Ok(text) if status.is_success() => {
                            return serde_json::from_str::<T>(&text)
                                .map_err(|e| HttpError::Decode(e.to_string(), snippet(&text)));
                        }
                        Ok(text) => (
                            retryable_status(status),
                            HttpError::Api {
                                status,
                                message: snippet(&text),
                            },
                        ),
                        Err(e) => (true, HttpError::Network(e.to_string())),
                    }
                }
                Err(e) => (true, HttpError::Network(e.to_string())),
            };
            if retryable && attempt < max_retries {
                attempt += 1;
                let delay = Duration::from_millis(200u64.saturating_mul(1 << (attempt - 1)));
                tracing::warn!(
                    target: "http",
                    attempt,
                    max_retries,
                    backoff_ms = delay.as_millis() as u64,
                    error = %err,
                    "http.retrying"
                );
                sleep(delay).await;
                continue;
            }
            tracing::warn!(target: "http", attempt, error = %err, "http.request.failed");
            return Err(err);
        }
    }
}

fn retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn snippet(text: &str) -> String {
    let mut s = text.chars().take(BODY_SNIPPET_LEN).collect::<String>();
    if text.len() > s.len() {
        s.push('…');
    }
    s
}

/// Query params worth hiding in logs even when callers pass them inline.
fn redacted_query(query: Option<&[(&str, Cow<'_, str>)]>) -> Vec<(String, String)> {
    query
        .map(|q| {
            q.iter()
                .map(|(k, v)| {
                    let secret = matches!(
                        k.to_ascii_lowercase().as_str(),
                        "key" | "api_key" | "token" | "access_token" | "secret" | "client_secret"
                    );
                    (
                        (*k).to_string(),
                        if secret {
                            "<redacted>".to_string()
                        } else {
                            v.as_ref().to_string()
                        },
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_query_params_are_redacted() {
        let q = vec![
            ("q", Cow::Borrowed("rust")),
            ("api_key", Cow::Borrowed("hunter2")),
        ];
        let redacted = redacted_query(Some(&q));
        assert_eq!(redacted[0].1, "rust");
        assert_eq!(redacted[1].1, "<redacted>");
    }

    #[test]
    fn snippets_are_bounded() {
        let long = "x".repeat(2048);
        assert!(snippet(&long).chars().count() <= BODY_SNIPPET_LEN + 1);
        assert_eq!(snippet("short"), "short");
    }

    #[test]
    fn only_throttling_and_server_errors_retry() {
        assert!(retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(retryable_status(StatusCode::BAD_GATEWAY));
        assert!(!retryable_status(StatusCode::NOT_FOUND));
        assert!(!retryable_status(StatusCode::UNAUTHORIZED));
    }
}

//! Search provider seam: one trait, provider lookup by configured name.

use std::sync::Arc;

use async_trait::async_trait;
use prospect_common::{ProspectError, Result};
use serde::{Deserialize, Serialize};

use crate::brave::BraveSearch;
use crate::duckduckgo::DuckDuckGoSearch;

/// Engines `build_engine` knows how to construct.
pub const SUPPORTED_ENGINES: [&str; 2] = ["brave", "duckduckgo"];

/// One normalized search result. Every provider's response shape collapses
/// into this; hits without a link are dropped at the adapter boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub link: String,
    pub summary: String,
}

#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Run a query and return up to the configured number of hits.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>>;

    fn name(&self) -> &'static str;
}

/// Construct a search engine from its configured name.
///
/// `api_key` is required by keyed providers (brave) and ignored by the
/// rest. Unknown names fail with the supported list, mirroring how the
/// engine is validated once at startup rather than mid-run.
pub fn build_engine(
    name: &str,
    api_key: Option<&str>,
    max_results: usize,
) -> Result<Arc<dyn SearchEngine>> {
    match name {
        "brave" => {
            let key = api_key.ok_or_else(|| {
                ProspectError::Config("brave search requires an api_key".to_string())
            })?;
            Ok(Arc::new(BraveSearch::new(key.to_string(), max_results)?))
        }
        "duckduckgo" => Ok(Arc::new(DuckDuckGoSearch::new(max_results)?)),
        other => Err(ProspectError::Config(format!(
            "unsupported search engine {other:?}; supported: {SUPPORTED_ENGINES:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_engine_names_fail_with_the_supported_list() {
        let err = build_engine("altavista", None, 5).err().expect("config error");
        let msg = err.to_string();
        assert!(msg.contains("altavista"));
        assert!(msg.contains("brave"));
        assert!(msg.contains("duckduckgo"));
    }

    #[test]
    fn brave_without_key_is_a_config_error() {
        assert!(matches!(
            build_engine("brave", None, 5),
            Err(ProspectError::Config(_))
        ));
    }

    #[test]
    fn duckduckgo_needs_no_key() {
        assert!(build_engine("duckduckgo", None, 5).is_ok());
    }
}

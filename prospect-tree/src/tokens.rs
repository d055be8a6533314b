//! Token counting for budget accounting.

use prospect_common::{ProspectError, Result};
use tiktoken_rs::{get_bpe_from_model, CoreBPE};

/// Counts tokens the way the configured chat model would.
///
/// Construction fails when the model name maps to no known encoding; the
/// tree refuses to start a run it cannot meter.
pub struct TokenCounter {
    bpe: CoreBPE,
    model: String,
}

impl TokenCounter {
    pub fn for_model(model: &str) -> Result<Self> {
        let bpe = get_bpe_from_model(model).map_err(|e| {
            ProspectError::Config(format!("no tokenizer for model {model:?}: {e}"))
        })?;
        Ok(Self {
            bpe,
            model: model.to_string(),
        })
    }

    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl std::fmt::Debug for TokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCounter")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_model_counts_tokens() {
        let counter = TokenCounter::for_model("gpt-4o").unwrap();
        assert_eq!(counter.count(""), 0);
        assert!(counter.count("hello world") > 0);
        assert!(counter.count("a longer sentence with several words") > counter.count("a"));
    }

    #[test]
    fn unknown_model_fails_at_construction() {
        let err = TokenCounter::for_model("definitely-not-a-model").unwrap_err();
        assert!(matches!(err, ProspectError::Config(_)));
    }
}

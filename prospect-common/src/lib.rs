//! Common types shared across Prospect crates.
//!
//! This crate defines the shared error type, observability helpers, and a
//! handful of small utilities used throughout the workspace. It is
//! intentionally lightweight so every crate can depend on it without
//! pulling in heavy transitive costs.
//!
//! - [`ProspectError`] and [`Result`]: shared error handling
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`normalize_topic`]: input sanitisation for research topics

pub mod observability;

/// Error types used across the Prospect system.
#[derive(thiserror::Error, Debug)]
pub enum ProspectError {
    /// Configuration was incomplete or invalid. Terminal: raised at
    /// construction time, never mid-run.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A searcher/reader capability failed to produce a result. Recoverable:
    /// the scheduler treats this as a stop signal for the affected node.
    #[error("Capability error: {0}")]
    Capability(String),

    /// A document could not resolve any usable page content.
    #[error("Content error: {0}")]
    Content(String),

    /// An external collaborator (HTTP, extraction, ...) reported an error.
    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

/// Convenient alias for results that use [`ProspectError`].
pub type Result<T> = std::result::Result<T, ProspectError>;

/// Collapse control characters in a research topic to single spaces.
///
/// Topics arrive from CLIs and config files where stray newlines or tabs are
/// common; search providers treat them as query syntax, so they are
/// normalized away before the topic seeds a tree.
///
/// ```
/// assert_eq!(prospect_common::normalize_topic("rust\nasync\ttraits"), "rust async traits");
/// assert_eq!(prospect_common::normalize_topic("  plain topic  "), "plain topic");
/// ```
pub fn normalize_topic(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_normalization_strips_control_chars() {
        assert_eq!(normalize_topic("a\r\nb"), "a b");
        assert_eq!(normalize_topic("a\u{0}b"), "a b");
        assert_eq!(normalize_topic(""), "");
    }

    #[test]
    fn topic_normalization_collapses_runs_of_whitespace() {
        assert_eq!(normalize_topic("a \t \n b"), "a b");
    }
}

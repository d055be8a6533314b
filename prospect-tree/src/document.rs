//! Discovered content units and their page-content resolution contract.

use prospect_common::{ProspectError, Result};
use serde::{Deserialize, Serialize};

/// Field priority used to resolve a document's page content. The first
/// non-empty candidate wins; a document where every candidate is empty is
/// rejected at construction time.
const PAGE_CONTENT_PRIORITY: [&str; 4] = ["summary", "title", "keywords", "content"];

/// Kind of source a document was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    WebPage,
    Wiki,
    Essay,
}

/// Raw metadata handed to [`Document::from_meta`] by collectors.
///
/// Collectors (search adapters, page extraction) fill in whatever they
/// managed to recover; resolution decides whether that is enough to admit
/// the document into a tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMeta {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub title: String,
    pub kind: Option<SourceKind>,
    #[serde(default)]
    pub keywords: String,
    /// Origin identifier, usually the source URL.
    #[serde(default)]
    pub source: String,
    /// The query that produced this document.
    #[serde(default)]
    pub query: String,
}

/// A discovered content unit.
///
/// Invariant: `page_content` is non-empty, resolved from the priority list
/// at construction. There is no way to build a `Document` that violates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub summary: String,
    pub title: String,
    pub kind: SourceKind,
    pub keywords: String,
    pub source: String,
    pub query: String,
    page_content: String,
}

impl Document {
    /// Build a document, resolving its page content or failing fast.
    pub fn from_meta(meta: DocumentMeta) -> Result<Self> {
        let page_content = resolve_page_content(&meta).ok_or_else(|| {
            ProspectError::Content(format!(
                "no usable page content in {:?} for source {:?}",
                PAGE_CONTENT_PRIORITY, meta.source
            ))
        })?;

        Ok(Self {
            content: meta.content,
            summary: meta.summary,
            title: meta.title,
            kind: meta.kind.unwrap_or(SourceKind::WebPage),
            keywords: meta.keywords,
            source: meta.source,
            query: meta.query,
            page_content,
        })
    }

    /// The resolved, non-empty text used for token accounting and as the
    /// reader capability's context.
    pub fn page_content(&self) -> &str {
        &self.page_content
    }
}

fn resolve_page_content(meta: &DocumentMeta) -> Option<String> {
    for key in PAGE_CONTENT_PRIORITY {
        let candidate = match key {
            "summary" => &meta.summary,
            "title" => &meta.title,
            "keywords" => &meta.keywords,
            "content" => &meta.content,
            _ => unreachable!(),
        };
        if !candidate.trim().is_empty() {
            return Some(candidate.clone());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(summary: &str, title: &str, keywords: &str, content: &str) -> DocumentMeta {
        DocumentMeta {
            content: content.into(),
            summary: summary.into(),
            title: title.into(),
            kind: Some(SourceKind::WebPage),
            keywords: keywords.into(),
            source: "https://example.com".into(),
            query: "q".into(),
        }
    }

    #[test]
    fn summary_wins_over_later_candidates() {
        let doc = Document::from_meta(meta("the summary", "the title", "k", "body")).unwrap();
        assert_eq!(doc.page_content(), "the summary");
    }

    #[test]
    fn resolution_falls_through_in_priority_order() {
        let doc = Document::from_meta(meta("", "the title", "k", "body")).unwrap();
        assert_eq!(doc.page_content(), "the title");

        let doc = Document::from_meta(meta("", "", "k", "body")).unwrap();
        assert_eq!(doc.page_content(), "k");

        let doc = Document::from_meta(meta("", "", "", "body")).unwrap();
        assert_eq!(doc.page_content(), "body");
    }

    #[test]
    fn whitespace_only_candidates_do_not_count() {
        let doc = Document::from_meta(meta("   ", "\t\n", "", "body")).unwrap();
        assert_eq!(doc.page_content(), "body");
    }

    #[test]
    fn construction_fails_when_everything_is_empty() {
        let err = Document::from_meta(meta("", "", "", "")).unwrap_err();
        assert!(matches!(err, ProspectError::Content(_)));
    }

    #[test]
    fn kind_defaults_to_web_page() {
        let mut m = meta("s", "", "", "");
        m.kind = None;
        assert_eq!(Document::from_meta(m).unwrap().kind, SourceKind::WebPage);
    }
}

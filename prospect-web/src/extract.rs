//! Page fetch and light HTML extraction.
//!
//! Produces just enough metadata (title, meta description, tag-stripped
//! body text) to admit a page into the research tree. Proper readability
//! extraction is a collaborator concern, not ours.

use prospect_common::{ProspectError, Result};
use prospect_http::{HttpClient, RequestOpts};
use prospect_tree::{DocumentMeta, SourceKind};
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ORIGIN, USER_AGENT};
use url::Url;

/// Body text is clipped here; the tree meters tokens, but there is no point
/// shipping a whole article when a snippet seeds the same follow-ups.
pub const MAX_CONTENT_CHARS: usize = 4000;

const BROWSER_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

/// Fetch `link` and build document metadata for it, recording `query` as
/// the originating research question.
pub async fn collect_page(http: &HttpClient, link: &str, query: &str) -> Result<DocumentMeta> {
    let url = Url::parse(link)
        .map_err(|e| ProspectError::Content(format!("invalid page url {link:?}: {e}")))?;

    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));
    if let (scheme, Some(host)) = (url.scheme(), url.host_str()) {
        if let Ok(origin) = HeaderValue::from_str(&format!("{scheme}://{host}")) {
            headers.insert(ORIGIN, origin);
        }
    }

    let html = http
        .get_text_absolute(
            &url,
            RequestOpts {
                headers: Some(headers),
                ..Default::default()
            },
        )
        .await
        .map_err(|e| ProspectError::Capability(format!("page fetch failed for {link}: {e}")))?;

    let meta = meta_from_html(&html, link, query);
    tracing::debug!(
        target: "web.extract",
        url = %link,
        title = %meta.title,
        content_chars = meta.content.len(),
        "extract.page"
    );
    Ok(meta)
}

/// Pure extraction half of [`collect_page`], separated for testability.
pub fn meta_from_html(html: &str, source: &str, query: &str) -> DocumentMeta {
    DocumentMeta {
        content: text_from_html(html),
        summary: extract_meta_description(html).unwrap_or_default(),
        title: extract_title(html).unwrap_or_default(),
        kind: Some(SourceKind::WebPage),
        keywords: extract_meta_keywords(html).unwrap_or_default(),
        source: source.to_string(),
        query: query.to_string(),
    }
}

fn extract_title(html: &str) -> Option<String> {
    let re = Regex::new(r"(?is)<title[^>]*>(.*?)</title>").ok()?;
    let title = re.captures(html)?.get(1)?.as_str().trim();
    (!title.is_empty()).then(|| title.to_string())
}

fn extract_meta_content(html: &str, name: &str) -> Option<String> {
    // both attribute orders occur in the wild
    let patterns = [
        format!(r#"(?is)<meta[^>]*name\s*=\s*["']{name}["'][^>]*content\s*=\s*["']([^"']*)["']"#),
        format!(r#"(?is)<meta[^>]*content\s*=\s*["']([^"']*)["'][^>]*name\s*=\s*["']{name}["']"#),
    ];
    for pat in patterns {
        if let Some(found) = Regex::new(&pat)
            .ok()
            .and_then(|re| re.captures(html))
            .and_then(|c| c.get(1).map(|m| m.as_str().trim().to_string()))
        {
            if !found.is_empty() {
                return Some(found);
            }
        }
    }
    None
}

fn extract_meta_description(html: &str) -> Option<String> {
    extract_meta_content(html, "description")
}

fn extract_meta_keywords(html: &str) -> Option<String> {
    extract_meta_content(html, "keywords")
}

/// Tag-stripped body text, script/style blocks removed, whitespace
/// collapsed, clipped to [`MAX_CONTENT_CHARS`].
fn text_from_html(html: &str) -> String {
    let without_blocks = Regex::new(r"(?is)<(script|style|noscript)\b.*?</(script|style|noscript)>")
        .map(|re| re.replace_all(html, " ").into_owned())
        .unwrap_or_else(|_| html.to_string());

    let mut out = String::with_capacity(without_blocks.len() / 4);
    let mut in_tag = false;
    for ch in without_blocks.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    let collapsed = out.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(MAX_CONTENT_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use prospect_tree::Document;

    const PAGE: &str = r#"<html><head>
        <title> Arena Allocators </title>
        <meta name="description" content="Why arenas beat Rc for trees">
        <meta name="keywords" content="rust, arena, tree">
        <style>body { color: red }</style>
        </head><body>
        <script>var tracking = "ignore me";</script>
        <h1>Arena Allocators</h1>
        <p>Index-based arenas avoid ownership cycles.</p>
        </body></html>"#;

    #[test]
    fn title_and_meta_fields_are_extracted() {
        let meta = meta_from_html(PAGE, "https://example.com/a", "arena trees");
        assert_eq!(meta.title, "Arena Allocators");
        assert_eq!(meta.summary, "Why arenas beat Rc for trees");
        assert_eq!(meta.keywords, "rust, arena, tree");
        assert_eq!(meta.source, "https://example.com/a");
        assert_eq!(meta.query, "arena trees");
    }

    #[test]
    fn body_text_skips_script_and_style_blocks() {
        let meta = meta_from_html(PAGE, "s", "q");
        assert!(meta.content.contains("Index-based arenas"));
        assert!(!meta.content.contains("ignore me"));
        assert!(!meta.content.contains("color: red"));
    }

    #[test]
    fn multibyte_titles_extract_intact() {
        // case folding must not disturb byte offsets into the original text
        let title = "İİİİİİİİİ閉";
        let html = format!("<html><head><TITLE>{title}</TITLE></head><body>x</body></html>");
        let meta = meta_from_html(&html, "s", "q");
        assert_eq!(meta.title, title);
    }

    #[test]
    fn reversed_meta_attribute_order_still_matches() {
        let html = r#"<meta content="found it" name="description">"#;
        assert_eq!(extract_meta_description(html).as_deref(), Some("found it"));
    }

    #[test]
    fn extracted_meta_builds_a_valid_document() {
        let meta = meta_from_html(PAGE, "https://example.com/a", "q");
        let doc = Document::from_meta(meta).unwrap();
        // summary has top priority among the page-content candidates
        assert_eq!(doc.page_content(), "Why arenas beat Rc for trees");
    }

    #[test]
    fn empty_page_yields_meta_that_fails_document_construction() {
        let meta = meta_from_html("<html></html>", "s", "q");
        assert!(Document::from_meta(meta).is_err());
    }

    #[test]
    fn body_text_is_clipped() {
        let html = format!("<body>{}</body>", "word ".repeat(5000));
        let meta = meta_from_html(&html, "s", "q");
        assert!(meta.content.chars().count() <= MAX_CONTENT_CHARS);
    }
}

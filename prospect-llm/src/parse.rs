//! Tolerant parsing of model output into string lists.
//!
//! Models are asked for JSON arrays but routinely answer with fenced code
//! blocks, bullets, or numbered lines; we accept all of those rather than
//! failing a whole research branch over formatting.

use regex::Regex;

/// Try to extract a ```json ... ``` fenced block; fall back to the first
/// bracketed array in the text.
pub fn extract_json_block(text: &str) -> Option<String> {
    let re_fence = Regex::new(r"(?s)```(?:json)?\s*(\[.*?\])\s*```").ok()?;
    if let Some(caps) = re_fence.captures(text) {
        return Some(caps.get(1)?.as_str().to_string());
    }
    let re_plain = Regex::new(r"(?s)(\[.*\])").ok()?;
    re_plain
        .captures(text)
        .and_then(|c| c.get(1).map(|m| m.as_str().to_string()))
}

/// Parse a list of strings out of free-form model output.
///
/// Order of attempts: JSON array (possibly fenced), then `-`/`•`/`*`
/// bullets, then `1.`-style numbered lines. Blank entries are dropped and
/// the result deduplicated preserving first occurrence.
pub fn parse_string_list(text: &str) -> Vec<String> {
    let trimmed = text.trim();

    if let Some(json) = extract_json_block(trimmed) {
        if let Ok(items) = serde_json::from_str::<Vec<String>>(&json) {
            return dedup_clean(items);
        }
    }

    let mut items = Vec::new();
    for line in trimmed.lines() {
        let line = line.trim();
        let item = if let Some(rest) = line
            .strip_prefix('-')
            .or_else(|| line.strip_prefix('•'))
            .or_else(|| line.strip_prefix('*'))
        {
            rest
        } else if let Some(rest) = strip_number_prefix(line) {
            rest
        } else {
            continue;
        };
        items.push(item.trim().to_string());
    }
    dedup_clean(items)
}

fn strip_number_prefix(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = &line[digits..];
    rest.strip_prefix('.').or_else(|| rest.strip_prefix(')'))
}

fn dedup_clean(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

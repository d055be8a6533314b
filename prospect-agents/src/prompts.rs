//! Default prompt templates for the searcher and reader capabilities.
//!
//! Both accept a `{topic}` placeholder; operators can override the
//! templates through configuration and they are passed through verbatim.

pub const SEARCHER_PROMPT: &str = "You are a search assistant that helps users search for \
Internet resources. You are researching the topic \"{topic}\". Given a research question, \
propose up to {max_items} sharper sub-questions that would surface additional sources. \
Answer with a JSON array of strings. Answer STOP if the question is empty or meaningless.";

pub const READER_PROMPT: &str = "You are a text analysis assistant that helps users discover \
valuable information. You are researching the topic \"{topic}\". Given text gathered from \
the Internet, propose up to {max_items} follow-up research questions it raises. Answer with \
a JSON array of strings. Answer STOP if the text is irrelevant to the topic or low quality.";

/// Fill the `{topic}` / `{max_items}` placeholders.
pub fn render(template: &str, topic: &str, max_items: usize) -> String {
    template
        .replace("{topic}", topic)
        .replace("{max_items}", &max_items.to_string())
}

/// A leading STOP line is the model's discard signal.
pub fn is_stop_answer(text: &str) -> bool {
    text.trim()
        .lines()
        .next()
        .map(|l| l.trim().trim_matches(['.', '!', '"']).eq_ignore_ascii_case("stop"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_all_placeholders() {
        let out = render("topic={topic} n={max_items}", "rust trees", 3);
        assert_eq!(out, "topic=rust trees n=3");
    }

    #[test]
    fn stop_detection_tolerates_case_and_punctuation() {
        assert!(is_stop_answer("STOP"));
        assert!(is_stop_answer("stop."));
        assert!(is_stop_answer("  Stop\nbecause it is irrelevant"));
        assert!(!is_stop_answer("- stop sign history"));
        assert!(!is_stop_answer(""));
    }
}

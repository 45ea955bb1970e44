//! Text helpers for word-count contracts and output normalization.

use once_cell::sync::Lazy;
use regex::Regex;

/// A list marker (`1.`, `-`, `*`, `•`) following whitespace. The
/// whitespace is captured so the newline can be inserted after it.
static MARKER_AFTER_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\s)((\d+\.)|[-*•])").unwrap());

/// A marker directly after a sentence-terminating period (optionally
/// followed by a closing quote).
static MARKER_AFTER_PERIOD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\.'?)\s*([-*•])").unwrap());

/// Whitespace-delimited word count.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Remove all double quotes from a model response.
pub fn remove_quotes(text: &str) -> String {
    text.replace('"', "")
}

/// Remove quotes and insert a newline before enumerated-list and
/// bullet markers so feedback renders as a list instead of a run-on
/// paragraph. Formatting only; no words are added or removed.
pub fn remove_quotes_and_format_list(text: &str) -> String {
    let cleaned = remove_quotes(text);
    let cleaned = MARKER_AFTER_SPACE.replace_all(&cleaned, "$1\n$2");
    MARKER_AFTER_PERIOD.replace_all(&cleaned, "$1\n$2").to_string()
}

/// Truncate at the first sentence terminator (`.` or `?`), whichever
/// occurs first. Re-prompted models often append an explanation of how
/// they shortened the question; only the question itself is wanted.
pub fn extract_first_sentence(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let dot = trimmed.find('.');
    let question_mark = trimmed.find('?');

    let end = match (dot, question_mark) {
        (Some(d), Some(q)) => Some(d.min(q)),
        (Some(d), None) => Some(d),
        (None, Some(q)) => Some(q),
        (None, None) => None,
    };

    match end {
        Some(i) => trimmed[..=i].trim().to_string(),
        None => trimmed.to_string(),
    }
}

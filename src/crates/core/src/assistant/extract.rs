//! Fenced code-block extraction from model replies.

use once_cell::sync::Lazy;
use regex::Regex;

static TAGGED_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```python[ \t]*\r?\n(.*?)```").expect("fence pattern compiles"));

static BARE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(.*?)```").expect("fence pattern compiles"));

/// First complete fenced block, trimmed. A ```python fence wins over a
/// bare one; a fence with no closing marker is not a match.
pub fn extract_code(message: &str) -> Option<String> {
    if let Some(captures) = TAGGED_FENCE.captures(message) {
        return Some(captures[1].trim().to_string());
    }
    BARE_FENCE
        .captures(message)
        .map(|captures| captures[1].trim().to_string())
}

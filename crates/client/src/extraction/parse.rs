//! Defensive JSON recovery from completion text.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::error::ParseError;

/// A triple-backtick region, with the word following the opening fence if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock {
    pub language: Option<String>,
    pub content: String,
}

fn fence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)```(\w+)?[^\n]*\n(.*?)```").expect("fence pattern is valid"))
}

/// All fenced code blocks in `text`, in order.
///
/// The opening fence may carry a language word and trailing text up to the
/// newline; the block runs lazily to the next closing fence.
pub fn extract_fenced_code_blocks(text: &str) -> Vec<FencedBlock> {
    fence_pattern()
        .captures_iter(text)
        .map(|caps| FencedBlock {
            language: caps.get(1).map(|m| m.as_str().to_string()),
            content: caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default(),
        })
        .collect()
}

/// Parse `text` as JSON, falling back to a single fenced `json` block.
///
/// The fallback is taken only when exactly one fenced block exists and it is
/// tagged `json`; anything else is ambiguous and fails.
pub fn extract_json(text: &str) -> Result<Value, ParseError> {
    let strict_err = match serde_json::from_str::<Value>(text) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    let blocks = extract_fenced_code_blocks(text);
    let block = match blocks.as_slice() {
        [] => return Err(ParseError::NoJson(strict_err.to_string())),
        [block] => block,
        many => return Err(ParseError::MultipleBlocks(many.len())),
    };

    match block.language.as_deref() {
        Some("json") => serde_json::from_str(&block.content).map_err(|e| ParseError::MalformedBlock(e.to_string())),
        other => Err(ParseError::WrongFormat(other.unwrap_or("untagged").to_string())),
    }
}

//! Token-aware chunking of long stories.
//!
//! Stories are cut on model token boundaries so each chunk fits one completion
//! request. Consecutive chunks share `overlap_tokens` tokens, and a chunk never
//! holds more than `max_tokens`.
//!
//! Tokens are byte-level, so a boundary can fall inside a multi-byte
//! character. Such boundaries are moved to the nearest token at which the text
//! decodes: chunk ends move back, overlap starts move forward.

use std::fmt::Write as _;

use serde::Serialize;
use tiktoken_rs::CoreBPE;

/// Default chunk size in tokens.
pub const DEFAULT_MAX_TOKENS: usize = 6000;

/// Characters kept from each end of a long chunk in summaries.
const SNIPPET_CHARS: usize = 100;

/// A character's bytes span at most four tokens.
const MAX_SPLIT_TOKENS: usize = 3;

/// Errors from chunking.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChunkError {
    #[error("invalid chunk options: {0}")]
    InvalidOptions(String),

    #[error("tokenizer unavailable: {0}")]
    Tokenizer(String),

    /// No span near `start..end` decodes to text.
    #[error("tokens {start}..{end} do not decode to text")]
    Decode { start: usize, end: usize },
}

/// Limits for [`chunk_story`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkOptions {
    /// Tokens per chunk (default: 6000).
    pub max_tokens: usize,
    /// Tokens shared by consecutive chunks; must be less than `max_tokens`.
    pub overlap_tokens: usize,
    /// Only chunk the first this-many tokens of the story.
    pub end_token_limit: Option<usize>,
    /// Return at most this many chunks.
    pub max_chunks: Option<usize>,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TOKENS)
    }
}

impl ChunkOptions {
    pub fn new(max_tokens: usize) -> Self {
        Self { max_tokens, overlap_tokens: 0, end_token_limit: None, max_chunks: None }
    }

    pub fn with_overlap(mut self, overlap_tokens: usize) -> Self {
        self.overlap_tokens = overlap_tokens;
        self
    }

    pub fn with_end_token_limit(mut self, limit: usize) -> Self {
        self.end_token_limit = Some(limit);
        self
    }

    pub fn with_max_chunks(mut self, max_chunks: usize) -> Self {
        self.max_chunks = Some(max_chunks);
        self
    }

    fn validate(&self) -> Result<(), ChunkError> {
        if self.max_tokens == 0 {
            return Err(ChunkError::InvalidOptions("max_tokens must be positive".into()));
        }
        if self.overlap_tokens >= self.max_tokens {
            return Err(ChunkError::InvalidOptions(format!(
                "overlap_tokens ({}) must be less than max_tokens ({})",
                self.overlap_tokens, self.max_tokens
            )));
        }
        Ok(())
    }
}

/// One piece of a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    pub index: usize,
    pub text: String,
    /// Offset of the first token in the story's token sequence.
    pub start_token: usize,
    /// Offset of the first character in the story text.
    pub start_char: usize,
}

/// Byte-pair tokenizer for a completion model.
pub struct Tokenizer {
    bpe: CoreBPE,
}

impl Tokenizer {
    /// Tokenizer for `model`, or `cl100k_base` when the model is not known.
    pub fn for_model(model: &str) -> Result<Self, ChunkError> {
        let bpe = match tiktoken_rs::get_bpe_from_model(model) {
            Ok(bpe) => bpe,
            Err(e) => {
                tracing::warn!(model, "no tokenizer for model, using cl100k_base: {}", e);
                tiktoken_rs::cl100k_base().map_err(|e| ChunkError::Tokenizer(e.to_string()))?
            }
        };
        Ok(Self { bpe })
    }

    /// Number of tokens in `text`.
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

/// Split `story_text` into chunks of at most `options.max_tokens` tokens.
///
/// An empty story yields no chunks.
pub fn chunk_story(story_text: &str, options: &ChunkOptions, tokenizer: &Tokenizer) -> Result<Vec<Chunk>, ChunkError> {
    options.validate()?;

    let mut tokens = tokenizer.bpe.encode_ordinary(story_text);
    if let Some(limit) = options.end_token_limit {
        tokens.truncate(limit);
    }
    let len = tokens.len();
    let decode = |start: usize, end: usize| tokenizer.bpe.decode(tokens[start..end].to_vec()).ok();

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut start_char = 0;

    while start < len {
        if options.max_chunks.is_some_and(|max| chunks.len() >= max) {
            break;
        }

        let target = (start + options.max_tokens).min(len);
        let (end, text) = (0..=MAX_SPLIT_TOKENS)
            .filter_map(|back| target.checked_sub(back).filter(|&end| end > start))
            .find_map(|end| decode(start, end).map(|text| (end, text)))
            .ok_or(ChunkError::Decode { start, end: target })?;

        let text_chars = text.chars().count();
        chunks.push(Chunk { index: chunks.len(), text, start_token: start, start_char });

        if end == len {
            break;
        }

        // `start..end` decodes, so any `start..next` that decodes leaves
        // `next..end` decodable too.
        let lower = end.saturating_sub(options.overlap_tokens).max(start + 1);
        let (next, skipped_chars) = (lower..end)
            .find_map(|next| decode(start, next).map(|head| (next, head.chars().count())))
            .unwrap_or((end, text_chars));

        start = next;
        start_char += skipped_chars;
    }

    tracing::debug!("chunked {} tokens into {} chunks", len, chunks.len());

    Ok(chunks)
}

/// Header line and a head/tail snippet for each chunk.
pub fn summarize_chunks(chunks: &[Chunk]) -> String {
    let mut lines = Vec::with_capacity(chunks.len() * 3);

    for chunk in chunks {
        let chars = chunk.text.chars().count();
        lines.push(format!("Chunk {} ({} chars, starts at char {}):", chunk.index, chars, chunk.start_char));

        let mut snippet = String::new();
        if chars > 2 * SNIPPET_CHARS {
            let head: String = chunk.text.chars().take(SNIPPET_CHARS).collect();
            let tail: String = chunk.text.chars().skip(chars - SNIPPET_CHARS).collect();
            let _ = write!(snippet, "{head} ... {tail}");
        } else {
            snippet.push_str(&chunk.text);
        }
        lines.push(snippet);
        lines.push(String::new());
    }

    lines.join("\n")
}

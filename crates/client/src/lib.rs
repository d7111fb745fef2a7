//! Client code for lcats.
//!
//! This crate provides the blocking HTTP fetch client and URL resource cache,
//! HTML text location used by source acquirers, the completion-service client,
//! token-aware story chunking, and the structured event extraction pipeline.

pub mod chunking;
pub mod completion;
pub mod extract;
pub mod extraction;
pub mod fetch;

pub use chunking::{Chunk, ChunkError, ChunkOptions, Tokenizer, chunk_story, summarize_chunks};
pub use completion::{Completion, CompletionClient, CompletionError, Message, OpenAiClient, OpenAiConfig, Role};
pub use extract::{BetweenIds, SectionTags, section_after_heading, text_between_ids};
pub use extraction::{ExtractionOutcome, ExtractionResult, ExtractionTemplate, extract_from_story};
pub use fetch::{
    FetchClient, FetchConfig, FetchError, UrlCanonicalizer, UrlResourceCache, url_resource_cache,
    url_resource_cache_from_config,
};

#[cfg(test)]
pub(crate) mod test_support;

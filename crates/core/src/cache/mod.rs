//! Filesystem-backed resource cache.
//!
//! This module provides an idempotent fetch-or-load cache keyed by
//! canonicalized identifiers. It supports:
//!
//! - Pluggable canonicalization (identifier -> filesystem-safe key)
//! - Pluggable acquisition, invoked only on a cache miss
//! - Atomic write-then-rename so readers never see partial entries
//! - Configurable refresh policy for reads

pub mod hash;
pub mod resource;
pub mod store;

pub use hash::hash_key;
pub use resource::{
    Acquirer, Canonicalizer, FnAcquirer, FnCanonicalizer, RefreshPolicy, ResourceCache, acquire_fn, canonicalize_fn,
    validate_key,
};
pub use store::{write_atomic, write_new};

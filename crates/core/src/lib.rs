//! Core types and shared functionality for lcats.
//!
//! This crate provides:
//! - Filesystem resource cache with pluggable canonicalization and acquisition
//! - Namespace-scoped artifact gathering and corpus loading
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod gather;
pub mod text;

pub use cache::{Acquirer, Canonicalizer, RefreshPolicy, ResourceCache, acquire_fn, canonicalize_fn};
pub use error::Error;
pub use gather::{Artifact, Corpora, DataGatherer, Download};

//! Torrent indexer abstraction.
//!
//! This module provides an `Indexer` trait for category-scoped full-text
//! queries against a torrent indexer (Jackett, ...).

mod jackett;
mod types;

pub use jackett::JackettIndexer;
pub use types::*;

//! File-backed cache for raw upstream payloads.
//!
//! This module provides a persistent, content-addressed cache on the local
//! filesystem. It supports:
//!
//! - Content-addressed file names using SHA-256 hashing
//! - Time-based expiry with eviction on read
//! - Atomic replacement of entries via temp file and rename

pub mod entry;
pub mod hash;
pub mod store;

pub use entry::CacheEntry;
pub use hash::compute_cache_key;
pub use store::{CacheError, CacheStore};

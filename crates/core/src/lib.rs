//! Core types and shared functionality for barabild.
//!
//! This crate provides:
//! - File-backed cache store for upstream payloads
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheEntry, CacheError, CacheStore};
pub use config::{AppConfig, ConfigError, Provider};
pub use error::Error;

//! Query-to-image resolution.
//!
//! Ties the cache, the upstream fetcher and extraction together:
//!
//! 1. Cache lookup. A fresh entry whose payload still yields an image
//!    resolves immediately without touching the upstream. A payload that
//!    no longer extracts is bypassed (not deleted) and treated as a miss.
//! 2. On a miss, exactly one upstream fetch. The raw payload is persisted
//!    before extraction, then extracted; failures from either step are
//!    returned to the caller.
//!
//! No state is held between calls beyond what lives in the cache directory.

use barabild_core::{CacheStore, Error};
use std::sync::Arc;

use crate::extract::extract_image_url;
use crate::fetch::Fetcher;

/// Where a resolved URL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    Cache,
    Upstream,
}

/// A resolved image URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub url: String,
    pub source: ResolutionSource,
}

/// Resolves queries to image URLs, caching raw upstream payloads.
#[derive(Clone)]
pub struct Resolver {
    cache: CacheStore,
    fetcher: Arc<dyn Fetcher>,
}

impl Resolver {
    pub fn new(cache: CacheStore, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { cache, fetcher }
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Resolve `query` to an image URL.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidInput` for an empty query
    /// - fetch errors (`FetchFailed`, `FetchTimeout`, `UpstreamStatus`, `FetchTooLarge`)
    /// - `Error::NoImage` / `Error::MalformedPayload` when a fresh payload does not extract
    pub async fn resolve(&self, query: &str) -> Result<Resolution, Error> {
        if query.is_empty() {
            return Err(Error::InvalidInput("query cannot be empty".into()));
        }

        let format = self.fetcher.format();

        if let Some(entry) = self.cache.get(query).await {
            match extract_image_url(format, &entry.payload) {
                Ok(url) => {
                    tracing::debug!(query, "resolved from cache");
                    return Ok(Resolution { url, source: ResolutionSource::Cache });
                }
                Err(e) => {
                    tracing::debug!(query, error = %e, "cached payload did not extract, refetching");
                }
            }
        }

        let payload = self.fetcher.fetch(query).await.map_err(|e| {
            tracing::warn!(query, error = %e, "upstream fetch failed");
            Error::from(e)
        })?;

        if let Err(e) = self.cache.put(query, &payload.body).await {
            tracing::warn!(query, error = %e, "failed to cache upstream payload");
        }

        let url = extract_image_url(format, &payload.body).map_err(|e| {
            tracing::warn!(query, error = %e, "no image in upstream payload");
            Error::from(e)
        })?;

        tracing::debug!(query, fetch_ms = payload.fetch_ms, "resolved from upstream");
        Ok(Resolution { url, source: ResolutionSource::Upstream })
    }
}

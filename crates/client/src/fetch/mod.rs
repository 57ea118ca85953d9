//! Upstream fetchers for image search providers.
//!
//! ### Contract
//! - One request per call, no retries.
//! - Bounded timeout and bounded body size.
//! - Non-success statuses are errors; an empty payload is never returned in
//!   place of a failure.
//!
//! ### Providers
//! - [`GettyFetcher`]: HTML search results page.
//! - [`UnsplashFetcher`]: JSON photo API, authenticated with an access key.

pub mod error;
pub mod getty;
pub mod unsplash;

#[cfg(test)]
pub(crate) mod testing;

pub use error::FetchError;
pub use getty::GettyFetcher;
pub use unsplash::UnsplashFetcher;

use async_trait::async_trait;
use barabild_core::{AppConfig, Error, Provider};
use reqwest::{Client, Response};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::extract::PayloadFormat;

/// Raw upstream response body and metadata.
#[derive(Debug, Clone)]
pub struct RawPayload {
    /// Response body, decoded as UTF-8 (lossily)
    pub body: String,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

/// Looks up an image search result for a query.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the raw upstream payload for `query`.
    async fn fetch(&self, query: &str) -> Result<RawPayload, FetchError>;

    /// Format of the payloads this fetcher returns.
    fn format(&self) -> PayloadFormat;
}

/// Settings shared by all fetchers.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string
    pub user_agent: String,

    /// Request timeout (default: 10s)
    pub timeout: Duration,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self { user_agent: config.user_agent.clone(), timeout: config.timeout(), max_bytes: config.max_bytes }
    }
}

/// Build the fetcher selected by `config.provider`.
pub fn build_fetcher(config: &AppConfig) -> Result<Arc<dyn Fetcher>, Error> {
    let fetch_config = FetchConfig::from(config);
    let fetcher: Arc<dyn Fetcher> = match config.provider {
        Provider::Getty => Arc::new(GettyFetcher::new(&config.getty_base_url, fetch_config)?),
        Provider::Unsplash => {
            let key = config
                .require_unsplash_access_key()
                .map_err(|e| Error::InvalidInput(e.to_string()))?;
            Arc::new(UnsplashFetcher::new(&config.unsplash_base_url, key, fetch_config)?)
        }
    };
    Ok(fetcher)
}

pub(crate) fn build_http_client(config: &FetchConfig) -> Result<Client, FetchError> {
    Client::builder()
        .user_agent(&config.user_agent)
        .timeout(config.timeout)
        .use_rustls_tls()
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
        .map_err(|e| FetchError::Client(e.to_string()))
}

/// Check status and read the body within the size limit.
pub(crate) async fn read_payload(response: Response, max_bytes: usize, start: Instant) -> Result<RawPayload, FetchError> {
    let status = response.status();
    tracing::debug!("upstream response status: {}", status);

    if !status.is_success() {
        return Err(FetchError::Status { status: status.as_u16() });
    }

    if let Some(len) = response.content_length()
        && len as usize > max_bytes
    {
        return Err(FetchError::TooLarge { size: len as usize, limit: max_bytes });
    }

    let bytes = response.bytes().await.map_err(|e| {
        if e.is_timeout() { FetchError::Timeout } else { FetchError::Body(e.to_string()) }
    })?;

    if bytes.len() > max_bytes {
        return Err(FetchError::TooLarge { size: bytes.len(), limit: max_bytes });
    }

    let fetch_ms = start.elapsed().as_millis() as u64;
    tracing::debug!("fetched {} bytes in {}ms", bytes.len(), fetch_ms);

    Ok(RawPayload { body: String::from_utf8_lossy(&bytes).into_owned(), fetch_ms })
}

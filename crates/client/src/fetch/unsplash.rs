//! Unsplash photo API fetcher.

use async_trait::async_trait;
use reqwest::{Client, header};
use std::time::Instant;
use url::Url;

use super::{FetchConfig, FetchError, Fetcher, RawPayload, build_http_client, read_payload};
use crate::extract::PayloadFormat;

/// Fetches a random photo matching a query from the Unsplash API.
///
/// Authenticates with `Authorization: Client-ID <access key>`.
#[derive(Debug, Clone)]
pub struct UnsplashFetcher {
    http: Client,
    base_url: Url,
    access_key: String,
    config: FetchConfig,
}

impl UnsplashFetcher {
    pub fn new(base_url: &str, access_key: &str, config: FetchConfig) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url).map_err(|e| FetchError::Client(format!("invalid base URL: {}", e)))?;
        let http = build_http_client(&config)?;
        Ok(Self { http, base_url, access_key: access_key.to_string(), config })
    }

    pub fn photo_url(&self, query: &str) -> Result<Url, FetchError> {
        let mut url = self
            .base_url
            .join("/photos/random")
            .map_err(|e| FetchError::Client(e.to_string()))?;
        url.query_pairs_mut().append_pair("query", query);
        Ok(url)
    }
}

#[async_trait]
impl Fetcher for UnsplashFetcher {
    async fn fetch(&self, query: &str) -> Result<RawPayload, FetchError> {
        let start = Instant::now();
        let url = self.photo_url(query)?;

        tracing::debug!("querying Unsplash API: query={}", query);

        let response = self
            .http
            .get(url)
            .header(header::AUTHORIZATION, format!("Client-ID {}", self.access_key))
            .header("Accept-Version", "v1")
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        read_payload(response, self.config.max_bytes, start).await
    }

    fn format(&self) -> PayloadFormat {
        PayloadFormat::Json
    }
}

//! Getty Images search page fetcher.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Instant;
use url::Url;

use super::{FetchConfig, FetchError, Fetcher, RawPayload, build_http_client, read_payload};
use crate::extract::PayloadFormat;

/// Fetches the HTML image search results page for a phrase.
#[derive(Debug, Clone)]
pub struct GettyFetcher {
    http: Client,
    base_url: Url,
    config: FetchConfig,
}

impl GettyFetcher {
    pub fn new(base_url: &str, config: FetchConfig) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url).map_err(|e| FetchError::Client(format!("invalid base URL: {}", e)))?;
        let http = build_http_client(&config)?;
        Ok(Self { http, base_url, config })
    }

    /// Search page URL for `query`, with the query URL-encoded as the phrase.
    pub fn search_url(&self, query: &str) -> Result<Url, FetchError> {
        let mut url = self
            .base_url
            .join("/search/2/image")
            .map_err(|e| FetchError::Client(e.to_string()))?;
        url.query_pairs_mut().append_pair("phrase", query);
        Ok(url)
    }
}

#[async_trait]
impl Fetcher for GettyFetcher {
    async fn fetch(&self, query: &str) -> Result<RawPayload, FetchError> {
        let start = Instant::now();
        let url = self.search_url(query)?;

        tracing::debug!("searching Getty Images: query={}", query);

        let response = self
            .http
            .get(url)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .send()
            .await?;

        read_payload(response, self.config.max_bytes, start).await
    }

    fn format(&self) -> PayloadFormat {
        PayloadFormat::Html
    }
}

//! On-disk cache entry envelope.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A cached upstream response.
///
/// Persisted as a JSON object holding the creation time and the raw
/// payload exactly as the upstream returned it. Extraction happens on
/// read, so the payload is never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub timestamp: DateTime<Utc>,
    pub payload: String,
}

impl CacheEntry {
    pub fn new(payload: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self { timestamp, payload: payload.into() }
    }

    /// Age of the entry relative to `now`. Negative if the clock went backwards.
    pub fn age_at(&self, now: DateTime<Utc>) -> TimeDelta {
        now.signed_duration_since(self.timestamp)
    }

    /// An entry is expired once its age is strictly greater than `ttl`.
    pub fn is_expired_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let ttl = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
        self.age_at(now) > ttl
    }

    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

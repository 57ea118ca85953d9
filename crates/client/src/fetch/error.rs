//! Upstream fetch error types.

use std::sync::Arc;

use barabild_core::Error;

/// Errors from a single upstream request.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    /// Request exceeded the configured timeout.
    #[error("request timeout")]
    Timeout,

    /// Connection, DNS or TLS failure.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Upstream answered with a non-success status.
    #[error("HTTP error: {status}")]
    Status { status: u16 },

    /// Response body exceeded the size limit.
    #[error("response too large: {size} bytes exceeds {limit}")]
    TooLarge { size: usize, limit: usize },

    /// Body could not be read to completion.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { FetchError::Timeout } else { FetchError::Network(Arc::new(err)) }
    }
}

impl From<FetchError> for Error {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Timeout => Error::FetchTimeout(err.to_string()),
            FetchError::Status { status } => Error::UpstreamStatus(status),
            FetchError::TooLarge { .. } => Error::FetchTooLarge(err.to_string()),
            FetchError::Network(_) | FetchError::Body(_) | FetchError::Client(_) => Error::FetchFailed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(FetchError::Timeout.to_string(), "request timeout");
        assert_eq!(FetchError::Status { status: 503 }.to_string(), "HTTP error: 503");
        assert!(
            FetchError::TooLarge { size: 10, limit: 5 }
                .to_string()
                .contains("10 bytes exceeds 5")
        );
    }

    #[test]
    fn test_into_core_error() {
        assert!(matches!(Error::from(FetchError::Timeout), Error::FetchTimeout(_)));
        assert!(matches!(Error::from(FetchError::Status { status: 403 }), Error::UpstreamStatus(403)));
        assert!(matches!(Error::from(FetchError::TooLarge { size: 2, limit: 1 }), Error::FetchTooLarge(_)));
        assert!(matches!(Error::from(FetchError::Body("eof".into())), Error::FetchFailed(_)));
        assert_eq!(Error::from(FetchError::Timeout).http_status(), 500);
    }
}

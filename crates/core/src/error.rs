//! Unified error types for barabild.
//!
//! Each variant carries a stable code prefix and maps onto the HTTP status
//! the server surfaces for it.

/// Unified error types for the barabild service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty query).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Transport failure talking to the upstream provider.
    #[error("FETCH_FAILED: {0}")]
    FetchFailed(String),

    /// Upstream request exceeded the configured timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Upstream answered with a non-success status.
    #[error("UPSTREAM_STATUS: {0}")]
    UpstreamStatus(u16),

    /// Upstream response body exceeded the size limit.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// A fresh payload held no qualifying image.
    #[error("NO_IMAGE: {0}")]
    NoImage(String),

    /// A fresh payload could not be parsed in the provider's format.
    #[error("MALFORMED_PAYLOAD: {0}")]
    MalformedPayload(String),
}

impl Error {
    /// Stable error code, as used in response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::FetchFailed(_) => "FETCH_FAILED",
            Error::FetchTimeout(_) => "FETCH_TIMEOUT",
            Error::UpstreamStatus(_) => "UPSTREAM_STATUS",
            Error::FetchTooLarge(_) => "FETCH_TOO_LARGE",
            Error::NoImage(_) => "NO_IMAGE",
            Error::MalformedPayload(_) => "MALFORMED_PAYLOAD",
        }
    }

    /// HTTP status code the server should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::InvalidInput(_) => 400,
            Error::NoImage(_) => 404,
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NoImage("no <picture> element".to_string());
        assert!(err.to_string().starts_with("NO_IMAGE"));
        assert!(err.to_string().contains("<picture>"));
    }

    #[test]
    fn test_error_http_status() {
        assert_eq!(Error::NoImage("x".into()).http_status(), 404);
        assert_eq!(Error::InvalidInput("x".into()).http_status(), 400);
        assert_eq!(Error::FetchFailed("x".into()).http_status(), 500);
        assert_eq!(Error::FetchTimeout("x".into()).http_status(), 500);
        assert_eq!(Error::UpstreamStatus(503).http_status(), 500);
        assert_eq!(Error::MalformedPayload("x".into()).http_status(), 500);
    }

    #[test]
    fn test_error_code_matches_display_prefix() {
        let err = Error::UpstreamStatus(403);
        assert!(err.to_string().starts_with(err.code()));
        assert_eq!(err.to_string(), "UPSTREAM_STATUS: 403");
    }
}

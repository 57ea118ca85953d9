//! Image URL extraction from raw upstream payloads.
//!
//! Extraction is a pure function of the payload: no I/O, no network. That is
//! what lets a cached payload be re-extracted without re-fetching, and lets
//! extraction rules change without invalidating the cache.
//!
//! - HTML: first `<picture>`, first `<img>` inside it, its `src`.
//! - JSON: `urls.regular` of the photo (or of the first search result).

pub mod html;
pub mod json;

pub use html::extract_from_html;
pub use json::extract_from_json;

use barabild_core::Error;

/// Shape of an upstream payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    Html,
    Json,
}

/// Errors from image URL extraction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// The payload parsed but held no qualifying image.
    #[error("no image found: {0}")]
    NoImage(String),

    /// The payload could not be parsed in the expected format.
    #[error("malformed payload: {0}")]
    Malformed(String),
}

impl From<ExtractError> for Error {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::NoImage(msg) => Error::NoImage(msg),
            ExtractError::Malformed(msg) => Error::MalformedPayload(msg),
        }
    }
}

/// Extract the first image URL from `payload`.
pub fn extract_image_url(format: PayloadFormat, payload: &str) -> Result<String, ExtractError> {
    match format {
        PayloadFormat::Html => extract_from_html(payload),
        PayloadFormat::Json => extract_from_json(payload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_by_format() {
        let html = r#"<picture><img src="https://img/a.jpg"></picture>"#;
        let json = r#"{"urls": {"regular": "https://img/b.jpg"}}"#;

        assert_eq!(extract_image_url(PayloadFormat::Html, html).unwrap(), "https://img/a.jpg");
        assert_eq!(extract_image_url(PayloadFormat::Json, json).unwrap(), "https://img/b.jpg");
        assert!(extract_image_url(PayloadFormat::Json, html).is_err());
    }

    #[test]
    fn test_into_core_error() {
        let err: Error = ExtractError::NoImage("none".into()).into();
        assert_eq!(err.http_status(), 404);

        let err: Error = ExtractError::Malformed("bad".into()).into();
        assert_eq!(err.http_status(), 500);
    }
}

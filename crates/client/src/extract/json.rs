//! Image extraction from photo API responses.

use serde::Deserialize;

use super::ExtractError;

#[derive(Debug, Deserialize)]
struct Photo {
    #[serde(default)]
    urls: Option<PhotoUrls>,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    #[serde(default)]
    regular: Option<String>,
}

/// Accepted response shapes: a search page, a single photo, or a list of photos.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PhotoResponse {
    Search { results: Vec<Photo> },
    // before Single: derived structs also deserialize from sequences
    Many(Vec<Photo>),
    Single(Photo),
}

impl PhotoResponse {
    fn first(self) -> Option<Photo> {
        match self {
            PhotoResponse::Search { results } | PhotoResponse::Many(results) => results.into_iter().next(),
            PhotoResponse::Single(photo) => Some(photo),
        }
    }
}

/// Return the regular-size URL of the first photo in the response.
pub fn extract_from_json(json: &str) -> Result<String, ExtractError> {
    let response: PhotoResponse = serde_json::from_str(json).map_err(|e| ExtractError::Malformed(e.to_string()))?;

    response
        .first()
        .and_then(|photo| photo.urls)
        .and_then(|urls| urls.regular)
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ExtractError::NoImage("no urls.regular field".into()))
}

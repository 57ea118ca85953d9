//! HTTP routes for barabild.
//!
//! - `GET /` returns a welcome message.
//! - `GET /search/{query}` redirects to the first image found for the query.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use barabild_client::Resolver;
use barabild_core::Error;
use serde::Serialize;

use crate::error::ApiError;
use crate::middleware::log_requests;

const WELCOME: &str = "Welcome to BaraBild Images Search API";

/// Shared state for request handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

/// Build the router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/search/:query", get(search_image))
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

async fn root() -> Json<Message> {
    Json(Message { message: WELCOME })
}

/// Resolve the query and redirect to the image.
async fn search_image(State(state): State<AppState>, Path(query): Path<String>) -> Result<Response, ApiError> {
    let resolution = state.resolver.resolve(&query).await?;

    let location = HeaderValue::from_str(&resolution.url)
        .map_err(|_| Error::MalformedPayload(format!("image URL is not a valid header value: {:?}", resolution.url)))?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use barabild_client::{FetchError, Fetcher, PayloadFormat, RawPayload};
    use barabild_core::CacheStore;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct StubFetcher {
        reply: Result<String, FetchError>,
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Fetcher for StubFetcher {
        async fn fetch(&self, query: &str) -> Result<RawPayload, FetchError> {
            self.queries.lock().unwrap().push(query.to_string());
            self.reply
                .clone()
                .map(|body| RawPayload { body, fetch_ms: 0 })
        }

        fn format(&self) -> PayloadFormat {
            PayloadFormat::Html
        }
    }

    fn setup(reply: Result<String, FetchError>) -> (TempDir, Arc<StubFetcher>, Router) {
        let dir = TempDir::new().unwrap();
        let fetcher = Arc::new(StubFetcher { reply, queries: Mutex::new(Vec::new()) });
        let cache = CacheStore::new(dir.path(), Duration::from_secs(24 * 60 * 60));
        let state = AppState { resolver: Arc::new(Resolver::new(cache, fetcher.clone())) };
        (dir, fetcher, app(state))
    }

    async fn get_request(router: Router, uri: &str) -> Response {
        router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_root_welcome() {
        let (_dir, _fetcher, router) = setup(Ok(String::new()));
        let response = get_request(router, "/").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Welcome to BaraBild Images Search API");
    }

    #[tokio::test]
    async fn test_search_redirects() {
        let page = r#"<picture><img src="https://img/cats1.jpg"></picture>"#;
        let (_dir, _fetcher, router) = setup(Ok(page.into()));
        let response = get_request(router, "/search/cats").await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "https://img/cats1.jpg");
    }

    #[tokio::test]
    async fn test_search_decodes_path() {
        let page = r#"<picture><img src="https://img/panda.jpg"></picture>"#;
        let (_dir, fetcher, router) = setup(Ok(page.into()));
        let response = get_request(router, "/search/red%20panda").await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(fetcher.queries.lock().unwrap().as_slice(), ["red panda".to_string()]);
    }

    #[tokio::test]
    async fn test_search_no_image() {
        let (_dir, _fetcher, router) = setup(Ok("<html><body>No results</body></html>".into()));
        let response = get_request(router, "/search/qwxz").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"], "NO_IMAGE");
    }

    #[tokio::test]
    async fn test_search_fetch_failure() {
        let (dir, _fetcher, router) = setup(Err(FetchError::Status { status: 503 }));
        let response = get_request(router, "/search/zzz").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "UPSTREAM_STATUS");
        assert!(json["detail"].as_str().unwrap().contains("503"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_search_serves_cached_payload() {
        let (dir, fetcher, router) = setup(Err(FetchError::Timeout));
        let cache = CacheStore::new(dir.path(), Duration::from_secs(60));
        cache
            .put("dogs", r#"<picture><img src="https://img/dogs1.jpg"></picture>"#)
            .await
            .unwrap();

        let response = get_request(router, "/search/dogs").await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "https://img/dogs1.jpg");
        assert!(fetcher.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (_dir, _fetcher, router) = setup(Ok(String::new()));
        let response = get_request(router, "/nope").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

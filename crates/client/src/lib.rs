//! Client code for barabild.
//!
//! This crate provides the upstream fetchers, image URL extraction, and the
//! resolution pipeline that ties them to the cache.

pub mod extract;
pub mod fetch;
pub mod resolve;

pub use extract::{ExtractError, PayloadFormat, extract_image_url};
pub use fetch::{FetchConfig, FetchError, Fetcher, GettyFetcher, RawPayload, UnsplashFetcher, build_fetcher};
pub use resolve::{Resolution, ResolutionSource, Resolver};

//! Image extraction from search results markup.

use scraper::{Html, Selector};
use std::sync::LazyLock;

use super::ExtractError;

static PICTURE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("picture").expect("invalid selector"));
static IMG: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").expect("invalid selector"));

/// Return the `src` of the first `<img>` inside the first `<picture>`.
///
/// Only the first `<picture>` is considered; if it holds no usable `<img>`,
/// later ones are not searched.
pub fn extract_from_html(html: &str) -> Result<String, ExtractError> {
    let document = Html::parse_document(html);

    let picture = document
        .select(&PICTURE)
        .next()
        .ok_or_else(|| ExtractError::NoImage("no <picture> element".into()))?;

    let img = picture
        .select(&IMG)
        .next()
        .ok_or_else(|| ExtractError::NoImage("no <img> inside <picture>".into()))?;

    match img.value().attr("src") {
        Some(src) if !src.trim().is_empty() => Ok(src.to_string()),
        _ => Err(ExtractError::NoImage("<img> has no src".into())),
    }
}

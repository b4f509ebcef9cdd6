//! Root greeting and catch-all handlers.

use axum::http::Uri;
use tracing::info;

use crate::error::AppError;

/// Plain-text greeting.
///
/// # Endpoint
///
/// `ANY /`
pub async fn index_handler(uri: Uri) -> &'static str {
    info!("handle URL path {} ...", uri.path());
    "Hello world!"
}

/// Answers 404 for every path no route matches.
pub async fn not_found_handler(uri: Uri) -> AppError {
    info!("handle URL path {} ...", uri.path());
    AppError::NotFound
}

//! Router configuration.
//!
//! # Route Structure
//!
//! - `/`                 - Plain-text greeting
//! - `/store/{id}`       - 302 redirect to the partner store page (with HTML body)
//! - `/store/{id}/pdf`   - Printable flyer with QR code
//! - `/store/{id}/qr`    - QR code PNG
//! - anything else       - 404
//!
//! Every route accepts any HTTP method.

use axum::Router;
use axum::routing::any;

use crate::handlers::{index_handler, not_found_handler, store_download_handler, store_handler};
use crate::middleware::tracing;
use crate::state::AppState;

/// Constructs the application router.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(index_handler))
        .route("/store/{id}", any(store_handler))
        .route("/store/{id}/{mode}", any(store_download_handler))
        .fallback(not_found_handler)
        .with_state(state)
        .layer(tracing::layer())
}

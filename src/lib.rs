//! # WhatsLeft Redirect
//!
//! A small stateless web service that points printed material at the
//! WhatsLeft partner site.
//!
//! For a place identifier it
//!
//! - redirects to the store page on the partner site (`/store/{id}`),
//! - serves a printable A4 flyer with a QR code (`/store/{id}/pdf`),
//! - serves the QR code alone as PNG (`/store/{id}/qr`).
//!
//! QR codes always encode the store URL on the project domain, so printed
//! flyers keep working if the partner site moves.
//!
//! ## Modules
//!
//! - [`domain`] - Place identifiers and store URL construction
//! - [`rendering`] - QR code and PDF flyer generation
//! - [`handlers`] - HTTP handlers
//! - [`routes`] - Router and middleware composition
//! - [`config`] - Environment-driven configuration
//!
//! ## Quick Start
//!
//! ```bash
//! export PORT=8080          # Optional
//! export ASSETS_DIR=assets  # Optional, flyer images
//! cargo run
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod rendering;
pub mod routes;
pub mod server;
pub mod state;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::domain::{LinkSettings, PlaceId};
    pub use crate::error::AppError;
    pub use crate::rendering::{FlyerLayout, QrSettings, RenderError};
    pub use crate::routes::app_router;
    pub use crate::state::AppState;
}

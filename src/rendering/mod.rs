//! Image and document rendering for store downloads.
//!
//! - [`qr`] - QR code bitmap and PNG generation
//! - [`flyer`] - Single-page A4 PDF flyer with an embedded QR code

pub mod flyer;
pub mod qr;

pub use flyer::{FlyerLayout, ImagePlacement};
pub use qr::QrSettings;

use std::path::PathBuf;

/// Errors raised while producing a QR code or a flyer.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to encode QR code: {0}")]
    Qr(#[from] qrcode::types::QrError),

    #[error("QR code with {modules} modules does not fit into {size_px}x{size_px} pixels")]
    QrTooLarge { modules: usize, size_px: u32 },

    #[error("image processing failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to read asset {}: {source}", path.display())]
    Asset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode asset {}: {source}", path.display())]
    AssetDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write PDF: {0}")]
    Pdf(String),

    #[error("rendering task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

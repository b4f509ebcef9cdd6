//! Request-level errors and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::domain::InvalidPlaceId;
use crate::rendering::RenderError;

/// Body of every 404 response.
pub const NOT_FOUND_BODY: &str = "404 page not found\n";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request path does not address a store resource.
    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Template(#[from] askama::Error),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl From<InvalidPlaceId> for AppError {
    fn from(_: InvalidPlaceId) -> Self {
        Self::NotFound
    }
}

impl IntoResponse for AppError {
    /// Not-found errors answer 404; everything else answers 500 with the
    /// error text as plain-text body.
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response(),
            other => {
                tracing::error!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response()
            }
        }
    }
}

//! Store redirect and download handlers.

use askama::Template;
use axum::{
    extract::{Path, State, rejection::PathRejection},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use std::str::FromStr;
use tracing::info;

use crate::domain::PlaceId;
use crate::error::AppError;
use crate::rendering::RenderError;
use crate::state::AppState;

/// Landing page rendered as the body of a store redirect.
///
/// Renders `templates/store-whatsleft.html` for clients that do not follow
/// the `Location` header.
#[derive(Template)]
#[template(path = "store-whatsleft.html")]
pub struct StoreView<'a> {
    pub google_place_id: &'a PlaceId,
    pub whatsleft_url: &'a str,
}

/// Download variant selected by the trailing path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    Pdf,
    Qr,
}

impl FromStr for StoreMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(Self::Pdf),
            "qr" => Ok(Self::Qr),
            _ => Err(AppError::NotFound),
        }
    }
}

/// Redirects to the store page on the partner site.
///
/// # Endpoint
///
/// `ANY /store/{id}`
///
/// # Response
///
/// `302 Found` with `Location` set to the partner URL. The body still
/// carries the rendered landing page so the link can be followed manually.
///
/// # Errors
///
/// - 404 if `id` is not a valid [`PlaceId`]
/// - 500 if the landing page cannot be rendered
pub async fn store_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(raw) = path.map_err(|_| AppError::NotFound)?;
    let id = PlaceId::parse(raw)?;

    let target = state.config.links.partner_url(&id);
    info!("redirecting to {target}");

    let body = StoreView {
        google_place_id: &id,
        whatsleft_url: &target,
    }
    .render()?;

    Ok((StatusCode::FOUND, [(header::LOCATION, target)], Html(body)).into_response())
}

/// Serves the PDF flyer or the QR code for a store.
///
/// # Endpoints
///
/// - `ANY /store/{id}/pdf` - `application/pdf`, shown inline with a
///   `whatsleft_-_{id}.pdf` file name
/// - `ANY /store/{id}/qr` - `image/png`, 1024x1024 QR code
///
/// Both encode the store's canonical URL on the project domain.
///
/// # Errors
///
/// - 404 for an invalid `id` or any other trailing segment
/// - 500 with the error text if rendering fails
pub async fn store_download_handler(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Response, AppError> {
    let Path((raw, mode)) = path.map_err(|_| AppError::NotFound)?;
    let id = PlaceId::parse(raw)?;
    let mode: StoreMode = mode.parse()?;

    let config = &state.config;
    let target = config.links.project_url(&id);

    match mode {
        StoreMode::Pdf => {
            let file_name = config.flyer.file_name(&id);
            info!("generating PDF {file_name} with QR code pointing to {target}");

            let pdf = config
                .flyer
                .compose(&config.assets_dir, config.qr, target)
                .await?;

            Ok((
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("inline; filename=\"{file_name}\""),
                    ),
                ],
                pdf,
            )
                .into_response())
        }
        StoreMode::Qr => {
            info!("generating QR code pointing to {target}");

            let qr = config.qr;
            let png = tokio::task::spawn_blocking(move || qr.render_png(&target))
                .await
                .map_err(RenderError::from)??;

            Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
        }
    }
}

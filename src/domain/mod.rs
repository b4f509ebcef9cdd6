//! Domain types independent of HTTP and rendering.
//!
//! - [`place_id`] - Validated store identifier taken from the request path
//! - [`links`] - Partner and project store URL construction

pub mod links;
pub mod place_id;

pub use links::LinkSettings;
pub use place_id::{InvalidPlaceId, PlaceId};

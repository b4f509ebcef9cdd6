//! HTTP request handlers.

pub mod index;
pub mod store;

pub use index::{index_handler, not_found_handler};
pub use store::{store_download_handler, store_handler};

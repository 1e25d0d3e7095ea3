//! Articles and projects: static catalogs loaded at startup, filtered per
//! request, plus article bodies read from the content directory.

pub mod content;
pub mod filter;
pub mod handlers;
pub mod loader;
pub mod models;
pub mod view;

pub use loader::{Catalog, CatalogError};

//! Nimbus Player Core
//!
//! Shared types, traits, and error handling for Nimbus Player.
//!
//! This crate defines:
//! - **Domain Types**: `Track`, `TrackPage`, `TrackQuery`
//! - **Core Traits**: `Catalog` (remote track source)
//! - **Error Handling**: `CatalogError` and `Result`
//!
//! # Example
//!
//! ```rust
//! use nimbus_core::TrackQuery;
//!
//! let query = TrackQuery::first_page(10).with_title("night");
//! assert_eq!(query.page, 1);
//! assert_eq!(query.title.as_deref(), Some("night"));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items
pub use error::{CatalogError, Result};
pub use traits::Catalog;
pub use types::{Track, TrackPage, TrackQuery};

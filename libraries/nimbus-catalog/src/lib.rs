//! Nimbus Catalog Client
//!
//! HTTP client for the Nimbus music catalog API.
//!
//! The catalog exposes a paged track listing, raw encoded audio per
//! track, and track deletion. List and delete responses arrive wrapped
//! in a `{success, message, data}` envelope; audio arrives as a raw
//! body.
//!
//! # Example
//!
//! ```ignore
//! use nimbus_catalog::{CatalogConfig, HttpCatalog};
//! use nimbus_core::{Catalog, TrackQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = HttpCatalog::new(CatalogConfig::new("https://music.example.com"))?;
//!
//!     let page = catalog.fetch_page(&TrackQuery::first_page(10)).await?;
//!     println!("Found {} tracks", page.total);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod types;

pub use client::HttpCatalog;
pub use types::CatalogConfig;

//! Catalog API tools.
//!
//! Thin wrappers over [`CatalogClient`](storefront_client::CatalogClient);
//! requests travel through the proxy registration.

pub mod listings;
pub mod products;

pub use listings::{businesses_impl, categories_impl};
pub use products::{CatalogProductsParams, products_impl};

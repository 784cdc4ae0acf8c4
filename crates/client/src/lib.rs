//! Client code for the storefront proxy.
//!
//! This crate provides the network transport, the asset-caching proxy that
//! sits in front of it, and the catalog API client, shared by the server.

pub mod catalog;
pub mod fetch;
pub mod proxy;

#[cfg(test)]
pub(crate) mod testing;

pub use catalog::{Business, CatalogClient, CatalogConfig, CatalogError, Product, ProductCategory, ProductFilter};
pub use fetch::{FetchConfig, HttpTransport, ProxyRequest, ProxyResponse, Transport};
pub use proxy::{
    ActivationReport, AssetCachingProxy, ClaimFlag, ClientControl, InstallOutcome, Lifecycle, ProxyConfig,
    Registration, RegistrationOutcome, RequestPolicy,
};

pub use reqwest::{Method, StatusCode, Url, header};

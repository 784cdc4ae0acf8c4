//! Proxy lifecycle and request tools.

pub mod fetch;
pub mod install;

pub use fetch::{ProxyFetchParams, fetch_impl};
pub use install::{ProxyInstallParams, install_impl};

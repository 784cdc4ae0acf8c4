//! Core types and shared functionality for the storefront proxy.
//!
//! This crate provides:
//! - Cache store registry with SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheDb, CacheStorage, CachedResponse, RequestKey};
pub use config::{AppConfig, ConfigError};
pub use error::Error;

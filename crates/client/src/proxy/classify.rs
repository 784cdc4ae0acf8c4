//! Per-request handling policy.

use std::collections::HashSet;
use std::fmt;

use reqwest::Method;
use serde::{Deserialize, Serialize};

/// How an intercepted request is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestPolicy {
    /// Straight to the network; the cache is never read or written.
    Bypass,
    /// Serve from the store if present, otherwise fetch and store on success.
    CacheFirst,
    /// Always fetch; the cache is never consulted.
    NetworkFirst,
}

impl fmt::Display for RequestPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestPolicy::Bypass => "bypass",
            RequestPolicy::CacheFirst => "cache-first",
            RequestPolicy::NetworkFirst => "network-first",
        };
        f.write_str(name)
    }
}

/// Pure `(path, method) -> RequestPolicy` classifier.
///
/// Rules, first match wins:
/// 1. API prefix or non-GET method: `Bypass`
/// 2. exact manifest path or static extension (case-insensitive): `CacheFirst`
/// 3. anything else: `NetworkFirst`
#[derive(Debug, Clone)]
pub struct RequestClassifier {
    api_prefix: String,
    manifest_paths: HashSet<String>,
    static_extensions: HashSet<String>,
}

impl RequestClassifier {
    pub fn new<P, E>(api_prefix: impl Into<String>, manifest_paths: P, static_extensions: E) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self {
            api_prefix: api_prefix.into(),
            manifest_paths: manifest_paths.into_iter().map(Into::into).collect(),
            static_extensions: static_extensions
                .into_iter()
                .map(|e| e.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn classify(&self, path: &str, method: &Method) -> RequestPolicy {
        if path.starts_with(&self.api_prefix) || *method != Method::GET {
            return RequestPolicy::Bypass;
        }

        if self.manifest_paths.contains(path) || self.has_static_extension(path) {
            return RequestPolicy::CacheFirst;
        }

        RequestPolicy::NetworkFirst
    }

    fn has_static_extension(&self, path: &str) -> bool {
        file_extension(path).is_some_and(|ext| self.static_extensions.contains(&ext.to_ascii_lowercase()))
    }
}

/// Text after the last `.` of the final path segment, if any.
fn file_extension(path: &str) -> Option<&str> {
    let segment = path.rsplit('/').next()?;
    let (_, ext) = segment.rsplit_once('.')?;
    (!ext.is_empty()).then_some(ext)
}

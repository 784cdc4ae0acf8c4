//! Catalog request types.

use serde::{Deserialize, Serialize};

/// Optional filters for the product listing.
///
/// Empty or absent fields are left out of the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    /// Category name, e.g. "Food".
    pub category: Option<String>,
    /// Business (shop) id.
    pub business_id: Option<String>,
    /// Business name, matched by the API.
    pub business_name: Option<String>,
    /// Owner user id.
    pub owner_id: Option<String>,
}

impl ProductFilter {
    /// Query pairs in API parameter order, skipping unset filters.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("category", &self.category),
            ("businessId", &self.business_id),
            ("businessName", &self.business_name),
            ("ownerId", &self.owner_id),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_deref().filter(|v| !v.is_empty()).map(|v| (name, v)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }
}

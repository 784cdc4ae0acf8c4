//! catalog_categories and catalog_businesses tool implementations.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use serde::Serialize;
use storefront_client::{Business, ProductCategory};
use storefront_core::Error;

use crate::state::AppState;
use crate::tools::json_result;

#[derive(Debug, Clone, Serialize)]
pub struct CategoriesOutput {
    pub categories: Vec<ProductCategory>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BusinessesOutput {
    pub businesses: Vec<Business>,
}

/// Implementation of the catalog_categories tool.
pub async fn categories_impl(state: &AppState) -> Result<CallToolResult, McpError> {
    let categories = state.catalog.list_categories().await.map_err(Error::from)?;
    json_result(&CategoriesOutput { categories })
}

/// Implementation of the catalog_businesses tool.
pub async fn businesses_impl(state: &AppState) -> Result<CallToolResult, McpError> {
    let businesses = state.catalog.list_businesses().await.map_err(Error::from)?;
    json_result(&BusinessesOutput { businesses })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support;
    use crate::tools::result_json;

    #[tokio::test]
    async fn test_categories() {
        let state = test_support::state().await;

        let output = result_json(&categories_impl(&state).await.unwrap());

        assert_eq!(output["categories"][0]["name"], "Crafts");
        assert_eq!(output["categories"][0]["displayOrder"], 2);
    }

    #[tokio::test]
    async fn test_businesses_through_active_proxy() {
        let state = test_support::state().await;
        state.bootstrap().await;
        assert!(state.registration.active().await.is_some());

        let output = result_json(&businesses_impl(&state).await.unwrap());

        assert_eq!(output["businesses"][0]["name"], "Duka La Mama");
        assert_eq!(state.db.entry_count("biasharahub-v1").await.unwrap(), 4);
    }
}

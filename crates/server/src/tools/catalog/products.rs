//! catalog_products tool implementation.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use storefront_client::{Product, ProductFilter};
use storefront_core::Error;

use crate::state::AppState;
use crate::tools::json_result;

/// Parameters for the catalog_products tool. Every filter is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CatalogProductsParams {
    /// Category name, e.g. "Food".
    #[serde(default)]
    pub category: Option<String>,
    /// Business (shop) id.
    #[serde(default)]
    pub business_id: Option<String>,
    /// Business name.
    #[serde(default)]
    pub business_name: Option<String>,
    /// Owner user id.
    #[serde(default)]
    pub owner_id: Option<String>,
}

impl From<CatalogProductsParams> for ProductFilter {
    fn from(params: CatalogProductsParams) -> Self {
        ProductFilter {
            category: params.category,
            business_id: params.business_id,
            business_name: params.business_name,
            owner_id: params.owner_id,
        }
    }
}

/// A product plus the image a storefront card would show.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCard {
    #[serde(flatten)]
    pub product: Product,
    pub display_image: Option<String>,
}

/// Output from the catalog_products tool.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogProductsOutput {
    pub count: usize,
    pub products: Vec<ProductCard>,
}

/// Implementation of the catalog_products tool.
pub async fn products_impl(state: &AppState, params: CatalogProductsParams) -> Result<CallToolResult, McpError> {
    let filter = ProductFilter::from(params);
    let products = state.catalog.list_products(&filter).await.map_err(Error::from)?;

    let products: Vec<ProductCard> = products
        .into_iter()
        .map(|product| {
            let display_image = product.primary_image().map(str::to_string);
            ProductCard { product, display_image }
        })
        .collect();

    json_result(&CatalogProductsOutput { count: products.len(), products })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support;
    use crate::tools::result_json;
    use storefront_core::AppConfig;

    #[tokio::test]
    async fn test_products_listed_with_display_image() {
        let state = test_support::state().await;
        let params = CatalogProductsParams { category: Some("Crafts".into()), ..Default::default() };

        let output = result_json(&products_impl(&state, params).await.unwrap());

        assert_eq!(output["count"], 1);
        assert_eq!(output["products"][0]["name"], "Kikoi");
        assert_eq!(output["products"][0]["displayImage"], "/img/kikoi.png");
    }

    #[test]
    fn test_params_into_filter() {
        let params = CatalogProductsParams { business_id: Some("b-7".into()), ..Default::default() };
        let filter = ProductFilter::from(params);
        assert_eq!(filter, ProductFilter { business_id: Some("b-7".into()), ..Default::default() });
    }

    #[tokio::test]
    async fn test_unreachable_api_maps_to_catalog_error() {
        let config = AppConfig { api_base_url: "http://localhost:8080/down".into(), ..Default::default() };
        let state = test_support::state_with(config).await;

        let err = products_impl(&state, CatalogProductsParams::default()).await.unwrap_err();
        assert_eq!(err.code.0, -32030);
    }
}

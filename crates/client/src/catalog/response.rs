//! Catalog API response types.

use serde::{Deserialize, Serialize};

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub display_order: Option<i32>,
}

/// A business (shop) selling on the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub owner_name: Option<String>,
    /// tier1, tier2 or tier3 (informal, registered SME, corporate).
    #[serde(default)]
    pub seller_tier: Option<String>,
}

/// A product listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub business_id: Option<String>,
    #[serde(default)]
    pub moderation_status: Option<String>,
}

impl Product {
    /// Image shown on the product card: `image`, else the first of `images`.
    pub fn primary_image(&self) -> Option<&str> {
        self.image
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.images.first().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_decodes_camel_case() {
        let json = r#"{
            "id": "3f6c2a9e-0000-4000-8000-000000000001",
            "name": "Sukuma Wiki",
            "category": "Food",
            "price": 40.5,
            "quantity": 12,
            "description": null,
            "image": null,
            "images": ["https://cdn.example.com/sukuma.jpg"],
            "businessId": "b-1",
            "moderationStatus": "approved"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.business_id.as_deref(), Some("b-1"));
        assert_eq!(product.price, 40.5);
        assert_eq!(product.primary_image(), Some("https://cdn.example.com/sukuma.jpg"));
    }

    #[test]
    fn test_primary_image_prefers_image_field() {
        let product = Product {
            id: "p".into(),
            name: "Chapati".into(),
            category: None,
            price: 20.0,
            quantity: None,
            description: None,
            image: Some("/img/chapati.png".into()),
            images: vec!["/img/other.png".into()],
            business_id: None,
            moderation_status: None,
        };
        assert_eq!(product.primary_image(), Some("/img/chapati.png"));

        let bare = Product { image: None, images: Vec::new(), ..product };
        assert_eq!(bare.primary_image(), None);
    }

    #[test]
    fn test_category_and_business_optional_fields() {
        let category: ProductCategory = serde_json::from_str(r#"{"id":"c","name":"Food"}"#).unwrap();
        assert_eq!(category.display_order, None);

        let business: Business =
            serde_json::from_str(r#"{"id":"b","name":"Duka","ownerName":"Achieng","sellerTier":"tier2"}"#).unwrap();
        assert_eq!(business.owner_name.as_deref(), Some("Achieng"));
        assert_eq!(business.seller_tier.as_deref(), Some("tier2"));
    }
}

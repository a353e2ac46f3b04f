//! Catalog product data as stored in the cart.
//!
//! Cart entries are catalog products copied verbatim at add time - no
//! normalization, no merging. Adding the same product twice produces two
//! distinct line items.

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A catalog product / cart line item.
///
/// The `price` field is kept as the string the catalog serves. Money
/// arithmetic on it lives in [`crate::types::money`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    /// Reference to the product image, when the catalog provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Product {
    /// Create a product with just an id, name, and price.
    ///
    /// Mostly useful in tests; catalog responses carry the full shape.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            price: price.into(),
            description: String::new(),
            category: String::new(),
            image: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_sparse_entry() {
        // Persisted cart blobs may carry entries with only id and price.
        let p: Product = serde_json::from_str(r#"{"id":1,"price":"10"}"#).expect("deserialize");
        assert_eq!(p.id, ProductId::new(1));
        assert_eq!(p.price, "10");
        assert!(p.name.is_empty());
        assert!(p.image.is_none());
    }

    #[test]
    fn test_roundtrip_full_entry() {
        let p = Product {
            id: ProductId::new(2),
            name: "Bamboo Toothbrush".to_string(),
            price: "4.99".to_string(),
            description: "Compostable handle".to_string(),
            category: "bathroom".to_string(),
            image: Some("https://cdn.example.com/p/2.jpg".to_string()),
        };
        let json = serde_json::to_string(&p).expect("serialize");
        let back: Product = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, p);
    }
}

//! Order records submitted to the order-persistence backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::payment::PaymentMethod;
use super::product::Product;

/// Per-item detail kept on an order for record keeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub id: ProductId,
    pub name: String,
    pub price: String,
    pub category: String,
}

impl From<&Product> for OrderLineItem {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price.clone(),
            category: product.category.clone(),
        }
    }
}

/// An order as submitted to the backend after a successful charge.
///
/// Field names match the backend's order endpoint exactly. The PayPal
/// fields are present only for PayPal transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Concatenated product names, one trailing `", "` per item.
    pub products: String,
    pub transaction_id: String,
    /// Charged amount as the gateway reported it.
    pub amount: String,
    pub payment_method: PaymentMethod,
    pub transaction_status: String,
    pub currency_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paypal_payer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paypal_payer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paypal_authorization_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paypal_capture_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub product_details: Vec<OrderLineItem>,
}

/// Concatenate product names the way the order backend stores them.
///
/// Every name is followed by `", "`, including the last one; the backend
/// counts items by splitting on the commas.
#[must_use]
pub fn concatenated_names(products: &[Product]) -> String {
    let mut names = String::new();
    for product in products {
        names.push_str(&product.name);
        names.push_str(", ");
    }
    names
}

/// Build the per-item detail sequence for an order.
#[must_use]
pub fn line_items(products: &[Product]) -> Vec<OrderLineItem> {
    products.iter().map(OrderLineItem::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concatenated_names_trailing_separator() {
        let products = vec![
            Product::new(ProductId::new(1), "Soap", "3"),
            Product::new(ProductId::new(2), "Sponge", "2"),
        ];
        assert_eq!(concatenated_names(&products), "Soap, Sponge, ");
    }

    #[test]
    fn test_concatenated_names_empty() {
        assert_eq!(concatenated_names(&[]), "");
    }

    #[test]
    fn test_line_items_copy_detail_fields() {
        let mut product = Product::new(ProductId::new(5), "Soap", "3.50");
        product.category = "bathroom".to_string();
        let items = line_items(std::slice::from_ref(&product));
        assert_eq!(
            items,
            vec![OrderLineItem {
                id: ProductId::new(5),
                name: "Soap".to_string(),
                price: "3.50".to_string(),
                category: "bathroom".to_string(),
            }]
        );
    }

    #[test]
    fn test_order_record_serializes_without_absent_paypal_fields() {
        let record = OrderRecord {
            products: "Soap, ".to_string(),
            transaction_id: "txn-1".to_string(),
            amount: "3".to_string(),
            payment_method: PaymentMethod::Card,
            transaction_status: "settled".to_string(),
            currency_code: "USD".to_string(),
            paypal_payer_email: None,
            paypal_payer_id: None,
            paypal_authorization_id: None,
            paypal_capture_id: None,
            created_at: Utc::now(),
            product_details: vec![],
        };
        let json = serde_json::to_value(&record).expect("serialize");
        assert!(json.get("paypal_payer_email").is_none());
        assert_eq!(json["payment_method"], "Card");
        assert_eq!(json["transaction_status"], "settled");
    }
}

//! Wire types for the remote store backend.
//!
//! Field names mirror the backend's JSON exactly; the camelCase spellings
//! come from the payment gateway it fronts.

use serde::{Deserialize, Serialize};

use ecostore_core::OrderId;

/// Response from `payment/gettoken/{id}/{token}/`.
#[derive(Debug, Deserialize)]
pub struct RawTokenResponse {
    #[serde(rename = "clientToken", default)]
    pub client_token: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response from `payment/process/{id}/{token}/`.
///
/// The `error` field is a bool on gateway rejections but a string on
/// session rejections, hence the loose value type.
#[derive(Debug, Deserialize)]
pub struct RawPaymentResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub transaction: Option<TransactionSummary>,
}

/// Settled transaction data reported by the payment gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub id: String,
    pub amount: String,
    pub status: String,
    #[serde(rename = "paymentInstrumentType", default)]
    pub payment_instrument_type: Option<String>,
    #[serde(rename = "currencyIsoCode", default)]
    pub currency_iso_code: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub paypal: Option<PayPalTransactionDetails>,
}

/// PayPal-specific transaction detail, present for PayPal charges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPalTransactionDetails {
    #[serde(rename = "payerEmail", default)]
    pub payer_email: Option<String>,
    #[serde(rename = "payerId", default)]
    pub payer_id: Option<String>,
    #[serde(rename = "authorizationId", default)]
    pub authorization_id: Option<String>,
    #[serde(rename = "captureId", default)]
    pub capture_id: Option<String>,
}

/// Response from `order/add/{id}/{token}/`.
#[derive(Debug, Deserialize)]
pub struct RawOrderResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub order_id: Option<i32>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

/// A persisted order as confirmed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderConfirmation {
    pub order_id: Option<OrderId>,
    pub transaction_id: Option<String>,
    pub payment_method: Option<String>,
    pub message: String,
}

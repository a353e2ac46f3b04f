//! Payment method types and widget-result ingress validation.
//!
//! The hosted drop-in widget yields a duck-typed, stringly-keyed result
//! object. It is validated into [`PaymentMethodPayload`] at the boundary so
//! everything downstream works with a tagged variant.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Payment method discriminators as the backend spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    #[default]
    Card,
    PayPalAccount,
    Venmo,
    ApplePay,
    GooglePay,
    #[serde(rename = "unknown")]
    Unknown,
}

impl PaymentMethod {
    /// Wire name used in backend requests and order records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Card => "Card",
            Self::PayPalAccount => "PayPalAccount",
            Self::Venmo => "Venmo",
            Self::ApplePay => "ApplePay",
            Self::GooglePay => "GooglePay",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors validating a widget result into a payload.
#[derive(Debug, Error)]
pub enum PaymentPayloadError {
    /// The result carried no payment-method nonce.
    #[error("payment result is missing a nonce")]
    MissingNonce,

    /// The result was not an object.
    #[error("payment result has an unexpected shape")]
    UnexpectedShape,
}

/// PayPal payer identity as reported by the widget.
///
/// Fields the widget omits default to empty strings, mirroring what the
/// backend stores.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PayPalPayer {
    #[serde(default)]
    pub payer_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Tagged payment-method result from the drop-in widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentMethodPayload {
    /// A tokenized card.
    Card { nonce: String },
    /// A PayPal account, carrying payer identity for the order record.
    PayPal { nonce: String, payer: PayPalPayer },
}

impl PaymentMethodPayload {
    /// The one-time payment-method token.
    #[must_use]
    pub fn nonce(&self) -> &str {
        match self {
            Self::Card { nonce } | Self::PayPal { nonce, .. } => nonce,
        }
    }

    /// The backend discriminator for this payload.
    #[must_use]
    pub const fn method(&self) -> PaymentMethod {
        match self {
            Self::Card { .. } => PaymentMethod::Card,
            Self::PayPal { .. } => PaymentMethod::PayPalAccount,
        }
    }

    /// Payer identity, present only for PayPal payloads.
    #[must_use]
    pub const fn paypal_payer(&self) -> Option<&PayPalPayer> {
        match self {
            Self::Card { .. } => None,
            Self::PayPal { payer, .. } => Some(payer),
        }
    }

    /// Validate a raw widget result into a tagged payload.
    ///
    /// The widget reports `{"nonce": "...", "type": "...", "details": {...}}`.
    /// Any `type` other than `PayPalAccount` is treated as a card; the
    /// card/PayPal split is the only one the backend distinguishes.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentPayloadError`] when the result is not an object or
    /// carries no nonce.
    pub fn from_widget_value(value: &serde_json::Value) -> Result<Self, PaymentPayloadError> {
        let object = value
            .as_object()
            .ok_or(PaymentPayloadError::UnexpectedShape)?;

        let nonce = object
            .get("nonce")
            .and_then(serde_json::Value::as_str)
            .filter(|n| !n.is_empty())
            .ok_or(PaymentPayloadError::MissingNonce)?
            .to_string();

        let method_type = object.get("type").and_then(serde_json::Value::as_str);
        if method_type == Some("PayPalAccount") {
            let details = object.get("details");
            let field = |key: &str| -> String {
                details
                    .and_then(|d| d.get(key))
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            Ok(Self::PayPal {
                nonce,
                payer: PayPalPayer {
                    payer_id: field("payerId"),
                    email: field("email"),
                    first_name: field("firstName"),
                    last_name: field("lastName"),
                },
            })
        } else {
            Ok(Self::Card { nonce })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_ingress() {
        let raw = serde_json::json!({"nonce": "abc-123", "type": "CreditCard"});
        let payload = PaymentMethodPayload::from_widget_value(&raw).expect("valid");
        assert_eq!(payload, PaymentMethodPayload::Card { nonce: "abc-123".to_string() });
        assert_eq!(payload.method(), PaymentMethod::Card);
        assert!(payload.paypal_payer().is_none());
    }

    #[test]
    fn test_paypal_ingress_with_details() {
        let raw = serde_json::json!({
            "nonce": "pp-456",
            "type": "PayPalAccount",
            "details": {
                "payerId": "PAYER1",
                "email": "buyer@example.com",
                "firstName": "Ada",
                "lastName": "Lovelace"
            }
        });
        let payload = PaymentMethodPayload::from_widget_value(&raw).expect("valid");
        assert_eq!(payload.method(), PaymentMethod::PayPalAccount);
        let payer = payload.paypal_payer().expect("payer");
        assert_eq!(payer.payer_id, "PAYER1");
        assert_eq!(payer.email, "buyer@example.com");
    }

    #[test]
    fn test_paypal_ingress_missing_details() {
        let raw = serde_json::json!({"nonce": "pp-789", "type": "PayPalAccount"});
        let payload = PaymentMethodPayload::from_widget_value(&raw).expect("valid");
        assert_eq!(payload.paypal_payer(), Some(&PayPalPayer::default()));
    }

    #[test]
    fn test_missing_nonce_rejected() {
        let raw = serde_json::json!({"type": "CreditCard"});
        let err = PaymentMethodPayload::from_widget_value(&raw).expect_err("invalid");
        assert!(matches!(err, PaymentPayloadError::MissingNonce));
    }

    #[test]
    fn test_non_object_rejected() {
        let raw = serde_json::json!("nonce");
        let err = PaymentMethodPayload::from_widget_value(&raw).expect_err("invalid");
        assert!(matches!(err, PaymentPayloadError::UnexpectedShape));
    }

    #[test]
    fn test_method_wire_names() {
        assert_eq!(PaymentMethod::PayPalAccount.as_str(), "PayPalAccount");
        assert_eq!(PaymentMethod::Unknown.to_string(), "unknown");
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Card).expect("serialize"),
            "\"Card\""
        );
    }
}

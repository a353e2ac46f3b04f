//! Client for the remote store backend.
//!
//! One HTTP API serves the product catalog, payment-gateway credentials,
//! payment processing, and order persistence:
//!
//! - GET  `products`
//! - GET  `payment/gettoken/{userId}/{token}/`
//! - POST `payment/process/{userId}/{token}/` (multipart form; nested
//!   objects JSON-stringified)
//! - POST `order/add/{userId}/{token}/` (JSON order record)
//!
//! The backend signals a dead session with the distinguished code `"1"`;
//! such rejections are fatal and force a sign-out upstream. The catalog is
//! cached in-memory via `moka` (5 minute TTL).

mod types;

pub use types::{
    OrderConfirmation, PayPalTransactionDetails, RawOrderResponse, RawPaymentResponse,
    RawTokenResponse, TransactionSummary,
};

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use thiserror::Error;
use url::Url;

use ecostore_core::{OrderRecord, PaymentMethodPayload, Product};

use crate::auth::AuthSession;

/// Backend error code that invalidates the session.
const FATAL_SESSION_CODE: &str = "1";

/// Catalog cache TTL.
const CATALOG_TTL: Duration = Duration::from_secs(300);

/// Errors from the remote store backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Backend rejected the request with an application-level error.
    ///
    /// `fatal` is set for the distinguished session-invalidation code;
    /// callers must force a sign-out when it is.
    #[error("{message}")]
    Rejected { message: String, fatal: bool },

    /// Endpoint URL could not be built.
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

impl BackendError {
    /// Whether this error invalidates the user's session.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Rejected { fatal: true, .. })
    }
}

/// A charge to submit to the payment backend.
#[derive(Debug, Clone)]
pub struct ChargeRequest {
    pub payload: PaymentMethodPayload,
    /// Whole-currency amount (see `ecostore_core::charge_amount`).
    pub amount: i64,
}

impl ChargeRequest {
    /// The multipart form fields for `payment/process`.
    ///
    /// PayPal charges carry a `paypal_data` object, JSON-stringified the
    /// way the backend expects, with payer identity under both key
    /// spellings the backend reads.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("paymentMethodNonce", self.payload.nonce().to_string()),
            ("amount", self.amount.to_string()),
        ];
        if let Some(payer) = self.payload.paypal_payer() {
            let paypal_data = serde_json::json!({
                "payerId": payer.payer_id,
                "email": payer.email,
                "firstName": payer.first_name,
                "lastName": payer.last_name,
                "paypalPayerId": payer.payer_id,
                "paypalFirstName": payer.first_name,
                "paypalLastName": payer.last_name,
            });
            fields.push(("payment_method", self.payload.method().to_string()));
            fields.push(("paypal_data", paypal_data.to_string()));
        }
        fields
    }
}

/// The three payment-flow calls, as a seam for the checkout orchestrator.
///
/// [`ApiClient`] is the production implementation; tests drive the
/// orchestrator with an in-memory fake.
pub trait PaymentGateway {
    /// Fetch a payment-gateway client credential for the widget.
    async fn client_token(&self, auth: &AuthSession) -> Result<String, BackendError>;

    /// Submit a charge.
    async fn process_payment(
        &self,
        auth: &AuthSession,
        charge: &ChargeRequest,
    ) -> Result<TransactionSummary, BackendError>;

    /// Persist an order record after a settled charge.
    async fn create_order(
        &self,
        auth: &AuthSession,
        order: &OrderRecord,
    ) -> Result<OrderConfirmation, BackendError>;
}

/// HTTP client for the remote store backend.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    catalog_cache: Cache<(), Arc<Vec<Product>>>,
}

impl ApiClient {
    /// Create a client for the backend at `base_url` (trailing slash
    /// expected, e.g. `https://api.example.com/api/`).
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            catalog_cache: Cache::builder()
                .max_capacity(1)
                .time_to_live(CATALOG_TTL)
                .build(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        Ok(self.base_url.join(path)?)
    }

    /// The product catalog, cached for five minutes.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the request fails or the body does
    /// not parse.
    pub async fn products(&self) -> Result<Vec<Product>, BackendError> {
        if let Some(cached) = self.catalog_cache.get(&()).await {
            return Ok(cached.as_ref().clone());
        }

        let url = self.endpoint("products")?;
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let products: Vec<Product> = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;
        self.catalog_cache
            .insert((), Arc::new(products.clone()))
            .await;
        Ok(products)
    }
}

impl PaymentGateway for ApiClient {
    async fn client_token(&self, auth: &AuthSession) -> Result<String, BackendError> {
        let url = self.endpoint(&format!(
            "payment/gettoken/{}/{}/",
            auth.user_id,
            auth.token()
        ))?;
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let raw: RawTokenResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;
        interpret_token_response(raw)
    }

    async fn process_payment(
        &self,
        auth: &AuthSession,
        charge: &ChargeRequest,
    ) -> Result<TransactionSummary, BackendError> {
        let url = self.endpoint(&format!(
            "payment/process/{}/{}/",
            auth.user_id,
            auth.token()
        ))?;

        let mut form = reqwest::multipart::Form::new();
        for (name, value) in charge.form_fields() {
            form = form.text(name, value);
        }

        let response = self.http.post(url).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let raw: RawPaymentResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;
        interpret_payment_response(raw)
    }

    async fn create_order(
        &self,
        auth: &AuthSession,
        order: &OrderRecord,
    ) -> Result<OrderConfirmation, BackendError> {
        let url = self.endpoint(&format!("order/add/{}/{}/", auth.user_id, auth.token()))?;
        let response = self.http.post(url).json(order).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let raw: RawOrderResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;
        interpret_order_response(raw)
    }
}

// =============================================================================
// Response Interpretation
// =============================================================================

/// Pull a human-readable message out of the loose `error` value.
fn rejection_message(error: &serde_json::Value, fallback: Option<&str>) -> String {
    error
        .as_str()
        .map(str::to_string)
        .or_else(|| fallback.map(str::to_string))
        .unwrap_or_else(|| "Request rejected by backend".to_string())
}

fn interpret_token_response(raw: RawTokenResponse) -> Result<String, BackendError> {
    if let Some(message) = raw.error {
        // A token rejection always means the session is dead.
        return Err(BackendError::Rejected {
            message,
            fatal: true,
        });
    }
    raw.client_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| BackendError::Parse("token response carried no clientToken".to_string()))
}

fn interpret_payment_response(raw: RawPaymentResponse) -> Result<TransactionSummary, BackendError> {
    let fatal = raw.code.as_deref() == Some(FATAL_SESSION_CODE);
    if let Some(error) = &raw.error {
        return Err(BackendError::Rejected {
            message: rejection_message(error, raw.message.as_deref()),
            fatal,
        });
    }
    if raw.success != Some(true) {
        return Err(BackendError::Rejected {
            message: raw
                .message
                .unwrap_or_else(|| "Payment processing failed".to_string()),
            fatal,
        });
    }
    raw.transaction
        .ok_or_else(|| BackendError::Parse("payment response carried no transaction".to_string()))
}

fn interpret_order_response(raw: RawOrderResponse) -> Result<OrderConfirmation, BackendError> {
    let fatal = raw.code.as_deref() == Some(FATAL_SESSION_CODE);
    // The backend sets `error` to `false` on success; only a truthy value
    // is a rejection.
    let rejected = match &raw.error {
        Some(serde_json::Value::Bool(flag)) => *flag,
        Some(serde_json::Value::Null) | None => false,
        Some(_) => true,
    };
    if rejected {
        let error = raw.error.unwrap_or_default();
        return Err(BackendError::Rejected {
            message: rejection_message(&error, raw.msg.as_deref()),
            fatal,
        });
    }
    if raw.success != Some(true) {
        return Err(BackendError::Rejected {
            message: raw
                .msg
                .unwrap_or_else(|| "Order creation failed".to_string()),
            fatal,
        });
    }
    Ok(OrderConfirmation {
        order_id: raw.order_id.map(Into::into),
        transaction_id: raw.transaction_id,
        payment_method: raw.payment_method,
        message: raw.msg.unwrap_or_else(|| "Order placed".to_string()),
    })
}

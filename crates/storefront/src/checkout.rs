//! Checkout orchestration.
//!
//! A checkout session sequences:
//!
//! 1. fetch payment-gateway client credentials,
//! 2. hand them to the hosted payment widget,
//! 3. on purchase, request a one-time payment-method token from the widget,
//! 4. submit the charge to the backend,
//! 5. on success, submit the order record,
//! 6. clear the cart and raise the reload signal.
//!
//! as an explicit state machine:
//!
//! ```text
//! Idle -> CredentialPending -> CredentialReady -> WidgetReady
//!      -> PaymentRequested -> PaymentSubmitted -> OrderSubmitted
//!      -> { Succeeded | Failed }
//! ```
//!
//! Each network-dependent step is sequenced after the prior step's
//! completion; no two backend calls for one session are ever in flight at
//! once. Every entry into `Failed` is terminal - retry means a fresh
//! session. There is no automatic retry anywhere; a retryable error only
//! returns the session to `WidgetReady` for the user to act again.
//!
//! Sessions carry a cancellation flag cancelled when the session drops, so
//! a checkout abandoned mid-flight stops between suspension points instead
//! of leaking work.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use thiserror::Error;

use ecostore_core::{
    OrderRecord, PaymentMethod, PaymentMethodPayload, Product, charge_amount, concatenated_names,
    format_total, line_items,
};

use crate::auth::AuthSession;
use crate::backend::{
    BackendError, ChargeRequest, OrderConfirmation, PaymentGateway, TransactionSummary,
};
use crate::cart::CartStore;

/// States of a checkout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    Idle,
    CredentialPending,
    CredentialReady,
    WidgetReady,
    PaymentRequested,
    PaymentSubmitted,
    OrderSubmitted,
    Succeeded,
    Failed,
}

/// Errors from the hosted widget's payment-method request.
#[derive(Debug, Clone, Error)]
pub enum WidgetError {
    #[error("Payment was canceled. Please try again if you want to complete the purchase.")]
    UserCanceled,

    #[error("The payment window was closed. Please try again.")]
    PopupClosed,

    #[error("Provider authentication failed: {0}")]
    ProviderAuthFailed(String),

    #[error("{0}")]
    Other(String),
}

/// Checkout failure taxonomy.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No signed-in session; reached without any network call.
    #[error("Please sign in to continue with payment")]
    AuthenticationRequired,

    /// `begin` was called on a session that already ran.
    #[error("Checkout session already started")]
    AlreadyStarted,

    /// Credential fetch failed; the session is terminated and the user
    /// signed out.
    #[error("Failed to initialize payment system: {0}")]
    CredentialFetch(String),

    /// The widget failed to initialize.
    #[error("Payment widget error: {0}")]
    WidgetInit(String),

    /// The widget could not produce a payment method; retryable.
    #[error(transparent)]
    PaymentMethodRequest(#[from] WidgetError),

    /// The backend rejected the charge.
    #[error("Payment failed: {message}")]
    PaymentSubmission { message: String, fatal: bool },

    /// The backend rejected the order record.
    #[error("Order creation failed: {message}")]
    OrderSubmission { message: String, fatal: bool },

    /// Purchase clicked without a live widget instance; no state change.
    #[error("Payment form is not ready. Please refresh the page and try again.")]
    WidgetUnavailable,

    /// The session was cancelled between suspension points.
    #[error("Checkout session cancelled")]
    Cancelled,
}

impl CheckoutError {
    /// Whether this failure forces a sign-out.
    #[must_use]
    pub const fn forces_signout(&self) -> bool {
        matches!(
            self,
            Self::CredentialFetch(_)
                | Self::PaymentSubmission { fatal: true, .. }
                | Self::OrderSubmission { fatal: true, .. }
        )
    }
}

/// The hosted payment widget boundary.
///
/// The real widget lives client-side; [`SubmittedPaymentMethod`] adapts an
/// already-tokenized result, and tests plug in fakes.
pub trait PaymentWidget {
    /// Request a one-time payment-method token from the widget.
    async fn request_payment_method(&self) -> Result<PaymentMethodPayload, WidgetError>;
}

/// A widget stand-in for payloads tokenized client-side and submitted
/// over HTTP.
#[derive(Debug, Clone)]
pub struct SubmittedPaymentMethod {
    payload: PaymentMethodPayload,
}

impl SubmittedPaymentMethod {
    #[must_use]
    pub const fn new(payload: PaymentMethodPayload) -> Self {
        Self { payload }
    }
}

impl PaymentWidget for SubmittedPaymentMethod {
    async fn request_payment_method(&self) -> Result<PaymentMethodPayload, WidgetError> {
        Ok(self.payload.clone())
    }
}

/// Cancellation flag scoped to a checkout session.
///
/// Cloned handles share the flag; the session cancels it on drop.
#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Side-effect hooks the orchestrator raises.
pub struct CheckoutHooks {
    /// Forced sign-out on fatal backend rejections.
    pub on_signout: Box<dyn FnMut() + Send>,
    /// Reload signal to the cart view, raised exactly once on success.
    pub on_reload: Box<dyn FnMut() + Send>,
}

impl Default for CheckoutHooks {
    fn default() -> Self {
        Self {
            on_signout: Box::new(|| {}),
            on_reload: Box::new(|| {}),
        }
    }
}

/// Successful checkout result.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CheckoutOutcome {
    pub transaction: TransactionSummary,
    pub order: OrderConfirmation,
    pub message: String,
}

/// One checkout-page visit.
///
/// Created per visit and discarded on navigation away; the cart snapshot
/// is read once at construction, not reactively.
pub struct CheckoutSession<G, W> {
    gateway: G,
    cart: CartStore,
    hooks: CheckoutHooks,
    products: Vec<Product>,
    state: CheckoutState,
    client_token: Option<String>,
    widget: Option<W>,
    loading: bool,
    succeeded: bool,
    error: Option<String>,
    cancellation: Cancellation,
}

impl<G, W> CheckoutSession<G, W>
where
    G: PaymentGateway,
    W: PaymentWidget,
{
    /// Create a session over a snapshot of the cart.
    #[must_use]
    pub fn new(gateway: G, cart: &CartStore, hooks: CheckoutHooks) -> Self {
        let products = cart.load();
        Self {
            gateway,
            cart: cart.clone(),
            hooks,
            products,
            state: CheckoutState::Idle,
            client_token: None,
            widget: None,
            loading: false,
            succeeded: false,
            error: None,
            cancellation: Cancellation::default(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> CheckoutState {
        self.state
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn client_token(&self) -> Option<&str> {
        self.client_token.as_deref()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.succeeded
    }

    /// The cart snapshot this session charges for.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Whole-currency amount that will be submitted to the backend.
    #[must_use]
    pub fn amount_due(&self) -> i64 {
        charge_amount(&self.products)
    }

    /// Display bill, e.g. `"$30.00"`.
    #[must_use]
    pub fn bill_total(&self) -> String {
        format_total(ecostore_core::cart_total(&self.products))
    }

    /// A handle for cancelling this session externally.
    #[must_use]
    pub fn cancellation_handle(&self) -> Cancellation {
        self.cancellation.clone()
    }

    fn fail(&mut self, message: impl Into<String>) {
        self.state = CheckoutState::Failed;
        self.error = Some(message.into());
        self.loading = false;
    }

    /// `Idle -> CredentialPending -> CredentialReady`.
    ///
    /// Guarded by a signed-in session: without one the session fails with
    /// an authentication-required error before any network call. A
    /// credential-fetch error terminates the session and forces sign-out.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::AuthenticationRequired`], [`CheckoutError::AlreadyStarted`],
    /// [`CheckoutError::CredentialFetch`], or [`CheckoutError::Cancelled`].
    pub async fn begin(&mut self, auth: Option<&AuthSession>) -> Result<(), CheckoutError> {
        if self.state != CheckoutState::Idle {
            return Err(CheckoutError::AlreadyStarted);
        }
        self.state = CheckoutState::CredentialPending;

        let Some(auth) = auth else {
            let err = CheckoutError::AuthenticationRequired;
            self.fail(err.to_string());
            return Err(err);
        };

        if self.cancellation.is_cancelled() {
            return Err(CheckoutError::Cancelled);
        }

        match self.gateway.client_token(auth).await {
            Ok(token) => {
                if self.cancellation.is_cancelled() {
                    return Err(CheckoutError::Cancelled);
                }
                tracing::debug!(user_id = %auth.user_id, "payment credential received");
                self.client_token = Some(token);
                self.state = CheckoutState::CredentialReady;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!("credential fetch failed: {message}");
                self.fail(&message);
                (self.hooks.on_signout)();
                Err(CheckoutError::CredentialFetch(message))
            }
        }
    }

    /// `CredentialReady -> WidgetReady`, driven by the widget's own
    /// readiness callback.
    ///
    /// Exactly one widget instance is active at a time; a second callback
    /// replaces the first. Out-of-sequence callbacks are ignored.
    pub fn widget_ready(&mut self, widget: W) {
        match self.state {
            CheckoutState::CredentialReady => {
                self.widget = Some(widget);
                self.state = CheckoutState::WidgetReady;
            }
            CheckoutState::WidgetReady => {
                self.widget = Some(widget);
            }
            state => {
                tracing::debug!(?state, "ignoring widget readiness callback");
            }
        }
    }

    /// Surface a widget initialization failure inline.
    pub fn widget_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("widget error: {message}");
        self.error = Some(message);
    }

    /// User-initiated purchase: `WidgetReady -> PaymentRequested ->
    /// PaymentSubmitted -> OrderSubmitted -> Succeeded`.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::WidgetUnavailable`] when no widget instance is
    ///   live; no state change.
    /// - [`CheckoutError::PaymentMethodRequest`] and retryable
    ///   [`CheckoutError::PaymentSubmission`] return the session to
    ///   `WidgetReady`.
    /// - Fatal payment rejections and all order rejections terminate the
    ///   session; fatal ones force sign-out.
    pub async fn purchase(&mut self, auth: &AuthSession) -> Result<CheckoutOutcome, CheckoutError> {
        if self.state != CheckoutState::WidgetReady {
            return Err(CheckoutError::WidgetUnavailable);
        }
        let Some(widget) = self.widget.take() else {
            return Err(CheckoutError::WidgetUnavailable);
        };

        self.loading = true;
        self.state = CheckoutState::PaymentRequested;

        let requested = widget.request_payment_method().await;
        self.widget = Some(widget);
        let payload = match requested {
            Ok(payload) => payload,
            Err(e) => {
                self.loading = false;
                self.error = Some(e.to_string());
                self.state = CheckoutState::WidgetReady;
                return Err(CheckoutError::PaymentMethodRequest(e));
            }
        };

        if self.cancellation.is_cancelled() {
            self.loading = false;
            return Err(CheckoutError::Cancelled);
        }

        let charge = ChargeRequest {
            amount: charge_amount(&self.products),
            payload,
        };
        self.state = CheckoutState::PaymentSubmitted;
        let transaction = match self.gateway.process_payment(auth, &charge).await {
            Ok(transaction) => transaction,
            Err(e) => return Err(self.payment_rejected(&e)),
        };
        tracing::info!(
            transaction_id = %transaction.id,
            method = %charge.payload.method(),
            "payment processed"
        );

        if self.cancellation.is_cancelled() {
            self.loading = false;
            return Err(CheckoutError::Cancelled);
        }

        let order = build_order_record(&self.products, &transaction, charge.payload.method());
        self.state = CheckoutState::OrderSubmitted;
        let confirmation = match self.gateway.create_order(auth, &order).await {
            Ok(confirmation) => confirmation,
            Err(e) => return Err(self.order_rejected(&e)),
        };
        tracing::info!(order_id = ?confirmation.order_id, "order placed");

        self.state = CheckoutState::Succeeded;
        self.succeeded = true;
        self.loading = false;
        self.error = None;

        self.cart.clear();
        (self.hooks.on_reload)();

        let message = if charge.payload.method() == PaymentMethod::PayPalAccount {
            "PayPal payment successful! Your order has been placed."
        } else {
            "Payment successful! Your order has been placed."
        };
        Ok(CheckoutOutcome {
            transaction,
            order: confirmation,
            message: message.to_string(),
        })
    }

    /// Fatal payment rejections terminate the session and sign the user
    /// out; others surface the message and return to `WidgetReady`.
    fn payment_rejected(&mut self, e: &BackendError) -> CheckoutError {
        let message = e.to_string();
        let fatal = e.is_fatal();
        self.loading = false;
        self.error = Some(message.clone());
        if fatal {
            tracing::warn!("payment rejected with fatal code, signing out");
            self.state = CheckoutState::Failed;
            (self.hooks.on_signout)();
        } else {
            self.state = CheckoutState::WidgetReady;
        }
        CheckoutError::PaymentSubmission { message, fatal }
    }

    /// Order rejections are always terminal - the charge has settled, so
    /// re-running submission from this session would charge again. Fatal
    /// codes additionally force sign-out.
    fn order_rejected(&mut self, e: &BackendError) -> CheckoutError {
        let message = e.to_string();
        let fatal = e.is_fatal();
        self.fail(&message);
        if fatal {
            tracing::warn!("order rejected with fatal code, signing out");
            (self.hooks.on_signout)();
        }
        CheckoutError::OrderSubmission { message, fatal }
    }
}

impl<G, W> Drop for CheckoutSession<G, W> {
    fn drop(&mut self) {
        self.cancellation.cancel();
    }
}

/// Assemble the order record for a settled transaction.
fn build_order_record(
    products: &[Product],
    transaction: &TransactionSummary,
    method: PaymentMethod,
) -> OrderRecord {
    let paypal = transaction.paypal.as_ref();
    OrderRecord {
        products: concatenated_names(products),
        transaction_id: transaction.id.clone(),
        amount: transaction.amount.clone(),
        payment_method: method,
        transaction_status: transaction.status.clone(),
        currency_code: transaction
            .currency_iso_code
            .clone()
            .unwrap_or_else(|| "USD".to_string()),
        paypal_payer_email: paypal.and_then(|p| p.payer_email.clone()),
        paypal_payer_id: paypal.and_then(|p| p.payer_id.clone()),
        paypal_authorization_id: paypal.and_then(|p| p.authorization_id.clone()),
        paypal_capture_id: paypal.and_then(|p| p.capture_id.clone()),
        created_at: Utc::now(),
        product_details: line_items(products),
    }
}

//! Checkout route handlers.
//!
//! The hosted payment widget runs client-side; these endpoints cover the
//! two server-side halves of the flow. `POST /checkout/token` fetches the
//! client credentials the widget is initialized with, and `POST /checkout`
//! runs the full orchestration for a payment method the widget already
//! tokenized.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use ecostore_core::{PaymentMethodPayload, UserId};

use crate::auth::AuthSession;
use crate::checkout::{
    CheckoutHooks, CheckoutOutcome, CheckoutSession, SubmittedPaymentMethod,
};
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::state::AppState;

/// Credentials identifying the signed-in user to the store backend.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub user_id: UserId,
    pub token: String,
}

/// Client-token response for widget initialization.
#[derive(Debug, Serialize)]
pub struct ClientToken {
    pub client_token: String,
}

/// Full checkout request: credentials plus the widget's tokenization
/// result, passed through as received.
#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    #[serde(flatten)]
    pub credentials: Credentials,
    pub payment_method: serde_json::Value,
}

impl Credentials {
    fn into_session(self) -> AuthSession {
        AuthSession::new(self.user_id, self.token)
    }
}

/// Fetch payment client credentials for the hosted widget.
#[instrument(skip(state, credentials), fields(user_id = %credentials.user_id))]
pub async fn client_token(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<ClientToken>> {
    set_sentry_user(&credentials.user_id);
    let auth = credentials.into_session();

    let mut session = CheckoutSession::<_, SubmittedPaymentMethod>::new(
        state.backend().clone(),
        state.cart(),
        signout_hooks(),
    );
    session.begin(Some(&auth)).await?;

    let token = session
        .client_token()
        .ok_or_else(|| AppError::Internal("credential missing after fetch".to_string()))?
        .to_string();
    Ok(Json(ClientToken {
        client_token: token,
    }))
}

/// Run checkout for a tokenized payment method.
///
/// The payment method value is validated on ingress; malformed payloads
/// are rejected before any backend call.
#[instrument(skip(state, request), fields(user_id = %request.credentials.user_id))]
pub async fn purchase(
    State(state): State<AppState>,
    Json(request): Json<PurchaseRequest>,
) -> Result<Json<CheckoutOutcome>> {
    let payload = PaymentMethodPayload::from_widget_value(&request.payment_method)?;
    set_sentry_user(&request.credentials.user_id);
    let auth = request.credentials.into_session();

    let mut session =
        CheckoutSession::new(state.backend().clone(), state.cart(), signout_hooks());
    session.begin(Some(&auth)).await?;
    session.widget_ready(SubmittedPaymentMethod::new(payload));
    let outcome = session.purchase(&auth).await?;

    Ok(Json(outcome))
}

/// Hooks for HTTP-driven sessions.
///
/// Sign-out here means dropping the Sentry user association; the session
/// itself lives with the external auth backend. The reload signal is the
/// response body, so no hook is needed.
fn signout_hooks() -> CheckoutHooks {
    CheckoutHooks {
        on_signout: Box::new(clear_sentry_user),
        on_reload: Box::new(|| {}),
    }
}

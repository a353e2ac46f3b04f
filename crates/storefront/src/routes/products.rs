//! Product catalog route handlers.

use axum::{Json, extract::State};
use tracing::instrument;

use ecostore_core::Product;

use crate::error::Result;
use crate::state::AppState;

/// Catalog listing, served from the short-lived backend cache.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = state.backend().products().await?;
    Ok(Json(products))
}

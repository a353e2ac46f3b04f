//! Cart route handlers.
//!
//! All cart endpoints return the render-ready [`CartView`]; mutations
//! publish `cartUpdated` through the store, not from here.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use ecostore_core::{Product, ProductId};

use crate::cart::CartView;
use crate::state::AppState;

/// Remove-from-cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCart {
    pub id: ProductId,
}

/// Cart count badge payload.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: usize,
}

/// Current cart view.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    Json(CartView::from_entries(state.cart().load()))
}

/// Add a product to the cart.
///
/// Duplicate adds append; the caller supplies the product as listed in
/// the catalog.
#[instrument(skip(state, product), fields(product_id = %product.id))]
pub async fn add(State(state): State<AppState>, Json(product): Json<Product>) -> Json<CartView> {
    state.cart().add(product);
    Json(CartView::from_entries(state.cart().load()))
}

/// Remove the first cart entry with the given product id.
///
/// A no-op when no entry matches.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(request): Json<RemoveFromCart>,
) -> Json<CartView> {
    state.cart().remove_by_id(request.id);
    Json(CartView::from_entries(state.cart().load()))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Json<CartView> {
    state.cart().clear();
    Json(CartView::empty())
}

/// Cart count badge.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Json<CartCount> {
    Json(CartCount {
        count: state.cart().count(),
    })
}

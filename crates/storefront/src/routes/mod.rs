//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products               - Catalog listing (cached backend proxy)
//!
//! # Cart
//! GET  /cart                   - Cart view (items, total, count)
//! POST /cart/add               - Add a product
//! POST /cart/remove            - Remove the first entry with a given id
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Cart count badge
//!
//! # Theme
//! GET  /theme                  - Current theme
//! POST /theme/toggle           - Toggle dark mode
//!
//! # Checkout
//! POST /checkout/token         - Fetch payment client credentials
//! POST /checkout               - Run checkout for a tokenized payment method
//! ```

pub mod cart;
pub mod checkout;
pub mod products;
pub mod theme;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the theme routes router.
pub fn theme_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(theme::show))
        .route("/toggle", post(theme::toggle))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::purchase))
        .route("/token", post(checkout::client_token))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .nest("/cart", cart_routes())
        .nest("/theme", theme_routes())
        .nest("/checkout", checkout_routes())
}

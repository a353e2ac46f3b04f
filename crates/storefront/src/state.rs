//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::ApiClient;
use crate::bus::NotificationBus;
use crate::cart::{CartStore, CartViewModel};
use crate::config::StorefrontConfig;
use crate::storage::SharedStorage;
use crate::theme::ThemeStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the backend client and the persistent stores.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    backend: ApiClient,
    bus: NotificationBus,
    cart: CartStore,
    theme: ThemeStore,
}

impl AppState {
    /// Create a new application state over the given persistent storage.
    #[must_use]
    pub fn new(config: StorefrontConfig, storage: SharedStorage) -> Self {
        let backend = ApiClient::new(config.backend_api_url.clone());
        let bus = NotificationBus::new();
        let cart = CartStore::new(Arc::clone(&storage), bus.clone());
        let theme = ThemeStore::new(storage, bus.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                bus,
                cart,
                theme,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the store backend client.
    #[must_use]
    pub fn backend(&self) -> &ApiClient {
        &self.inner.backend
    }

    /// Get a reference to the notification bus.
    #[must_use]
    pub fn bus(&self) -> &NotificationBus {
        &self.inner.bus
    }

    /// Get a reference to the persistent cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the persistent theme store.
    #[must_use]
    pub fn theme(&self) -> &ThemeStore {
        &self.inner.theme
    }

    /// Build a cart view model with a fresh confirmation gate.
    ///
    /// Gates are per page visit, not shared state.
    #[must_use]
    pub fn cart_view_model(&self) -> CartViewModel {
        CartViewModel::new(self.inner.cart.clone())
    }
}

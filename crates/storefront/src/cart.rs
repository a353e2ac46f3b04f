//! Persistent cart store and view model.
//!
//! The cart is a serialized sequence of products under the `cart` storage
//! key. Entries are catalog products copied verbatim: duplicate adds append
//! rather than merge, and removal takes the first entry matching the id.
//! Every mutation publishes exactly one `cartUpdated` notification,
//! synchronously, before returning.

use serde::Serialize;

use ecostore_core::{Product, ProductId, cart_total, format_total};

use crate::bus::{Notification, NotificationBus};
use crate::confirm::ConfirmationGate;
use crate::storage::{SharedStorage, Storage, keys};

/// Cart store over the injected storage capability.
#[derive(Clone)]
pub struct CartStore {
    storage: SharedStorage,
    bus: NotificationBus,
}

impl CartStore {
    #[must_use]
    pub fn new(storage: SharedStorage, bus: NotificationBus) -> Self {
        Self { storage, bus }
    }

    /// The persisted sequence of cart entries.
    ///
    /// An absent key is an empty cart. A malformed blob is logged and read
    /// as empty; every write re-establishes a well-formed sequence.
    #[must_use]
    pub fn load(&self) -> Vec<Product> {
        let guard = self
            .storage
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        read_entries(&*guard)
    }

    /// Number of entries in the cart.
    #[must_use]
    pub fn count(&self) -> usize {
        self.load().len()
    }

    /// Append an entry to the cart.
    ///
    /// No uniqueness check: adding the same product twice produces two
    /// line items.
    pub fn add(&self, product: Product) {
        self.mutate(|entries| entries.push(product));
    }

    /// Remove the first entry whose id matches, preserving the order of
    /// the rest. Silently a no-op when nothing matches.
    pub fn remove_by_id(&self, id: ProductId) {
        self.mutate(|entries| {
            if let Some(index) = entries.iter().position(|p| p.id == id) {
                entries.remove(index);
            }
        });
    }

    /// Replace the cart with an empty sequence.
    pub fn clear(&self) {
        self.mutate(Vec::clear);
    }

    /// Read-modify-write under the storage lock, then publish one
    /// `cartUpdated` after the lock is released.
    fn mutate(&self, f: impl FnOnce(&mut Vec<Product>)) {
        {
            let mut guard = self
                .storage
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let mut entries = read_entries(&*guard);
            f(&mut entries);
            match serde_json::to_string(&entries) {
                Ok(encoded) => guard.set(keys::CART, encoded),
                Err(e) => {
                    // Leaves the persisted blob untouched.
                    tracing::error!("Failed to encode cart contents: {e}");
                    return;
                }
            }
        }
        self.bus.publish(&Notification::CartUpdated);
    }
}

fn read_entries(storage: &dyn Storage) -> Vec<Product> {
    storage.get(keys::CART).map_or_else(Vec::new, |blob| {
        serde_json::from_str(&blob).unwrap_or_else(|e| {
            tracing::warn!("Malformed cart blob, treating as empty: {e}");
            Vec::new()
        })
    })
}

// =============================================================================
// View Model
// =============================================================================

/// Render-ready cart state.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<Product>,
    /// Exact decimal total formatted to two places, e.g. `"$30.00"`.
    pub total: String,
    pub count: usize,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: "$0.00".to_string(),
            count: 0,
        }
    }

    /// Derive the view from a cart snapshot.
    #[must_use]
    pub fn from_entries(items: Vec<Product>) -> Self {
        let total = format_total(cart_total(&items));
        let count = items.len();
        Self {
            items,
            total,
            count,
        }
    }
}

/// Cart view model: derives render state and issues commands.
///
/// Adds go straight to the store; removals are routed through the
/// confirmation gate so the user decides before anything mutates.
pub struct CartViewModel {
    store: CartStore,
    gate: ConfirmationGate,
}

impl CartViewModel {
    #[must_use]
    pub fn new(store: CartStore) -> Self {
        Self {
            store,
            gate: ConfirmationGate::new(),
        }
    }

    /// Current render-ready cart state.
    #[must_use]
    pub fn view(&self) -> CartView {
        CartView::from_entries(self.store.load())
    }

    /// Add a product to the cart.
    pub fn add(&self, product: Product) {
        self.store.add(product);
    }

    /// Ask for confirmation before removing an entry.
    pub fn request_remove(&mut self, product: &Product) {
        let store = self.store.clone();
        let id = product.id;
        self.gate
            .open("Remove Item from Cart", product.name.clone(), move || {
                store.remove_by_id(id);
            });
    }

    /// The confirmation gate, for rendering and dismissal bindings.
    pub fn gate_mut(&mut self) -> &mut ConfirmationGate {
        &mut self.gate
    }

    #[must_use]
    pub const fn gate(&self) -> &ConfirmationGate {
        &self.gate
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::bus::Channel;
    use crate::storage::{MemoryStorage, shared};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn store() -> (CartStore, NotificationBus) {
        let bus = NotificationBus::new();
        let store = CartStore::new(shared(MemoryStorage::new()), bus.clone());
        (store, bus)
    }

    fn product(id: i32, price: &str) -> Product {
        Product::new(ProductId::new(id), format!("product-{id}"), price)
    }

    #[test]
    fn test_load_empty_when_key_absent() {
        let (store, _bus) = store();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_add_appends_in_order() {
        let (store, _bus) = store();
        store.add(product(1, "10"));
        store.add(product(2, "20"));

        let entries = store.load();
        assert_eq!(
            entries.iter().map(|p| p.id.as_i32()).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn test_duplicate_adds_are_distinct_line_items() {
        let (store, _bus) = store();
        store.add(product(1, "10"));
        store.add(product(1, "10"));
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn test_remove_takes_first_match_only() {
        let (store, _bus) = store();
        store.add(product(1, "10"));
        store.add(product(2, "20"));
        store.add(product(1, "10"));

        store.remove_by_id(ProductId::new(1));
        let entries = store.load();
        assert_eq!(
            entries.iter().map(|p| p.id.as_i32()).collect::<Vec<_>>(),
            vec![2, 1]
        );
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let (store, _bus) = store();
        store.add(product(1, "10"));
        store.remove_by_id(ProductId::new(99));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_remove_from_empty_cart_is_noop() {
        let (store, _bus) = store();
        store.remove_by_id(ProductId::new(1));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_clear_yields_empty_regardless_of_prior_state() {
        let (store, _bus) = store();
        store.add(product(1, "10"));
        store.add(product(2, "20"));
        store.clear();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_every_mutation_publishes_exactly_one_notification() {
        let (store, bus) = store();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let _sub = bus.subscribe(Channel::CartUpdated, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.add(product(1, "10"));
        store.remove_by_id(ProductId::new(1));
        store.clear();
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_malformed_blob_reads_as_empty() {
        let bus = NotificationBus::new();
        let storage = shared(MemoryStorage::new());
        storage
            .lock()
            .unwrap()
            .set(keys::CART, "{not valid".to_string());

        let store = CartStore::new(storage, bus);
        assert!(store.load().is_empty());

        // A write re-establishes a well-formed sequence.
        store.add(product(1, "10"));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_view_totals_and_count() {
        let (store, _bus) = store();
        store.add(product(1, "10"));
        store.add(product(2, "20"));

        let view = CartViewModel::new(store).view();
        assert_eq!(view.total, "$30.00");
        assert_eq!(view.count, 2);
    }

    #[test]
    fn test_view_model_remove_waits_for_confirmation() {
        let (store, _bus) = store();
        let soap = product(1, "10");
        store.add(soap.clone());

        let mut vm = CartViewModel::new(store);
        vm.request_remove(&soap);
        assert!(vm.gate().scroll_locked());
        assert_eq!(vm.view().count, 1);

        assert!(vm.gate_mut().confirm());
        assert_eq!(vm.view().count, 0);
    }

    #[test]
    fn test_view_model_dismiss_keeps_entry() {
        let (store, _bus) = store();
        let soap = product(1, "10");
        store.add(soap.clone());

        let mut vm = CartViewModel::new(store);
        vm.request_remove(&soap);
        vm.gate_mut().dismiss();
        assert_eq!(vm.view().count, 1);
    }
}

//! Navigation shell state.
//!
//! The shell reflects authentication state and a live cart count. It is
//! independent of the cart and checkout flows except as a bus subscriber:
//! on `cartUpdated` it re-queries the cart store, on `themeChanged` it
//! tracks the dark-mode flag. Dropping the shell unsubscribes its
//! handlers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::bus::{Channel, Notification, NotificationBus, Subscription};
use crate::cart::CartStore;

/// Live navigation state, updated through bus subscriptions.
pub struct NavShell {
    cart_count: Arc<AtomicUsize>,
    dark_mode: Arc<AtomicBool>,
    signed_in: AtomicBool,
    _subscriptions: [Subscription; 2],
}

impl NavShell {
    /// Mount the shell: seed the count from the store and subscribe for
    /// updates.
    #[must_use]
    pub fn mount(cart: &CartStore, bus: &NotificationBus) -> Self {
        let cart_count = Arc::new(AtomicUsize::new(cart.count()));
        let dark_mode = Arc::new(AtomicBool::new(false));

        let count = Arc::clone(&cart_count);
        let store = cart.clone();
        let cart_sub = bus.subscribe(Channel::CartUpdated, move |_| {
            // No payload on cartUpdated; re-query current state.
            count.store(store.count(), Ordering::SeqCst);
        });

        let dark = Arc::clone(&dark_mode);
        let theme_sub = bus.subscribe(Channel::ThemeChanged, move |n| {
            if let Notification::ThemeChanged { is_dark_mode } = n {
                dark.store(*is_dark_mode, Ordering::SeqCst);
            }
        });

        Self {
            cart_count,
            dark_mode,
            signed_in: AtomicBool::new(false),
            _subscriptions: [cart_sub, theme_sub],
        }
    }

    /// Current cart badge count.
    #[must_use]
    pub fn cart_count(&self) -> usize {
        self.cart_count.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_dark_mode(&self) -> bool {
        self.dark_mode.load(Ordering::SeqCst)
    }

    /// Reflect the external auth backend's session state.
    pub fn set_signed_in(&self, signed_in: bool) {
        self.signed_in.store(signed_in, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.signed_in.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, shared};
    use crate::theme::{Theme, ThemeStore};
    use ecostore_core::{Product, ProductId};

    fn fixture() -> (CartStore, ThemeStore, NotificationBus) {
        let bus = NotificationBus::new();
        let storage = shared(MemoryStorage::new());
        (
            CartStore::new(Arc::clone(&storage), bus.clone()),
            ThemeStore::new(storage, bus.clone()),
            bus,
        )
    }

    #[test]
    fn test_mount_seeds_count_from_store() {
        let (cart, _theme, bus) = fixture();
        cart.add(Product::new(ProductId::new(1), "Soap", "3"));

        let shell = NavShell::mount(&cart, &bus);
        assert_eq!(shell.cart_count(), 1);
    }

    #[test]
    fn test_count_tracks_cart_mutations() {
        let (cart, _theme, bus) = fixture();
        let shell = NavShell::mount(&cart, &bus);

        cart.add(Product::new(ProductId::new(1), "Soap", "3"));
        cart.add(Product::new(ProductId::new(2), "Sponge", "2"));
        assert_eq!(shell.cart_count(), 2);

        cart.clear();
        assert_eq!(shell.cart_count(), 0);
    }

    #[test]
    fn test_theme_flag_tracks_bus() {
        let (cart, theme, bus) = fixture();
        let shell = NavShell::mount(&cart, &bus);

        theme.set(Theme::Dark);
        assert!(shell.is_dark_mode());
        theme.set(Theme::Light);
        assert!(!shell.is_dark_mode());
    }

    #[test]
    fn test_drop_unsubscribes() {
        let (cart, _theme, bus) = fixture();
        let shell = NavShell::mount(&cart, &bus);
        drop(shell);

        // Publishing after drop must not panic or invoke stale handlers.
        cart.add(Product::new(ProductId::new(1), "Soap", "3"));
    }

    #[test]
    fn test_signed_in_flag() {
        let (cart, _theme, bus) = fixture();
        let shell = NavShell::mount(&cart, &bus);
        assert!(!shell.is_signed_in());
        shell.set_signed_in(true);
        assert!(shell.is_signed_in());
    }
}

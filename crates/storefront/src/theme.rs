//! Theme persistence.
//!
//! The theme lives under the `theme` storage key as `"dark"` or `"light"`;
//! changes are announced on the `themeChanged` channel with the dark-mode
//! flag.

use crate::bus::{Notification, NotificationBus};
use crate::storage::{SharedStorage, keys};

/// Color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

impl Theme {
    /// Persisted name, `"dark"` or `"light"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Parse a persisted value; anything but `"dark"` is light.
    #[must_use]
    pub fn from_stored(value: &str) -> Self {
        if value == "dark" { Self::Dark } else { Self::Light }
    }

    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

/// Theme store over the shared storage capability.
#[derive(Clone)]
pub struct ThemeStore {
    storage: SharedStorage,
    bus: NotificationBus,
}

impl ThemeStore {
    #[must_use]
    pub fn new(storage: SharedStorage, bus: NotificationBus) -> Self {
        Self { storage, bus }
    }

    /// The persisted theme; absent means light.
    #[must_use]
    pub fn load(&self) -> Theme {
        let guard = self
            .storage
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        guard
            .get(keys::THEME)
            .map_or_else(Theme::default, |v| Theme::from_stored(&v))
    }

    /// Persist a theme and publish `themeChanged`.
    pub fn set(&self, theme: Theme) {
        {
            let mut guard = self
                .storage
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            guard.set(keys::THEME, theme.as_str().to_string());
        }
        self.bus.publish(&Notification::ThemeChanged {
            is_dark_mode: theme.is_dark(),
        });
    }

    /// Flip the theme, returning the new value.
    pub fn toggle(&self) -> Theme {
        let next = self.load().toggled();
        self.set(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::Channel;
    use crate::storage::{MemoryStorage, shared};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_default_is_light() {
        let store = ThemeStore::new(shared(MemoryStorage::new()), NotificationBus::new());
        assert_eq!(store.load(), Theme::Light);
    }

    #[test]
    fn test_toggle_persists_and_announces() {
        let bus = NotificationBus::new();
        let store = ThemeStore::new(shared(MemoryStorage::new()), bus.clone());

        let dark_events = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&dark_events);
        let _sub = bus.subscribe(Channel::ThemeChanged, move |n| {
            if matches!(n, Notification::ThemeChanged { is_dark_mode: true }) {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        assert_eq!(store.toggle(), Theme::Dark);
        assert_eq!(store.load(), Theme::Dark);
        assert_eq!(dark_events.load(Ordering::SeqCst), 1);

        assert_eq!(store.toggle(), Theme::Light);
        assert_eq!(store.load(), Theme::Light);
        assert_eq!(dark_events.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unknown_stored_value_reads_as_light() {
        assert_eq!(Theme::from_stored("sepia"), Theme::Light);
        assert_eq!(Theme::from_stored("dark"), Theme::Dark);
    }
}

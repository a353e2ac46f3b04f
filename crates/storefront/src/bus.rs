//! In-process notification bus.
//!
//! A synchronous publish/subscribe channel used to propagate cart-changed
//! and theme-changed signals between otherwise independent components.
//! Unlike the ambient event target it replaces, subscribers hold explicit
//! [`Subscription`] objects: subscribe on mount, drop on teardown.
//!
//! `cartUpdated` carries no payload; subscribers re-query the cart store
//! for current state. A rapid burst of changes therefore collapses to
//! re-reading current state once per handler invocation (at-least-once,
//! last-value-wins).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Named channels on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    CartUpdated,
    ThemeChanged,
}

impl Channel {
    /// Wire name of the channel.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CartUpdated => "cartUpdated",
            Self::ThemeChanged => "themeChanged",
        }
    }
}

/// A published notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The persisted cart changed; re-query the store for current state.
    CartUpdated,
    /// The theme changed.
    ThemeChanged { is_dark_mode: bool },
}

impl Notification {
    /// The channel this notification is delivered on.
    #[must_use]
    pub const fn channel(&self) -> Channel {
        match self {
            Self::CartUpdated => Channel::CartUpdated,
            Self::ThemeChanged { .. } => Channel::ThemeChanged,
        }
    }
}

type Handler = Arc<dyn Fn(&Notification) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: HashMap<Channel, Vec<(u64, Handler)>>,
}

/// Process-wide synchronous publish/subscribe bus.
///
/// Cheaply cloneable; clones share one handler registry.
#[derive(Clone, Default)]
pub struct NotificationBus {
    registry: Arc<Mutex<Registry>>,
}

impl NotificationBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler on a channel.
    ///
    /// The handler stays registered until the returned [`Subscription`] is
    /// dropped.
    #[must_use]
    pub fn subscribe(
        &self,
        channel: Channel,
        handler: impl Fn(&Notification) + Send + Sync + 'static,
    ) -> Subscription {
        let mut registry = self
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let id = registry.next_id;
        registry.next_id += 1;
        registry
            .handlers
            .entry(channel)
            .or_default()
            .push((id, Arc::new(handler)));
        Subscription {
            registry: Arc::downgrade(&self.registry),
            channel,
            id,
        }
    }

    /// Deliver a notification to every live subscriber of its channel,
    /// synchronously, before returning.
    pub fn publish(&self, notification: &Notification) {
        // Snapshot the handlers so they can publish or subscribe without
        // deadlocking on the registry.
        let handlers: Vec<Handler> = {
            let registry = self
                .registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            registry
                .handlers
                .get(&notification.channel())
                .map(|subs| subs.iter().map(|(_, h)| Arc::clone(h)).collect())
                .unwrap_or_default()
        };
        tracing::debug!(
            channel = notification.channel().name(),
            subscribers = handlers.len(),
            "publishing notification"
        );
        for handler in handlers {
            handler(notification);
        }
    }
}

/// Handle for a registered bus handler; dropping it unsubscribes.
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    channel: Channel,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(subs) = registry.handlers.get_mut(&self.channel) {
                subs.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

//! Confirmation gate for destructive cart actions.
//!
//! A generic yes/no interaction: opened with a described action and the
//! name of the thing it targets, it either runs the supplied action on
//! confirm or drops it on dismissal (cancel button, overlay click, or the
//! escape key - all the same dismissal path). Only one interaction may be
//! pending per view, and background scroll is suspended while one is open.

/// The interaction currently awaiting a decision.
pub struct PendingConfirmation {
    /// Human-readable description of the action, e.g. "Remove Item from Cart".
    pub description: String,
    /// Name of the entity the action targets.
    pub target: String,
    action: Box<dyn FnOnce() + Send>,
}

/// One-at-a-time yes/no gate in front of an action.
#[derive(Default)]
pub struct ConfirmationGate {
    pending: Option<PendingConfirmation>,
}

impl ConfirmationGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the gate for an action.
    ///
    /// If an interaction is already pending it is replaced; the previous
    /// action is dropped without running.
    pub fn open(
        &mut self,
        description: impl Into<String>,
        target: impl Into<String>,
        action: impl FnOnce() + Send + 'static,
    ) {
        self.pending = Some(PendingConfirmation {
            description: description.into(),
            target: target.into(),
            action: Box::new(action),
        });
    }

    /// Whether an interaction is awaiting a decision.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    /// Background scroll is suspended exactly while the gate is open.
    #[must_use]
    pub const fn scroll_locked(&self) -> bool {
        self.is_open()
    }

    /// The pending interaction, for rendering.
    #[must_use]
    pub const fn pending(&self) -> Option<&PendingConfirmation> {
        self.pending.as_ref()
    }

    /// Run the pending action and close the gate.
    ///
    /// Returns `true` if an action ran. A confirm on a closed gate is a
    /// no-op.
    pub fn confirm(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                (pending.action)();
                true
            }
            None => false,
        }
    }

    /// Close the gate without running the action.
    ///
    /// Covers cancel, overlay dismissal, and the escape key.
    pub fn dismiss(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter_action(hits: &Arc<AtomicUsize>) -> impl FnOnce() + Send + 'static {
        let hits = Arc::clone(hits);
        move || {
            hits.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_confirm_runs_action_once_and_closes() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut gate = ConfirmationGate::new();
        gate.open("Remove Item from Cart", "Soap", counter_action(&hits));

        assert!(gate.is_open());
        assert!(gate.scroll_locked());
        assert!(gate.confirm());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!gate.is_open());
        assert!(!gate.scroll_locked());

        // A second confirm is a no-op.
        assert!(!gate.confirm());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dismiss_drops_action() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut gate = ConfirmationGate::new();
        gate.open("Remove Item from Cart", "Soap", counter_action(&hits));

        gate.dismiss();
        assert!(!gate.is_open());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_reopen_replaces_pending_action() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let mut gate = ConfirmationGate::new();
        gate.open("Remove Item from Cart", "Soap", counter_action(&first));
        gate.open("Remove Item from Cart", "Sponge", counter_action(&second));

        assert_eq!(gate.pending().map(|p| p.target.as_str()), Some("Sponge"));
        assert!(gate.confirm());
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }
}

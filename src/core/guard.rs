//! Guard predicates for controlling state transitions.
//!
//! Guards are pure boolean functions evaluated right before a queued
//! transition is applied.

use std::fmt;

/// Pure predicate that determines if a transition can be applied.
///
/// The context type is whatever the caller can observe at apply time; for
/// the terminal that is a [`SessionView`](super::SessionView).
///
/// # Example
///
/// ```rust
/// use atm_controller::core::{Guard, SessionView};
///
/// let unlocked = Guard::new(|view: &SessionView| view.unlocked);
///
/// assert!(unlocked.check(&SessionView { present: true, unlocked: true, type_selected: false }));
/// assert!(!unlocked.check(&SessionView::default()));
/// ```
pub struct Guard<C> {
    label: &'static str,
    predicate: Box<dyn Fn(&C) -> bool + Send + Sync>,
}

impl<C> Guard<C> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and thread-safe.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Self::labelled("guard", predicate)
    }

    /// Create a guard with a label that shows up in logs when it blocks.
    pub fn labelled<F>(label: &'static str, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Guard {
            label,
            predicate: Box::new(predicate),
        }
    }

    /// Check if the guard allows the transition for this context.
    pub fn check(&self, context: &C) -> bool {
        (self.predicate)(context)
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl<C> fmt::Debug for Guard<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").field("label", &self.label).finish()
    }
}

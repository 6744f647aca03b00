//! Pending transition requests.

use crate::core::ScreenState;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared queue of requested target states.
///
/// Requests are pushed to the front and drained most-recent-first, like a
/// stack. Clones share the same queue, so the event path and the draining
/// path can each hold one.
///
/// # Example
///
/// ```rust
/// use atm_controller::core::ScreenState;
/// use atm_controller::terminal::TransitionQueue;
///
/// let queue = TransitionQueue::new();
/// queue.request(ScreenState::EnterPin);
/// queue.request(ScreenState::Idle);
///
/// assert_eq!(queue.drain(), vec![ScreenState::Idle, ScreenState::EnterPin]);
/// assert!(queue.is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct TransitionQueue {
    pending: Arc<Mutex<VecDeque<ScreenState>>>,
}

impl TransitionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self, target: ScreenState) {
        self.lock().push_front(target);
    }

    /// Take exactly the requests queued right now, in service order.
    pub fn drain(&self) -> Vec<ScreenState> {
        self.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave the deque half-updated,
    // so a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, VecDeque<ScreenState>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

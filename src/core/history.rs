//! Record of applied screen transitions.
//!
//! Only transitions that were actually applied during a drain are recorded;
//! dropped requests leave no trace here (they are logged instead).

use super::state::ScreenState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single applied transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    /// The state being transitioned from
    pub from: ScreenState,
    /// The state being transitioned to
    pub to: ScreenState,
    /// When the transition was applied
    pub timestamp: DateTime<Utc>,
}

impl StateTransition {
    pub fn now(from: ScreenState, to: ScreenState) -> Self {
        Self {
            from,
            to,
            timestamp: Utc::now(),
        }
    }
}

/// Ordered history of applied transitions.
///
/// Grows with every applied transition until drained with
/// [`StateHistory::take`].
///
/// # Example
///
/// ```rust
/// use atm_controller::core::{ScreenState, StateHistory, StateTransition};
///
/// let mut history = StateHistory::new();
/// history.record(StateTransition::now(ScreenState::Idle, ScreenState::EnterPin));
/// history.record(StateTransition::now(ScreenState::EnterPin, ScreenState::Idle));
///
/// assert_eq!(
///     history.path(),
///     vec![ScreenState::Idle, ScreenState::EnterPin, ScreenState::Idle]
/// );
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: Vec<StateTransition>,
}

impl StateHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, transition: StateTransition) {
        self.transitions.push(transition);
    }

    /// States traversed: the first `from`, then every `to`.
    pub fn path(&self) -> Vec<ScreenState> {
        self.transitions
            .first()
            .map(|first| first.from)
            .into_iter()
            .chain(self.transitions.iter().map(|t| t.to))
            .collect()
    }

    pub fn last(&self) -> Option<&StateTransition> {
        self.transitions.last()
    }

    /// Number of completed visits, i.e. returns to `IDLE`.
    pub fn visits(&self) -> usize {
        self.transitions.iter().filter(|t| t.to.is_idle()).count()
    }

    /// Time between the first and the last applied transition.
    ///
    /// Returns `None` if nothing was recorded.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.first()?, self.transitions.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn transitions(&self) -> &[StateTransition] {
        &self.transitions
    }

    /// Remove and return everything recorded so far, e.g. for audit export.
    pub fn take(&mut self) -> Vec<StateTransition> {
        std::mem::take(&mut self.transitions)
    }
}

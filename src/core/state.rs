//! Screen states of the terminal.
//!
//! The terminal is a cyclic machine: `Idle` is both the initial state and the
//! only resting state, and every session eventually returns to it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The terminal's current step in the user interaction flow.
///
/// # Example
///
/// ```rust
/// use atm_controller::core::ScreenState;
///
/// let state = ScreenState::default();
/// assert!(state.is_idle());
/// assert_eq!(ScreenState::EnterPin.name(), "ENTER_PIN");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScreenState {
    /// Waiting for a card
    #[default]
    Idle,
    /// Card accepted, waiting for the PIN
    EnterPin,
    /// PIN accepted, waiting for an account type
    SelectAccount,
    /// Account type chosen, accepting management actions
    AccountManagement,
}

impl ScreenState {
    /// Every screen state, in flow order.
    pub const ALL: [ScreenState; 4] = [
        ScreenState::Idle,
        ScreenState::EnterPin,
        ScreenState::SelectAccount,
        ScreenState::AccountManagement,
    ];

    /// Get the state's name for display/logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::EnterPin => "ENTER_PIN",
            Self::SelectAccount => "SELECT_ACCOUNT",
            Self::AccountManagement => "ACCOUNT_MANAGEMENT",
        }
    }

    /// Check if this is the resting state.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Check if a card session must be attached while in this state.
    pub fn requires_session(&self) -> bool {
        !self.is_idle()
    }
}

impl fmt::Display for ScreenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

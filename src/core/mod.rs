//! Core screen-state machine types.
//!
//! This module contains the pure part of the terminal:
//! - Screen states via `ScreenState`
//! - Guard predicates and the allowed-transition table
//! - History of applied transitions
//!
//! Nothing here talks to the ledger or owns a session.

mod guard;
mod history;
mod state;
mod transition;

pub use guard::Guard;
pub use history::{StateHistory, StateTransition};
pub use state::ScreenState;
pub use transition::{SessionView, TransitionError, TransitionRule, TransitionTable};

//! ATM Controller: the session state machine of a single ATM terminal.
//!
//! A card holder's visit walks the terminal through four screens:
//!
//! ```text
//! IDLE -> ENTER_PIN -> SELECT_ACCOUNT -> ACCOUNT_MANAGEMENT -> IDLE
//! ```
//!
//! Any failure, and an explicit `Done`, sends the terminal back to `IDLE`
//! and discards the card session.
//!
//! # Core Concepts
//!
//! - **Terminal**: accepts events, queues transition requests, and applies
//!   them when `service()` runs
//! - **Account Session**: lock state, one-shot account type selection and
//!   withdrawal limits for one card
//! - **Ledger Service**: the bank's system of record behind a trait, so
//!   tests and demos inject their own data
//!
//! # Example
//!
//! ```rust
//! use atm_controller::account::{AccountType, CardId, ManagementRequest, Pin};
//! use atm_controller::config::TerminalConfig;
//! use atm_controller::core::ScreenState;
//! use atm_controller::ledger::InMemoryLedger;
//! use atm_controller::terminal::{EventOutcome, Terminal};
//!
//! let card = CardId(1234_1234_1234_1234);
//! let ledger = InMemoryLedger::new(&TerminalConfig::default())
//!     .with_account(card, Pin(1234), 1000, 10_000);
//! let mut atm = Terminal::new(ledger);
//!
//! atm.present_card(card);
//! atm.service();
//! assert_eq!(atm.current_state(), ScreenState::EnterPin);
//!
//! atm.enter_pin(Pin(1234));
//! atm.service();
//! atm.select_account_type(AccountType::Savings);
//! atm.service();
//!
//! let outcome = atm.submit_management_action(ManagementRequest::Withdraw(5000));
//! assert!(outcome.is_rejected()); // savings limit is 1000
//! atm.service();
//! assert_eq!(atm.current_state(), ScreenState::Idle);
//! ```

pub mod account;
pub mod config;
pub mod core;
pub mod error;
pub mod ledger;
pub mod terminal;

// Re-export commonly used types
pub use account::{AccountSession, AccountType, CardId, ManagementRequest, Pin};
pub use config::TerminalConfig;
pub use crate::core::ScreenState;
pub use error::{AtmError, Result};
pub use ledger::{InMemoryLedger, LedgerService};
pub use terminal::{EventOutcome, ServiceTicker, Terminal};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a global fmt subscriber, filtered by `RUST_LOG` and defaulting
/// to `info` for this crate. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("atm_controller=info"));

        if fmt().with_env_filter(filter).try_init().is_err() {
            tracing::debug!("global subscriber already installed");
        }
    });
}

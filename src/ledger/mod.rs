//! Bank-side system of record for PINs, balances and the cash reserve.
//!
//! The terminal owns its ledger and lends it to the active session for the
//! duration of a single call. Implementations fronting a networked backend
//! should bound every call with a timeout and report a timeout as the
//! corresponding failure (`NotFound` on lookups, `CashUnavailable` on
//! disbursement), which collapses the terminal back to `IDLE`.

mod memory;

pub use memory::{InMemoryLedger, LedgerRecord};

use crate::account::{AccountType, Balances, CardId, Pin};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A balance change reported to the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Adjustment {
    Credit { account: AccountType, amount: u64 },
    Debit { account: AccountType, amount: u64 },
}

impl Adjustment {
    pub fn account(&self) -> AccountType {
        match self {
            Self::Credit { account, .. } | Self::Debit { account, .. } => *account,
        }
    }

    pub fn amount(&self) -> u64 {
        match self {
            Self::Credit { amount, .. } | Self::Debit { amount, .. } => *amount,
        }
    }

    /// Signed change to the account balance.
    pub fn delta(&self) -> i128 {
        match self {
            Self::Credit { amount, .. } => i128::from(*amount),
            Self::Debit { amount, .. } => -i128::from(*amount),
        }
    }
}

/// Contract the terminal relies on.
pub trait LedgerService {
    /// Fails with `AtmError::NotFound` for an unknown card.
    fn resolve_pin(&self, card: CardId) -> Result<Pin>;

    /// Fails with `AtmError::NotFound` for an unknown card.
    fn fetch_balances(&self, card: CardId) -> Result<Balances>;

    /// Best-effort notification of a debit or credit.
    fn record_adjustment(&mut self, card: CardId, adjustment: Adjustment);

    fn available_cash(&self) -> u64;

    /// Check the reserve and decrement it in one step.
    ///
    /// Fails with `AtmError::CashUnavailable` when the reserve is short.
    fn disburse(&mut self, amount: u64) -> Result<()>;
}

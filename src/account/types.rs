//! Value types shared by sessions and the ledger.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque key identifying a bank card/account relationship.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u64);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only the last four digits ever reach logs or screens.
        write!(f, "****{:04}", self.0 % 10_000)
    }
}

/// Personal identification number. Never printed.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin(pub u16);

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(****)")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Checking,
    Savings,
}

impl AccountType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Checking => "CHECKING",
            Self::Savings => "SAVINGS",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Snapshot of a card's balances and per-type withdrawal limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    pub checking: u64,
    pub savings: u64,
    pub checking_withdraw_limit: u64,
    pub savings_withdraw_limit: u64,
}

impl Balances {
    pub fn get(&self, account_type: AccountType) -> u64 {
        match account_type {
            AccountType::Checking => self.checking,
            AccountType::Savings => self.savings,
        }
    }

    pub fn get_mut(&mut self, account_type: AccountType) -> &mut u64 {
        match account_type {
            AccountType::Checking => &mut self.checking,
            AccountType::Savings => &mut self.savings,
        }
    }

    pub fn limit(&self, account_type: AccountType) -> u64 {
        match account_type {
            AccountType::Checking => self.checking_withdraw_limit,
            AccountType::Savings => self.savings_withdraw_limit,
        }
    }
}

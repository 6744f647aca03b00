//! One-shot management commands submitted while an account is open.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    Withdraw,
    Deposit,
    Balance,
    Done,
}

/// A management command. Consumed by value when submitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManagementRequest {
    Withdraw(u64),
    Deposit(u64),
    Balance,
    Done,
}

impl ManagementRequest {
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::Withdraw(_) => RequestKind::Withdraw,
            Self::Deposit(_) => RequestKind::Deposit,
            Self::Balance => RequestKind::Balance,
            Self::Done => RequestKind::Done,
        }
    }

    /// Amount carried by the request; `None` for `Balance` and `Done`.
    pub fn amount(&self) -> Option<u64> {
        match self {
            Self::Withdraw(amount) | Self::Deposit(amount) => Some(*amount),
            Self::Balance | Self::Done => None,
        }
    }
}

//! Error taxonomy for card sessions and the terminal.
//!
//! Every variant is recoverable: the terminal reports it and returns to
//! `IDLE`. Messages shown to the card holder never carry internal detail.

use crate::account::CardId;
use crate::config::ConfigError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AtmError>;

/// Operation attempted outside the session's access preconditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateViolation {
    #[error("account is locked")]
    Locked,

    #[error("account type not selected")]
    TypeNotSelected,

    #[error("account type already selected")]
    TypeAlreadySelected,

    #[error("no card session is active")]
    NoSession,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AtmError {
    #[error("Account not found for card {card}")]
    NotFound { card: CardId },

    #[error("Wrong pin")]
    Auth,

    #[error("Session state error: {0}")]
    State(#[from] StateViolation),

    #[error("E12344: Withdraw amount too great, change your settings online")]
    LimitExceeded { requested: u64, limit: u64 },

    #[error("E12343: Insufficient balance!")]
    InsufficientFunds { requested: u64, available: u64 },

    /// Terminal-level refusal; the message is deliberately vague.
    #[error("E12345: Something went wrong! Please try another ATM")]
    CashUnavailable,

    #[error("Invalid amount: {0}")]
    InvalidAmount(u64),

    #[error("Invalid terminal configuration: {}", format_config_errors(.0))]
    Config(Vec<ConfigError>),
}

fn format_config_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl AtmError {
    /// Terminal error code shown on screen, where one exists.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::CashUnavailable => Some("E12345"),
            Self::LimitExceeded { .. } => Some("E12344"),
            Self::InsufficientFunds { .. } => Some("E12343"),
            _ => None,
        }
    }

    /// Failures that a production terminal would answer with a temporary
    /// lockout and an alert. Only logged for now.
    pub fn is_security_relevant(&self) -> bool {
        matches!(
            self,
            Self::Auth | Self::LimitExceeded { .. } | Self::InsufficientFunds { .. }
        )
    }
}

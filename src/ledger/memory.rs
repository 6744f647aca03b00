//! Simulated in-memory ledger.

use super::{Adjustment, LedgerService};
use crate::account::{AccountType, Balances, CardId, Pin};
use crate::config::TerminalConfig;
use crate::error::{AtmError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-card record held by the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub pin: Pin,
    pub checking: u64,
    pub savings: u64,
}

/// Ledger backed by a map, seeded by the caller.
///
/// Withdrawal limits are per account type and come from the terminal
/// configuration, not from the card record.
///
/// # Example
///
/// ```rust
/// use atm_controller::account::{CardId, Pin};
/// use atm_controller::config::TerminalConfig;
/// use atm_controller::ledger::{InMemoryLedger, LedgerService};
///
/// let ledger = InMemoryLedger::new(&TerminalConfig::default())
///     .with_account(CardId(1234), Pin(1234), 1000, 10_000);
///
/// assert_eq!(ledger.resolve_pin(CardId(1234)).unwrap(), Pin(1234));
/// assert_eq!(ledger.available_cash(), 100_000);
/// ```
#[derive(Clone, Debug)]
pub struct InMemoryLedger {
    records: HashMap<CardId, LedgerRecord>,
    checking_withdraw_limit: u64,
    savings_withdraw_limit: u64,
    cash_reserve: u64,
    adjustments: Vec<(CardId, Adjustment)>,
}

impl InMemoryLedger {
    pub fn new(config: &TerminalConfig) -> Self {
        Self {
            records: HashMap::new(),
            checking_withdraw_limit: config.checking_withdraw_limit,
            savings_withdraw_limit: config.savings_withdraw_limit,
            cash_reserve: config.initial_cash_reserve,
            adjustments: Vec::new(),
        }
    }

    pub fn with_account(mut self, card: CardId, pin: Pin, checking: u64, savings: u64) -> Self {
        self.records.insert(
            card,
            LedgerRecord {
                pin,
                checking,
                savings,
            },
        );
        self
    }

    pub fn with_cash_reserve(mut self, amount: u64) -> Self {
        self.cash_reserve = amount;
        self
    }

    pub fn record(&self, card: CardId) -> Option<&LedgerRecord> {
        self.records.get(&card)
    }

    /// Every adjustment received since the last [`take_adjustments`], in
    /// arrival order.
    ///
    /// [`take_adjustments`]: InMemoryLedger::take_adjustments
    pub fn adjustments(&self) -> &[(CardId, Adjustment)] {
        &self.adjustments
    }

    /// Drain the adjustment log. Balances are unaffected.
    pub fn take_adjustments(&mut self) -> Vec<(CardId, Adjustment)> {
        std::mem::take(&mut self.adjustments)
    }

    fn lookup(&self, card: CardId) -> Result<&LedgerRecord> {
        self.records.get(&card).ok_or(AtmError::NotFound { card })
    }
}

impl LedgerService for InMemoryLedger {
    fn resolve_pin(&self, card: CardId) -> Result<Pin> {
        self.lookup(card).map(|r| r.pin)
    }

    fn fetch_balances(&self, card: CardId) -> Result<Balances> {
        let record = self.lookup(card)?;
        Ok(Balances {
            checking: record.checking,
            savings: record.savings,
            checking_withdraw_limit: self.checking_withdraw_limit,
            savings_withdraw_limit: self.savings_withdraw_limit,
        })
    }

    fn record_adjustment(&mut self, card: CardId, adjustment: Adjustment) {
        self.adjustments.push((card, adjustment));

        let Some(record) = self.records.get_mut(&card) else {
            tracing::warn!(%card, ?adjustment, "adjustment for unknown card ignored");
            return;
        };
        let balance = match adjustment.account() {
            AccountType::Checking => &mut record.checking,
            AccountType::Savings => &mut record.savings,
        };
        *balance = match adjustment {
            Adjustment::Credit { amount, .. } => balance.saturating_add(amount),
            Adjustment::Debit { amount, .. } => balance.saturating_sub(amount),
        };
        tracing::debug!(%card, ?adjustment, "adjustment recorded");
    }

    fn available_cash(&self) -> u64 {
        self.cash_reserve
    }

    fn disburse(&mut self, amount: u64) -> Result<()> {
        if amount > self.cash_reserve {
            tracing::warn!(amount, reserve = self.cash_reserve, "cash can't be disbursed");
            return Err(AtmError::CashUnavailable);
        }
        self.cash_reserve -= amount;
        tracing::debug!(amount, reserve = self.cash_reserve, "cash disbursed");
        Ok(())
    }
}

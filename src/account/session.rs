//! Per-card, per-visit access context.

use super::types::{AccountType, Balances, CardId, Pin};
use crate::error::{AtmError, Result, StateViolation};
use crate::ledger::{Adjustment, LedgerService};
use uuid::Uuid;

/// Access state for one card during one visit to the terminal.
///
/// The PIN and a balance snapshot are fetched once, when the session is
/// opened. Until the session is unlocked and an account type is selected no
/// balance can be read or changed.
#[derive(Debug)]
pub struct AccountSession {
    id: Uuid,
    card: CardId,
    pin: Pin,
    locked: bool,
    selected: Option<AccountType>,
    balances: Balances,
}

impl AccountSession {
    /// Open a session for `card`, failing with `NotFound` if the ledger
    /// cannot resolve it.
    pub fn open<L: LedgerService>(ledger: &L, card: CardId) -> Result<Self> {
        let pin = ledger.resolve_pin(card)?;
        let balances = ledger.fetch_balances(card)?;
        let id = Uuid::new_v4();
        tracing::debug!(session = %id, %card, "session opened");

        Ok(Self {
            id,
            card,
            pin,
            locked: true,
            selected: None,
            balances,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn card(&self) -> CardId {
        self.card
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn selected_type(&self) -> Option<AccountType> {
        self.selected
    }

    /// Unlock with the card's PIN. There is no retry counter; every wrong
    /// attempt fails the same way.
    pub fn unlock(&mut self, pin: Pin) -> Result<()> {
        if pin != self.pin {
            return Err(AtmError::Auth);
        }
        self.locked = false;
        Ok(())
    }

    /// Select the account type. One-shot: a second call always fails.
    pub fn select_type(&mut self, account_type: AccountType) -> Result<()> {
        if self.locked {
            return Err(StateViolation::Locked.into());
        }
        if self.selected.is_some() {
            return Err(StateViolation::TypeAlreadySelected.into());
        }
        self.selected = Some(account_type);
        Ok(())
    }

    pub fn balance(&self) -> Result<u64> {
        let account_type = self.accessible_type()?;
        Ok(self.balances.get(account_type))
    }

    pub fn deposit<L: LedgerService>(&mut self, ledger: &mut L, amount: u64) -> Result<()> {
        let account = self.accessible_type()?;
        let balance = self.balances.get_mut(account);
        *balance = balance
            .checked_add(amount)
            .ok_or(AtmError::InvalidAmount(amount))?;

        ledger.record_adjustment(self.card, Adjustment::Credit { account, amount });
        Ok(())
    }

    /// Withdraw cash from the selected account.
    ///
    /// Checks run in a fixed order and the first failure wins: terminal
    /// reserve, per-type limit, then balance.
    pub fn withdraw<L: LedgerService>(&mut self, ledger: &mut L, amount: u64) -> Result<()> {
        let account = self.accessible_type()?;

        if amount > ledger.available_cash() {
            return Err(AtmError::CashUnavailable);
        }
        let limit = self.balances.limit(account);
        if amount > limit {
            return Err(AtmError::LimitExceeded {
                requested: amount,
                limit,
            });
        }
        let available = self.balances.get(account);
        if amount > available {
            return Err(AtmError::InsufficientFunds {
                requested: amount,
                available,
            });
        }

        *self.balances.get_mut(account) -= amount;
        ledger.record_adjustment(self.card, Adjustment::Debit { account, amount });

        if let Err(err) = ledger.disburse(amount) {
            *self.balances.get_mut(account) += amount;
            ledger.record_adjustment(self.card, Adjustment::Credit { account, amount });
            tracing::warn!(session = %self.id, amount, "disbursement refused, debit reversed");
            return Err(err);
        }
        Ok(())
    }

    fn accessible_type(&self) -> Result<AccountType> {
        if self.locked {
            return Err(StateViolation::Locked.into());
        }
        self.selected
            .ok_or(AtmError::State(StateViolation::TypeNotSelected))
    }
}

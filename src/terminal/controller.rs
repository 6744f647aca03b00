//! The terminal controller: screen state, the active session and event
//! handling.

use super::queue::TransitionQueue;
use crate::account::{AccountSession, AccountType, CardId, ManagementRequest, Pin};
use crate::core::{ScreenState, SessionView, StateHistory, StateTransition, TransitionTable};
use crate::error::{AtmError, StateViolation};
use crate::ledger::LedgerService;

/// What an event handler did with an event.
///
/// Handlers never fail outward. A rejected event has already queued the
/// return to `IDLE` by the time this value is returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    /// Event applied; a transition may be queued
    Accepted,
    /// Balance of the selected account, for display
    Balance(u64),
    /// Event failed; the error is for display
    Rejected(AtmError),
    /// Event arrived in the wrong screen state
    OutOfSequence,
}

impl EventOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    pub fn error(&self) -> Option<&AtmError> {
        match self {
            Self::Rejected(err) => Some(err),
            _ => None,
        }
    }
}

/// A single ATM terminal.
///
/// Event handlers only *request* transitions; nothing changes screen state
/// until [`service`](Terminal::service) drains the requests. Confirm with
/// [`current_state`](Terminal::current_state) rather than assuming.
///
/// # Example
///
/// ```rust
/// use atm_controller::account::{AccountType, CardId, ManagementRequest, Pin};
/// use atm_controller::config::TerminalConfig;
/// use atm_controller::core::ScreenState;
/// use atm_controller::ledger::InMemoryLedger;
/// use atm_controller::terminal::{EventOutcome, Terminal};
///
/// let card = CardId(1234);
/// let ledger = InMemoryLedger::new(&TerminalConfig::default())
///     .with_account(card, Pin(1234), 1000, 10_000);
/// let mut atm = Terminal::new(ledger);
///
/// atm.present_card(card);
/// atm.service();
/// atm.enter_pin(Pin(1234));
/// atm.service();
/// atm.select_account_type(AccountType::Checking);
/// atm.service();
/// assert_eq!(atm.current_state(), ScreenState::AccountManagement);
///
/// assert_eq!(
///     atm.submit_management_action(ManagementRequest::Balance),
///     EventOutcome::Balance(1000)
/// );
/// ```
#[derive(Debug)]
pub struct Terminal<L: LedgerService> {
    state: ScreenState,
    session: Option<AccountSession>,
    ledger: L,
    table: TransitionTable,
    pending: TransitionQueue,
    history: StateHistory,
}

impl<L: LedgerService> Terminal<L> {
    pub fn new(ledger: L) -> Self {
        Self::with_table(ledger, TransitionTable::standard())
    }

    pub fn with_table(ledger: L, table: TransitionTable) -> Self {
        Self {
            state: ScreenState::Idle,
            session: None,
            ledger,
            table,
            pending: TransitionQueue::new(),
            history: StateHistory::new(),
        }
    }

    pub fn current_state(&self) -> ScreenState {
        self.state
    }

    pub fn session(&self) -> Option<&AccountSession> {
        self.session.as_ref()
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    /// Export and clear the transition history.
    pub fn take_history(&mut self) -> Vec<StateTransition> {
        self.history.take()
    }

    /// Handle onto the pending requests; clones share the same queue.
    pub fn requests(&self) -> TransitionQueue {
        self.pending.clone()
    }

    /// A card was inserted.
    pub fn present_card(&mut self, card: CardId) -> EventOutcome {
        if !self.expect_state(ScreenState::Idle, "present_card") {
            return EventOutcome::OutOfSequence;
        }

        match AccountSession::open(&self.ledger, card) {
            Ok(session) => {
                tracing::info!(session = %session.id(), %card, "card accepted");
                self.session = Some(session);
                self.pending.request(ScreenState::EnterPin);
                EventOutcome::Accepted
            }
            Err(err) => {
                // Still idle: nothing to collapse, no session was created.
                tracing::warn!(%card, error = %err, "card rejected");
                EventOutcome::Rejected(err)
            }
        }
    }

    pub fn enter_pin(&mut self, pin: Pin) -> EventOutcome {
        if !self.expect_state(ScreenState::EnterPin, "enter_pin") {
            return EventOutcome::OutOfSequence;
        }

        let result = self.with_session(|session, _| session.unlock(pin));
        self.settle(result.map(|()| ScreenState::SelectAccount), "enter_pin")
    }

    pub fn select_account_type(&mut self, account_type: AccountType) -> EventOutcome {
        if !self.expect_state(ScreenState::SelectAccount, "select_account_type") {
            return EventOutcome::OutOfSequence;
        }

        let result = self.with_session(|session, _| session.select_type(account_type));
        self.settle(
            result.map(|()| ScreenState::AccountManagement),
            "select_account_type",
        )
    }

    pub fn submit_management_action(&mut self, request: ManagementRequest) -> EventOutcome {
        if !self.expect_state(ScreenState::AccountManagement, "submit_management_action") {
            return EventOutcome::OutOfSequence;
        }

        let result = match request {
            ManagementRequest::Done => {
                self.pending.request(ScreenState::Idle);
                return EventOutcome::Accepted;
            }
            ManagementRequest::Balance => self
                .with_session(|session, _| session.balance())
                .map(EventOutcome::Balance),
            ManagementRequest::Deposit(amount) => self
                .with_session(|session, ledger| session.deposit(ledger, amount))
                .map(|()| EventOutcome::Accepted),
            ManagementRequest::Withdraw(amount) => self
                .with_session(|session, ledger| session.withdraw(ledger, amount))
                .map(|()| EventOutcome::Accepted),
        };

        match result {
            Ok(outcome) => {
                tracing::debug!(kind = ?request.kind(), "management action completed");
                outcome
            }
            Err(err) => self.reject(err, "submit_management_action"),
        }
    }

    /// Drain and apply the requests queued so far, most recent first.
    ///
    /// Requests the table rejects are dropped and logged; they never change
    /// the screen state. Calling this with nothing queued is a no-op.
    pub fn service(&mut self) {
        for target in self.pending.drain() {
            let from = self.state;
            match self.table.check(from, target, &self.session_view()) {
                Ok(()) if target.requires_session() && self.session.is_none() => {
                    tracing::warn!(%from, to = %target, "transition dropped, no session attached");
                }
                Ok(()) => self.apply(target),
                Err(err) => tracing::warn!(%from, to = %target, error = %err, "transition dropped"),
            }
        }
    }

    fn apply(&mut self, target: ScreenState) {
        let from = self.state;
        if target.is_idle() {
            if let Some(session) = self.session.take() {
                tracing::debug!(session = %session.id(), "session discarded");
            }
        }
        self.state = target;
        self.history.record(StateTransition::now(from, target));
        tracing::info!(%from, to = %target, "transition applied");
    }

    fn session_view(&self) -> SessionView {
        match &self.session {
            Some(session) => SessionView {
                present: true,
                unlocked: !session.is_locked(),
                type_selected: session.selected_type().is_some(),
            },
            None => SessionView::default(),
        }
    }

    /// Queue a return to idle when the event does not belong to the current
    /// screen.
    fn expect_state(&self, expected: ScreenState, event: &'static str) -> bool {
        if self.state == expected {
            return true;
        }
        tracing::warn!(event, state = %self.state, "event out of sequence");
        self.pending.request(ScreenState::Idle);
        false
    }

    fn with_session<T, F>(&mut self, op: F) -> Result<T, AtmError>
    where
        F: FnOnce(&mut AccountSession, &mut L) -> Result<T, AtmError>,
    {
        let session = self
            .session
            .as_mut()
            .ok_or(AtmError::State(StateViolation::NoSession))?;
        op(session, &mut self.ledger)
    }

    fn settle(
        &mut self,
        result: Result<ScreenState, AtmError>,
        event: &'static str,
    ) -> EventOutcome {
        match result {
            Ok(next) => {
                self.pending.request(next);
                EventOutcome::Accepted
            }
            Err(err) => self.reject(err, event),
        }
    }

    fn reject(&mut self, err: AtmError, event: &'static str) -> EventOutcome {
        // Lockout and alerting for security-relevant failures hook in here.
        if err.is_security_relevant() {
            tracing::warn!(event, security = true, error = %err, "session failure");
        } else {
            tracing::warn!(event, error = %err, "session failure");
        }
        self.pending.request(ScreenState::Idle);
        EventOutcome::Rejected(err)
    }
}

//! End-to-end card visits against the in-memory ledger.

use atm_controller::account::{AccountType, CardId, ManagementRequest, Pin};
use atm_controller::config::TerminalConfig;
use atm_controller::core::ScreenState;
use atm_controller::ledger::{InMemoryLedger, LedgerService};
use atm_controller::terminal::{EventOutcome, ServiceTicker, Terminal};
use atm_controller::AtmError;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const CARD_X: CardId = CardId(1234_1234_1234_1234);
const PIN_X: Pin = Pin(1234);
const CARD_Y: CardId = CardId(2345_2345_2345_2345);
const PIN_Y: Pin = Pin(2345);

fn ledger() -> InMemoryLedger {
    InMemoryLedger::new(&TerminalConfig::default())
        .with_account(CARD_X, PIN_X, 1000, 10_000)
        .with_account(CARD_Y, PIN_Y, 99_999, 9999)
}

#[test]
fn deposit_then_balance_then_done() {
    let mut atm = Terminal::new(ledger());
    let initial = atm
        .ledger()
        .fetch_balances(CARD_X)
        .map(|b| b.checking)
        .unwrap();

    atm.present_card(CARD_X);
    atm.service();
    assert_eq!(atm.current_state(), ScreenState::EnterPin);

    atm.enter_pin(PIN_X);
    atm.service();
    assert_eq!(atm.current_state(), ScreenState::SelectAccount);

    atm.select_account_type(AccountType::Checking);
    atm.service();
    assert_eq!(atm.current_state(), ScreenState::AccountManagement);

    assert_eq!(
        atm.submit_management_action(ManagementRequest::Deposit(100)),
        EventOutcome::Accepted
    );
    assert_eq!(
        atm.submit_management_action(ManagementRequest::Balance),
        EventOutcome::Balance(initial + 100)
    );

    atm.submit_management_action(ManagementRequest::Done);
    atm.service();
    assert_eq!(atm.current_state(), ScreenState::Idle);
    assert!(atm.session().is_none());
}

#[test]
fn withdraw_beyond_balance_collapses_to_idle() {
    let mut atm = Terminal::new(ledger());
    atm.present_card(CARD_X);
    atm.service();
    atm.enter_pin(PIN_X);
    atm.service();
    atm.select_account_type(AccountType::Checking);
    atm.service();

    let outcome = atm.submit_management_action(ManagementRequest::Withdraw(2000));
    assert_eq!(
        outcome,
        EventOutcome::Rejected(AtmError::InsufficientFunds {
            requested: 2000,
            available: 1000
        })
    );
    assert_eq!(atm.current_state(), ScreenState::AccountManagement);

    atm.service();
    assert_eq!(atm.current_state(), ScreenState::Idle);
    assert_eq!(atm.ledger().available_cash(), 100_000);
}

#[test]
fn card_during_pin_entry_discards_session() {
    let mut atm = Terminal::new(ledger());
    atm.present_card(CARD_X);
    atm.service();
    assert_eq!(atm.current_state(), ScreenState::EnterPin);

    assert_eq!(atm.present_card(CARD_Y), EventOutcome::OutOfSequence);
    atm.service();
    assert_eq!(atm.current_state(), ScreenState::Idle);
    assert!(atm.session().is_none());

    // The terminal is re-enterable after the collapse.
    atm.present_card(CARD_Y);
    atm.service();
    assert_eq!(atm.session().map(|s| s.card()), Some(CARD_Y));
}

#[test]
fn second_visit_sees_ledger_updates_from_first() {
    let mut atm = Terminal::new(ledger());
    for (amount, expected) in [(300, 700), (200, 500)] {
        atm.present_card(CARD_X);
        atm.service();
        atm.enter_pin(PIN_X);
        atm.service();
        atm.select_account_type(AccountType::Checking);
        atm.service();

        atm.submit_management_action(ManagementRequest::Withdraw(amount));
        assert_eq!(
            atm.submit_management_action(ManagementRequest::Balance),
            EventOutcome::Balance(expected)
        );
        atm.submit_management_action(ManagementRequest::Done);
        atm.service();
    }

    assert_eq!(atm.history().visits(), 2);
    assert_eq!(atm.ledger().available_cash(), 100_000 - 500);
}

#[test]
fn ticker_drives_a_full_visit() {
    let atm = Arc::new(Mutex::new(Terminal::new(ledger())));
    let ticker = ServiceTicker::spawn(Arc::clone(&atm), Duration::from_millis(5));

    let wait_for = |state: ScreenState| {
        let deadline = Instant::now() + Duration::from_secs(2);
        while atm.lock().unwrap().current_state() != state {
            assert!(Instant::now() < deadline, "timed out waiting for {state}");
            std::thread::sleep(Duration::from_millis(5));
        }
    };

    atm.lock().unwrap().present_card(CARD_Y);
    wait_for(ScreenState::EnterPin);
    atm.lock().unwrap().enter_pin(PIN_Y);
    wait_for(ScreenState::SelectAccount);
    atm.lock().unwrap().select_account_type(AccountType::Savings);
    wait_for(ScreenState::AccountManagement);

    let balance = atm
        .lock()
        .unwrap()
        .submit_management_action(ManagementRequest::Balance);
    assert_eq!(balance, EventOutcome::Balance(9999));

    atm.lock()
        .unwrap()
        .submit_management_action(ManagementRequest::Done);
    wait_for(ScreenState::Idle);

    ticker.stop();
}

type Event = fn(&mut Terminal<InMemoryLedger>) -> EventOutcome;

fn terminal_at(state: ScreenState) -> Terminal<InMemoryLedger> {
    let mut atm = Terminal::new(ledger());
    atm.present_card(CARD_X);
    atm.service();
    if state != ScreenState::EnterPin {
        atm.enter_pin(PIN_X);
        atm.service();
    }
    if state == ScreenState::AccountManagement {
        atm.select_account_type(AccountType::Checking);
        atm.service();
    }
    assert_eq!(atm.current_state(), state);
    atm
}

#[test]
fn every_wrong_event_collapses_to_idle() {
    use ScreenState::*;

    let card: (&str, Event) = ("present_card", |t| t.present_card(CARD_X));
    let pin: (&str, Event) = ("enter_pin", |t| t.enter_pin(PIN_X));
    let select: (&str, Event) = ("select_account_type", |t| {
        t.select_account_type(AccountType::Savings)
    });
    let actions: [(&str, Event); 4] = [
        ("balance", |t| {
            t.submit_management_action(ManagementRequest::Balance)
        }),
        ("deposit", |t| {
            t.submit_management_action(ManagementRequest::Deposit(10))
        }),
        ("withdraw", |t| {
            t.submit_management_action(ManagementRequest::Withdraw(10))
        }),
        ("done", |t| t.submit_management_action(ManagementRequest::Done)),
    ];

    let mut cases: Vec<(ScreenState, (&str, Event))> = vec![
        (EnterPin, card),
        (EnterPin, select),
        (SelectAccount, card),
        (SelectAccount, pin),
        (AccountManagement, card),
        (AccountManagement, pin),
        (AccountManagement, select),
    ];
    for action in actions {
        cases.push((EnterPin, action));
        cases.push((SelectAccount, action));
    }

    for (state, (name, event)) in cases {
        let mut atm = terminal_at(state);
        let before = atm.ledger().record(CARD_X).map(|r| r.checking);

        assert_eq!(event(&mut atm), EventOutcome::OutOfSequence, "{name} in {state}");
        atm.service();

        assert_eq!(atm.current_state(), Idle, "{name} in {state}");
        assert!(atm.session().is_none(), "{name} in {state}");
        assert_eq!(atm.ledger().record(CARD_X).map(|r| r.checking), before);
    }
}

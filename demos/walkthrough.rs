//! Walkthrough
//!
//! A scripted visit to a terminal serviced by a background ticker:
//! card, PIN, checking account, balance/deposit/withdraw, done.
//!
//! Run with: RUST_LOG=atm_controller=debug cargo run --example walkthrough

use atm_controller::account::{AccountType, CardId, ManagementRequest, Pin};
use atm_controller::config::TerminalConfig;
use atm_controller::ledger::InMemoryLedger;
use atm_controller::terminal::{EventOutcome, ServiceTicker, Terminal};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

const PAUSE: Duration = Duration::from_millis(500);

fn main() -> atm_controller::Result<()> {
    atm_controller::init_tracing();

    let config = TerminalConfig::from_json(r#"{"service_hz": 5}"#)?;
    let card = CardId(1234_1234_1234_1234);
    let ledger = InMemoryLedger::new(&config)
        .with_account(card, Pin(1234), 1000, 10_000)
        .with_account(CardId(2345_2345_2345_2345), Pin(2345), 99_999, 9999);

    let atm = Arc::new(Mutex::new(Terminal::new(ledger)));
    let ticker = ServiceTicker::spawn(Arc::clone(&atm), config.service_interval());

    let step = |label: &str, event: &dyn Fn(&mut Terminal<InMemoryLedger>) -> EventOutcome| {
        let outcome = match atm.lock() {
            Ok(mut terminal) => event(&mut *terminal),
            Err(_) => return,
        };
        match outcome {
            EventOutcome::Balance(amount) => println!("  {label}: BALANCE [${amount}]"),
            EventOutcome::Rejected(err) => println!("  {label}: {err}"),
            other => println!("  {label}: {other:?}"),
        }
        thread::sleep(PAUSE);
        if let Ok(terminal) = atm.lock() {
            println!("Current State: {}", terminal.current_state());
        }
    };

    println!("=== ATM Walkthrough ===\n");
    step("insert card", &|t| t.present_card(card));
    step("enter pin", &|t| t.enter_pin(Pin(1234)));
    step("select checking", &|t| {
        t.select_account_type(AccountType::Checking)
    });
    step("balance", &|t| {
        t.submit_management_action(ManagementRequest::Balance)
    });
    step("deposit 100", &|t| {
        t.submit_management_action(ManagementRequest::Deposit(100))
    });
    step("balance", &|t| {
        t.submit_management_action(ManagementRequest::Balance)
    });
    step("withdraw 150", &|t| {
        t.submit_management_action(ManagementRequest::Withdraw(150))
    });
    step("balance", &|t| {
        t.submit_management_action(ManagementRequest::Balance)
    });
    step("done", &|t| t.submit_management_action(ManagementRequest::Done));

    ticker.stop();
    Ok(())
}

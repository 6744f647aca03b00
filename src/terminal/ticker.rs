//! Background thread that services a shared terminal at a fixed cadence.

use super::controller::Terminal;
use crate::ledger::LedgerService;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub type SharedTerminal<L> = Arc<Mutex<Terminal<L>>>;

/// Calls [`Terminal::service`] every `interval` until stopped or dropped.
///
/// The foreground caller issues events through the same mutex, so an event
/// and a drain never interleave.
pub struct ServiceTicker {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ServiceTicker {
    pub fn spawn<L>(terminal: SharedTerminal<L>, interval: Duration) -> Self
    where
        L: LedgerService + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let handle = thread::spawn(move || {
            tracing::debug!(?interval, "service ticker started");
            while flag.load(Ordering::Acquire) {
                terminal
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .service();
                thread::sleep(interval);
            }
            tracing::debug!("service ticker stopped");
        });

        Self {
            running,
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop the ticker and wait for its thread to finish.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("service ticker thread panicked");
            }
        }
    }
}

impl Drop for ServiceTicker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

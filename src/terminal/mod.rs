//! Terminal controller and the machinery that drives it.
//!
//! - `Terminal`: validates events, owns the active session, applies queued
//!   transitions in `service()`
//! - `TransitionQueue`: requests shared between the event and drain paths
//! - `ServiceTicker`: background cadence for `service()`

mod controller;
mod queue;
mod ticker;

pub use controller::{EventOutcome, Terminal};
pub use queue::TransitionQueue;
pub use ticker::{ServiceTicker, SharedTerminal};

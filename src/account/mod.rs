//! Card sessions and the values they work with.

mod request;
mod session;
mod types;

pub use request::{ManagementRequest, RequestKind};
pub use session::AccountSession;
pub use types::{AccountType, Balances, CardId, Pin};

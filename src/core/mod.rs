pub mod ledger_manager;
pub mod services;
pub mod time;
pub mod validation;

pub use ledger_manager::{LedgerManager, OpenOptions};
pub use time::{Clock, FixedClock, SystemClock};

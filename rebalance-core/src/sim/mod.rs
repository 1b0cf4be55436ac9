//! In-memory venue and ledger used by the backtest driver, the CLI and tests.

pub mod ledger;
pub mod venue;

pub use ledger::{Holding, SimLedger};
pub use venue::{Quote, SimVenue};

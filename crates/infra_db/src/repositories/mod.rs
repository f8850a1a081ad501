//! Repository implementations over the PostgreSQL store

pub mod chart;
pub mod ledger;

pub use chart::ChartRepository;
pub use ledger::{AccountMovement, LedgerRepository};

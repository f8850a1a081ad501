//! Shared test utilities for the ledger workspace
//!
//! - [`builders`]: realistic domain fixtures (named clients, numbered loans)
//! - [`assertions`]: ledger-specific assertion helpers
//! - [`database`]: PostgreSQL testcontainer management (requires Docker)

pub mod assertions;
pub mod builders;
pub mod database;

use once_cell::sync::Lazy;

use domain_ledger::ChartOfAccounts;

/// A pre-built standard chart of accounts, cloned by tests that only read it
pub static STANDARD_CHART: Lazy<ChartOfAccounts> = Lazy::new(ChartOfAccounts::standard);

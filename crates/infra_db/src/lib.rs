//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the microfinance ledger, implemented with
//! SQLx over the repository pattern: concrete repository structs own a
//! connection pool handle and hide the SQL from the domain layer.
//!
//! Journal persistence is atomic - the entry header and all lines commit
//! in one transaction, with the balance invariant re-verified at this
//! layer - and the posted→reversed transition is a compare-and-swap on the
//! status column, so concurrent reversals cannot double-apply.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, DatabaseConfig, LedgerRepository};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/ledger")).await?;
//! let repo = LedgerRepository::new(pool);
//! repo.insert_entry(&entry).await?;
//! ```

pub mod error;
pub mod pool;
pub mod repositories;

pub use error::DatabaseError;
pub use pool::{create_pool, run_migrations, DatabaseConfig, DatabasePool, LedgerSettings};
pub use repositories::{AccountMovement, ChartRepository, LedgerRepository};

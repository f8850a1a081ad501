//! Chart-of-accounts initialization command
//!
//! Runs the schema migrations and seeds the standard microfinance chart of
//! accounts. Safe to re-run: existing accounts are left untouched.
//!
//! ```text
//! LEDGER_DATABASE_URL=postgres://localhost/ledger cargo run --bin init_chart
//! ```

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use infra_db::{create_pool, run_migrations, ChartRepository, LedgerSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = LedgerSettings::from_env().context("loading LEDGER_* settings")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.log_level.clone())),
        )
        .init();

    let pool = create_pool(settings.pool_config())
        .await
        .context("connecting to the ledger database")?;

    run_migrations(&pool).await.context("running migrations")?;

    let chart = ChartRepository::new(pool);
    let created = chart
        .seed_standard_chart()
        .await
        .context("seeding the standard chart of accounts")?;

    info!(created, "chart of accounts initialized");
    Ok(())
}

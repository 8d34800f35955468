mod budget;
mod config;
mod db;
mod error;
mod fx;
mod logging;
mod models;
mod money;
mod report;
mod run;
mod ui;

use anyhow::Result;

use budget::{AlertPolicy, BudgetStore, MemoryStore, SnapshotStore};
use config::Settings;

const DB_FILE: &str = "cashflow.db";

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let settings = Settings::load()?;
    let data_dir = settings.data_dir()?;
    logging::init(&data_dir, &settings.log_level)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), data_dir = %data_dir.display(), "starting");

    let mut store = BudgetStore::open(
        open_storage(&data_dir.join(DB_FILE)),
        &settings.storage_key,
        AlertPolicy::new(settings.low_balance_percent),
    );

    match args.len() {
        1 => run::as_tui(&mut store, &settings),
        2.. => run::as_cli(&args, &mut store, &settings),
        _ => {
            eprintln!("Usage: cashflow [command]");
            Ok(())
        }
    }
}

/// SQLite when it opens; otherwise an in-memory store so the session still
/// works, just without durability.
fn open_storage(path: &std::path::Path) -> Box<dyn SnapshotStore> {
    match db::Database::open(path) {
        Ok(db) => Box::new(db),
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), path = %path.display(), "database unavailable, changes will not persist");
            eprintln!("Warning: could not open {} ({e:#}); changes will not be saved", path.display());
            Box::new(MemoryStore::default())
        }
    }
}

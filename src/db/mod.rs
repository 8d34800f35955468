mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::budget::SnapshotStore;

/// SQLite-backed key-value store. The budget lives in a single row.
pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Failed to prepare database schema")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Create the tables if needed and stamp the schema version on a fresh
    /// file. A database stamped by a newer release is refused.
    fn migrate(&mut self) -> Result<()> {
        self.conn.execute_batch(schema::SCHEMA)?;

        let stamped: Option<i32> = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        match stamped {
            None => {
                self.conn.execute(
                    "INSERT INTO schema_version (version) VALUES (?1)",
                    params![schema::CURRENT_VERSION],
                )?;
            }
            Some(version) if version > schema::CURRENT_VERSION => anyhow::bail!(
                "database schema version {version} is newer than this build supports ({})",
                schema::CURRENT_VERSION
            ),
            Some(_) => {}
        }
        Ok(())
    }

    // ── Key-value records ─────────────────────────────────────

    pub(crate) fn put(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub(crate) fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?)
    }
}

impl SnapshotStore for Database {
    fn write(&mut self, key: &str, payload: &str) -> Result<()> {
        self.put(key, payload)
            .with_context(|| format!("Failed to save '{key}'"))
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        self.get(key)
            .with_context(|| format!("Failed to read '{key}'"))
    }
}

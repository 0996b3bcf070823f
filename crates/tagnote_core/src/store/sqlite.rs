//! SQLite-backed durable medium.
//!
//! # Responsibility
//! - Open file or in-memory databases holding the `kv_entries` table.
//! - Map `read`/`write` onto single-row select and upsert.
//!
//! # Invariants
//! - `PRAGMA user_version` is 0 (fresh) or `KV_SCHEMA_VERSION`.
//! - A database at `KV_SCHEMA_VERSION` must already contain `kv_entries`.
//! - No entry is read or written before the bootstrap succeeds.

use crate::store::medium::{DurableMedium, MediumError, MediumResult};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{Duration, Instant};

/// `user_version` written once `kv_entries` exists.
pub const KV_SCHEMA_VERSION: u32 = 1;

const KV_ENTRIES_SQL: &str = include_str!("kv_entries.sql");

/// Medium backed by the `kv_entries` table of a SQLite database.
pub struct SqliteMedium {
    conn: Connection,
}

impl SqliteMedium {
    /// Opens (or creates) a database file and bootstraps `kv_entries`.
    ///
    /// # Side effects
    /// - Creates the file when missing.
    /// - Emits `medium_open` logging events with duration and status.
    pub fn open(path: impl AsRef<Path>) -> MediumResult<Self> {
        open_with("file", || Connection::open(path))
    }

    pub fn open_in_memory() -> MediumResult<Self> {
        open_with("memory", Connection::open_in_memory)
    }

    /// Current `PRAGMA user_version` of the underlying database.
    pub fn schema_version(&self) -> MediumResult<u32> {
        user_version(&self.conn)
    }
}

impl DurableMedium for SqliteMedium {
    fn read(&self, key: &str) -> MediumResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn write(&self, key: &str, payload: &str) -> MediumResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, payload],
        )?;
        Ok(())
    }
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> MediumResult<SqliteMedium> {
    let started_at = Instant::now();
    info!("event=medium_open module=store status=start mode={mode}");

    let result = connect()
        .map_err(MediumError::from)
        .and_then(|mut conn| bootstrap(&mut conn).map(|()| conn));

    match result {
        Ok(conn) => {
            info!(
                "event=medium_open module=store status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(SqliteMedium { conn })
        }
        Err(err) => {
            error!(
                "event=medium_open module=store status=error mode={mode} duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap(conn: &mut Connection) -> MediumResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;

    match user_version(conn)? {
        0 => {
            let tx = conn.transaction()?;
            tx.execute_batch(KV_ENTRIES_SQL)?;
            tx.execute_batch(&format!("PRAGMA user_version = {KV_SCHEMA_VERSION};"))?;
            tx.commit()?;
            Ok(())
        }
        KV_SCHEMA_VERSION if has_kv_table(conn)? => Ok(()),
        KV_SCHEMA_VERSION => Err(MediumError::MissingKvTable),
        newer => Err(MediumError::UnsupportedSchemaVersion {
            db_version: newer,
            latest_supported: KV_SCHEMA_VERSION,
        }),
    }
}

fn user_version(conn: &Connection) -> MediumResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn has_kv_table(conn: &Connection) -> MediumResult<bool> {
    let exists = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_entries'
        );",
        [],
        |row| row.get::<_, bool>(0),
    )?;
    Ok(exists)
}

//! Connection bootstrap for the roster database.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON` and a busy timeout.
//! - Returned connections have every embedded migration applied.

use super::migrations::apply_migrations;
use super::{DbError, DbResult, OpenMode};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const MEMORY_TARGET: &str = ":memory:";

/// Opens (or creates) a roster database file and migrates it.
///
/// # Errors
/// - [`DbError::Open`] carrying the path when the file cannot be opened.
/// - [`DbError::Migration`] / [`DbError::SchemaTooNew`] from migration.
///
/// # Side effects
/// - Emits `db_open` events with `mode=file`, duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    open_with(OpenMode::File, &path.display().to_string(), || {
        Connection::open(path)
    })
}

/// Opens a private in-memory roster database and migrates it.
///
/// Used by tests and throwaway tooling; data is lost when the connection drops.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with(OpenMode::Memory, MEMORY_TARGET, Connection::open_in_memory)
}

fn open_with<F>(mode: OpenMode, target: &str, connect: F) -> DbResult<Connection>
where
    F: FnOnce() -> rusqlite::Result<Connection>,
{
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let result = connect()
        .and_then(|conn| configure_connection(&conn).map(|()| conn))
        .map_err(|source| DbError::Open {
            mode,
            target: target.to_string(),
            source,
        })
        .and_then(|mut conn| apply_migrations(&mut conn).map(|()| conn));

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code={} error={err}",
            started_at.elapsed().as_millis(),
            err.code()
        ),
    }
    result
}

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)
}

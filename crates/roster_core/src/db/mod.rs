//! SQLite storage bootstrap for the student roster.
//!
//! # Responsibility
//! - Open and configure SQLite connections used by the record store.
//! - Apply embedded schema migrations before any roster data is touched.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - A roster file written by a newer binary is never opened for writes.
//! - Every bootstrap failure names where it happened: the open target or the
//!   migration version.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Where a roster connection points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    File,
    Memory,
}

impl OpenMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Memory => "memory",
        }
    }
}

impl Display for OpenMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roster storage error.
#[derive(Debug)]
pub enum DbError {
    /// Connecting or applying connection pragmas failed.
    Open {
        mode: OpenMode,
        /// File path, or `:memory:`.
        target: String,
        source: rusqlite::Error,
    },
    /// Migration `version` failed and was rolled back.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The roster file carries a schema this binary does not know.
    SchemaTooNew { found: u32, supported: u32 },
    /// Statement failure on an already bootstrapped connection.
    Sqlite(rusqlite::Error),
}

impl DbError {
    /// Stable snake_case code used in `error_code=` log fields.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Open { .. } => "db_open_failed",
            Self::Migration { .. } => "db_migration_failed",
            Self::SchemaTooNew { .. } => "db_schema_too_new",
            Self::Sqlite(_) => "db_statement_failed",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open {
                mode,
                target,
                source,
            } => write!(f, "cannot open roster {mode} `{target}`: {source}"),
            Self::Migration { version, source } => {
                write!(f, "roster migration {version} failed: {source}")
            }
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "roster schema version {found} is newer than supported {supported}"
            ),
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Migration { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

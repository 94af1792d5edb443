//! SQLite backing file for the key-value store.
//!
//! # Responsibility
//! - Hand out connections whose `kv_entries` table is ready to use.
//! - Refuse files this build cannot read.
//!
//! # Invariants
//! - The schema version lives in `PRAGMA user_version`.
//! - A connection is only returned after every migration committed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failures while opening the store file or upgrading its schema.
#[derive(Debug)]
pub enum DbError {
    /// SQLite rejected an open, pragma or query.
    Sqlite(rusqlite::Error),
    /// The file carries a schema version newer than this build knows.
    SchemaTooNew { found: u32, supported: u32 },
    /// A migration script failed; the upgrade was rolled back.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "store schema v{found} was written by a newer build (this build reads up to v{supported})"
            ),
            Self::Migration { version, source } => {
                write!(f, "store migration v{version} failed: {source}")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

//! Memo store bootstrap.
//!
//! Every connection handed to a repository comes from `open_db` or
//! `open_db_in_memory` and has the embedded schema fully applied:
//!
//! - `user`: callers that author memos.
//! - `memo`: memos and comments alike; `uid` is unique, `parent_id` marks a
//!   comment.
//! - `memo_relation`: typed edges keyed by `(memo_id, related_memo_id, type)`,
//!   deliberately without foreign keys so a hard-deleted memo can leave a
//!   dangling edge behind.
//!
//! The schema only moves forward. Its version lives in `PRAGMA user_version`
//! and a store written by a newer binary is refused rather than downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or migrating the memo store.
#[derive(Debug)]
pub enum DbError {
    /// Any error reported by SQLite, including constraint violations.
    Sqlite(rusqlite::Error),
    /// Store schema is ahead of the migrations compiled into this binary.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "memo store is at schema v{db_version}; this build understands up to v{latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

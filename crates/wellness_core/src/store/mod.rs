//! Check-in log persistence.
//!
//! # Responsibility
//! - Define the storage contract used by the tool layer (`CheckinStore`).
//! - Keep file layout and recovery details inside the persistence boundary.
//!
//! # Invariants
//! - Reads never fail: a missing or unreadable log reads as "absent".
//! - Appends never reorder or mutate earlier records.
//! - The most recent check-in is the last record of the log.

use crate::model::checkin::{CheckinRecord, NewCheckin};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod json_store;
mod lock_file;

pub use json_store::JsonFileCheckinStore;

/// File name used when no explicit log path is configured.
pub const DEFAULT_LOG_FILE_NAME: &str = "wellness_log.json";

pub type StoreResult<T> = Result<T, StoreError>;

/// Write-path failure of a check-in store.
#[derive(Debug)]
pub enum StoreError {
    /// File system operation failed.
    Io {
        op: &'static str,
        path: PathBuf,
        source: io::Error,
    },
    /// The in-memory log could not be encoded.
    Serialize(serde_json::Error),
    /// Another writer held the log lock for too long.
    LockTimeout { path: PathBuf },
}

impl StoreError {
    pub(crate) fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { op, path, source } => {
                write!(f, "check-in log {op} failed at `{}`: {source}", path.display())
            }
            Self::Serialize(err) => write!(f, "check-in log encoding failed: {err}"),
            Self::LockTimeout { path } => {
                write!(f, "timed out waiting for check-in log lock `{}`", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
            Self::LockTimeout { .. } => None,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Why no previous check-in is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsentReason {
    /// The log document does not exist yet.
    NoLog,
    /// The log document is well-formed but holds no records.
    EmptyLog,
    /// The log document is valid JSON but not a list of records.
    NotAList,
    /// The log document exists but is unreadable or malformed.
    Unreadable,
}

impl AbsentReason {
    /// Short, speakable explanation.
    pub fn message(self) -> &'static str {
        match self {
            Self::NoLog | Self::EmptyLog | Self::NotAList => "No previous check-ins found.",
            Self::Unreadable => "Could not read previous entries.",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::NoLog => "no_log",
            Self::EmptyLog => "empty_log",
            Self::NotAList => "not_a_list",
            Self::Unreadable => "unreadable",
        }
    }
}

/// Result of looking up the most recent check-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LatestCheckin {
    Found(CheckinRecord),
    Absent(AbsentReason),
}

impl LatestCheckin {
    pub fn record(&self) -> Option<&CheckinRecord> {
        match self {
            Self::Found(record) => Some(record),
            Self::Absent(_) => None,
        }
    }
}

/// Storage contract for the check-in log.
///
/// Implementations must be safe to call in any order and any number of
/// times, including concurrently through a shared reference.
pub trait CheckinStore {
    /// Returns the last stored check-in, or why there is none.
    fn read_latest(&self) -> LatestCheckin;

    /// Stamps `entry` with the current time and appends it to the log.
    ///
    /// Returns the stored record on success.
    fn append(&self, entry: NewCheckin) -> StoreResult<CheckinRecord>;

    /// Returns every readable record in insertion order.
    ///
    /// An unreadable log yields an empty list.
    fn history(&self) -> Vec<CheckinRecord>;
}

impl<S: CheckinStore + ?Sized> CheckinStore for Arc<S> {
    fn read_latest(&self) -> LatestCheckin {
        (**self).read_latest()
    }

    fn append(&self, entry: NewCheckin) -> StoreResult<CheckinRecord> {
        (**self).append(entry)
    }

    fn history(&self) -> Vec<CheckinRecord> {
        (**self).history()
    }
}

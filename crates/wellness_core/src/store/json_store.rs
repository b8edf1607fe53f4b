//! JSON document implementation of the check-in store.
//!
//! # Responsibility
//! - Persist the whole check-in log as one pretty-printed JSON array.
//! - Recover from corrupt documents by treating them as an empty log.
//!
//! # Invariants
//! - Every append rewrites the full log through a uniquely named sibling temp
//!   file and a rename, so readers see either the previous or the updated
//!   document.
//! - Earlier entries are written back byte-for-byte as they were read; only
//!   the new entry is encoded.
//! - Writers sharing a path are serialized by the `<log>.lock` file, across
//!   store instances and processes.
//! - File handles never outlive the call that opened them.

use super::lock_file::acquire_log_lock;
use super::{AbsentReason, CheckinStore, LatestCheckin, StoreError, StoreResult};
use crate::model::checkin::{checkin_now, next_timestamp, CheckinRecord, NewCheckin};
use log::{debug, error, info, warn};
use serde_json::value::RawValue;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

const TEMP_SUFFIX: &str = ".tmp";

/// How long an append waits for another writer before giving up.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// File-backed check-in store.
///
/// Construct one instance per log path and share it (e.g. behind `Arc`)
/// between sessions that use the same file. Separate instances or processes
/// on one path stay consistent through the lock file.
#[derive(Debug)]
pub struct JsonFileCheckinStore {
    path: PathBuf,
    lock_timeout: Duration,
    writer: Mutex<()>,
}

/// One log element: its original JSON text and its decoded form.
struct StoredEntry {
    raw: Box<RawValue>,
    record: CheckinRecord,
}

enum LoadedLog {
    Missing,
    Unreadable,
    NotAList,
    Entries(Vec<StoredEntry>),
}

impl JsonFileCheckinStore {
    /// Creates a store for the log document at `path`.
    ///
    /// Nothing is touched on disk until the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            writer: Mutex::new(()),
        }
    }

    /// Overrides how long an append waits for the writer lock.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Path of the persisted log document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // Guards the file, not in-memory state; a poisoned lock is still usable.
    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn append_locked(&self, entry: NewCheckin) -> StoreResult<(CheckinRecord, usize)> {
        ensure_parent_dir(&self.path)?;
        let _file_lock = acquire_log_lock(&self.path, self.lock_timeout)?;

        let entries = match load_log(&self.path) {
            LoadedLog::Entries(entries) => entries,
            LoadedLog::Missing => Vec::new(),
            LoadedLog::Unreadable | LoadedLog::NotAList => {
                warn!(
                    "event=checkin_append module=store status=recovering reason=unreadable_log path={}",
                    self.path.display()
                );
                Vec::new()
            }
        };

        let previous = entries.last().map(|stored| stored.record.timestamp);
        let record = entry.into_record(next_timestamp(previous, checkin_now()));

        let mut raws = entries
            .into_iter()
            .map(|stored| stored.raw)
            .collect::<Vec<_>>();
        raws.push(encode_entry(&record)?);

        write_log(&self.path, &raws)?;
        Ok((record, raws.len()))
    }
}

impl CheckinStore for JsonFileCheckinStore {
    fn read_latest(&self) -> LatestCheckin {
        let latest = match load_log(&self.path) {
            LoadedLog::Missing => LatestCheckin::Absent(AbsentReason::NoLog),
            LoadedLog::Unreadable => LatestCheckin::Absent(AbsentReason::Unreadable),
            LoadedLog::NotAList => LatestCheckin::Absent(AbsentReason::NotAList),
            LoadedLog::Entries(mut entries) => match entries.pop() {
                Some(stored) => LatestCheckin::Found(stored.record),
                None => LatestCheckin::Absent(AbsentReason::EmptyLog),
            },
        };

        match &latest {
            LatestCheckin::Found(_) => {
                debug!("event=checkin_read_latest module=store status=ok found=true");
            }
            LatestCheckin::Absent(reason) => {
                debug!(
                    "event=checkin_read_latest module=store status=ok found=false reason={}",
                    reason.label()
                );
            }
        }
        latest
    }

    fn append(&self, entry: NewCheckin) -> StoreResult<CheckinRecord> {
        let started_at = Instant::now();
        let goal_count = entry.goals.len();
        let _writer = self.lock_writer();

        match self.append_locked(entry) {
            Ok((record, entry_count)) => {
                info!(
                    "event=checkin_append module=store status=ok entries={} goals={} duration_ms={}",
                    entry_count,
                    goal_count,
                    started_at.elapsed().as_millis()
                );
                Ok(record)
            }
            Err(err) => {
                error!(
                    "event=checkin_append module=store status=error duration_ms={} error_code=write_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn history(&self) -> Vec<CheckinRecord> {
        match load_log(&self.path) {
            LoadedLog::Entries(entries) => entries.into_iter().map(|stored| stored.record).collect(),
            LoadedLog::Missing | LoadedLog::Unreadable | LoadedLog::NotAList => Vec::new(),
        }
    }
}

fn load_log(path: &Path) -> LoadedLog {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return LoadedLog::Missing,
        Err(err) => {
            warn!(
                "event=checkin_load module=store status=error error_code=read_failed path={} error={}",
                path.display(),
                err
            );
            return LoadedLog::Unreadable;
        }
    };

    let root = match serde_json::from_str::<Box<RawValue>>(&contents) {
        Ok(root) => root,
        Err(err) => {
            warn!(
                "event=checkin_load module=store status=error error_code=parse_failed path={} error={}",
                path.display(),
                err
            );
            return LoadedLog::Unreadable;
        }
    };

    let Ok(raws) = serde_json::from_str::<Vec<Box<RawValue>>>(root.get()) else {
        warn!(
            "event=checkin_load module=store status=error error_code=not_a_list path={}",
            path.display()
        );
        return LoadedLog::NotAList;
    };

    let mut entries = Vec::with_capacity(raws.len());
    for (index, raw) in raws.into_iter().enumerate() {
        match serde_json::from_str::<CheckinRecord>(raw.get()) {
            Ok(record) => entries.push(StoredEntry { raw, record }),
            Err(err) => {
                warn!(
                    "event=checkin_load module=store status=error error_code=invalid_entry index={} path={} error={}",
                    index,
                    path.display(),
                    err
                );
                return LoadedLog::Unreadable;
            }
        }
    }
    LoadedLog::Entries(entries)
}

/// Encodes a new record as a pretty element indented one level into the array.
fn encode_entry(record: &CheckinRecord) -> StoreResult<Box<RawValue>> {
    let pretty = serde_json::to_string_pretty(record)?;
    Ok(RawValue::from_string(pretty.replace('\n', "\n  "))?)
}

fn render_log(entries: &[Box<RawValue>]) -> StoreResult<String> {
    let mut contents = serde_json::to_string_pretty(entries)?;
    contents.push('\n');
    Ok(contents)
}

fn parent_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

fn ensure_parent_dir(path: &Path) -> StoreResult<()> {
    let dir = parent_dir(path);
    fs::create_dir_all(dir).map_err(|source| StoreError::io("create_dir", dir, source))
}

fn write_log(path: &Path, entries: &[Box<RawValue>]) -> StoreResult<()> {
    let contents = render_log(entries)?;
    let dir = parent_dir(path);

    let mut prefix = OsString::from(".");
    prefix.push(
        path.file_name()
            .unwrap_or_else(|| super::DEFAULT_LOG_FILE_NAME.as_ref()),
    );
    prefix.push(".");

    // Unpersisted temp files are removed when dropped, including on error.
    let mut temp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(TEMP_SUFFIX)
        .tempfile_in(dir)
        .map_err(|source| StoreError::io("create", dir, source))?;
    temp.write_all(contents.as_bytes())
        .map_err(|source| StoreError::io("write", temp.path(), source))?;
    temp.as_file()
        .sync_all()
        .map_err(|source| StoreError::io("sync", temp.path(), source))?;
    temp.persist(path)
        .map_err(|err| StoreError::io("rename", path, err.error))?;

    // Best effort: flush the directory entry of the rename.
    if let Ok(dir_handle) = File::open(dir) {
        let _ = dir_handle.sync_all();
    }
    Ok(())
}

//! Advisory lock file serializing writers of one check-in log.
//!
//! # Responsibility
//! - Give one writer at a time exclusive use of a log path, across store
//!   instances and processes.
//!
//! # Invariants
//! - The lock is held iff `<log>.lock` exists; the guard removes it on drop.
//! - A lock file older than `STALE_LOCK_AGE` is treated as left behind by a
//!   crashed writer and removed.

use super::{StoreError, StoreResult};
use log::warn;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant, SystemTime};

const LOCK_SUFFIX: &str = ".lock";
const STALE_LOCK_AGE: Duration = Duration::from_secs(10);
const RETRY_INTERVAL: Duration = Duration::from_millis(5);

/// Held lock on a log path. Dropping it releases the lock.
#[derive(Debug)]
pub(crate) struct LogLockGuard {
    path: PathBuf,
    _file: File,
}

impl Drop for LogLockGuard {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            warn!(
                "event=checkin_lock module=store status=error error_code=release_failed path={} error={}",
                self.path.display(),
                err
            );
        }
    }
}

/// Sibling lock file path for `log_path`.
pub(crate) fn lock_path_for(log_path: &Path) -> PathBuf {
    let mut name = log_path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from(super::DEFAULT_LOG_FILE_NAME));
    name.push(LOCK_SUFFIX);
    log_path.with_file_name(name)
}

/// Acquires the writer lock for `log_path`, waiting up to `timeout`.
///
/// # Errors
/// - `LockTimeout` when another writer keeps the lock past `timeout`.
/// - `Io` when the lock file cannot be created for another reason.
pub(crate) fn acquire_log_lock(log_path: &Path, timeout: Duration) -> StoreResult<LogLockGuard> {
    let lock_path = lock_path_for(log_path);
    let started_at = Instant::now();

    loop {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
        {
            Ok(file) => {
                return Ok(LogLockGuard {
                    path: lock_path,
                    _file: file,
                })
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                if is_stale(&lock_path) {
                    warn!(
                        "event=checkin_lock module=store status=recovering reason=stale_lock path={}",
                        lock_path.display()
                    );
                    let _ = fs::remove_file(&lock_path);
                    continue;
                }
                if started_at.elapsed() >= timeout {
                    return Err(StoreError::LockTimeout { path: lock_path });
                }
                thread::sleep(RETRY_INTERVAL);
            }
            Err(err) => return Err(StoreError::io("lock", &lock_path, err)),
        }
    }
}

fn is_stale(lock_path: &Path) -> bool {
    fs::metadata(lock_path)
        .and_then(|meta| meta.modified())
        .ok()
        .and_then(|modified| SystemTime::now().duration_since(modified).ok())
        .is_some_and(|age| age > STALE_LOCK_AGE)
}

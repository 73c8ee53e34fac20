use std::{
    fmt,
    io::Error,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local, TimeDelta, Utc};

use crate::warning;

#[derive(Debug)]
pub enum LockError {
    IoError(Error),
    /// Another run holds the lock and it is not yet stale. A lock left by a
    /// killed run blocks until it ages out or the file is removed by hand.
    Held(PathBuf),
}

impl From<Error> for LockError {
    fn from(err: Error) -> Self {
        LockError::IoError(err)
    }
}

impl fmt::Display for LockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockError::IoError(e) => write!(f, "run lock I/O failed: {}", e),
            LockError::Held(path) => write!(
                f,
                "a run is already in progress (lock {} is taken over after {} hours, or remove it by hand)",
                path.display(),
                STALE_AFTER_HOURS
            ),
        }
    }
}

impl std::error::Error for LockError {}

/// Runs older than this are assumed to have died without releasing the lock.
pub const STALE_AFTER_HOURS: i64 = 6;

/// Marker file held for the duration of one run.
///
/// The file holds the owner's pid and start time and is removed when the
/// guard is dropped. A process killed mid-run leaves it behind; such a lock
/// is taken over once it is older than [`STALE_AFTER_HOURS`].
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    pub async fn acquire(path: PathBuf) -> Result<Self, LockError> {
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        match Self::create(path).await {
            Err(LockError::Held(held)) => {
                if !is_stale(&held).await {
                    return Err(LockError::Held(held));
                }

                warning!("Taking over stale run lock {}", held.display());
                match async_fs::remove_file(&held).await {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => return Err(LockError::IoError(e)),
                }
                Self::create(held).await
            }
            result => result,
        }
    }

    async fn create(path: PathBuf) -> Result<Self, LockError> {
        let file = match async_fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(LockError::Held(path));
            }
            Err(e) => return Err(LockError::IoError(e)),
        };

        drop(file);

        let lock = Self { path };
        let owner = format!("{} {}\n", std::process::id(), Local::now().to_rfc3339());
        async_fs::write(&lock.path, owner).await?;

        Ok(lock)
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Whether a lock file with contents `owner` ("<pid> <rfc3339 start>") was
/// written more than [`STALE_AFTER_HOURS`] before `now`. Unreadable contents
/// are never stale.
pub fn is_stale_owner(owner: &str, now: DateTime<Utc>) -> bool {
    owner
        .split_whitespace()
        .nth(1)
        .and_then(|started| DateTime::parse_from_rfc3339(started).ok())
        .is_some_and(|started| {
            now.signed_duration_since(started) > TimeDelta::hours(STALE_AFTER_HOURS)
        })
}

async fn is_stale(path: &Path) -> bool {
    async_fs::read_to_string(path)
        .await
        .map(|owner| is_stale_owner(&owner, Utc::now()))
        .unwrap_or(false)
}

use std::{fmt, io::Error, path::PathBuf};

use crate::types::Trigger;

#[derive(Debug)]
pub enum TriggerError {
    IoError(Error),
    SerdeError(serde_json::Error),
    InvalidTime(String),
}

impl From<Error> for TriggerError {
    fn from(err: Error) -> Self {
        TriggerError::IoError(err)
    }
}

impl From<serde_json::Error> for TriggerError {
    fn from(err: serde_json::Error) -> Self {
        TriggerError::SerdeError(err)
    }
}

impl fmt::Display for TriggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerError::IoError(e) => write!(f, "trigger store I/O failed: {}", e),
            TriggerError::SerdeError(e) => write!(f, "trigger file is malformed: {}", e),
            TriggerError::InvalidTime(msg) => write!(f, "cannot compute trigger time: {}", msg),
        }
    }
}

impl std::error::Error for TriggerError {}

/// Holds the single pending one-shot trigger.
pub struct TriggerStore {
    path: PathBuf,
}

impl TriggerStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub async fn load(&self) -> Result<Option<Trigger>, TriggerError> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(TriggerError::IoError(e)),
        };

        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Registers `trigger`, replacing whatever was pending.
    pub async fn persist(&self, trigger: &Trigger) -> Result<(), TriggerError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(trigger)?;
        async_fs::write(&self.path, json)
            .await
            .map_err(TriggerError::IoError)
    }

    /// Consumes the pending trigger. Clearing an empty store is a no-op.
    pub async fn clear(&self) -> Result<(), TriggerError> {
        match async_fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TriggerError::IoError(e)),
        }
    }
}

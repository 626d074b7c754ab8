//! Snapshot persistence with modification-time expiry.

use crate::util::errors::{CadPilotError, CadPilotResult};
use chrono::{DateTime, Duration, Utc};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;

/// A JSON snapshot on disk that goes stale after a fixed number of days.
pub struct SnapshotStore {
    path: PathBuf,
    expiry_days: i64,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>, expiry_days: i64) -> Self {
        Self {
            path: path.into(),
            expiry_days,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Load the snapshot when present and younger than the expiry window;
    /// `Ok(None)` means the caller should rebuild.
    pub fn load<T: DeserializeOwned>(&self) -> CadPilotResult<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let modified: DateTime<Utc> = std::fs::metadata(&self.path)?.modified()?.into();
        let age = Utc::now() - modified;
        if age >= Duration::days(self.expiry_days) {
            debug!(
                "Snapshot {} is {} days old, treating as expired",
                self.path.display(),
                age.num_days()
            );
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let value = serde_json::from_str(&content).map_err(|e| {
            CadPilotError::Storage(format!(
                "Failed to parse snapshot {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(Some(value))
    }

    pub fn save<T: Serialize>(&self, value: &T) -> CadPilotResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(value)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

//! File-backed snapshot store.
//!
//! # Responsibility
//! - Read and write the planner snapshot as one JSON file.
//! - Emit `state_load` / `state_save` logging events with duration.
//!
//! # Invariants
//! - Writes go to a temp file in the target directory, are fsynced, then
//!   renamed over the target, so readers never observe a partial file.
//! - A failed load returns `PlannerState::default()`.

use super::{decode_snapshot, encode_snapshot, StateStore, StoreError, StoreResult};
use crate::model::state::PlannerState;
use log::{error, info, warn};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

/// Snapshot store rooted at one explicit file path.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomic(&self, bytes: &[u8]) -> StoreResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        std::fs::create_dir_all(&dir).map_err(io_err)?;
        let mut tmp = NamedTempFile::new_in(&dir).map_err(io_err)?;
        tmp.write_all(bytes).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|err| io_err(err.error))?;
        Ok(())
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> PlannerState {
        let started_at = Instant::now();
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    "event=state_load module=store status=fallback reason=missing duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                return PlannerState::default();
            }
            Err(err) => {
                warn!(
                    "event=state_load module=store status=fallback reason=unreadable duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return PlannerState::default();
            }
        };

        match decode_snapshot(&bytes) {
            Ok(state) => {
                info!(
                    "event=state_load module=store status=ok duration_ms={} tasks={} potatoes={}",
                    started_at.elapsed().as_millis(),
                    state.tasks.len(),
                    state.potatoes.len()
                );
                state
            }
            Err(err) => {
                warn!(
                    "event=state_load module=store status=fallback reason=malformed duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                PlannerState::default()
            }
        }
    }

    fn save(&self, state: &PlannerState) -> StoreResult<()> {
        let started_at = Instant::now();
        let result = encode_snapshot(state).and_then(|bytes| self.write_atomic(&bytes));
        match &result {
            Ok(()) => info!(
                "event=state_save module=store status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=state_save module=store status=error duration_ms={} error_code=snapshot_write_failed error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

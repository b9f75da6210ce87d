//! In-memory snapshot store.
//!
//! Runs the same JSON codec as the file store, so tests and previews see
//! real round-trip behavior without touching disk.

use super::{decode_snapshot, encode_snapshot, StateStore, StoreResult};
use crate::model::state::PlannerState;
use std::sync::Mutex;

/// Store keeping the last encoded snapshot in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    snapshot: Mutex<Option<Vec<u8>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from raw snapshot bytes, e.g. a fixture document.
    pub fn with_snapshot(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            snapshot: Mutex::new(Some(bytes.into())),
        }
    }

    /// Returns a copy of the last saved snapshot bytes.
    pub fn snapshot(&self) -> Option<Vec<u8>> {
        match self.snapshot.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl StateStore for InMemoryStore {
    fn load(&self) -> PlannerState {
        self.snapshot()
            .and_then(|bytes| decode_snapshot(&bytes).ok())
            .unwrap_or_default()
    }

    fn save(&self, state: &PlannerState) -> StoreResult<()> {
        let bytes = encode_snapshot(state)?;
        match self.snapshot.lock() {
            Ok(mut guard) => *guard = Some(bytes),
            Err(poisoned) => *poisoned.into_inner() = Some(bytes),
        }
        Ok(())
    }
}

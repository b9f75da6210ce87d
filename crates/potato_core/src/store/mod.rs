//! Snapshot persistence for planner state.
//!
//! # Responsibility
//! - Define the load/save contract used by the planner controller.
//! - Own the JSON snapshot codec shared by every store implementation.
//!
//! # Invariants
//! - `load` never fails; unreadable snapshots degrade to the default state.
//! - `save` reports failures but never panics, and never mutates the
//!   in-memory state it was given.
//!
//! # See also
//! - `json_file` for the atomic on-disk implementation.

use crate::model::state::PlannerState;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure while writing a snapshot.
#[derive(Debug)]
pub enum StoreError {
    /// State could not be encoded as JSON.
    Serialize(serde_json::Error),
    /// File system failure while writing or replacing the snapshot.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialize(err) => write!(f, "failed to encode planner state: {err}"),
            Self::Io { path, source } => {
                write!(f, "failed to write snapshot `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Serialize(err) => Some(err),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Durable home for the planner state snapshot.
pub trait StateStore {
    /// Reads the last snapshot, or the default state when none is usable.
    fn load(&self) -> PlannerState;
    /// Replaces the stored snapshot with `state`.
    fn save(&self, state: &PlannerState) -> StoreResult<()>;
}

impl<S: StateStore + ?Sized> StateStore for &S {
    fn load(&self) -> PlannerState {
        (**self).load()
    }

    fn save(&self, state: &PlannerState) -> StoreResult<()> {
        (**self).save(state)
    }
}

/// Encodes `state` as the pretty-printed snapshot document.
pub fn encode_snapshot(state: &PlannerState) -> StoreResult<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(state)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Decodes a snapshot document.
///
/// Unknown fields are ignored and missing top-level keys take defaults; any
/// other mismatch is an error for the caller to degrade.
pub fn decode_snapshot(bytes: &[u8]) -> Result<PlannerState, serde_json::Error> {
    serde_json::from_slice(bytes)
}

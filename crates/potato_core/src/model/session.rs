//! Focus session state machine.
//!
//! # Responsibility
//! - Represent whether a focus session is running, and for which task.
//! - Map the two-state machine onto the nullable `activeSession` record.
//!
//! # Invariants
//! - At most one session is active; starting a new one replaces the old.
//! - `Idle` serializes as `null`.

use crate::model::task::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wire record for a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSession {
    pub task_id: TaskId,
    pub started_at: DateTime<Utc>,
}

impl ActiveSession {
    /// Whole seconds between `started_at` and `now`, never negative.
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        (now - self.started_at).num_seconds().max(0)
    }
}

/// Focus session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<ActiveSession>", into = "Option<ActiveSession>")]
pub enum SessionState {
    #[default]
    Idle,
    Active(ActiveSession),
}

impl SessionState {
    pub fn active(&self) -> Option<&ActiveSession> {
        match self {
            Self::Idle => None,
            Self::Active(session) => Some(session),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    /// Returns whether the running session is bound to `task_id`.
    pub fn is_bound_to(&self, task_id: TaskId) -> bool {
        self.active()
            .is_some_and(|session| session.task_id == task_id)
    }
}

impl From<Option<ActiveSession>> for SessionState {
    fn from(value: Option<ActiveSession>) -> Self {
        match value {
            Some(session) => Self::Active(session),
            None => Self::Idle,
        }
    }
}

impl From<SessionState> for Option<ActiveSession> {
    fn from(value: SessionState) -> Self {
        match value {
            SessionState::Idle => None,
            SessionState::Active(session) => Some(session),
        }
    }
}

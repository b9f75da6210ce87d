//! Task domain model.
//!
//! # Responsibility
//! - Define the focus-time goal record scheduled on one calendar day.
//! - Normalize user input (trimmed title, empty description → `None`).
//!
//! # Invariants
//! - `id` is stable across edits.
//! - `completed_seconds` is only ever increased by finished sessions and
//!   survives edits unchanged.
//! - `scheduled_date` carries no time-of-day or time-zone component.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a task.
pub type TaskId = Uuid;

/// Focus-time goal the user works on during sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    /// Total focus time goal in seconds.
    pub allocated_seconds: i64,
    /// Focus time accumulated by finished sessions.
    pub completed_seconds: i64,
    #[serde(with = "scheduled_date_format")]
    pub scheduled_date: NaiveDate,
}

impl Task {
    /// Builds a fresh task from user input with a generated id.
    pub fn from_draft(draft: &TaskDraft) -> Self {
        Self::with_id(Uuid::new_v4(), draft, 0)
    }

    /// Builds a task from user input keeping caller-provided identity and
    /// accumulated progress.
    pub fn with_id(id: TaskId, draft: &TaskDraft, completed_seconds: i64) -> Self {
        let draft = draft.normalized();
        Self {
            id,
            title: draft.title,
            description: draft.description,
            allocated_seconds: draft.allocated_seconds,
            completed_seconds,
            scheduled_date: draft.scheduled_date,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed_seconds >= self.allocated_seconds
    }

    pub fn allocated_minutes(&self) -> i64 {
        self.allocated_seconds / 60
    }

    pub fn completed_minutes(&self) -> i64 {
        self.completed_seconds / 60
    }

    /// Completed time plus the seconds of a session still running.
    pub fn total_seconds_including(&self, session_seconds: i64) -> i64 {
        self.completed_seconds.saturating_add(session_seconds)
    }

    /// Seconds left until the goal, counting a running session.
    ///
    /// Negative once the task has been worked past its allocation.
    pub fn remaining_seconds_including(&self, session_seconds: i64) -> i64 {
        self.allocated_seconds
            .saturating_sub(self.total_seconds_including(session_seconds))
    }
}

/// User-editable task fields used by create and edit intents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub allocated_seconds: i64,
    pub scheduled_date: NaiveDate,
}

impl TaskDraft {
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        allocated_seconds: i64,
        scheduled_date: NaiveDate,
    ) -> Self {
        Self {
            title: title.into(),
            description,
            allocated_seconds,
            scheduled_date,
        }
    }

    /// Returns a copy with trimmed text and blank description removed.
    pub fn normalized(&self) -> Self {
        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        Self {
            title: self.title.trim().to_string(),
            description,
            allocated_seconds: self.allocated_seconds,
            scheduled_date: self.scheduled_date,
        }
    }

    /// Checks the input preconditions presentation callers must enforce.
    ///
    /// The state aggregate itself accepts any draft.
    pub fn validate(&self) -> Result<(), TaskDraftError> {
        if self.title.trim().is_empty() {
            return Err(TaskDraftError::EmptyTitle);
        }
        if self.allocated_seconds <= 0 {
            return Err(TaskDraftError::NonPositiveAllocation(self.allocated_seconds));
        }
        Ok(())
    }
}

/// Rejected task input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskDraftError {
    /// Title is blank after trim.
    EmptyTitle,
    /// Allocated focus time must be at least one second.
    NonPositiveAllocation(i64),
}

impl Display for TaskDraftError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title must not be blank"),
            Self::NonPositiveAllocation(value) => {
                write!(f, "allocated_seconds must be > 0, got {value}")
            }
        }
    }
}

impl Error for TaskDraftError {}

/// Wire format for `scheduledDate`.
///
/// Writes midnight UTC of the calendar day as RFC 3339. Reads take the date
/// in the timestamp's own offset, so the stored day never shifts with the
/// local time zone of the process. Bare `YYYY-MM-DD` values are accepted too.
mod scheduled_date_format {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer};

    const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{}T00:00:00Z", date.format(DATE_ONLY_FORMAT)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let trimmed = raw.trim();
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(timestamp.date_naive());
        }
        NaiveDate::parse_from_str(trimmed, DATE_ONLY_FORMAT).map_err(|_| {
            serde::de::Error::custom(format!("invalid scheduledDate value `{trimmed}`"))
        })
    }
}

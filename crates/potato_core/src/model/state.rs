//! Planner state aggregate.
//!
//! # Responsibility
//! - Own tasks, potatoes, the spud balance, equip selection and session.
//! - Apply session lifecycle and economy rules as in-memory mutations.
//!
//! # Invariants
//! - Task and potato ids are unique within their collections.
//! - Deleting the task bound to the active session returns it to `Idle`
//!   without crediting time.
//! - Finishing a session whose task vanished clears it without economy
//!   effects.
//! - Purchases are not affordability-gated here; callers check first.

use crate::catalog;
use crate::model::economy;
use crate::model::potato::{Potato, PotatoId};
use crate::model::session::{ActiveSession, SessionState};
use crate::model::task::{Task, TaskDraft, TaskId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// What one finished session credited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport {
    pub task_id: TaskId,
    pub elapsed_seconds: i64,
    /// Zero when the task had been deleted before the session finished.
    pub spuds_earned: i64,
    /// Levels gained by the equipped potato, if any.
    pub levels_gained: u32,
}

/// Aggregate root persisted as one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlannerState {
    pub tasks: Vec<Task>,
    pub potatoes: Vec<Potato>,
    pub spuds: i64,
    /// Serialized as `activePotatoId`.
    #[serde(rename = "activePotatoId")]
    pub equipped_potato_id: Option<PotatoId>,
    #[serde(rename = "activeSession")]
    pub session: SessionState,
}

impl PlannerState {
    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn potato(&self, potato_id: PotatoId) -> Option<&Potato> {
        self.potatoes.iter().find(|potato| potato.id == potato_id)
    }

    /// Currently equipped potato, when the equip id resolves.
    pub fn equipped_potato(&self) -> Option<&Potato> {
        self.equipped_potato_id
            .and_then(|potato_id| self.potato(potato_id))
    }

    /// Tasks whose scheduled day is `day`, in stored order.
    pub fn tasks_on(&self, day: NaiveDate) -> impl Iterator<Item = &Task> {
        self.tasks
            .iter()
            .filter(move |task| task.scheduled_date == day)
    }

    /// Appends a task built from `draft` and returns its new id.
    pub fn add_task(&mut self, draft: &TaskDraft) -> TaskId {
        let task = Task::from_draft(draft);
        let task_id = task.id;
        self.tasks.push(task);
        task_id
    }

    /// Replaces editable fields of a task, keeping id and progress.
    ///
    /// Returns `false` when no task has `task_id`.
    pub fn edit_task(&mut self, task_id: TaskId, draft: &TaskDraft) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == task_id) else {
            return false;
        };
        *task = Task::with_id(task_id, draft, task.completed_seconds);
        true
    }

    /// Removes a task and ends a session bound to it without credit.
    ///
    /// Returns `false` when no task has `task_id`.
    pub fn delete_task(&mut self, task_id: TaskId) -> bool {
        if self.session.is_bound_to(task_id) {
            self.session = SessionState::Idle;
        }
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != task_id);
        self.tasks.len() != before
    }

    /// Starts a focus session, silently discarding any running one.
    pub fn start_session(&mut self, task_id: TaskId, now: DateTime<Utc>) {
        self.session = SessionState::Active(ActiveSession {
            task_id,
            started_at: now,
        });
    }

    /// Ends the running session and credits its elapsed time.
    ///
    /// Returns `None` when no session was active.
    pub fn finish_session(&mut self, now: DateTime<Utc>) -> Option<SessionReport> {
        let SessionState::Active(session) = std::mem::take(&mut self.session) else {
            return None;
        };
        let elapsed_seconds = session.elapsed_seconds(now);

        let Some(task) = self
            .tasks
            .iter_mut()
            .find(|task| task.id == session.task_id)
        else {
            return Some(SessionReport {
                task_id: session.task_id,
                elapsed_seconds,
                spuds_earned: 0,
                levels_gained: 0,
            });
        };
        task.completed_seconds = task.completed_seconds.saturating_add(elapsed_seconds);

        let (spuds_earned, levels_gained) = self.apply_focus_credit(elapsed_seconds);
        Some(SessionReport {
            task_id: session.task_id,
            elapsed_seconds,
            spuds_earned,
            levels_gained,
        })
    }

    /// Credits focus time to the spud balance and the equipped potato.
    ///
    /// Returns `(spuds_earned, levels_gained)`.
    pub fn apply_focus_credit(&mut self, elapsed_seconds: i64) -> (i64, u32) {
        let spuds_earned = economy::spuds_for(elapsed_seconds);
        self.spuds = self.spuds.saturating_add(spuds_earned);

        let Some(potato_id) = self.equipped_potato_id else {
            return (spuds_earned, 0);
        };
        let Some(potato) = self.potatoes.iter_mut().find(|potato| potato.id == potato_id) else {
            return (spuds_earned, 0);
        };

        let fertilizer = economy::fertilizer_for(elapsed_seconds);
        let levels_gained = match catalog::lookup(&potato.species_id) {
            Some(species) => economy::grow(potato, species, fertilizer),
            None => {
                potato.fertilizer = potato.fertilizer.saturating_add(fertilizer);
                0
            }
        };
        (spuds_earned, levels_gained)
    }

    /// Buys one potato of a catalog species and charges its cost.
    ///
    /// Unknown species ids are ignored and return `None`.
    pub fn buy_potato(&mut self, species_id: &str) -> Option<PotatoId> {
        let species = catalog::lookup(species_id)?;
        let potato = Potato::acquire(species);
        let potato_id = potato.id;
        self.potatoes.push(potato);
        self.spuds = self.spuds.saturating_sub(species.cost);
        Some(potato_id)
    }

    /// Sets the equipped potato id without checking ownership.
    pub fn equip_potato(&mut self, potato_id: PotatoId) {
        self.equipped_potato_id = Some(potato_id);
    }
}

#[cfg(test)]
mod tests {
    use super::PlannerState;
    use crate::model::session::SessionState;
    use crate::model::task::TaskDraft;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn draft(title: &str) -> TaskDraft {
        TaskDraft::new(title, None, 600, NaiveDate::from_ymd_opt(2026, 5, 1).unwrap())
    }

    #[test]
    fn edit_keeps_id_and_completed_seconds() {
        let mut state = PlannerState::default();
        let task_id = state.add_task(&draft("Old"));
        state.tasks[0].completed_seconds = 120;

        let mut edited = draft("  New ");
        edited.allocated_seconds = 900;
        assert!(state.edit_task(task_id, &edited));

        let task = state.task(task_id).unwrap();
        assert_eq!(task.title, "New");
        assert_eq!(task.allocated_seconds, 900);
        assert_eq!(task.completed_seconds, 120);
    }

    #[test]
    fn edit_and_delete_unknown_task_report_false() {
        let mut state = PlannerState::default();
        let stray = uuid::Uuid::new_v4();
        assert!(!state.edit_task(stray, &draft("x")));
        assert!(!state.delete_task(stray));
    }

    #[test]
    fn finish_without_active_session_is_noop() {
        let mut state = PlannerState::default();
        assert_eq!(state.finish_session(Utc::now()), None);
        assert_eq!(state, PlannerState::default());
    }

    #[test]
    fn finish_for_vanished_task_clears_without_credit() {
        let mut state = PlannerState::default();
        let start = Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap();
        state.start_session(uuid::Uuid::new_v4(), start);

        let report = state
            .finish_session(start + Duration::seconds(30))
            .unwrap();
        assert_eq!(report.spuds_earned, 0);
        assert_eq!(state.spuds, 0);
        assert_eq!(state.session, SessionState::Idle);
    }

    #[test]
    fn dangling_equip_id_still_earns_spuds() {
        let mut state = PlannerState::default();
        state.equip_potato(uuid::Uuid::new_v4());
        assert_eq!(state.apply_focus_credit(10), (10, 0));
        assert_eq!(state.spuds, 10);
    }

    #[test]
    fn buying_with_deeply_negative_balance_saturates() {
        let mut state = PlannerState::default();
        state.spuds = i64::MIN + 5;
        assert!(state.buy_potato("cephara").is_some());
        assert_eq!(state.spuds, i64::MIN);
        assert_eq!(state.potatoes.len(), 1);
    }
}

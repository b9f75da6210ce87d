//! Planner controller facade.
//!
//! # Responsibility
//! - Be the single mutation entry point for presentation code.
//! - Persist after every mutation and notify subscribed listeners.
//! - Expose read-only projections (day agenda, ownership, shop actions).
//!
//! # Invariants
//! - The in-memory state is authoritative; a failed save never rolls back.
//! - The starter potato is seeded only when no potato is owned at open.
//! - Every mutation saves exactly once, including no-op intents.
//! - An event is emitted only when a mutation changed the state.

use crate::catalog;
use crate::model::potato::{Potato, PotatoId};
use crate::model::session::ActiveSession;
use crate::model::state::{PlannerState, SessionReport};
use crate::model::task::{Task, TaskDraft, TaskId};
use crate::store::{StateStore, StoreError, StoreResult};
use chrono::{DateTime, NaiveDate, Utc};
use log::{info, warn};

/// Level of the free potato granted on first launch.
pub const STARTER_POTATO_LEVEL: u32 = 7;

/// Change notification emitted after a mutation was applied and saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannerEvent {
    StarterSeeded(PotatoId),
    TaskAdded(TaskId),
    TaskEdited(TaskId),
    TaskDeleted(TaskId),
    SessionStarted(TaskId),
    SessionFinished(SessionReport),
    PotatoBought(PotatoId),
    PotatoEquipped(PotatoId),
}

/// Mutation result paired with the outcome of the follow-up save.
#[must_use]
#[derive(Debug)]
pub struct Persisted<T> {
    pub value: T,
    pub saved: StoreResult<()>,
}

impl<T> Persisted<T> {
    pub fn is_saved(&self) -> bool {
        self.saved.is_ok()
    }

    pub fn save_error(&self) -> Option<&StoreError> {
        self.saved.as_ref().err()
    }

    /// Drops the save outcome, keeping only the mutation result.
    pub fn into_value(self) -> T {
        self.value
    }
}

/// What the shop should offer for one species.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopAction {
    /// Not owned yet; `affordable` reflects the current balance.
    Buy { affordable: bool },
    /// Owned but another potato is equipped.
    Equip(PotatoId),
    /// Owned and currently equipped.
    Equipped,
}

type Listener = Box<dyn FnMut(&PlannerEvent) + Send>;

/// Controller owning the planner state and its store.
pub struct Planner<S: StateStore> {
    state: PlannerState,
    store: S,
    listeners: Vec<Listener>,
    seed_saved: Option<StoreResult<()>>,
}

impl<S: StateStore> Planner<S> {
    /// Loads state from `store`, seeding the starter potato on first run.
    pub fn open(store: S) -> Self {
        let state = store.load();
        let mut planner = Self {
            state,
            store,
            listeners: Vec::new(),
            seed_saved: None,
        };

        if planner.state.potatoes.is_empty() {
            let starter = Potato::with_level(catalog::starter(), STARTER_POTATO_LEVEL);
            let potato_id = starter.id;
            planner.state.potatoes.push(starter);
            planner.state.equip_potato(potato_id);
            info!(
                "event=starter_seeded module=planner status=ok species={} level={}",
                catalog::starter().id,
                STARTER_POTATO_LEVEL
            );
            let saved = planner.commit(PlannerEvent::StarterSeeded(potato_id));
            planner.seed_saved = Some(saved);
        }

        planner
    }

    /// Outcome of the starter seed save made by `open`.
    ///
    /// `None` when the loaded state already owned a potato.
    pub fn seed_save(&self) -> Option<&StoreResult<()>> {
        self.seed_saved.as_ref()
    }

    /// Registers a callback invoked after every mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&PlannerEvent) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn state(&self) -> &PlannerState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn spuds(&self) -> i64 {
        self.state.spuds
    }

    pub fn active_session(&self) -> Option<&ActiveSession> {
        self.state.session.active()
    }

    // Mutations

    pub fn add_task(&mut self, draft: &TaskDraft) -> Persisted<TaskId> {
        let task_id = self.state.add_task(draft);
        let saved = self.commit(PlannerEvent::TaskAdded(task_id));
        Persisted {
            value: task_id,
            saved,
        }
    }

    /// Returns `false` in `value` when the task does not exist.
    pub fn edit_task(&mut self, task_id: TaskId, draft: &TaskDraft) -> Persisted<bool> {
        let edited = self.state.edit_task(task_id, draft);
        let saved = self.commit_if(edited.then_some(PlannerEvent::TaskEdited(task_id)));
        Persisted {
            value: edited,
            saved,
        }
    }

    pub fn delete_task(&mut self, task_id: TaskId) -> Persisted<bool> {
        let deleted = self.state.delete_task(task_id);
        let saved = self.commit_if(deleted.then_some(PlannerEvent::TaskDeleted(task_id)));
        Persisted {
            value: deleted,
            saved,
        }
    }

    pub fn start_session(&mut self, task_id: TaskId, now: DateTime<Utc>) -> Persisted<()> {
        if let Some(previous) = self.state.session.active() {
            warn!(
                "event=session_start module=planner status=replaced discarded_seconds={}",
                previous.elapsed_seconds(now)
            );
        }
        self.state.start_session(task_id, now);
        let saved = self.commit(PlannerEvent::SessionStarted(task_id));
        Persisted { value: (), saved }
    }

    pub fn finish_session(&mut self, now: DateTime<Utc>) -> Persisted<Option<SessionReport>> {
        let report = self.state.finish_session(now);
        if let Some(report) = &report {
            info!(
                "event=session_finish module=planner status=ok elapsed_seconds={} spuds_earned={} levels_gained={}",
                report.elapsed_seconds, report.spuds_earned, report.levels_gained
            );
        }
        let saved = self.commit_if(report.map(PlannerEvent::SessionFinished));
        Persisted {
            value: report,
            saved,
        }
    }

    /// Buys a species without checking the balance; see `can_afford`.
    pub fn buy_potato(&mut self, species_id: &str) -> Persisted<Option<PotatoId>> {
        let bought = self.state.buy_potato(species_id);
        if bought.is_none() {
            warn!(
                "event=potato_buy module=planner status=ignored reason=unknown_species species={species_id}"
            );
        }
        let saved = self.commit_if(bought.map(PlannerEvent::PotatoBought));
        Persisted {
            value: bought,
            saved,
        }
    }

    pub fn equip_potato(&mut self, potato_id: PotatoId) -> Persisted<()> {
        self.state.equip_potato(potato_id);
        let saved = self.commit(PlannerEvent::PotatoEquipped(potato_id));
        Persisted { value: (), saved }
    }

    // Projections

    /// Tasks scheduled on `day`, in stored order.
    pub fn tasks_scheduled(&self, day: NaiveDate) -> Vec<&Task> {
        self.state.tasks_on(day).collect()
    }

    /// Sum of allocated focus seconds over the tasks of `day`.
    pub fn total_allocated_seconds(&self, day: NaiveDate) -> i64 {
        self.state
            .tasks_on(day)
            .fold(0i64, |total, task| total.saturating_add(task.allocated_seconds))
    }

    /// First owned potato of `species_id`.
    pub fn owned_potato(&self, species_id: &str) -> Option<&Potato> {
        self.state
            .potatoes
            .iter()
            .find(|potato| potato.species_id == species_id)
    }

    pub fn is_equipped(&self, potato_id: PotatoId) -> bool {
        self.state.equipped_potato_id == Some(potato_id)
    }

    pub fn equipped_potato(&self) -> Option<&Potato> {
        self.state.equipped_potato()
    }

    /// `None` for species the catalog does not know.
    pub fn can_afford(&self, species_id: &str) -> Option<bool> {
        catalog::lookup(species_id).map(|species| self.state.spuds >= species.cost)
    }

    pub fn shop_action(&self, species_id: &str) -> Option<ShopAction> {
        let species = catalog::lookup(species_id)?;
        let action = match self.owned_potato(species.id) {
            Some(potato) if self.is_equipped(potato.id) => ShopAction::Equipped,
            Some(potato) => ShopAction::Equip(potato.id),
            None => ShopAction::Buy {
                affordable: self.state.spuds >= species.cost,
            },
        };
        Some(action)
    }

    fn commit(&mut self, event: PlannerEvent) -> StoreResult<()> {
        self.commit_if(Some(event))
    }

    /// Saves, then notifies listeners when the mutation applied.
    fn commit_if(&mut self, event: Option<PlannerEvent>) -> StoreResult<()> {
        let saved = self.store.save(&self.state);
        if let Some(event) = event {
            for listener in &mut self.listeners {
                listener(&event);
            }
        }
        saved
    }
}

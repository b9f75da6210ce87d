//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose planner intents and projections to Dart via FRB.
//! - Enforce presentation preconditions (non-blank titles, affordability,
//!   ownership on equip) before calling into the core.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - One planner instance per process; calls are serialized by a mutex.
//! - Ids cross the boundary as UUID strings, days as `YYYY-MM-DD`.

use chrono::{NaiveDate, Utc};
use log::warn;
use potato_core::catalog;
use potato_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    JsonFileStore, Persisted, Planner, ShopAction, TaskDraft,
};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

const STATE_FILE_NAME: &str = "potato_planner_state.json";
const STATE_PATH_ENV: &str = "POTATO_PLANNER_STATE_PATH";
const DAY_FORMAT: &str = "%Y-%m-%d";

static PLANNER: Mutex<Option<Planner<JsonFileStore>>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Generic action response envelope for planner intents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerActionResponse {
    /// Whether the intent was applied.
    pub ok: bool,
    /// Whether the resulting state reached disk.
    pub saved: bool,
    /// Id of the created or targeted entity, when there is one.
    pub id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl PlannerActionResponse {
    fn applied<T>(message: &str, id: Option<String>, persisted: &Persisted<T>) -> Self {
        let message = match persisted.save_error() {
            Some(err) => format!("{message} (not saved: {err})"),
            None => message.to_string(),
        };
        Self {
            ok: true,
            saved: persisted.is_saved(),
            id,
            message,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            saved: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Task row for list rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub allocated_seconds: i64,
    pub completed_seconds: i64,
    /// Calendar day as `YYYY-MM-DD`.
    pub scheduled_date: String,
    pub is_complete: bool,
}

/// Owned potato row for the collection and main views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PotatoItem {
    pub id: String,
    pub species_id: String,
    pub name: String,
    pub level: u32,
    pub fertilizer: i64,
    /// Fertilizer needed for the next level; `None` for unknown species.
    pub fertilizer_needed: Option<i64>,
    pub is_max_level: bool,
    pub is_equipped: bool,
    pub image_name: Option<String>,
}

/// Catalog row with the action the shop should offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesItem {
    pub id: String,
    pub display_name: String,
    pub plant_type: String,
    pub plant_info: String,
    pub max_level: u32,
    pub cost: i64,
    /// One of `buy|equip|equipped`.
    pub action: String,
    /// Only meaningful for `buy`.
    pub affordable: bool,
}

/// Full read model for one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerSnapshot {
    pub spuds: i64,
    pub tasks: Vec<TaskItem>,
    pub potatoes: Vec<PotatoItem>,
    pub equipped_potato_id: Option<String>,
    pub active_task_id: Option<String>,
    /// Session start in epoch milliseconds.
    pub active_started_at_ms: Option<i64>,
}

/// Tasks of one day plus their total planned focus time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayAgenda {
    pub items: Vec<TaskItem>,
    pub total_allocated_seconds: i64,
    pub message: String,
}

/// Result of finishing a focus session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFinishResponse {
    pub ok: bool,
    pub saved: bool,
    pub elapsed_seconds: i64,
    pub spuds_earned: i64,
    pub levels_gained: u32,
    pub message: String,
}

/// Opens (or reopens) the planner on `state_path`.
///
/// Blank paths fall back to `$POTATO_PLANNER_STATE_PATH`, then to a file in
/// the system temp directory.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_open(state_path: String) -> PlannerActionResponse {
    let path = resolve_state_path(state_path.as_str());
    let planner = Planner::open(JsonFileStore::new(&path));
    // Nothing is written when an existing collection was loaded.
    let (saved, message) = match planner.seed_save() {
        Some(Err(err)) => (
            false,
            format!("Planner opened at {} (not saved: {err}).", path.display()),
        ),
        _ => (true, format!("Planner opened at {}.", path.display())),
    };
    let mut guard = lock_planner();
    *guard = Some(planner);
    PlannerActionResponse {
        ok: true,
        saved,
        id: None,
        message,
    }
}

/// Returns the full planner read model.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_snapshot() -> PlannerSnapshot {
    with_planner(|planner| {
        let state = planner.state();
        let session = planner.active_session();
        PlannerSnapshot {
            spuds: state.spuds,
            tasks: state.tasks.iter().map(to_task_item).collect(),
            potatoes: state
                .potatoes
                .iter()
                .map(|potato| to_potato_item(potato, planner.is_equipped(potato.id)))
                .collect(),
            equipped_potato_id: state.equipped_potato_id.map(|id| id.to_string()),
            active_task_id: session.map(|session| session.task_id.to_string()),
            active_started_at_ms: session.map(|session| session.started_at.timestamp_millis()),
        }
    })
}

/// Lists tasks scheduled on `day` (`YYYY-MM-DD`).
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_for_day(day: String) -> DayAgenda {
    let day = match parse_day(day.as_str()) {
        Ok(day) => day,
        Err(message) => {
            return DayAgenda {
                items: Vec::new(),
                total_allocated_seconds: 0,
                message,
            }
        }
    };
    with_planner(|planner| {
        let items: Vec<TaskItem> = planner
            .tasks_scheduled(day)
            .into_iter()
            .map(to_task_item)
            .collect();
        let message = if items.is_empty() {
            "No tasks.".to_string()
        } else {
            format!("Found {} task(s).", items.len())
        };
        DayAgenda {
            items,
            total_allocated_seconds: planner.total_allocated_seconds(day),
            message,
        }
    })
}

/// Creates a task.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(
    title: String,
    description: Option<String>,
    allocated_seconds: i64,
    scheduled_date: String,
) -> PlannerActionResponse {
    let draft = match build_draft(title, description, allocated_seconds, &scheduled_date) {
        Ok(draft) => draft,
        Err(message) => {
            return PlannerActionResponse::failure(format!("task_add failed: {message}"))
        }
    };
    with_planner(|planner| {
        let persisted = planner.add_task(&draft);
        let task_id = persisted.value.to_string();
        PlannerActionResponse::applied("Task created.", Some(task_id), &persisted)
    })
}

/// Replaces a task's editable fields, keeping its progress.
#[flutter_rust_bridge::frb(sync)]
pub fn task_edit(
    task_id: String,
    title: String,
    description: Option<String>,
    allocated_seconds: i64,
    scheduled_date: String,
) -> PlannerActionResponse {
    let task_id = match parse_id(task_id.as_str()) {
        Ok(id) => id,
        Err(message) => {
            return PlannerActionResponse::failure(format!("task_edit failed: {message}"))
        }
    };
    let draft = match build_draft(title, description, allocated_seconds, &scheduled_date) {
        Ok(draft) => draft,
        Err(message) => {
            return PlannerActionResponse::failure(format!("task_edit failed: {message}"))
        }
    };
    with_planner(|planner| {
        if planner.state().task(task_id).is_none() {
            return PlannerActionResponse::failure(format!(
                "task_edit failed: task not found: {task_id}"
            ));
        }
        let persisted = planner.edit_task(task_id, &draft);
        PlannerActionResponse::applied("Task updated.", Some(task_id.to_string()), &persisted)
    })
}

/// Deletes a task; a session running on it is dropped without credit.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(task_id: String) -> PlannerActionResponse {
    let task_id = match parse_id(task_id.as_str()) {
        Ok(id) => id,
        Err(message) => {
            return PlannerActionResponse::failure(format!("task_delete failed: {message}"))
        }
    };
    with_planner(|planner| {
        let persisted = planner.delete_task(task_id);
        if !persisted.value {
            return PlannerActionResponse::failure(format!(
                "task_delete failed: task not found: {task_id}"
            ));
        }
        PlannerActionResponse::applied("Task deleted.", Some(task_id.to_string()), &persisted)
    })
}

/// Starts a focus session on a task at the current time.
#[flutter_rust_bridge::frb(sync)]
pub fn session_start(task_id: String) -> PlannerActionResponse {
    let task_id = match parse_id(task_id.as_str()) {
        Ok(id) => id,
        Err(message) => {
            return PlannerActionResponse::failure(format!("session_start failed: {message}"))
        }
    };
    with_planner(|planner| {
        if planner.state().task(task_id).is_none() {
            return PlannerActionResponse::failure(format!(
                "session_start failed: task not found: {task_id}"
            ));
        }
        let persisted = planner.start_session(task_id, Utc::now());
        PlannerActionResponse::applied("Session started.", Some(task_id.to_string()), &persisted)
    })
}

/// Finishes the running session at the current time.
#[flutter_rust_bridge::frb(sync)]
pub fn session_finish() -> SessionFinishResponse {
    with_planner(|planner| {
        let persisted = planner.finish_session(Utc::now());
        let saved = persisted.is_saved();
        match persisted.value {
            Some(report) => SessionFinishResponse {
                ok: true,
                saved,
                elapsed_seconds: report.elapsed_seconds,
                spuds_earned: report.spuds_earned,
                levels_gained: report.levels_gained,
                message: "Session finished.".to_string(),
            },
            None => SessionFinishResponse {
                ok: false,
                saved,
                elapsed_seconds: 0,
                spuds_earned: 0,
                levels_gained: 0,
                message: "No active session.".to_string(),
            },
        }
    })
}

/// Lists catalog species with the shop action for each.
#[flutter_rust_bridge::frb(sync)]
pub fn species_list() -> Vec<SpeciesItem> {
    with_planner(|planner| {
        catalog::all()
            .iter()
            .filter_map(|species| {
                let (action, affordable) = match planner.shop_action(species.id) {
                    Some(ShopAction::Buy { affordable }) => ("buy", affordable),
                    Some(ShopAction::Equip(_)) => ("equip", false),
                    Some(ShopAction::Equipped) => ("equipped", false),
                    None => {
                        warn!(
                            "event=species_list module=ffi status=skipped reason=unknown_species species={}",
                            species.id
                        );
                        return None;
                    }
                };
                Some(SpeciesItem {
                    id: species.id.to_string(),
                    display_name: species.display_name.to_string(),
                    plant_type: species.plant_type.to_string(),
                    plant_info: species.plant_info.to_string(),
                    max_level: species.max_level,
                    cost: species.cost,
                    action: action.to_string(),
                    affordable,
                })
            })
            .collect()
    })
}

/// Buys one potato of `species_id` when the balance covers its cost.
#[flutter_rust_bridge::frb(sync)]
pub fn potato_buy(species_id: String) -> PlannerActionResponse {
    let species_id = species_id.trim().to_string();
    with_planner(|planner| {
        match planner.can_afford(species_id.as_str()) {
            None => {
                return PlannerActionResponse::failure(format!(
                    "potato_buy failed: unknown species `{species_id}`"
                ))
            }
            Some(false) => {
                return PlannerActionResponse::failure(format!(
                    "potato_buy failed: not enough spuds for `{species_id}`"
                ))
            }
            Some(true) => {}
        }
        let persisted = planner.buy_potato(species_id.as_str());
        let id = persisted.value.map(|id| id.to_string());
        PlannerActionResponse::applied("Potato bought.", id, &persisted)
    })
}

/// Equips an owned potato.
#[flutter_rust_bridge::frb(sync)]
pub fn potato_equip(potato_id: String) -> PlannerActionResponse {
    let potato_id = match parse_id(potato_id.as_str()) {
        Ok(id) => id,
        Err(message) => {
            return PlannerActionResponse::failure(format!("potato_equip failed: {message}"))
        }
    };
    with_planner(|planner| {
        if planner.state().potato(potato_id).is_none() {
            return PlannerActionResponse::failure(format!(
                "potato_equip failed: potato not owned: {potato_id}"
            ));
        }
        let persisted = planner.equip_potato(potato_id);
        PlannerActionResponse::applied("Potato equipped.", Some(potato_id.to_string()), &persisted)
    })
}

fn lock_planner() -> MutexGuard<'static, Option<Planner<JsonFileStore>>> {
    match PLANNER.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!("event=planner_lock module=ffi status=recovered reason=poisoned");
            poisoned.into_inner()
        }
    }
}

fn with_planner<T>(f: impl FnOnce(&mut Planner<JsonFileStore>) -> T) -> T {
    let mut guard = lock_planner();
    let planner = guard.get_or_insert_with(|| {
        Planner::open(JsonFileStore::new(resolve_state_path("")))
    });
    f(planner)
}

fn resolve_state_path(requested: &str) -> PathBuf {
    let trimmed = requested.trim();
    if !trimmed.is_empty() {
        return PathBuf::from(trimmed);
    }
    if let Ok(raw) = std::env::var(STATE_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(STATE_FILE_NAME)
}

fn build_draft(
    title: String,
    description: Option<String>,
    allocated_seconds: i64,
    scheduled_date: &str,
) -> Result<TaskDraft, String> {
    let day = parse_day(scheduled_date)?;
    let draft = TaskDraft::new(title, description, allocated_seconds, day).normalized();
    draft.validate().map_err(|err| err.to_string())?;
    Ok(draft)
}

fn parse_day(value: &str) -> Result<NaiveDate, String> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, DAY_FORMAT)
        .map_err(|_| format!("invalid day `{trimmed}`; expected YYYY-MM-DD"))
}

fn parse_id(value: &str) -> Result<Uuid, String> {
    let trimmed = value.trim();
    Uuid::parse_str(trimmed).map_err(|_| format!("invalid id `{trimmed}`"))
}

fn to_task_item(task: &potato_core::Task) -> TaskItem {
    TaskItem {
        id: task.id.to_string(),
        title: task.title.clone(),
        description: task.description.clone(),
        allocated_seconds: task.allocated_seconds,
        completed_seconds: task.completed_seconds,
        scheduled_date: task.scheduled_date.format(DAY_FORMAT).to_string(),
        is_complete: task.is_complete(),
    }
}

fn to_potato_item(potato: &potato_core::Potato, is_equipped: bool) -> PotatoItem {
    let progress = potato.progress();
    PotatoItem {
        id: potato.id.to_string(),
        species_id: potato.species_id.clone(),
        name: potato.name.clone(),
        level: potato.level,
        fertilizer: progress.map_or(potato.fertilizer, |progress| progress.fertilizer),
        fertilizer_needed: progress.map(|progress| progress.needed),
        is_max_level: potato.is_max_level(),
        is_equipped,
        image_name: potato.image_name(),
    }
}

//! Core domain logic for Potato Planner.
//! This crate is the single source of truth for planner and economy invariants.

pub mod catalog;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use catalog::{PotatoSpecies, STARTER_SPECIES_ID};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::potato::{LevelProgress, Potato, PotatoId};
pub use model::session::{ActiveSession, SessionState};
pub use model::state::{PlannerState, SessionReport};
pub use model::task::{Task, TaskDraft, TaskDraftError, TaskId};
pub use service::planner::{Persisted, Planner, PlannerEvent, ShopAction, STARTER_POTATO_LEVEL};
pub use store::{InMemoryStore, JsonFileStore, StateStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

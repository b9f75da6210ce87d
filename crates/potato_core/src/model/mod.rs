//! Planner domain model.
//!
//! # Responsibility
//! - Define value entities (task, potato, focus session).
//! - Define the `PlannerState` aggregate and its economy rules.
//!
//! # Invariants
//! - Every task and potato is identified by a stable UUID.
//! - Potatoes are never deleted; tasks are hard-deleted.

pub mod economy;
pub mod potato;
pub mod session;
pub mod state;
pub mod task;

//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `potato_core` linkage.
//! - Summarize a planner snapshot file without modifying it.
//! - Keep output deterministic for quick local sanity checks.

use potato_core::{JsonFileStore, StateStore};

fn main() {
    println!("potato_core ping={}", potato_core::ping());
    println!("potato_core version={}", potato_core::core_version());

    // Read-only: load never writes and never seeds the starter potato.
    if let Some(path) = std::env::args().nth(1) {
        let state = JsonFileStore::new(&path).load();
        let equipped = state
            .equipped_potato()
            .map(|potato| format!("{}@{}", potato.name, potato.level))
            .unwrap_or_else(|| "none".to_string());
        println!(
            "snapshot path={} tasks={} potatoes={} spuds={} equipped={} session={}",
            path,
            state.tasks.len(),
            state.potatoes.len(),
            state.spuds,
            equipped,
            if state.session.is_active() { "active" } else { "idle" }
        );
    }
}

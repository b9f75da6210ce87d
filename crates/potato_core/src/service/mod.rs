//! Core use-case services.
//!
//! # Responsibility
//! - Wrap state mutations with persistence and change notification.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod planner;

// src/config/mod.rs

//! Plan-file loading and validation.
//!
//! Responsibilities:
//! - Define the YAML-backed data model (`model.rs`).
//! - Load a plan file from disk (`loader.rs`).
//! - Validate strategies, modes and group references (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{GroupEntry, PlanFile, RawGroupEntry, RawPlanFile, RawTaskEntry, TaskEntry};

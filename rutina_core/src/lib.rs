#![forbid(unsafe_code)]

//! Core domain model and business logic for the Rutina gym tracker.
//!
//! This crate provides:
//! - Domain types (weekdays, exercises, routines, weight logs)
//! - Day grouping and the muscle-group exercise catalog
//! - Drafts that validate raw input into records
//! - PDF export (layout + rendering)
//! - Persistence (routine store, weight log JSONL, CSV export)

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod grouping;
pub mod draft;
pub mod layout;
pub mod export;
pub mod store;
pub mod weight_log;
pub mod weight_export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::MuscleGroup;
pub use config::Config;
pub use grouping::{group_by_day, DayGroups, DayOrder};
pub use draft::{ExerciseDraft, RoutineDraft, WeightLogDraft};
pub use layout::{layout_routine, DocumentLayout, ExportOptions};
pub use export::{export_routine, routine_file_name};
pub use store::{FileRoutineStore, RoutineStore, WeightLogStore};
pub use weight_log::JsonlWeightLogStore;

//! Domain model for tasks, notes, journal entries and calendar projections.
//!
//! # Responsibility
//! - Define the plain data records owned by the stores.
//! - Keep JSON wire naming stable for whole-collection persistence.
//!
//! # Invariants
//! - Every top-level record is identified by a stable, non-nil id.
//! - Subtasks and comments live inside their parent task only.

pub mod calendar;
pub mod journal;
pub mod note;
pub mod task;
pub mod validation;

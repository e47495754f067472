//! Stores that own the application's collections.
//!
//! # Responsibility
//! - Apply validated mutations and persist whole collections.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod journal_store;
pub mod note_store;
pub mod ordering;
pub mod task_store;

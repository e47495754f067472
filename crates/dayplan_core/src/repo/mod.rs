//! Persistence gateway abstractions and implementations.
//!
//! # Responsibility
//! - Define the key-value contract every store persists through.
//! - Isolate SQLite details from store/business orchestration.
//!
//! # Invariants
//! - Every store mutation re-serializes its entire collection; there are
//!   no incremental writes.

pub mod kv_repo;

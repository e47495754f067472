//! Core data management for Dayplan: tasks, notes, journal and calendar.
//! This crate is the single source of truth for business invariants.

pub mod calendar;
pub mod clock;
pub mod config;
pub mod context;
pub mod db;
pub mod interchange;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use calendar::aggregator::{CalendarAggregator, CalendarWindow};
pub use calendar::gateway::{
    CalendarError, CalendarGateway, CalendarResult, InMemoryCalendarGateway,
};
pub use calendar::service::CalendarService;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, CoreConfig};
pub use context::{ContextError, CoreContext};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::calendar::{CalendarEvent, CalendarItem, EventDraft};
pub use model::journal::{journal_key, JournalEntry};
pub use model::note::{Note, NoteId, NoteSortOption};
pub use model::task::{
    Category, Comment, Priority, RecurrenceFrequency, SortOption, Subtask, Task, TaskColor, TaskId,
};
pub use model::validation::ValidationError;
pub use repo::kv_repo::{
    KeyValueStore, MemoryKvStore, PersistenceError, PersistenceResult, SqliteKvStore,
};
pub use service::journal_store::JournalStore;
pub use service::note_store::{NoteStore, NoteStoreError, NoteStoreResult};
pub use service::ordering::MoveError;
pub use service::task_store::{
    compare_priority_labels, ImportReport, TaskFilter, TaskStore, TaskStoreError,
    TaskStoreResult,
};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

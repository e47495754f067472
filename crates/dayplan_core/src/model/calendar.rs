//! Calendar event records and the task/event display projection.
//!
//! # Responsibility
//! - Describe events owned by the external calendar.
//! - Provide `CalendarItem`, the read-time union used by the aggregator.
//!
//! # Invariants
//! - `end >= start` for every accepted event or draft.
//! - `CalendarItem` has no identity of its own; it delegates to the
//!   wrapped record.

use crate::model::task::Task;
use crate::model::validation::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event stored in the platform calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Opaque identifier assigned by the calendar.
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl CalendarEvent {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_window(self.start, self.end)
    }

    /// Whether the event touches the closed range `[start, end]`.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start <= end && self.end >= start
    }
}

/// Input for creating a new calendar event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl EventDraft {
    pub fn new(title: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            start,
            end,
            location: None,
            notes: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_window(self.start, self.end)
    }
}

/// One row in the merged calendar list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarItem {
    Task(Task),
    Event(CalendarEvent),
}

impl CalendarItem {
    pub fn id(&self) -> String {
        match self {
            Self::Task(task) => task.id.to_string(),
            Self::Event(event) => event.id.clone(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Task(task) => task.title.as_str(),
            Self::Event(event) => event.title.as_str(),
        }
    }

    /// Sort key. Unscheduled tasks report the earliest representable instant.
    pub fn start(&self) -> DateTime<Utc> {
        match self {
            Self::Task(task) => task.due_date.unwrap_or(DateTime::<Utc>::MIN_UTC),
            Self::Event(event) => event.start,
        }
    }

    pub fn is_task(&self) -> bool {
        matches!(self, Self::Task(_))
    }
}

fn validate_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), ValidationError> {
    if end < start {
        return Err(ValidationError::InvalidEventWindow { start, end });
    }
    Ok(())
}

//! Calendar gateway contract and in-memory implementation.
//!
//! Platform calendars answer asynchronously; the UI layer marshals those
//! callbacks onto the owning thread before calling in, so the contract here
//! is synchronous.

use crate::interchange::csv_codec::CsvError;
use crate::model::calendar::{CalendarEvent, EventDraft};
use crate::model::validation::ValidationError;
use chrono::{DateTime, Utc};
use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CalendarResult<T> = Result<T, CalendarError>;

#[derive(Debug)]
pub enum CalendarError {
    /// The user refused calendar access.
    AccessDenied,
    Validation(ValidationError),
    EventNotFound(String),
    /// Platform-side failure, passed through verbatim.
    Gateway(String),
    Csv(CsvError),
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccessDenied => write!(f, "calendar access denied"),
            Self::Validation(err) => write!(f, "invalid event: {err}"),
            Self::EventNotFound(id) => write!(f, "calendar event not found: {id}"),
            Self::Gateway(message) => write!(f, "calendar gateway error: {message}"),
            Self::Csv(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CalendarError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Csv(err) => Some(err),
            Self::AccessDenied | Self::EventNotFound(_) | Self::Gateway(_) => None,
        }
    }
}

impl From<ValidationError> for CalendarError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<CsvError> for CalendarError {
    fn from(value: CsvError) -> Self {
        Self::Csv(value)
    }
}

/// Platform calendar operations consumed by the core.
pub trait CalendarGateway {
    fn request_access(&self) -> CalendarResult<bool>;
    /// Events overlapping `[start, end]`.
    fn fetch_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CalendarResult<Vec<CalendarEvent>>;
    fn add_event(&self, draft: &EventDraft) -> CalendarResult<CalendarEvent>;
    fn save_event(&self, event: &CalendarEvent) -> CalendarResult<()>;
    fn delete_event(&self, event: &CalendarEvent) -> CalendarResult<()>;
}

impl<T: CalendarGateway + ?Sized> CalendarGateway for &T {
    fn request_access(&self) -> CalendarResult<bool> {
        (**self).request_access()
    }

    fn fetch_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CalendarResult<Vec<CalendarEvent>> {
        (**self).fetch_events(start, end)
    }

    fn add_event(&self, draft: &EventDraft) -> CalendarResult<CalendarEvent> {
        (**self).add_event(draft)
    }

    fn save_event(&self, event: &CalendarEvent) -> CalendarResult<()> {
        (**self).save_event(event)
    }

    fn delete_event(&self, event: &CalendarEvent) -> CalendarResult<()> {
        (**self).delete_event(event)
    }
}

/// Calendar kept in process memory, used for tests and offline previews.
#[derive(Debug)]
pub struct InMemoryCalendarGateway {
    events: RefCell<Vec<CalendarEvent>>,
    access_granted: Cell<bool>,
    next_id: Cell<u64>,
    fetch_calls: Cell<usize>,
}

impl Default for InMemoryCalendarGateway {
    fn default() -> Self {
        Self {
            events: RefCell::new(Vec::new()),
            access_granted: Cell::new(true),
            next_id: Cell::new(1),
            fetch_calls: Cell::new(0),
        }
    }
}

impl InMemoryCalendarGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_access_granted(&self, granted: bool) {
        self.access_granted.set(granted);
    }

    /// Seeds an event as if it already existed in the calendar.
    pub fn insert(&self, event: CalendarEvent) {
        self.events.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<CalendarEvent> {
        self.events.borrow().clone()
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.get()
    }
}

impl CalendarGateway for InMemoryCalendarGateway {
    fn request_access(&self) -> CalendarResult<bool> {
        Ok(self.access_granted.get())
    }

    fn fetch_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CalendarResult<Vec<CalendarEvent>> {
        self.fetch_calls.set(self.fetch_calls.get() + 1);
        let mut matching: Vec<CalendarEvent> = self
            .events
            .borrow()
            .iter()
            .filter(|event| event.overlaps(start, end))
            .cloned()
            .collect();
        matching.sort_by_key(|event| event.start);
        Ok(matching)
    }

    fn add_event(&self, draft: &EventDraft) -> CalendarResult<CalendarEvent> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let event = CalendarEvent {
            id: format!("mem-{id}"),
            title: draft.title.clone(),
            start: draft.start,
            end: draft.end,
            location: draft.location.clone(),
            notes: draft.notes.clone(),
        };
        self.events.borrow_mut().push(event.clone());
        Ok(event)
    }

    fn save_event(&self, event: &CalendarEvent) -> CalendarResult<()> {
        let mut events = self.events.borrow_mut();
        let slot = events
            .iter_mut()
            .find(|stored| stored.id == event.id)
            .ok_or_else(|| CalendarError::EventNotFound(event.id.clone()))?;
        *slot = event.clone();
        Ok(())
    }

    fn delete_event(&self, event: &CalendarEvent) -> CalendarResult<()> {
        let mut events = self.events.borrow_mut();
        let index = events
            .iter()
            .position(|stored| stored.id == event.id)
            .ok_or_else(|| CalendarError::EventNotFound(event.id.clone()))?;
        events.remove(index);
        Ok(())
    }
}

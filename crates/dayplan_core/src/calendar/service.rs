//! Calendar use-case service.
//!
//! # Responsibility
//! - Gate every calendar write behind an access request.
//! - Validate event windows before they reach the gateway.
//! - Export upcoming events as CSV.
//!
//! # Invariants
//! - Failures are logged and returned; nothing is retried.

use crate::calendar::gateway::{CalendarError, CalendarGateway, CalendarResult};
use crate::clock::Clock;
use crate::interchange::csv_codec::{format_short_date, write_document};
use crate::model::calendar::{CalendarEvent, EventDraft};
use chrono::{DateTime, Months, Utc};
use log::{error, info, warn};

pub const EVENT_CSV_HEADER: [&str; 4] = ["Title", "Start Date", "End Date", "Notes"];
const UNTITLED_EVENT: &str = "No Title";

pub struct CalendarService<G: CalendarGateway> {
    gateway: G,
}

impl<G: CalendarGateway> CalendarService<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn request_access(&self) -> CalendarResult<bool> {
        self.gateway.request_access()
    }

    pub fn fetch_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CalendarResult<Vec<CalendarEvent>> {
        self.gateway.fetch_events(start, end)
    }

    pub fn add_event(&self, draft: &EventDraft) -> CalendarResult<CalendarEvent> {
        self.ensure_access("event_add")?;
        draft.validate()?;
        let result = self.gateway.add_event(draft);
        log_outcome("event_add", &result);
        result
    }

    pub fn save_event(&self, event: &CalendarEvent) -> CalendarResult<()> {
        self.ensure_access("event_save")?;
        event.validate()?;
        let result = self.gateway.save_event(event);
        log_outcome("event_save", &result);
        result
    }

    pub fn delete_event(&self, event: &CalendarEvent) -> CalendarResult<()> {
        self.ensure_access("event_delete")?;
        let result = self.gateway.delete_event(event);
        log_outcome("event_delete", &result);
        result
    }

    /// Events from the clock's now to one year ahead as CSV.
    ///
    /// Dates are calendar days in the clock's zone.
    pub fn export_events<C: Clock>(&self, clock: &C) -> CalendarResult<String> {
        let now = clock.now();
        let end = now
            .checked_add_months(Months::new(12))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let events = self.gateway.fetch_events(now, end)?;
        let day = |instant: DateTime<Utc>| format_short_date(clock.local_date(instant));
        let rows = events.iter().map(|event| {
            let title = if event.title.trim().is_empty() {
                UNTITLED_EVENT.to_string()
            } else {
                event.title.clone()
            };
            vec![
                title,
                day(event.start),
                day(event.end),
                event.notes.clone().unwrap_or_default(),
            ]
        });
        let text = write_document(&EVENT_CSV_HEADER, rows)?;
        info!(
            "event=events_export module=calendar status=ok row_count={}",
            events.len()
        );
        Ok(text)
    }

    fn ensure_access(&self, event: &'static str) -> CalendarResult<()> {
        match self.gateway.request_access() {
            Ok(true) => Ok(()),
            Ok(false) => {
                warn!("event={event} module=calendar status=denied");
                Err(CalendarError::AccessDenied)
            }
            Err(err) => {
                error!("event={event} module=calendar status=error error_code=access_failed error={err}");
                Err(err)
            }
        }
    }
}

fn log_outcome<T>(event: &'static str, result: &CalendarResult<T>) {
    match result {
        Ok(_) => info!("event={event} module=calendar status=ok"),
        Err(err) => error!("event={event} module=calendar status=error error={err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::CalendarService;
    use crate::calendar::gateway::{CalendarError, InMemoryCalendarGateway};
    use crate::model::calendar::EventDraft;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn writes_require_access() {
        let gateway = InMemoryCalendarGateway::new();
        gateway.set_access_granted(false);
        let service = CalendarService::new(&gateway);
        let start = Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap();

        let err = service
            .add_event(&EventDraft::new("review", start, start + Duration::hours(1)))
            .unwrap_err();
        assert!(matches!(err, CalendarError::AccessDenied));
        assert!(gateway.events().is_empty());
    }

    #[test]
    fn reversed_window_is_rejected_before_gateway() {
        let gateway = InMemoryCalendarGateway::new();
        let service = CalendarService::new(&gateway);
        let start = Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap();

        let err = service
            .add_event(&EventDraft::new("review", start, start - Duration::hours(1)))
            .unwrap_err();
        assert!(matches!(err, CalendarError::Validation(_)));
        assert!(gateway.events().is_empty());
    }
}

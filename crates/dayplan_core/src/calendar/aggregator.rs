//! Merged task/event timeline for the calendar view.
//!
//! # Invariants
//! - The window is `[start_of_day(selected), start_of_day(selected + days)]`,
//!   closed at both ends, for tasks and events alike. Days are calendar
//!   days, so a window across a DST change is not a multiple of 24 hours.
//! - Output is stably sorted by start; on ties tasks keep precedence over
//!   events and each source keeps its own order.
//! - Unscheduled tasks never appear.

use crate::calendar::gateway::{CalendarGateway, CalendarResult};
use crate::clock::Clock;
use crate::model::calendar::CalendarItem;
use crate::model::task::Task;
use crate::repo::kv_repo::KeyValueStore;
use crate::service::task_store::TaskStore;
use chrono::{DateTime, Days, NaiveDate, Utc};
use log::debug;

/// Preset window lengths offered by the calendar view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CalendarWindow {
    #[default]
    ThreeDays,
    OneWeek,
    TwoWeeks,
    OneMonth,
}

impl CalendarWindow {
    pub const ALL: [CalendarWindow; 4] = [
        CalendarWindow::ThreeDays,
        CalendarWindow::OneWeek,
        CalendarWindow::TwoWeeks,
        CalendarWindow::OneMonth,
    ];

    pub fn days(self) -> u32 {
        match self {
            Self::ThreeDays => 3,
            Self::OneWeek => 7,
            Self::TwoWeeks => 14,
            Self::OneMonth => 30,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ThreeDays => "3 Days",
            Self::OneWeek => "1 Week",
            Self::TwoWeeks => "2 Weeks",
            Self::OneMonth => "1 Month",
        }
    }
}

/// Stateless merger of task-store items and gateway events.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarAggregator;

impl CalendarAggregator {
    /// Window bounds for `selected` spanning `days` days.
    pub fn window<C: Clock>(clock: &C, selected: NaiveDate, days: u32) -> (DateTime<Utc>, DateTime<Utc>) {
        let last = selected
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MAX);
        (clock.start_of_day(selected), clock.start_of_day(last))
    }

    /// Tasks due inside `[start, end]`, in collection order.
    pub fn scheduled_tasks<S, C>(
        tasks: &TaskStore<S, C>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<Task>
    where
        S: KeyValueStore,
        C: Clock,
    {
        tasks
            .tasks()
            .iter()
            .filter(|task| task.due_date.is_some_and(|due| start <= due && due <= end))
            .cloned()
            .collect()
    }

    /// Scheduled tasks and calendar events inside the window, by start time.
    pub fn items<S, C, G>(
        tasks: &TaskStore<S, C>,
        gateway: &G,
        selected: NaiveDate,
        days: u32,
    ) -> CalendarResult<Vec<CalendarItem>>
    where
        S: KeyValueStore,
        C: Clock,
        G: CalendarGateway + ?Sized,
    {
        let (start, end) = Self::window(tasks.clock(), selected, days);

        let mut items: Vec<CalendarItem> = Self::scheduled_tasks(tasks, start, end)
            .into_iter()
            .map(CalendarItem::Task)
            .collect();
        let task_count = items.len();
        items.extend(
            gateway
                .fetch_events(start, end)?
                .into_iter()
                .map(CalendarItem::Event),
        );
        items.sort_by_key(CalendarItem::start);

        debug!(
            "event=calendar_aggregate module=calendar status=ok days={days} task_count={task_count} event_count={}",
            items.len() - task_count
        );
        Ok(items)
    }
}

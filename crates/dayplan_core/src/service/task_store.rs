//! Task store: the authoritative task collection.
//!
//! # Responsibility
//! - Own tasks, the custom id order and the active sort option.
//! - Provide CRUD, sorting, CSV import/export and completion statistics.
//!
//! # Invariants
//! - A mutation rewrites exactly one key in full: `tasks` for collection
//!   changes, `customOrder` for `move_tasks`. One write per mutation keeps
//!   memory and storage in step when that write fails.
//! - In-memory state is replaced only after the write succeeds.
//! - An import is one write; a failed import persists none of its rows.
//! - Deleting a task leaves its id in the custom order; stale ids are
//!   skipped when sorting and dropped on the next `move_tasks`.
//! - Tasks without a due date sort after scheduled ones and never match a
//!   calendar day.

use crate::clock::Clock;
use crate::interchange::csv_codec::{
    format_short_date, parse_short_date, read_rows, write_document, CsvError,
};
use crate::model::task::{Category, Priority, SortOption, Task, TaskId};
use crate::model::validation::ValidationError;
use crate::repo::kv_repo::{
    load_json, save_json, KeyValueStore, PersistenceError, CUSTOM_ORDER_KEY, TASKS_KEY,
};
use crate::service::ordering::{move_items, MoveError};
use chrono::{Duration, NaiveDate};
use log::{error, info, warn};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Column header for task CSV import/export.
pub const TASK_CSV_HEADER: [&str; 5] = ["Title", "Due Date", "Priority", "Category", "Completed"];

pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

#[derive(Debug)]
pub enum TaskStoreError {
    Persistence(PersistenceError),
    Validation(ValidationError),
    InvalidMove(MoveError),
    /// Rendering CSV failed. Only `export_tasks` produces this; unreadable
    /// rows during `import_tasks` are counted in `ImportReport::skipped`.
    Csv(CsvError),
}

impl Display for TaskStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Persistence(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "invalid task: {err}"),
            Self::InvalidMove(err) => write!(f, "{err}"),
            Self::Csv(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::InvalidMove(err) => Some(err),
            Self::Csv(err) => Some(err),
        }
    }
}

impl From<PersistenceError> for TaskStoreError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

impl From<ValidationError> for TaskStoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<MoveError> for TaskStoreError {
    fn from(value: MoveError) -> Self {
        Self::InvalidMove(value)
    }
}

impl From<CsvError> for TaskStoreError {
    fn from(value: CsvError) -> Self {
        Self::Csv(value)
    }
}

/// Outcome of a CSV import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Rows turned into tasks.
    pub imported: usize,
    /// Rows dropped because they were unreadable or not exactly 5 fields.
    pub skipped: usize,
}

/// List-view narrowing applied on top of the active sort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub category: Option<Category>,
    /// Case-insensitive title substring; blank matches everything.
    pub search: String,
}

impl TaskFilter {
    fn matches(&self, task: &Task) -> bool {
        let category_ok = self.category.map_or(true, |c| task.category == c);
        let needle = self.search.trim().to_lowercase();
        category_ok && (needle.is_empty() || task.title.to_lowercase().contains(&needle))
    }
}

/// Orders priorities by display label, so "High" < "Low" < "Medium".
///
/// This is intentionally not severity order; it is what users of the list
/// view have always seen.
pub fn compare_priority_labels(a: Priority, b: Priority) -> Ordering {
    a.label().cmp(b.label())
}

/// Task collection backed by a key-value store.
pub struct TaskStore<S: KeyValueStore, C: Clock> {
    kv: S,
    clock: C,
    tasks: Vec<Task>,
    custom_order: Vec<TaskId>,
    sort_option: SortOption,
}

impl<S: KeyValueStore, C: Clock> TaskStore<S, C> {
    /// Loads persisted tasks and custom order. Missing keys start empty.
    pub fn load(kv: S, clock: C) -> TaskStoreResult<Self> {
        let tasks: Vec<Task> = load_json(&kv, TASKS_KEY)?.unwrap_or_default();
        let custom_order: Vec<TaskId> = load_json(&kv, CUSTOM_ORDER_KEY)?.unwrap_or_default();
        info!(
            "event=tasks_load module=task_store status=ok task_count={} custom_order_len={}",
            tasks.len(),
            custom_order.len()
        );
        Ok(Self {
            kv,
            clock,
            tasks,
            custom_order,
            sort_option: SortOption::default(),
        })
    }

    /// Tasks in collection (insertion) order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn custom_order(&self) -> &[TaskId] {
        &self.custom_order
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn sort_option(&self) -> SortOption {
        self.sort_option
    }

    pub fn set_sort_option(&mut self, option: SortOption) {
        self.sort_option = option;
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Appends a task. The caller guarantees a fresh id.
    pub fn add(&mut self, task: Task) -> TaskStoreResult<()> {
        task.validate()?;
        let mut tasks = self.tasks.clone();
        tasks.push(task);
        self.commit_tasks("task_add", tasks)
    }

    /// Replaces the task with the same id. Returns `false` when absent.
    pub fn update(&mut self, task: &Task) -> TaskStoreResult<bool> {
        task.validate()?;
        let Some(index) = self.position(task.id) else {
            return Ok(false);
        };
        let mut tasks = self.tasks.clone();
        tasks[index] = task.clone();
        self.commit_tasks("task_update", tasks)?;
        Ok(true)
    }

    /// Removes the task with `id`. Its id stays in the custom order.
    pub fn delete(&mut self, id: TaskId) -> TaskStoreResult<bool> {
        if self.position(id).is_none() {
            return Ok(false);
        }
        let tasks = self
            .tasks
            .iter()
            .filter(|task| task.id != id)
            .cloned()
            .collect();
        self.commit_tasks("task_delete", tasks)?;
        Ok(true)
    }

    /// Flips completion only; `completed_date` is the caller's business.
    pub fn toggle_complete(&mut self, id: TaskId) -> TaskStoreResult<bool> {
        self.modify("task_toggle", id, Task::toggle_complete)
    }

    /// Sets completion and stamps or clears `completed_date` with now.
    pub fn set_completed(&mut self, id: TaskId, completed: bool) -> TaskStoreResult<bool> {
        let now = self.clock.now();
        self.modify("task_set_completed", id, |task| task.set_completed(completed, now))
    }

    /// Full collection ordered by the active sort option.
    pub fn sorted_tasks(&self) -> Vec<Task> {
        let mut sorted = self.tasks.clone();
        match self.sort_option {
            SortOption::Title => sorted.sort_by(|a, b| a.title.cmp(&b.title)),
            SortOption::DueDate => sorted.sort_by(|a, b| match (a.due_date, b.due_date) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }),
            SortOption::Priority => {
                sorted.sort_by(|a, b| compare_priority_labels(a.priority, b.priority))
            }
            SortOption::Tags => sorted.sort_by_key(Task::joined_tags),
            SortOption::Custom => return self.custom_sorted_tasks(),
        }
        sorted
    }

    /// Tasks in custom order, followed by tasks the order does not mention.
    pub fn custom_sorted_tasks(&self) -> Vec<Task> {
        let mut emitted: HashSet<TaskId> = HashSet::with_capacity(self.tasks.len());
        let mut sorted = Vec::with_capacity(self.tasks.len());
        for id in &self.custom_order {
            if emitted.contains(id) {
                continue;
            }
            if let Some(task) = self.get(*id) {
                emitted.insert(*id);
                sorted.push(task.clone());
            }
        }
        sorted.extend(
            self.tasks
                .iter()
                .filter(|task| !emitted.contains(&task.id))
                .cloned(),
        );
        sorted
    }

    /// Sorted tasks narrowed by category and title search.
    pub fn filtered_tasks(&self, filter: &TaskFilter) -> Vec<Task> {
        self.sorted_tasks()
            .into_iter()
            .filter(|task| filter.matches(task))
            .collect()
    }

    /// Reorders the custom sequence by drag-and-drop offsets.
    ///
    /// Offsets index the sequence `custom_sorted_tasks` returns. The stored
    /// order is rebuilt from that sequence, so stale ids disappear here.
    pub fn move_tasks(&mut self, offsets: &[usize], destination: usize) -> TaskStoreResult<()> {
        let mut order: Vec<TaskId> = self
            .custom_sorted_tasks()
            .into_iter()
            .map(|task| task.id)
            .collect();
        move_items(&mut order, offsets, destination)?;
        self.persist("task_move", CUSTOM_ORDER_KEY, &order)?;
        self.custom_order = order;
        self.log_committed("task_move");
        Ok(())
    }

    /// Completed tasks due within the last `days` days (missing due date
    /// counts as now).
    pub fn tasks_completed_in(&self, days: u32) -> usize {
        let now = self.clock.now();
        let cutoff = now - Duration::days(i64::from(days));
        self.tasks
            .iter()
            .filter(|task| task.is_completed && task.due_date.unwrap_or(now) >= cutoff)
            .count()
    }

    /// Completed tasks whose `completed_date` is at most `days` whole days ago.
    pub fn completed_within_days(&self, days: u32) -> Vec<Task> {
        let now = self.clock.now();
        self.tasks
            .iter()
            .filter(|task| {
                task.is_completed
                    && task
                        .completed_date
                        .is_some_and(|done| (now - done).num_days() <= i64::from(days))
            })
            .cloned()
            .collect()
    }

    /// Mean of `due_date - reminder_date` in seconds over completed tasks.
    ///
    /// A missing reminder counts as now; a missing due date contributes 0.
    /// Returns 0 when nothing is completed or the mean is not finite.
    pub fn average_completion_secs(&self) -> f64 {
        let now = self.clock.now();
        let completed: Vec<&Task> = self.tasks.iter().filter(|t| t.is_completed).collect();
        if completed.is_empty() {
            return 0.0;
        }
        let total: f64 = completed
            .iter()
            .map(|task| match task.due_date {
                Some(due) => {
                    let span = due - task.reminder_date.unwrap_or(now);
                    span.num_milliseconds() as f64 / 1000.0
                }
                None => 0.0,
            })
            .sum();
        let average = total / completed.len() as f64;
        if average.is_finite() {
            average
        } else {
            0.0
        }
    }

    /// Tasks due on the calendar day `date` (clock offset).
    pub fn tasks_for_date(&self, date: NaiveDate) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| {
                task.due_date
                    .is_some_and(|due| self.clock.local_date(due) == date)
            })
            .cloned()
            .collect()
    }

    /// Renders all tasks, in collection order, as CSV.
    pub fn export_tasks(&self) -> TaskStoreResult<String> {
        let rows = self.tasks.iter().map(|task| {
            let due = task
                .due_date
                .map(|due| format_short_date(self.clock.local_date(due)))
                .unwrap_or_default();
            vec![
                task.title.clone(),
                due,
                task.priority.label().to_string(),
                task.category.label().to_string(),
                task.is_completed.to_string(),
            ]
        });
        let text = write_document(&TASK_CSV_HEADER, rows)?;
        info!(
            "event=tasks_export module=task_store status=ok row_count={}",
            self.tasks.len()
        );
        Ok(text)
    }

    /// Adds one task per well-formed CSV row after the header.
    ///
    /// Unknown priority falls back to Medium, unknown category to Other,
    /// an unreadable completion flag to `false` and an unreadable date to
    /// no due date. All rows are appended with a single write; when it
    /// fails the store is unchanged and the call may be retried.
    pub fn import_tasks(&mut self, csv_text: &str) -> TaskStoreResult<ImportReport> {
        let mut report = ImportReport::default();
        let mut tasks = self.tasks.clone();
        for row in read_rows(csv_text) {
            let fields = match row {
                Ok(fields) if fields.len() == TASK_CSV_HEADER.len() => fields,
                _ => {
                    report.skipped += 1;
                    continue;
                }
            };
            let task = self.task_from_row(&fields);
            if task.validate().is_err() {
                report.skipped += 1;
                continue;
            }
            tasks.push(task);
            report.imported += 1;
        }
        if report.imported > 0 {
            self.commit_tasks("tasks_import", tasks)?;
        }

        if report.skipped > 0 {
            warn!(
                "event=tasks_import module=task_store status=partial imported={} skipped={}",
                report.imported, report.skipped
            );
        } else {
            info!(
                "event=tasks_import module=task_store status=ok imported={}",
                report.imported
            );
        }
        Ok(report)
    }

    fn task_from_row(&self, fields: &[String]) -> Task {
        let mut task = Task::new(fields[0].as_str());
        task.due_date = parse_short_date(&fields[1]).map(|day| self.clock.start_of_day(day));
        task.priority = Priority::from_label(fields[2].trim()).unwrap_or(Priority::Medium);
        task.category = Category::from_label(fields[3].trim()).unwrap_or(Category::Other);
        task.is_completed = fields[4].trim().parse::<bool>().unwrap_or(false);
        task
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    fn modify(
        &mut self,
        event: &'static str,
        id: TaskId,
        change: impl FnOnce(&mut Task),
    ) -> TaskStoreResult<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };
        let mut tasks = self.tasks.clone();
        change(&mut tasks[index]);
        self.commit_tasks(event, tasks)?;
        Ok(true)
    }

    fn commit_tasks(&mut self, event: &'static str, tasks: Vec<Task>) -> TaskStoreResult<()> {
        self.persist(event, TASKS_KEY, &tasks)?;
        self.tasks = tasks;
        self.log_committed(event);
        Ok(())
    }

    fn persist<T: Serialize + ?Sized>(
        &self,
        event: &'static str,
        key: &str,
        value: &T,
    ) -> TaskStoreResult<()> {
        save_json(&self.kv, key, value).map_err(|err| {
            error!("event={event} module=task_store status=error error_code=persist_failed key={key} error={err}");
            err.into()
        })
    }

    fn log_committed(&self, event: &'static str) {
        info!(
            "event={event} module=task_store status=ok task_count={} custom_order_len={}",
            self.tasks.len(),
            self.custom_order.len()
        );
    }
}

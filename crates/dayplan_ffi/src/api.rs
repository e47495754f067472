//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Open the configured database per call and run exactly one use case.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Calls are serialized process-wide; every store rewrites whole
//!   collections, so two overlapping calls would lose an update.
//! - The database location and config are fixed after first use.

use chrono::{DateTime, NaiveDate, Utc};
use dayplan_core::config::DB_FILE_NAME;
use dayplan_core::db::open_db;
use dayplan_core::{
    core_version as core_version_inner, init_logging as init_logging_inner,
    init_logging_from_config, ping as ping_inner, CalendarAggregator, CalendarWindow, Category,
    Clock, CoreConfig, JournalStore, Note, NoteSortOption, NoteStore, Priority, SortOption,
    SqliteKvStore, SystemClock, Task, TaskStore,
};
use log::{error, info};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};
use uuid::Uuid;

const DB_PATH_ENV: &str = "DAYPLAN_DB_PATH";
const JOURNAL_DATE_FORMAT: &str = "%Y-%m-%d";

static CONFIG: OnceLock<CoreConfig> = OnceLock::new();
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static DB_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Points every later call at `<data_dir>/dayplan.sqlite3`.
///
/// # FFI contract
/// - Must run before the first data call; afterwards only the same
///   directory is accepted.
/// - Creates `data_dir` when missing.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_data_dir(data_dir: String) -> String {
    match apply_config(CoreConfig::new(data_dir.trim())) {
        Ok(()) => {
            info!("event=configure_data_dir module=ffi status=ok");
            String::new()
        }
        Err(message) => message,
    }
}

/// Applies a JSON config document and starts logging under `<data_dir>/logs`.
///
/// Input semantics:
/// - `config_json`: object with `data_dir` (required, absolute), optional
///   `log_level` and optional `calendar_window_days`.
///
/// # FFI contract
/// - Same first-use rules as `configure_data_dir`; a later config that
///   differs in any field is refused.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure(config_json: String) -> String {
    let config = match CoreConfig::from_json_str(&config_json) {
        Ok(config) => config,
        Err(err) => return err.to_string(),
    };
    if let Err(message) = apply_config(config.clone()) {
        return message;
    }
    if let Err(err) = init_logging_from_config(&config) {
        return err.to_string();
    }
    info!(
        "event=configure module=ffi status=ok calendar_window_days={}",
        config.calendar_window_days
    );
    String::new()
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Id of the affected record, when there is one.
    pub id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: String) -> Self {
        Self {
            ok: true,
            id: Some(id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Flat task projection for list rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub is_completed: bool,
    pub due_epoch_ms: Option<i64>,
    pub priority: String,
    pub category: String,
    pub tags: Vec<String>,
}

impl From<Task> for TaskItem {
    fn from(task: Task) -> Self {
        Self {
            id: task.id.to_string(),
            title: task.title,
            is_completed: task.is_completed,
            due_epoch_ms: task.due_date.map(|due| due.timestamp_millis()),
            priority: task.priority.label().to_string(),
            category: task.category.label().to_string(),
            tags: task.tags,
        }
    }
}

/// Sorted task list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub items: Vec<TaskItem>,
    /// Label of the sort option actually applied.
    pub applied_sort: String,
    pub message: String,
}

/// Text payload envelope used by exports and journal reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextResponse {
    pub ok: bool,
    pub text: String,
    pub message: String,
}

impl TextResponse {
    fn success(text: String, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            text,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            text: String::new(),
            message: message.into(),
        }
    }
}

/// Flat note projection for list rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    pub id: String,
    pub title: String,
    pub content: String,
    pub date_epoch_ms: i64,
}

impl From<Note> for NoteItem {
    fn from(note: Note) -> Self {
        Self {
            id: note.id.to_string(),
            title: note.title,
            content: note.content,
            date_epoch_ms: note.date.timestamp_millis(),
        }
    }
}

/// Sorted note list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteListResponse {
    pub items: Vec<NoteItem>,
    pub applied_sort: String,
    pub message: String,
}

/// Scheduled tasks for one calendar window.
///
/// Device calendar events stay on the host; it fetches them for the same
/// bounds and merges them by start time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarTasksResponse {
    pub ok: bool,
    pub items: Vec<TaskItem>,
    pub days: u32,
    pub start_epoch_ms: i64,
    /// Inclusive upper bound.
    pub end_epoch_ms: i64,
    pub message: String,
}

/// CSV import outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResponse {
    pub ok: bool,
    pub imported: u32,
    pub skipped: u32,
    pub message: String,
}

/// Adds a task.
///
/// Input semantics:
/// - `priority`/`category`: display labels; blank selects the default.
/// - `due_epoch_ms`: optional due instant in Unix milliseconds.
///
/// # FFI contract
/// - Returns the created task id on success.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(
    title: String,
    due_epoch_ms: Option<i64>,
    priority: String,
    category: String,
) -> ActionResponse {
    let task = match build_task(title, due_epoch_ms, &priority, &category) {
        Ok(task) => task,
        Err(message) => return ActionResponse::failure(format!("task_add failed: {message}")),
    };
    let id = task.id.to_string();
    match with_tasks("task_add", |store| {
        store.add(task).map_err(|err| err.to_string())
    }) {
        Ok(()) => ActionResponse::success("Task created.", id),
        Err(err) => ActionResponse::failure(format!("task_add failed: {err}")),
    }
}

/// Flips completion of one task.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle_complete(id: String) -> ActionResponse {
    let task_id = match parse_id(&id) {
        Ok(task_id) => task_id,
        Err(message) => {
            return ActionResponse::failure(format!("task_toggle_complete failed: {message}"))
        }
    };
    match with_tasks("task_toggle_complete", |store| {
        store
            .toggle_complete(task_id)
            .map_err(|err| err.to_string())
    }) {
        Ok(true) => ActionResponse::success("Task updated.", task_id.to_string()),
        Ok(false) => ActionResponse::failure("Task not found."),
        Err(err) => ActionResponse::failure(format!("task_toggle_complete failed: {err}")),
    }
}

/// Deletes one task; its id stays in the custom order until the next move.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(id: String) -> ActionResponse {
    let task_id = match parse_id(&id) {
        Ok(task_id) => task_id,
        Err(message) => return ActionResponse::failure(format!("task_delete failed: {message}")),
    };
    match with_tasks("task_delete", |store| {
        store.delete(task_id).map_err(|err| err.to_string())
    }) {
        Ok(true) => ActionResponse::success("Task deleted.", task_id.to_string()),
        Ok(false) => ActionResponse::failure("Task not found."),
        Err(err) => ActionResponse::failure(format!("task_delete failed: {err}")),
    }
}

/// Lists tasks ordered by the sort option labelled `sort`.
///
/// Unknown labels fall back to `Title`; the applied label is echoed back.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_sorted(sort: String) -> TaskListResponse {
    let option = SortOption::from_label(&sort).unwrap_or_default();
    match with_tasks("tasks_sorted", |store| {
        store.set_sort_option(option);
        Ok(store.sorted_tasks())
    }) {
        Ok(tasks) => {
            let items: Vec<TaskItem> = tasks.into_iter().map(TaskItem::from).collect();
            let message = if items.is_empty() {
                "No tasks.".to_string()
            } else {
                format!("Found {} task(s).", items.len())
            };
            TaskListResponse {
                items,
                applied_sort: option.label().to_string(),
                message,
            }
        }
        Err(err) => TaskListResponse {
            items: Vec::new(),
            applied_sort: option.label().to_string(),
            message: format!("tasks_sorted failed: {err}"),
        },
    }
}

/// Moves one task to `destination` in the custom order.
///
/// `destination` indexes the current custom sequence (as listed with the
/// `Custom` sort) before the task is removed from it.
#[flutter_rust_bridge::frb(sync)]
pub fn task_move(id: String, destination: u32) -> ActionResponse {
    let task_id = match parse_id(&id) {
        Ok(task_id) => task_id,
        Err(message) => return ActionResponse::failure(format!("task_move failed: {message}")),
    };
    match with_tasks("task_move", |store| {
        let Some(offset) = store
            .custom_sorted_tasks()
            .iter()
            .position(|task| task.id == task_id)
        else {
            return Ok(false);
        };
        store
            .move_tasks(&[offset], destination as usize)
            .map_err(|err| err.to_string())?;
        Ok(true)
    }) {
        Ok(true) => ActionResponse::success("Task moved.", task_id.to_string()),
        Ok(false) => ActionResponse::failure("Task not found."),
        Err(err) => ActionResponse::failure(format!("task_move failed: {err}")),
    }
}

/// Tasks due in the window starting at `date` (`YYYY-MM-DD`).
///
/// Input semantics:
/// - `days`: window length; `None` uses the configured
///   `calendar_window_days` (3 when unconfigured).
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_tasks(date: String, days: Option<u32>) -> CalendarTasksResponse {
    let days = days.unwrap_or_else(configured_window_days);
    let failure = |message: String| CalendarTasksResponse {
        ok: false,
        items: Vec::new(),
        days,
        start_epoch_ms: 0,
        end_epoch_ms: 0,
        message: format!("calendar_tasks failed: {message}"),
    };
    let day = match parse_day(&date) {
        Ok(day) => day,
        Err(message) => return failure(message),
    };
    if days == 0 {
        return failure("days must be at least 1".to_string());
    }

    let (start, end) = CalendarAggregator::window(&SystemClock, day, days);
    match with_tasks("calendar_tasks", |store| {
        Ok(CalendarAggregator::scheduled_tasks(&*store, start, end))
    }) {
        Ok(tasks) => CalendarTasksResponse {
            ok: true,
            message: format!("Found {} scheduled task(s).", tasks.len()),
            items: tasks.into_iter().map(TaskItem::from).collect(),
            days,
            start_epoch_ms: start.timestamp_millis(),
            end_epoch_ms: end.timestamp_millis(),
        },
        Err(err) => failure(err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn tasks_export_csv() -> TextResponse {
    match with_tasks("tasks_export_csv", |store| {
        store.export_tasks().map_err(|err| err.to_string())
    }) {
        Ok(text) => TextResponse::success(text, "Tasks exported."),
        Err(err) => TextResponse::failure(format!("tasks_export_csv failed: {err}")),
    }
}

/// Imports task rows; malformed rows are skipped and counted.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_import_csv(csv_text: String) -> ImportResponse {
    match with_tasks("tasks_import_csv", |store| {
        store.import_tasks(&csv_text).map_err(|err| err.to_string())
    }) {
        Ok(report) => ImportResponse {
            ok: true,
            imported: saturating_u32(report.imported),
            skipped: saturating_u32(report.skipped),
            message: format!(
                "Imported {} task(s), skipped {} row(s).",
                report.imported, report.skipped
            ),
        },
        Err(err) => ImportResponse {
            ok: false,
            imported: 0,
            skipped: 0,
            message: format!("tasks_import_csv failed: {err}"),
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn note_add(title: String, content: String) -> ActionResponse {
    let note = Note::new(title.trim(), content, SystemClock.now());
    let id = note.id.to_string();
    match with_notes("note_add", |store| {
        store.add(note).map_err(|err| err.to_string())
    }) {
        Ok(()) => ActionResponse::success("Note created.", id),
        Err(err) => ActionResponse::failure(format!("note_add failed: {err}")),
    }
}

/// Replaces title and content of one note and stamps it as modified now.
#[flutter_rust_bridge::frb(sync)]
pub fn note_update(id: String, title: String, content: String) -> ActionResponse {
    let note_id = match parse_id(&id) {
        Ok(note_id) => note_id,
        Err(message) => return ActionResponse::failure(format!("note_update failed: {message}")),
    };
    match with_notes("note_update", |store| {
        let Some(mut note) = store.get(note_id).cloned() else {
            return Ok(false);
        };
        note.title = title.trim().to_string();
        note.content = content;
        note.touch(SystemClock.now());
        store.update(&note).map_err(|err| err.to_string())
    }) {
        Ok(true) => ActionResponse::success("Note updated.", note_id.to_string()),
        Ok(false) => ActionResponse::failure("Note not found."),
        Err(err) => ActionResponse::failure(format!("note_update failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn note_delete(id: String) -> ActionResponse {
    let note_id = match parse_id(&id) {
        Ok(note_id) => note_id,
        Err(message) => return ActionResponse::failure(format!("note_delete failed: {message}")),
    };
    match with_notes("note_delete", |store| {
        store.delete(note_id).map_err(|err| err.to_string())
    }) {
        Ok(true) => ActionResponse::success("Note deleted.", note_id.to_string()),
        Ok(false) => ActionResponse::failure("Note not found."),
        Err(err) => ActionResponse::failure(format!("note_delete failed: {err}")),
    }
}

/// Moves one note to `destination` in the stored (custom) order.
#[flutter_rust_bridge::frb(sync)]
pub fn note_move(id: String, destination: u32) -> ActionResponse {
    let note_id = match parse_id(&id) {
        Ok(note_id) => note_id,
        Err(message) => return ActionResponse::failure(format!("note_move failed: {message}")),
    };
    match with_notes("note_move", |store| {
        let Some(offset) = store.notes().iter().position(|note| note.id == note_id) else {
            return Ok(false);
        };
        store
            .move_notes(&[offset], destination as usize)
            .map_err(|err| err.to_string())?;
        Ok(true)
    }) {
        Ok(true) => ActionResponse::success("Note moved.", note_id.to_string()),
        Ok(false) => ActionResponse::failure("Note not found."),
        Err(err) => ActionResponse::failure(format!("note_move failed: {err}")),
    }
}

/// Lists notes by the sort labelled `sort`, narrowed by a title `query`.
///
/// Unknown labels fall back to `Title`; blank `query` matches every note.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_list(sort: String, query: String) -> NoteListResponse {
    let option = NoteSortOption::from_label(&sort).unwrap_or_default();
    match with_notes("notes_list", |store| Ok(store.search(option, &query))) {
        Ok(notes) => {
            let items: Vec<NoteItem> = notes.into_iter().map(NoteItem::from).collect();
            let message = if items.is_empty() {
                "No notes.".to_string()
            } else {
                format!("Found {} note(s).", items.len())
            };
            NoteListResponse {
                items,
                applied_sort: option.label().to_string(),
                message,
            }
        }
        Err(err) => NoteListResponse {
            items: Vec::new(),
            applied_sort: option.label().to_string(),
            message: format!("notes_list failed: {err}"),
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn notes_export_csv() -> TextResponse {
    let result = with_notes("notes_export_csv", |store| {
        store.export_notes().map_err(|err| err.to_string())
    });
    match result {
        Ok(text) => TextResponse::success(text, "Notes exported."),
        Err(err) => TextResponse::failure(format!("notes_export_csv failed: {err}")),
    }
}

/// Reads the journal entry for `date` (`YYYY-MM-DD`); empty when unwritten.
#[flutter_rust_bridge::frb(sync)]
pub fn journal_load(date: String) -> TextResponse {
    let day = match parse_day(&date) {
        Ok(day) => day,
        Err(message) => return TextResponse::failure(format!("journal_load failed: {message}")),
    };
    let result = with_kv("journal_load", |kv| {
        JournalStore::new(kv)
            .entry(day)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(entry) => TextResponse::success(entry.text, "Journal loaded."),
        Err(err) => TextResponse::failure(format!("journal_load failed: {err}")),
    }
}

/// Saves the journal entry for `date`; blank text clears the day.
#[flutter_rust_bridge::frb(sync)]
pub fn journal_save(date: String, text: String) -> ActionResponse {
    let day = match parse_day(&date) {
        Ok(day) => day,
        Err(message) => return ActionResponse::failure(format!("journal_save failed: {message}")),
    };
    let result = with_kv("journal_save", |kv| {
        let journal = JournalStore::new(kv);
        journal.save(day, &text).map_err(|err| err.to_string())?;
        journal.entry(day).map_err(|err| err.to_string())
    });
    match result {
        Ok(entry) => ActionResponse::success("Journal saved.", entry.id.to_string()),
        Err(err) => ActionResponse::failure(format!("journal_save failed: {err}")),
    }
}

fn build_task(
    title: String,
    due_epoch_ms: Option<i64>,
    priority: &str,
    category: &str,
) -> Result<Task, String> {
    let mut task = Task::new(title.trim());
    task.priority = parse_label(priority, Priority::from_label, "priority")?;
    task.category = parse_label(category, Category::from_label, "category")?;
    task.due_date = match due_epoch_ms {
        Some(ms) => Some(
            DateTime::<Utc>::from_timestamp_millis(ms)
                .ok_or_else(|| format!("due_epoch_ms out of range: {ms}"))?,
        ),
        None => None,
    };
    Ok(task)
}

fn parse_label<T: Default>(
    raw: &str,
    from_label: impl Fn(&str) -> Option<T>,
    field: &str,
) -> Result<T, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(T::default());
    }
    from_label(trimmed).ok_or_else(|| format!("unknown {field} `{trimmed}`"))
}

fn parse_id(raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw.trim()).map_err(|err| format!("invalid id: {err}"))
}

fn parse_day(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), JOURNAL_DATE_FORMAT)
        .map_err(|err| format!("invalid date `{}`: {err}", raw.trim()))
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn apply_config(config: CoreConfig) -> Result<(), String> {
    config.validate().map_err(|err| err.to_string())?;
    std::fs::create_dir_all(config.data_dir())
        .map_err(|err| format!("failed to create data dir: {err}"))?;

    let active = CONFIG.get_or_init(|| config.clone());
    if active.data_dir() != config.data_dir() {
        return Err(format!(
            "data dir already configured at `{}`; refusing to switch to `{}`",
            active.data_dir().display(),
            config.data_dir().display()
        ));
    }
    if *active != config {
        return Err("config already applied with different settings".to_string());
    }

    let requested = config.db_path();
    let db_path = DB_PATH.get_or_init(|| requested.clone());
    if *db_path != requested {
        return Err(format!(
            "database already opened at `{}`; refusing to switch to `{}`",
            db_path.display(),
            requested.display()
        ));
    }
    Ok(())
}

fn configured_window_days() -> u32 {
    CONFIG
        .get()
        .map_or_else(|| CalendarWindow::default().days(), |config| config.calendar_window_days)
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_kv<T>(
    op: &'static str,
    f: impl FnOnce(SqliteKvStore<'_>) -> Result<T, String>,
) -> Result<T, String> {
    let _guard = DB_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| {
        error!("event={op} module=ffi status=error error_code=db_open_failed");
        format!("DB open failed: {err}")
    })?;
    let kv = SqliteKvStore::try_new(&conn).map_err(|err| format!("store init failed: {err}"))?;
    f(kv)
}

fn with_tasks<T>(
    op: &'static str,
    f: impl FnOnce(&mut TaskStore<SqliteKvStore<'_>, SystemClock>) -> Result<T, String>,
) -> Result<T, String> {
    with_kv(op, |kv| {
        let mut store = TaskStore::load(kv, SystemClock).map_err(|err| err.to_string())?;
        f(&mut store)
    })
}

fn with_notes<T>(
    op: &'static str,
    f: impl FnOnce(&mut NoteStore<SqliteKvStore<'_>, SystemClock>) -> Result<T, String>,
) -> Result<T, String> {
    with_kv(op, |kv| {
        let mut store = NoteStore::load(kv, SystemClock).map_err(|err| err.to_string())?;
        f(&mut store)
    })
}

#[cfg(test)]
mod tests {
    use super::{
        calendar_tasks, configure, configure_data_dir, core_version, init_logging, journal_load,
        journal_save, note_add, note_delete, note_move, note_update, notes_export_csv, notes_list,
        ping, task_add, task_delete, task_move, task_toggle_complete, tasks_export_csv,
        tasks_import_csv, tasks_sorted,
    };
    use std::path::PathBuf;
    use std::sync::OnceLock;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn configure_data_dir_rejects_relative_and_conflicting_paths() {
        use_test_data_dir();
        assert!(!configure_data_dir("relative/dir".to_string()).is_empty());

        let other = std::env::temp_dir().join(unique_token("dayplan-ffi-other"));
        let error = configure_data_dir(other.to_string_lossy().into_owned());
        assert!(error.contains("already configured"));
    }

    #[test]
    fn task_add_then_list_toggle_and_delete() {
        use_test_data_dir();
        let title = unique_token("ffi-task");
        let created = task_add(
            title.clone(),
            Some(1_767_225_600_000),
            "High".to_string(),
            String::new(),
        );
        assert!(created.ok, "{}", created.message);
        let id = created.id.clone().expect("created task should return id");

        let listed = tasks_sorted("priority".to_string());
        assert_eq!(listed.applied_sort, "Priority");
        let item = listed
            .items
            .iter()
            .find(|item| item.id == id)
            .expect("created task should be listed");
        assert_eq!(item.title, title);
        assert_eq!(item.priority, "High");
        assert_eq!(item.category, "Other");
        assert_eq!(item.due_epoch_ms, Some(1_767_225_600_000));

        let toggled = task_toggle_complete(id.clone());
        assert!(toggled.ok, "{}", toggled.message);
        let listed = tasks_sorted("Title".to_string());
        assert!(listed.items.iter().any(|item| item.id == id && item.is_completed));

        assert!(task_delete(id.clone()).ok);
        let missing = task_delete(id);
        assert!(!missing.ok);
        assert_eq!(missing.message, "Task not found.");
    }

    #[test]
    fn task_add_rejects_unknown_priority() {
        use_test_data_dir();
        let response = task_add("x".to_string(), None, "Critical".to_string(), String::new());
        assert!(!response.ok);
        assert!(response.message.contains("unknown priority"));
    }

    #[test]
    fn task_toggle_rejects_malformed_id() {
        use_test_data_dir();
        let response = task_toggle_complete("not-a-uuid".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("invalid id"));
    }

    #[test]
    fn unknown_sort_label_falls_back_to_title() {
        use_test_data_dir();
        assert_eq!(tasks_sorted("shuffle".to_string()).applied_sort, "Title");
    }

    #[test]
    fn import_counts_rows_and_export_contains_them() {
        use_test_data_dir();
        let title = unique_token("ffi-import");
        let csv = format!(
            "Title,Due Date,Priority,Category,Completed\n\"{title}, quoted\",1/2/26,Low,Work,true\nbroken\n"
        );

        let report = tasks_import_csv(csv);
        assert!(report.ok, "{}", report.message);
        assert_eq!(report.imported, 1);
        assert_eq!(report.skipped, 1);

        let exported = tasks_export_csv();
        assert!(exported.ok, "{}", exported.message);
        assert!(exported
            .text
            .contains(&format!("\"{title}, quoted\",1/2/26,Low,Work,true")));
    }

    #[test]
    fn notes_export_starts_with_header() {
        use_test_data_dir();
        let exported = notes_export_csv();
        assert!(exported.ok, "{}", exported.message);
        assert!(exported.text.starts_with("Title,Date,Content\n"));
    }

    #[test]
    fn journal_round_trip_and_blank_clear() {
        use_test_data_dir();
        let saved = journal_save("2031-05-04".to_string(), "long walk".to_string());
        assert!(saved.ok, "{}", saved.message);
        assert_eq!(journal_load("2031-05-04".to_string()).text, "long walk");

        let cleared = journal_save("2031-05-04".to_string(), "  ".to_string());
        assert_eq!(cleared.id, saved.id);
        assert_eq!(journal_load("2031-05-04".to_string()).text, "");

        let bad = journal_load("05/04/2031".to_string());
        assert!(!bad.ok);
    }

    #[test]
    fn configure_reads_json_and_refuses_changed_settings() {
        let dir = use_test_data_dir();
        let dir = dir.to_string_lossy().replace('\\', "\\\\");

        assert!(configure("{".to_string()).contains("invalid config JSON"));
        let same = configure(format!(r#"{{"data_dir":"{dir}"}}"#));
        assert!(same.is_empty(), "{same}");
        let changed = configure(format!(r#"{{"data_dir":"{dir}","calendar_window_days":7}}"#));
        assert!(changed.contains("different settings"));
    }

    #[test]
    fn calendar_tasks_defaults_to_three_day_window() {
        use_test_data_dir();
        let title = unique_token("ffi-calendar");
        // 2031-02-10T18:00:00Z: inside three days from Feb 9 and past the
        // first day in every zone from -12:00 to +14:00.
        let created = task_add(title.clone(), Some(1_928_512_800_000), String::new(), String::new());
        assert!(created.ok, "{}", created.message);

        let window = calendar_tasks("2031-02-09".to_string(), None);
        assert!(window.ok, "{}", window.message);
        assert_eq!(window.days, 3);
        assert!(window.items.iter().any(|item| item.title == title));
        assert!(window.start_epoch_ms < window.end_epoch_ms);

        let narrow = calendar_tasks("2031-02-09".to_string(), Some(1));
        assert!(!narrow.items.iter().any(|item| item.title == title));
        assert!(!calendar_tasks("2031-02-09".to_string(), Some(0)).ok);
    }

    #[test]
    fn task_move_puts_task_first_in_custom_order() {
        use_test_data_dir();
        let first = task_add(unique_token("ffi-move-a"), None, String::new(), String::new());
        let second = task_add(unique_token("ffi-move-b"), None, String::new(), String::new());
        let id = second.id.expect("created task should return id");
        assert!(first.ok);

        let moved = task_move(id.clone(), 0);
        assert!(moved.ok, "{}", moved.message);
        let listed = tasks_sorted("Custom".to_string());
        assert_eq!(listed.applied_sort, "Custom");
        assert_eq!(listed.items[0].id, id);

        let out_of_range = task_move(id, u32::MAX);
        assert!(!out_of_range.ok);
    }

    #[test]
    fn note_lifecycle_reaches_list_and_export() {
        use_test_data_dir();
        let title = unique_token("ffi-note");
        let created = note_add(title.clone(), "line one\nline two".to_string());
        assert!(created.ok, "{}", created.message);
        let id = created.id.clone().expect("created note should return id");

        let updated = note_update(id.clone(), format!("{title} v2"), "rewritten".to_string());
        assert!(updated.ok, "{}", updated.message);
        let listed = notes_list("date".to_string(), title.to_uppercase());
        assert_eq!(listed.applied_sort, "Date");
        let item = listed
            .items
            .iter()
            .find(|item| item.id == id)
            .expect("updated note should be listed");
        assert_eq!(item.content, "rewritten");
        assert!(notes_export_csv().text.contains(&format!("{title} v2")));

        assert!(note_move(id.clone(), 0).ok);
        assert_eq!(notes_list("Custom".to_string(), String::new()).items[0].id, id);

        assert!(note_delete(id.clone()).ok);
        assert_eq!(note_delete(id).message, "Note not found.");
    }

    fn use_test_data_dir() -> PathBuf {
        static DIR: OnceLock<PathBuf> = OnceLock::new();
        let dir = DIR.get_or_init(|| std::env::temp_dir().join(unique_token("dayplan-ffi")));
        let error = configure_data_dir(dir.to_string_lossy().into_owned());
        assert!(error.is_empty(), "{error}");
        dir.clone()
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}

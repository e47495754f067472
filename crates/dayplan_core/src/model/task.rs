//! Task domain model.
//!
//! # Responsibility
//! - Define `Task` and its embedded `Subtask`/`Comment` records.
//! - Define the closed label sets used for priority, category, recurrence
//!   and sorting.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `completed_date` is meaningful only while `is_completed` is true.
//!   Only `Task::set_completed` keeps the two in step.
//! - `tags` keep insertion order and may contain duplicates.

use crate::model::validation::{ensure_non_nil, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a task.
pub type TaskId = Uuid;

/// Task urgency. Serialized and exported by display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Display label, also used as CSV value.
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.label() == value)
    }
}

/// Task grouping shown as a filter in the list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    Work,
    Personal,
    Urgent,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Work,
        Category::Personal,
        Category::Urgent,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Personal => "Personal",
            Self::Urgent => "Urgent",
            Self::Other => "Other",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RecurrenceFrequency {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurrenceFrequency {
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
        }
    }
}

/// Ordering applied by `TaskStore::sorted_tasks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortOption {
    #[default]
    Title,
    #[serde(rename = "Due Date")]
    DueDate,
    Priority,
    Tags,
    Custom,
}

impl SortOption {
    pub const ALL: [SortOption; 5] = [
        SortOption::Title,
        SortOption::DueDate,
        SortOption::Priority,
        SortOption::Tags,
        SortOption::Custom,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::DueDate => "Due Date",
            Self::Priority => "Priority",
            Self::Tags => "Tags",
            Self::Custom => "Custom",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|option| option.label().eq_ignore_ascii_case(value.trim()))
    }
}

/// RGBA display color attached to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl TaskColor {
    pub const BLUE: TaskColor = TaskColor::rgb(0, 122, 255);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 255,
        }
    }
}

impl Default for TaskColor {
    fn default() -> Self {
        Self::BLUE
    }
}

/// Checklist item embedded in a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: Uuid,
    pub title: String,
    pub is_completed: bool,
}

impl Subtask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            is_completed: false,
        }
    }
}

/// Free-text remark embedded in a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    /// Creation timestamp.
    pub date: DateTime<Utc>,
}

impl Comment {
    pub fn new(text: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            date,
        }
    }
}

/// A to-do item as persisted under the `tasks` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub is_completed: bool,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub reminder_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default)]
    pub recurrence_frequency: RecurrenceFrequency,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub color: TaskColor,
    /// Opaque image bytes; the core never decodes them.
    #[serde(default)]
    pub attached_image: Option<Vec<u8>>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Task {
    /// Creates an open task with a generated id and default metadata.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title)
    }

    /// Creates a task with a caller-provided id.
    ///
    /// Used by import paths; the id is checked by `validate`, not here.
    pub fn with_id(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            is_completed: false,
            due_date: None,
            completed_date: None,
            priority: Priority::default(),
            category: Category::default(),
            reminder_date: None,
            recurring: false,
            recurrence_frequency: RecurrenceFrequency::default(),
            subtasks: Vec::new(),
            comments: Vec::new(),
            color: TaskColor::default(),
            attached_image: None,
            tags: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_non_nil(self.id)
    }

    /// Flips the completion flag only. `completed_date` is left untouched.
    pub fn toggle_complete(&mut self) {
        self.is_completed = !self.is_completed;
    }

    /// Sets completion and stamps or clears `completed_date` accordingly.
    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        self.is_completed = completed;
        self.completed_date = completed.then_some(now);
    }

    /// Tags joined the way the tag sort compares them.
    pub fn joined_tags(&self) -> String {
        self.tags.join(", ")
    }

    /// Fraction of finished subtasks, `None` when there are no subtasks.
    pub fn subtask_progress(&self) -> Option<f64> {
        if self.subtasks.is_empty() {
            return None;
        }
        let done = self.subtasks.iter().filter(|s| s.is_completed).count();
        Some(done as f64 / self.subtasks.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, Priority, SortOption, Subtask, Task};
    use chrono::{TimeZone, Utc};

    #[test]
    fn labels_round_trip_through_from_label() {
        for priority in Priority::ALL {
            assert_eq!(Priority::from_label(priority.label()), Some(priority));
        }
        for category in Category::ALL {
            assert_eq!(Category::from_label(category.label()), Some(category));
        }
        assert_eq!(Priority::from_label("urgent"), None);
    }

    #[test]
    fn sort_option_parses_case_insensitively() {
        assert_eq!(SortOption::from_label("due date"), Some(SortOption::DueDate));
        assert_eq!(SortOption::from_label(" CUSTOM "), Some(SortOption::Custom));
        assert_eq!(SortOption::from_label("size"), None);
    }

    #[test]
    fn set_completed_keeps_completed_date_in_step() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let mut task = Task::new("ship");

        task.set_completed(true, now);
        assert!(task.is_completed);
        assert_eq!(task.completed_date, Some(now));

        task.set_completed(false, now);
        assert_eq!(task.completed_date, None);
    }

    #[test]
    fn toggle_leaves_completed_date_alone() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let mut task = Task::new("ship");
        task.set_completed(true, now);

        task.toggle_complete();
        assert!(!task.is_completed);
        assert_eq!(task.completed_date, Some(now));
    }

    #[test]
    fn subtask_progress_counts_finished_items() {
        let mut task = Task::new("trip");
        assert_eq!(task.subtask_progress(), None);

        let mut packed = Subtask::new("pack");
        packed.is_completed = true;
        task.subtasks = vec![packed, Subtask::new("book")];
        assert_eq!(task.subtask_progress(), Some(0.5));
    }
}

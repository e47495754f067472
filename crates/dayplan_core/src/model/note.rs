//! Note domain model.

use crate::model::validation::{ensure_non_nil, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type NoteId = Uuid;

/// Ordering applied by `NoteStore::sorted_notes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NoteSortOption {
    #[default]
    Title,
    Date,
    /// Stored collection order, rearranged by `NoteStore::move_notes`.
    Custom,
}

impl NoteSortOption {
    pub const ALL: [NoteSortOption; 3] = [
        NoteSortOption::Title,
        NoteSortOption::Date,
        NoteSortOption::Custom,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Date => "Date",
            Self::Custom => "Custom",
        }
    }

    /// Case-insensitive lookup by display label.
    pub fn from_label(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|option| option.label().eq_ignore_ascii_case(value.trim()))
    }
}

/// Free-form note persisted under the `notes` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    /// Creation or last-modified timestamp.
    pub date: DateTime<Utc>,
}

impl Note {
    pub fn new(title: impl Into<String>, content: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content: content.into(),
            date,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_non_nil(self.id)
    }

    /// Marks the note as modified at `now`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.date = now;
    }
}

#[cfg(test)]
mod tests {
    use super::NoteSortOption;

    #[test]
    fn sort_labels_resolve_ignoring_case() {
        assert_eq!(NoteSortOption::from_label(" date "), Some(NoteSortOption::Date));
        assert_eq!(NoteSortOption::from_label("CUSTOM"), Some(NoteSortOption::Custom));
        assert_eq!(NoteSortOption::from_label("newest"), None);
    }
}

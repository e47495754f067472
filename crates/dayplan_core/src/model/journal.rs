//! Journal entry model.
//!
//! # Invariants
//! - There is at most one entry per calendar day.
//! - An entry id is derived from its day, so the same day always maps to
//!   the same id.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const JOURNAL_KEY_PREFIX: &str = "journal-";

/// One day of free-text journaling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub text: String,
}

impl JournalEntry {
    pub fn new(date: NaiveDate, text: impl Into<String>) -> Self {
        Self {
            id: journal_entry_id(date),
            date,
            text: text.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Persistence key for one day, formatted `journal-YYYY-MM-DD`.
pub fn journal_key(date: NaiveDate) -> String {
    format!("{JOURNAL_KEY_PREFIX}{}", date.format("%Y-%m-%d"))
}

pub(crate) fn journal_key_prefix() -> &'static str {
    JOURNAL_KEY_PREFIX
}

fn journal_entry_id(date: NaiveDate) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, journal_key(date).as_bytes())
}

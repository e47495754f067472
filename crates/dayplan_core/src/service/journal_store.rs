//! Day-keyed journal store.
//!
//! # Responsibility
//! - Read and write one free-text entry per calendar day.
//! - Enumerate stored days for history views.
//!
//! # Invariants
//! - Each day lives under its own `journal-YYYY-MM-DD` key as plain text.
//! - Saving blank text removes the day instead of storing an empty value.

use crate::model::journal::{journal_key, journal_key_prefix, JournalEntry};
use crate::repo::kv_repo::{load_text, KeyValueStore, PersistenceResult};
use chrono::NaiveDate;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

static JOURNAL_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^journal-(\d{4}-\d{2}-\d{2})$").expect("valid journal key regex")
});

pub struct JournalStore<S: KeyValueStore> {
    kv: S,
}

impl<S: KeyValueStore> JournalStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Entry for `date`; empty text when nothing was written that day.
    pub fn entry(&self, date: NaiveDate) -> PersistenceResult<JournalEntry> {
        let text = load_text(&self.kv, &journal_key(date))?.unwrap_or_default();
        Ok(JournalEntry::new(date, text))
    }

    pub fn save(&self, date: NaiveDate, text: &str) -> PersistenceResult<()> {
        let key = journal_key(date);
        if text.trim().is_empty() {
            self.kv.remove(&key)?;
            info!("event=journal_save module=journal_store status=ok cleared=true");
            return Ok(());
        }
        self.kv.put(&key, text.as_bytes())?;
        info!(
            "event=journal_save module=journal_store status=ok cleared=false chars={}",
            text.chars().count()
        );
        Ok(())
    }

    pub fn delete(&self, date: NaiveDate) -> PersistenceResult<()> {
        self.kv.remove(&journal_key(date))
    }

    /// All stored entries, oldest day first.
    pub fn entries(&self) -> PersistenceResult<Vec<JournalEntry>> {
        let mut entries = Vec::new();
        for key in self.kv.keys_with_prefix(journal_key_prefix())? {
            let Some(date) = parse_journal_key(&key) else {
                warn!("event=journal_scan module=journal_store status=skip reason=unrecognized_key");
                continue;
            };
            let text = load_text(&self.kv, &key)?.unwrap_or_default();
            entries.push(JournalEntry::new(date, text));
        }
        Ok(entries)
    }
}

fn parse_journal_key(key: &str) -> Option<NaiveDate> {
    let captures = JOURNAL_KEY_RE.captures(key)?;
    NaiveDate::parse_from_str(captures.get(1)?.as_str(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::parse_journal_key;
    use chrono::NaiveDate;

    #[test]
    fn parses_only_well_formed_keys() {
        assert_eq!(
            parse_journal_key("journal-2026-04-30"),
            NaiveDate::from_ymd_opt(2026, 4, 30)
        );
        assert_eq!(parse_journal_key("journal-2026-02-30"), None);
        assert_eq!(parse_journal_key("journal-draft"), None);
        assert_eq!(parse_journal_key("notes"), None);
    }
}

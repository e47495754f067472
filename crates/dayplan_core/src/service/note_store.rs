//! Note store.
//!
//! # Responsibility
//! - Own the note collection and persist it under `notes`.
//! - Provide title/date/custom ordering, title search and CSV export.
//!
//! # Invariants
//! - The stored collection order is the custom order.
//! - In-memory state is replaced only after the write succeeds.

use crate::clock::Clock;
use crate::interchange::csv_codec::{format_short_date, write_document, CsvError};
use crate::model::note::{Note, NoteId, NoteSortOption};
use crate::model::validation::ValidationError;
use crate::repo::kv_repo::{load_json, save_json, KeyValueStore, PersistenceError, NOTES_KEY};
use crate::service::ordering::{move_items, MoveError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const NOTE_CSV_HEADER: [&str; 3] = ["Title", "Date", "Content"];

pub type NoteStoreResult<T> = Result<T, NoteStoreError>;

#[derive(Debug)]
pub enum NoteStoreError {
    Persistence(PersistenceError),
    Validation(ValidationError),
    InvalidMove(MoveError),
    Csv(CsvError),
}

impl Display for NoteStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Persistence(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "invalid note: {err}"),
            Self::InvalidMove(err) => write!(f, "{err}"),
            Self::Csv(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::InvalidMove(err) => Some(err),
            Self::Csv(err) => Some(err),
        }
    }
}

impl From<PersistenceError> for NoteStoreError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

impl From<ValidationError> for NoteStoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<MoveError> for NoteStoreError {
    fn from(value: MoveError) -> Self {
        Self::InvalidMove(value)
    }
}

impl From<CsvError> for NoteStoreError {
    fn from(value: CsvError) -> Self {
        Self::Csv(value)
    }
}

pub struct NoteStore<S: KeyValueStore, C: Clock> {
    kv: S,
    clock: C,
    notes: Vec<Note>,
}

impl<S: KeyValueStore, C: Clock> NoteStore<S, C> {
    pub fn load(kv: S, clock: C) -> NoteStoreResult<Self> {
        let notes: Vec<Note> = load_json(&kv, NOTES_KEY)?.unwrap_or_default();
        info!(
            "event=notes_load module=note_store status=ok note_count={}",
            notes.len()
        );
        Ok(Self { kv, clock, notes })
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn add(&mut self, note: Note) -> NoteStoreResult<()> {
        note.validate()?;
        let mut notes = self.notes.clone();
        notes.push(note);
        self.commit("note_add", notes)
    }

    /// Replaces the note with the same id. Returns `false` when absent.
    pub fn update(&mut self, note: &Note) -> NoteStoreResult<bool> {
        note.validate()?;
        let Some(index) = self.position(note.id) else {
            return Ok(false);
        };
        let mut notes = self.notes.clone();
        notes[index] = note.clone();
        self.commit("note_update", notes)?;
        Ok(true)
    }

    pub fn delete(&mut self, id: NoteId) -> NoteStoreResult<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };
        let mut notes = self.notes.clone();
        notes.remove(index);
        self.commit("note_delete", notes)?;
        Ok(true)
    }

    /// Rearranges the stored (custom) order.
    pub fn move_notes(&mut self, offsets: &[usize], destination: usize) -> NoteStoreResult<()> {
        let mut notes = self.notes.clone();
        move_items(&mut notes, offsets, destination)?;
        self.commit("note_move", notes)
    }

    pub fn sorted_notes(&self, sort: NoteSortOption) -> Vec<Note> {
        let mut sorted = self.notes.clone();
        match sort {
            NoteSortOption::Title => sorted.sort_by(|a, b| a.title.cmp(&b.title)),
            NoteSortOption::Date => sorted.sort_by_key(|note| note.date),
            NoteSortOption::Custom => {}
        }
        sorted
    }

    /// Sorted notes whose title contains `query`, ignoring case.
    pub fn search(&self, sort: NoteSortOption, query: &str) -> Vec<Note> {
        let needle = query.trim().to_lowercase();
        self.sorted_notes(sort)
            .into_iter()
            .filter(|note| needle.is_empty() || note.title.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn export_notes(&self) -> NoteStoreResult<String> {
        let rows = self.notes.iter().map(|note| {
            vec![
                note.title.clone(),
                format_short_date(self.clock.local_date(note.date)),
                note.content.clone(),
            ]
        });
        let text = write_document(&NOTE_CSV_HEADER, rows)?;
        info!(
            "event=notes_export module=note_store status=ok row_count={}",
            self.notes.len()
        );
        Ok(text)
    }

    fn position(&self, id: NoteId) -> Option<usize> {
        self.notes.iter().position(|note| note.id == id)
    }

    fn commit(&mut self, event: &'static str, notes: Vec<Note>) -> NoteStoreResult<()> {
        if let Err(err) = save_json(&self.kv, NOTES_KEY, &notes) {
            error!("event={event} module=note_store status=error error_code=persist_failed error={err}");
            return Err(err.into());
        }
        self.notes = notes;
        info!(
            "event={event} module=note_store status=ok note_count={}",
            self.notes.len()
        );
        Ok(())
    }
}

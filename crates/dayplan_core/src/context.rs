//! Composition root for the stores.
//!
//! Built once at startup and handed to consumers by reference; there are
//! no global store instances.

use crate::clock::Clock;
use crate::repo::kv_repo::KeyValueStore;
use crate::service::journal_store::JournalStore;
use crate::service::note_store::{NoteStore, NoteStoreError};
use crate::service::task_store::{TaskStore, TaskStoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ContextError {
    Tasks(TaskStoreError),
    Notes(NoteStoreError),
}

impl Display for ContextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tasks(err) => write!(f, "task store load failed: {err}"),
            Self::Notes(err) => write!(f, "note store load failed: {err}"),
        }
    }
}

impl Error for ContextError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Tasks(err) => Some(err),
            Self::Notes(err) => Some(err),
        }
    }
}

/// Stores sharing one persistence gateway and one clock.
pub struct CoreContext<'a, S: KeyValueStore + ?Sized, C: Clock + ?Sized> {
    pub tasks: TaskStore<&'a S, &'a C>,
    pub notes: NoteStore<&'a S, &'a C>,
    pub journal: JournalStore<&'a S>,
}

impl<'a, S: KeyValueStore + ?Sized, C: Clock + ?Sized> CoreContext<'a, S, C> {
    pub fn open(kv: &'a S, clock: &'a C) -> Result<Self, ContextError> {
        Ok(Self {
            tasks: TaskStore::load(kv, clock).map_err(ContextError::Tasks)?,
            notes: NoteStore::load(kv, clock).map_err(ContextError::Notes)?,
            journal: JournalStore::new(kv),
        })
    }
}

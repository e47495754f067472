//! Shared validation errors for domain records.

use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Validation failures raised before a record is accepted by a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The record id is the nil UUID.
    NilId,
    /// An event ends before it starts.
    InvalidEventWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "id must not be nil"),
            Self::InvalidEventWindow { start, end } => write!(
                f,
                "event end ({}) must be >= event start ({})",
                end.to_rfc3339(),
                start.to_rfc3339()
            ),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn ensure_non_nil(id: Uuid) -> Result<(), ValidationError> {
    if id.is_nil() {
        return Err(ValidationError::NilId);
    }
    Ok(())
}

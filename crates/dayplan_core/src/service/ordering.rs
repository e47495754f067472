//! Drag-and-drop reordering shared by the task and note stores.
//!
//! Semantics: the items at `offsets` are pulled out (keeping their relative
//! order) and reinserted in front of the item that sat at `destination`
//! before the move. `destination == len` appends.

use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    OffsetOutOfRange { offset: usize, len: usize },
    DestinationOutOfRange { destination: usize, len: usize },
}

impl Display for MoveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OffsetOutOfRange { offset, len } => {
                write!(f, "move offset {offset} is out of range for {len} item(s)")
            }
            Self::DestinationOutOfRange { destination, len } => write!(
                f,
                "move destination {destination} is out of range for {len} item(s)"
            ),
        }
    }
}

impl Error for MoveError {}

/// Applies an extract-and-reinsert move in place.
///
/// Leaves `items` untouched when any index is out of range.
pub fn move_items<T>(items: &mut Vec<T>, offsets: &[usize], destination: usize) -> Result<(), MoveError> {
    let len = items.len();
    let selected: BTreeSet<usize> = offsets.iter().copied().collect();
    if let Some(&offset) = selected.iter().find(|&&offset| offset >= len) {
        return Err(MoveError::OffsetOutOfRange { offset, len });
    }
    if destination > len {
        return Err(MoveError::DestinationOutOfRange { destination, len });
    }
    if selected.is_empty() {
        return Ok(());
    }

    let insert_at = destination - selected.range(..destination).count();
    let mut moved = Vec::with_capacity(selected.len());
    let mut kept = Vec::with_capacity(len - selected.len());
    for (index, item) in items.drain(..).enumerate() {
        if selected.contains(&index) {
            moved.push(item);
        } else {
            kept.push(item);
        }
    }
    kept.splice(insert_at..insert_at, moved);
    *items = kept;
    Ok(())
}

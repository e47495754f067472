//! Import/export formats shared by the stores.
//!
//! # Responsibility
//! - Encode and decode delimited text for task, note and event exports.
//! - Own the short date form used inside exported files.

pub mod csv_codec;

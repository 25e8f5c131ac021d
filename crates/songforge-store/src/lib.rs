//! JSON-file repository adapters for songforge.
//!
//! Both persisted documents are plain JSON files: a flat settings object and
//! a flat array of generation records. Writes go through a temp file followed
//! by a rename, so a crash mid-write never corrupts the previous document.

mod io;
pub mod repositories;

pub use repositories::{JsonHistoryRepository, JsonSettingsRepository};

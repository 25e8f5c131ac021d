//! Generation history record types.
//!
//! The history file is a flat JSON array of these records, newest first.
//! The schema mirrors what earlier releases wrote, so existing files load
//! unchanged.

use serde::{Deserialize, Serialize};

/// Timestamp format used in history records.
pub const RECORD_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One completed generation in the library.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationRecord {
    /// Local wall-clock time of completion, `%Y-%m-%d %H:%M:%S`.
    pub timestamp: String,
    /// Path to the generated MP3.
    pub file_path: String,
    /// Basename of `file_path`.
    pub filename: String,
    /// The parameters the track was generated with.
    pub settings: GenerationSettings,
}

impl GenerationRecord {
    /// Build a record stamped with the current local time.
    #[must_use]
    pub fn now(file_path: impl Into<String>, settings: GenerationSettings) -> Self {
        let file_path = file_path.into();
        let filename = std::path::Path::new(&file_path)
            .file_name()
            .map_or_else(|| file_path.clone(), |n| n.to_string_lossy().into_owned());
        Self {
            timestamp: chrono::Local::now()
                .format(RECORD_TIMESTAMP_FORMAT)
                .to_string(),
            file_path,
            filename,
            settings,
        }
    }
}

/// The nested settings object stored with each record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationSettings {
    pub tags: String,
    pub lyrics: String,
    pub max_length_ms: u64,
    pub topk: u32,
    pub temperature: f64,
    pub cfg_scale: f64,
    /// The resolved seed actually used (never the -1 sentinel).
    pub seed: i64,
}

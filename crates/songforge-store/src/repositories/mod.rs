//! Repository implementations over JSON files.

mod json_history_repository;
mod json_settings_repository;

pub use json_history_repository::JsonHistoryRepository;
pub use json_settings_repository::JsonSettingsRepository;

//! Orchestration services over the ports.

mod generation;
mod history_service;
mod settings_service;

pub use generation::{GenerationService, resolve_output_path};
pub use history_service::HistoryService;
pub use settings_service::SettingsService;

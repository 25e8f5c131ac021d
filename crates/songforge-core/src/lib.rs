//! Core domain types, ports and services for songforge.
//!
//! This crate holds everything the adapters (store, engine, audio, CLI, Tauri)
//! agree on: the settings and history schemas, the event union, the trait
//! seams for infrastructure, and the orchestration services. It has no
//! knowledge of files on disk, child processes, or audio devices.

pub mod domain;
pub mod events;
pub mod paths;
pub mod ports;
pub mod services;
pub mod settings;
pub mod verify;

// Re-export commonly used types for convenience
pub use domain::{
    BatchQueue, DType, Device, GenerationParams, GenerationRecord, GenerationSettings,
    ModelVersion, ParamsError, QuantizationConfig, TagPrompt, resolve_seed, validate_params,
};
pub use events::AppEvent;
pub use paths::{
    PathError, checkpoint_dir, data_root, default_output_dir, ensure_directory, history_path,
    settings_path, verify_writable,
};
pub use ports::{
    AppEventEmitter, CoreError, EngineError, EngineLoadSpec, EnginePort, EngineRequest,
    HistoryRepository, NoopEmitter, RepositoryError, SettingsRepository,
};
pub use services::{GenerationService, HistoryService, SettingsService};
pub use settings::{Settings, SettingsError, SettingsUpdate, validate_settings};
pub use verify::{CheckOutcome, CheckStatus, VerifyReport};

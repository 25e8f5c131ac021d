//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No filesystem or process types in any signature
//! - Repository traits are minimal and CRUD-focused
//! - The engine port is intent-based (load/generate), not protocol-leaking

pub mod engine;
pub mod event_emitter;
pub mod history_repository;
pub mod settings_repository;

use thiserror::Error;

pub use engine::{EngineError, EngineLoadSpec, EnginePort, EngineRequest};
pub use event_emitter::{AppEventEmitter, NoopEmitter};
pub use history_repository::HistoryRepository;
pub use settings_repository::SettingsRepository;

use crate::domain::ParamsError;
use crate::paths::PathError;
use crate::settings::SettingsError;

/// Domain-specific errors for repository operations.
///
/// This error type abstracts away storage implementation details so that
/// services never see raw I/O errors without path context.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Failed to read the backing document.
    #[error("Failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    /// Failed to write the backing document.
    #[error("Failed to write {path}: {reason}")]
    Write { path: String, reason: String },

    /// The backing document exists but does not parse.
    #[error("Malformed data in {path}: {reason}")]
    Corrupt { path: String, reason: String },
}

/// Top-level error for service operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Params(#[from] ParamsError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Path(#[from] PathError),

    /// Another generation (or batch) is already running.
    #[error("Already generating music. Please wait.")]
    Busy,

    /// `run_batch` was called with an empty queue.
    #[error("Batch queue is empty. Add items first.")]
    EmptyBatch,

    /// A history index was out of range.
    #[error("No history entry at index {0}")]
    HistoryIndex(usize),
}

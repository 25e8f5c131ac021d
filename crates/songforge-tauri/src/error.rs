//! Backend error type for the Tauri adapter.
//!
//! Commands in the app shell stringify this for the frontend, which surfaces
//! it as a modal dialog plus a log line.

use songforge_audio::AudioError;
use songforge_core::ports::{CoreError, EngineError};
use songforge_core::paths::PathError;

/// Unified error for [`crate::Backend`] operations.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error(transparent)]
    Path(#[from] PathError),
}

impl From<EngineError> for BackendError {
    fn from(e: EngineError) -> Self {
        Self::Core(CoreError::Engine(e))
    }
}

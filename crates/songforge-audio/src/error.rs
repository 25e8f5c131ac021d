//! Audio error types.

use std::path::PathBuf;

/// Errors that can occur in playback or waveform loading.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    /// Failed to open the audio output stream.
    #[error("Failed to open audio output stream: {0}")]
    OutputStreamError(String),

    /// The audio file does not exist or could not be opened.
    #[error("Audio file not found: {0}")]
    FileNotFound(PathBuf),

    /// The audio stream could not be decoded.
    #[error("Failed to decode {path}: {reason}")]
    DecodeError { path: PathBuf, reason: String },

    /// The dedicated audio thread is gone.
    #[error("Audio thread died")]
    AudioThreadDied,
}

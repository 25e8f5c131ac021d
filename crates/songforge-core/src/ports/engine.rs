//! Generation engine port.
//!
//! The engine is the external, pre-trained model pipeline that turns a
//! lyrics/tags prompt into an audio file. It is consumed, never implemented:
//! this port describes its call contract and nothing about its internals.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{DType, Device, ModelVersion, QuantizationConfig};

/// Everything the engine needs to bring model weights up.
#[derive(Debug, Clone)]
pub struct EngineLoadSpec {
    /// Checkpoint root directory.
    pub checkpoint_dir: PathBuf,
    pub version: ModelVersion,
    pub device: Device,
    pub dtype: DType,
    /// Load submodels on demand instead of up front.
    pub lazy_load: bool,
    /// Reduced-precision loading, when requested.
    pub quantization: Option<QuantizationConfig>,
}

/// One generation request, serialized verbatim onto the engine's stdin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineRequest {
    pub lyrics: String,
    pub tags: String,
    pub max_audio_length_ms: u64,
    /// Where the engine writes the MP3.
    pub save_path: String,
    pub topk: u32,
    pub temperature: f64,
    pub cfg_scale: f64,
    pub seed: i64,
}

/// Errors surfaced by the engine adapter.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine binary could not be located.
    #[error("Engine binary not found: {0}")]
    BinaryNotFound(String),

    /// An operation requires a loaded engine.
    #[error("Engine is not loaded. Load the model first.")]
    NotLoaded,

    /// The engine process failed to spawn, died, or exited abnormally.
    #[error("Engine process error: {0}")]
    Process(String),

    /// The engine emitted something outside the line protocol.
    #[error("Engine protocol error: {0}")]
    Protocol(String),

    /// The engine reported a generation failure.
    #[error("Generation failed: {0}")]
    Generation(String),

    /// The engine reported a load failure.
    #[error("Failed to load model: {0}")]
    Load(String),
}

/// Trait seam for the external generation pipeline.
///
/// Calls are strictly sequential: a `generate` dispatched while another is in
/// flight queues behind it. There is no cancellation once a request has been
/// dispatched, and no timeout.
#[async_trait]
pub trait EnginePort: Send + Sync {
    /// Start the engine and wait until it reports its weights resident.
    async fn load(&self, spec: EngineLoadSpec) -> Result<(), EngineError>;

    /// Run one generation to completion, producing an MP3 at
    /// `req.save_path`. Stage and progress events are emitted through the
    /// adapter's event emitter as they stream in.
    async fn generate(&self, req: EngineRequest) -> Result<(), EngineError>;

    /// Whether a load has completed successfully.
    fn is_loaded(&self) -> bool;

    /// Shut the engine down, releasing its memory.
    async fn unload(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let req = EngineRequest {
            lyrics: "[Verse]\nhello".to_string(),
            tags: "pop,female vocal".to_string(),
            max_audio_length_ms: 30_000,
            save_path: "/out/song.mp3".to_string(),
            topk: 50,
            temperature: 1.0,
            cfg_scale: 1.5,
            seed: 42,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"max_audio_length_ms\":30000"));
        assert!(json.contains("\"save_path\":\"/out/song.mp3\""));
        assert!(json.contains("\"seed\":42"));
    }
}

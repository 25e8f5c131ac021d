//! Canonical event union for all cross-adapter events.
//!
//! This module is the single source of truth for events consumed by the Tauri
//! frontend and printed by the CLI. Events are serialized with a `type` tag:
//!
//! ```json
//! { "type": "generation_completed", "record": { ... }, "elapsedSecs": 93.4 }
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::{Device, GenerationRecord, ModelVersion};

/// Stage of an in-flight generation, as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStage {
    /// Tokenizing and encoding the lyrics/tags prompt.
    Prompt,
    /// Autoregressive frame generation.
    Frames,
    /// Decoding frames into the audio waveform.
    Decode,
}

/// Canonical event types for all adapters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    // ========== Engine Events ==========
    /// Engine load has been requested.
    EngineLoadStarted,

    /// The engine reported its weights resident and is ready to generate.
    EngineLoaded {
        version: ModelVersion,
        device: Device,
    },

    /// Engine load failed.
    EngineLoadFailed { error: String },

    // ========== Generation Events ==========
    /// A single generation was dispatched.
    GenerationStarted {
        #[serde(rename = "savePath")]
        save_path: String,
    },

    /// The engine moved to a new pipeline stage.
    GenerationStage {
        stage: GenerationStage,
        /// Estimated total frame count (present for the `frames` stage).
        #[serde(skip_serializing_if = "Option::is_none")]
        frames: Option<u64>,
    },

    /// Frame-level progress within the `frames` stage.
    GenerationProgress { frame: u64, total: u64 },

    /// A generation finished and was recorded in the library.
    GenerationCompleted {
        record: GenerationRecord,
        #[serde(rename = "elapsedSecs")]
        elapsed_secs: f64,
    },

    /// A generation failed.
    GenerationFailed { error: String },

    // ========== Batch Events ==========
    /// Batch processing started.
    BatchStarted { total: usize },

    /// A batch item was dispatched.
    BatchItemStarted {
        /// 1-based position in the batch.
        index: usize,
        total: usize,
        filename: String,
    },

    /// A batch item finished.
    BatchItemCompleted {
        index: usize,
        total: usize,
        #[serde(rename = "savePath")]
        save_path: String,
        #[serde(rename = "elapsedSecs")]
        elapsed_secs: f64,
    },

    /// The whole batch finished.
    BatchCompleted {
        total: usize,
        #[serde(rename = "elapsedSecs")]
        elapsed_secs: f64,
    },

    /// A batch item failed; remaining items were not attempted.
    BatchFailed { index: usize, error: String },

    // ========== Playback Events ==========
    /// Periodic playback position sample (last write wins).
    PlaybackPosition {
        path: String,
        #[serde(rename = "positionSecs")]
        position_secs: f64,
        #[serde(rename = "durationSecs")]
        duration_secs: f64,
    },

    /// Playback reached the end of the track.
    PlaybackFinished { path: String },

    // ========== Download Events ==========
    /// A checkpoint repository download started.
    DownloadStarted { repo: String },

    /// Per-file download progress.
    DownloadProgress {
        repo: String,
        file: String,
        #[serde(rename = "filesDone")]
        files_done: usize,
        #[serde(rename = "filesTotal")]
        files_total: usize,
    },

    /// A checkpoint repository download finished.
    DownloadCompleted { repo: String },

    /// A checkpoint repository download failed.
    DownloadFailed { repo: String, error: String },

    // ========== Library Events ==========
    /// Records pointing at deleted audio files were pruned.
    HistoryPruned { removed: usize },
}

impl AppEvent {
    /// Get the event name for wire protocols.
    ///
    /// This provides consistent event naming across the Tauri transport and
    /// the CLI presentation.
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::EngineLoadStarted => "engine:load_started",
            Self::EngineLoaded { .. } => "engine:loaded",
            Self::EngineLoadFailed { .. } => "engine:load_failed",
            Self::GenerationStarted { .. } => "generation:started",
            Self::GenerationStage { .. } => "generation:stage",
            Self::GenerationProgress { .. } => "generation:progress",
            Self::GenerationCompleted { .. } => "generation:completed",
            Self::GenerationFailed { .. } => "generation:failed",
            Self::BatchStarted { .. } => "batch:started",
            Self::BatchItemStarted { .. } => "batch:item_started",
            Self::BatchItemCompleted { .. } => "batch:item_completed",
            Self::BatchCompleted { .. } => "batch:completed",
            Self::BatchFailed { .. } => "batch:failed",
            Self::PlaybackPosition { .. } => "playback:position",
            Self::PlaybackFinished { .. } => "playback:finished",
            Self::DownloadStarted { .. } => "download:started",
            Self::DownloadProgress { .. } => "download:progress",
            Self::DownloadCompleted { .. } => "download:completed",
            Self::DownloadFailed { .. } => "download:failed",
            Self::HistoryPruned { .. } => "history:pruned",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = AppEvent::GenerationStarted {
            save_path: "/out/song.mp3".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"generation_started\""));
        assert!(json.contains("\"savePath\":\"/out/song.mp3\""));
    }

    #[test]
    fn test_stage_event_omits_absent_frames() {
        let event = AppEvent::GenerationStage {
            stage: GenerationStage::Prompt,
            frames: None,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("frames"));

        let event = AppEvent::GenerationStage {
            stage: GenerationStage::Frames,
            frames: Some(375),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"frames\":375"));
    }

    /// Lock down event names to prevent frontend subscription mismatches.
    ///
    /// If this test fails, update the event-name table in the frontend's
    /// transport layer to match.
    #[test]
    fn event_names_are_stable() {
        let cases = vec![
            (AppEvent::EngineLoadStarted, "engine:load_started"),
            (
                AppEvent::GenerationFailed {
                    error: "x".to_string(),
                },
                "generation:failed",
            ),
            (AppEvent::BatchStarted { total: 3 }, "batch:started"),
            (
                AppEvent::PlaybackFinished {
                    path: "a.mp3".to_string(),
                },
                "playback:finished",
            ),
            (AppEvent::HistoryPruned { removed: 2 }, "history:pruned"),
        ];

        for (event, expected_name) in cases {
            assert_eq!(event.event_name(), expected_name);
        }
    }
}

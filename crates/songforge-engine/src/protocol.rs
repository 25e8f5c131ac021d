//! Protocol parsing for engine process communication.
//!
//! The engine speaks a JSON-line protocol on stdout. Each line is an object
//! with a required `status` field:
//!
//! ```json
//! {"status": "loading"}
//! {"status": "loaded"}
//! {"status": "stage", "stage": "frames", "frames": 375}
//! {"status": "progress", "frame": 120, "total": 375}
//! {"status": "complete", "path": "/out/song.mp3"}
//! {"status": "error", "message": "CUDA out of memory"}
//! ```

use serde::Deserialize;
use songforge_core::events::GenerationStage;
use thiserror::Error;

/// Errors that can occur when parsing protocol messages.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Missing or invalid 'status' field")]
    InvalidStatus,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    #[error("Unknown stage: {0}")]
    UnknownStage(String),
}

/// Events emitted by the engine process. Maps 1:1 to the JSON protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Weights are being loaded.
    Loading,

    /// Weights are resident; the engine accepts requests.
    Loaded,

    /// The in-flight request moved to a new pipeline stage.
    Stage {
        stage: GenerationStage,
        /// Total frame count, when the engine knows it.
        frames: Option<u64>,
    },

    /// Frame-level progress within the frames stage.
    Progress { frame: u64, total: u64 },

    /// The in-flight request finished; the audio file is on disk.
    Complete {
        /// Path the engine wrote, when echoed back.
        path: Option<String>,
    },

    /// The in-flight request (or load) failed.
    Error { message: String },
}

/// Raw JSON envelope for parsing.
#[derive(Deserialize)]
struct RawEnvelope {
    status: Option<String>,
    // Stage fields
    stage: Option<String>,
    frames: Option<u64>,
    // Progress fields
    frame: Option<u64>,
    total: Option<u64>,
    // Completion fields
    path: Option<String>,
    // Error fields
    message: Option<String>,
    detail: Option<String>,
}

/// Parse a single line of protocol output into an [`EngineEvent`].
pub fn parse_line(line: &str) -> Result<EngineEvent, ProtocolError> {
    let envelope: RawEnvelope = serde_json::from_str(line)?;

    let status = envelope.status.ok_or(ProtocolError::InvalidStatus)?;

    match status.as_str() {
        "loading" => Ok(EngineEvent::Loading),

        "loaded" => Ok(EngineEvent::Loaded),

        "stage" => {
            let stage = envelope.stage.ok_or(ProtocolError::MissingField("stage"))?;
            let stage = match stage.as_str() {
                "prompt" => GenerationStage::Prompt,
                "frames" => GenerationStage::Frames,
                "decode" => GenerationStage::Decode,
                other => return Err(ProtocolError::UnknownStage(other.to_string())),
            };
            Ok(EngineEvent::Stage {
                stage,
                frames: envelope.frames,
            })
        }

        "progress" => {
            let frame = envelope.frame.ok_or(ProtocolError::MissingField("frame"))?;
            let total = envelope.total.ok_or(ProtocolError::MissingField("total"))?;
            Ok(EngineEvent::Progress { frame, total })
        }

        "complete" => Ok(EngineEvent::Complete {
            path: envelope.path,
        }),

        "error" => {
            // Accept message or detail as the explanation
            let message = envelope
                .message
                .or(envelope.detail)
                .ok_or(ProtocolError::MissingField("message"))?;
            Ok(EngineEvent::Error { message })
        }

        other => Err(ProtocolError::UnknownStatus(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_loading_and_loaded() {
        assert_eq!(
            parse_line(r#"{"status": "loading"}"#).unwrap(),
            EngineEvent::Loading
        );
        assert_eq!(
            parse_line(r#"{"status": "loaded"}"#).unwrap(),
            EngineEvent::Loaded
        );
    }

    #[test]
    fn test_parse_stage_with_frames() {
        let event = parse_line(r#"{"status": "stage", "stage": "frames", "frames": 375}"#).unwrap();
        assert_eq!(
            event,
            EngineEvent::Stage {
                stage: GenerationStage::Frames,
                frames: Some(375),
            }
        );
    }

    #[test]
    fn test_parse_stage_without_frames() {
        let event = parse_line(r#"{"status": "stage", "stage": "prompt"}"#).unwrap();
        assert_eq!(
            event,
            EngineEvent::Stage {
                stage: GenerationStage::Prompt,
                frames: None,
            }
        );
    }

    #[test]
    fn test_parse_stage_missing_stage() {
        let err = parse_line(r#"{"status": "stage"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MissingField("stage")));
    }

    #[test]
    fn test_parse_unknown_stage() {
        let err = parse_line(r#"{"status": "stage", "stage": "warp"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownStage(_)));
    }

    #[test]
    fn test_parse_progress() {
        let event = parse_line(r#"{"status": "progress", "frame": 120, "total": 375}"#).unwrap();
        assert_eq!(
            event,
            EngineEvent::Progress {
                frame: 120,
                total: 375,
            }
        );
    }

    #[test]
    fn test_parse_progress_missing_total() {
        let err = parse_line(r#"{"status": "progress", "frame": 120}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MissingField("total")));
    }

    #[test]
    fn test_parse_complete_with_and_without_path() {
        let event = parse_line(r#"{"status": "complete", "path": "/out/song.mp3"}"#).unwrap();
        assert_eq!(
            event,
            EngineEvent::Complete {
                path: Some("/out/song.mp3".to_string()),
            }
        );

        let event = parse_line(r#"{"status": "complete"}"#).unwrap();
        assert_eq!(event, EngineEvent::Complete { path: None });
    }

    #[test]
    fn test_parse_error_with_message() {
        let event = parse_line(r#"{"status": "error", "message": "CUDA out of memory"}"#).unwrap();
        assert_eq!(
            event,
            EngineEvent::Error {
                message: "CUDA out of memory".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_error_with_detail_fallback() {
        let event = parse_line(r#"{"status": "error", "detail": "weights missing"}"#).unwrap();
        assert_eq!(
            event,
            EngineEvent::Error {
                message: "weights missing".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_error_missing_message() {
        let err = parse_line(r#"{"status": "error"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MissingField("message")));
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse_line("step 1/3: processing prompt").unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidJson(_)));
    }

    #[test]
    fn test_parse_missing_status() {
        let err = parse_line(r#"{"frame": 1, "total": 2}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidStatus));
    }

    #[test]
    fn test_parse_unknown_status() {
        let err = parse_line(r#"{"status": "telemetry"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownStatus(_)));
    }
}

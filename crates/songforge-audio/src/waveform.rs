//! Waveform rendering data.
//!
//! Loads an audio stream, mixes it down to mono, and decimates it to a
//! bounded number of display points by fixed-stride subsampling. The result
//! is what the library view plots as amplitude vs. time.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, Source};
use serde::{Deserialize, Serialize};

use crate::error::AudioError;

/// Decimated waveform of one audio file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Waveform {
    /// Mono amplitudes in [-1, 1], one per display point.
    pub points: Vec<f32>,
    /// Full track duration in seconds.
    #[serde(rename = "durationSecs")]
    pub duration_secs: f64,
    /// Source sample rate.
    #[serde(rename = "sampleRate")]
    pub sample_rate: u32,
    /// Samples between consecutive points.
    pub stride: usize,
}

impl Waveform {
    /// Display points to aim for; the stride is rounded down, so the actual
    /// count can exceed this slightly.
    pub const DEFAULT_MAX_POINTS: usize = 1000;

    /// Load and decimate an audio file.
    pub fn from_file(path: &Path, max_points: usize) -> Result<Self, AudioError> {
        let file = File::open(path).map_err(|_| AudioError::FileNotFound(path.to_path_buf()))?;
        let decoder =
            Decoder::new(BufReader::new(file)).map_err(|e| AudioError::DecodeError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let channels = usize::from(decoder.channels());
        let sample_rate = decoder.sample_rate();

        // Mix interleaved channels down to mono
        let mut mono: Vec<f32> = Vec::new();
        let mut acc = 0.0_f32;
        let mut in_frame = 0_usize;
        for sample in decoder.convert_samples::<f32>() {
            acc += sample;
            in_frame += 1;
            if in_frame == channels {
                #[allow(clippy::cast_precision_loss)]
                mono.push(acc / channels as f32);
                acc = 0.0;
                in_frame = 0;
            }
        }

        if mono.is_empty() {
            return Err(AudioError::DecodeError {
                path: path.to_path_buf(),
                reason: "no audio samples".to_string(),
            });
        }

        #[allow(clippy::cast_precision_loss)]
        let duration_secs = mono.len() as f64 / f64::from(sample_rate);

        let stride = (mono.len() / max_points.max(1)).max(1);
        let points = mono
            .iter()
            .step_by(stride)
            .map(|s| s.clamp(-1.0, 1.0))
            .collect();

        Ok(Self {
            points,
            duration_secs,
            sample_rate,
            stride,
        })
    }

    /// Time axis matching [`points`](Self::points), in seconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn point_times(&self) -> Vec<f64> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, _)| (i * self.stride) as f64 / f64::from(self.sample_rate))
            .collect()
    }
}

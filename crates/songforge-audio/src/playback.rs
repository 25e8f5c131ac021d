//! Audio playback via `rodio`.
//!
//! One track at a time: starting a new file stops the previous sink. The
//! position is derived from wall-clock time since `play`, with paused
//! stretches excluded.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::{Duration, Instant};

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use crate::error::AudioError;

/// Audio playback handle for library tracks.
///
/// Not `Send` on all platforms - owned by the dedicated audio thread
/// (see [`crate::thread::AudioThreadHandle`]).
pub struct AudioPlayback {
    /// rodio output stream (must be kept alive).
    _stream: OutputStream,

    /// Handle used to create sinks.
    stream_handle: OutputStreamHandle,

    /// Current playback sink (if any).
    sink: Option<Sink>,

    /// Wall-clock start of the current track.
    started_at: Option<Instant>,

    /// When the current pause began, while paused.
    paused_at: Option<Instant>,

    /// Accumulated paused time for the current track.
    paused_total: Duration,

    /// Volume carried across tracks (0.0 - 1.0).
    volume: f32,
}

impl AudioPlayback {
    /// Create a new audio playback instance using the default output device.
    pub fn new() -> Result<Self, AudioError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| AudioError::OutputStreamError(e.to_string()))?;

        tracing::info!("Audio playback initialized on default output device");

        Ok(Self {
            _stream: stream,
            stream_handle,
            sink: None,
            started_at: None,
            paused_at: None,
            paused_total: Duration::ZERO,
            volume: 0.7,
        })
    }

    /// Start playing a file, stopping any current playback first.
    pub fn play(&mut self, path: &Path) -> Result<(), AudioError> {
        self.stop();

        let file = File::open(path).map_err(|_| AudioError::FileNotFound(path.to_path_buf()))?;
        let source = Decoder::new(BufReader::new(file)).map_err(|e| AudioError::DecodeError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| AudioError::OutputStreamError(e.to_string()))?;
        sink.set_volume(self.volume);
        sink.append(source);

        self.sink = Some(sink);
        self.started_at = Some(Instant::now());
        self.paused_at = None;
        self.paused_total = Duration::ZERO;

        tracing::debug!(path = %path.display(), "Audio playback started");
        Ok(())
    }

    /// Pause playback, freezing the position clock.
    pub fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            if !sink.is_paused() {
                sink.pause();
                self.paused_at = Some(Instant::now());
            }
        }
    }

    /// Resume paused playback.
    pub fn resume(&mut self) {
        if let Some(sink) = &self.sink {
            if sink.is_paused() {
                sink.play();
                if let Some(paused_at) = self.paused_at.take() {
                    self.paused_total += paused_at.elapsed();
                }
            }
        }
    }

    /// Stop playback and reset the position clock.
    pub fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.started_at = None;
        self.paused_at = None;
        self.paused_total = Duration::ZERO;
    }

    /// Set playback volume (0.0 = muted, 1.0 = full). Carries to new tracks.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(sink) = &self.sink {
            sink.set_volume(self.volume);
        }
    }

    /// Check whether audio is queued (playing or paused).
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.sink.as_ref().is_some_and(|sink| !sink.empty())
    }

    /// Check whether playback is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.sink
            .as_ref()
            .is_some_and(|sink| sink.is_paused() && !sink.empty())
    }

    /// Elapsed playback position in seconds, excluding paused time.
    ///
    /// `None` when nothing is queued (stopped or drained).
    #[must_use]
    pub fn position_secs(&self) -> Option<f64> {
        if !self.is_playing() {
            return None;
        }
        let started_at = self.started_at?;
        let raw = self
            .paused_at
            .map_or_else(|| started_at.elapsed(), |p| p.duration_since(started_at));
        Some(raw.saturating_sub(self.paused_total).as_secs_f64())
    }
}

//! Playback position watcher.
//!
//! A background thread samples the playback state on a fixed interval and
//! marshals each sample to the UI through the event emitter. Last write
//! wins; there is no ordering guarantee beyond that. The loop terminates
//! when the external stop flag is set, or when playback drains naturally -
//! in which case it emits `PlaybackFinished` exactly once.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use songforge_core::events::AppEvent;
use songforge_core::ports::AppEventEmitter;

use crate::thread::AudioThreadHandle;

/// How often the watcher samples the playback state.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// The slice of playback state the watcher needs.
///
/// [`AudioThreadHandle`] is the production implementation; tests drive the
/// watcher with a scripted fake.
pub trait PlaybackProbe: Send + Sync {
    /// Whether audio is queued (playing or paused).
    fn is_playing(&self) -> bool;

    /// Whether playback is paused.
    fn is_paused(&self) -> bool;

    /// Elapsed position in seconds, excluding paused time.
    fn position_secs(&self) -> Option<f64>;
}

impl PlaybackProbe for AudioThreadHandle {
    fn is_playing(&self) -> bool {
        Self::is_playing(self)
    }

    fn is_paused(&self) -> bool {
        Self::is_paused(self)
    }

    fn position_secs(&self) -> Option<f64> {
        Self::position_secs(self)
    }
}

/// Spawns and identifies the polling thread.
pub struct PositionWatcher;

impl PositionWatcher {
    /// Start watching the given track.
    ///
    /// Setting `stop` ends the loop silently (used when the user stops
    /// playback or starts another track); natural drain emits
    /// `PlaybackFinished`.
    pub fn spawn(
        probe: Arc<dyn PlaybackProbe>,
        path: String,
        duration_secs: f64,
        emitter: Arc<dyn AppEventEmitter>,
        stop: Arc<AtomicBool>,
    ) -> thread::JoinHandle<()> {
        thread::spawn(move || {
            Self::run(&*probe, &path, duration_secs, &*emitter, &stop, POLL_INTERVAL);
        })
    }

    fn run(
        probe: &dyn PlaybackProbe,
        path: &str,
        duration_secs: f64,
        emitter: &dyn AppEventEmitter,
        stop: &AtomicBool,
        interval: Duration,
    ) {
        loop {
            if stop.load(Ordering::SeqCst) {
                break;
            }

            if !probe.is_playing() {
                // Playback finished naturally
                emitter.emit(AppEvent::PlaybackFinished {
                    path: path.to_string(),
                });
                break;
            }

            if !probe.is_paused() {
                if let Some(position_secs) = probe.position_secs() {
                    emitter.emit(AppEvent::PlaybackPosition {
                        path: path.to_string(),
                        position_secs,
                        duration_secs,
                    });
                }
            }

            thread::sleep(interval);
        }
    }
}

//! Inline audio playback and waveform rendering.
//!
//! `rodio`'s output types are `!Send` on some platforms, so playback is
//! confined to a dedicated OS thread behind [`AudioThreadHandle`]. The
//! position watcher polls that handle on a fixed interval and marshals
//! samples to the UI through the event emitter; the waveform module turns an
//! audio file into a bounded set of display points.

pub mod error;
pub mod playback;
pub mod position;
pub mod thread;
pub mod waveform;

pub use error::AudioError;
pub use playback::AudioPlayback;
pub use position::{PlaybackProbe, PositionWatcher};
pub use thread::AudioThreadHandle;
pub use waveform::Waveform;

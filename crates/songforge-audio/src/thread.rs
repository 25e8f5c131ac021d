//! Dedicated audio I/O thread - isolates `!Send` audio resources.
//!
//! `rodio::OutputStream` is `!Send` on some platforms. Rather than unsafe
//! Send/Sync impls, playback is confined to a single OS thread and every
//! operation is proxied through an [`AudioCommand`] over a channel.

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use crate::error::AudioError;
use crate::playback::AudioPlayback;

/// A command sent from callers to the audio thread.
enum AudioCommand {
    /// Start playing a file (stops any current playback).
    Play {
        path: PathBuf,
        reply: mpsc::Sender<Result<(), AudioError>>,
    },

    /// Pause playback (fire-and-forget).
    Pause,

    /// Resume paused playback (fire-and-forget).
    Resume,

    /// Stop playback (fire-and-forget).
    Stop,

    /// Set playback volume, 0.0 - 1.0 (fire-and-forget).
    SetVolume(f32),

    /// Query whether audio is queued (playing or paused).
    IsPlaying { reply: mpsc::Sender<bool> },

    /// Query whether playback is paused.
    IsPaused { reply: mpsc::Sender<bool> },

    /// Query the elapsed playback position.
    Position { reply: mpsc::Sender<Option<f64>> },

    /// Shut down the audio thread, releasing the output device.
    Shutdown,
}

/// `Send + Sync` handle to the dedicated audio thread.
///
/// Request–reply methods block the caller until the audio thread responds;
/// this latency is microseconds of local channel I/O plus the audio
/// operation itself.
pub struct AudioThreadHandle {
    cmd_tx: mpsc::Sender<AudioCommand>,
    thread: Option<thread::JoinHandle<()>>,
}

impl AudioThreadHandle {
    /// Spawn the audio thread, initialise the output device, and return the
    /// handle.
    ///
    /// Errors from `AudioPlayback::new` are propagated back to the caller
    /// via a one-shot init channel.
    pub fn spawn() -> Result<Self, AudioError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<AudioCommand>();
        let (init_tx, init_rx) = mpsc::channel::<Result<(), AudioError>>();

        let thread = thread::Builder::new()
            .name("songforge-audio".into())
            .spawn(move || {
                Self::run(cmd_rx, &init_tx);
            })
            .map_err(|e| AudioError::OutputStreamError(format!("failed to spawn audio thread: {e}")))?;

        // Wait for the audio thread to finish initialisation.
        init_rx.recv().map_err(|_| AudioError::AudioThreadDied)??;

        Ok(Self {
            cmd_tx,
            thread: Some(thread),
        })
    }

    /// Start playing a file, stopping any current playback.
    pub fn play(&self, path: PathBuf) -> Result<(), AudioError> {
        let (tx, rx) = mpsc::channel();
        self.cmd_tx
            .send(AudioCommand::Play { path, reply: tx })
            .map_err(|_| AudioError::AudioThreadDied)?;
        rx.recv().map_err(|_| AudioError::AudioThreadDied)?
    }

    /// Pause playback.
    pub fn pause(&self) {
        let _ = self.cmd_tx.send(AudioCommand::Pause);
    }

    /// Resume paused playback.
    pub fn resume(&self) {
        let _ = self.cmd_tx.send(AudioCommand::Resume);
    }

    /// Stop playback.
    pub fn stop(&self) {
        let _ = self.cmd_tx.send(AudioCommand::Stop);
    }

    /// Set playback volume (0.0 = muted, 1.0 = full).
    pub fn set_volume(&self, volume: f32) {
        let _ = self.cmd_tx.send(AudioCommand::SetVolume(volume));
    }

    /// Check whether audio is queued (playing or paused).
    pub fn is_playing(&self) -> bool {
        self.query(|reply| AudioCommand::IsPlaying { reply })
            .unwrap_or(false)
    }

    /// Check whether playback is paused.
    pub fn is_paused(&self) -> bool {
        self.query(|reply| AudioCommand::IsPaused { reply })
            .unwrap_or(false)
    }

    /// Elapsed playback position in seconds, excluding paused time.
    pub fn position_secs(&self) -> Option<f64> {
        self.query(|reply| AudioCommand::Position { reply })
            .flatten()
    }

    /// Like request–reply but for simple queries that return a bare value.
    /// Returns `None` if the thread is dead.
    fn query<T>(&self, build: impl FnOnce(mpsc::Sender<T>) -> AudioCommand) -> Option<T> {
        let (tx, rx) = mpsc::channel();
        self.cmd_tx.send(build(tx)).ok()?;
        rx.recv().ok()
    }

    /// The body of the dedicated audio thread. Owns `AudioPlayback` for its
    /// entire lifetime - it never crosses thread boundaries.
    fn run(cmd_rx: mpsc::Receiver<AudioCommand>, init_tx: &mpsc::Sender<Result<(), AudioError>>) {
        let mut playback = match AudioPlayback::new() {
            Ok(p) => p,
            Err(e) => {
                let _ = init_tx.send(Err(e));
                return;
            }
        };

        if init_tx.send(Ok(())).is_err() {
            // Caller dropped - nothing to do.
            return;
        }

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                AudioCommand::Play { path, reply } => {
                    let _ = reply.send(playback.play(&path));
                }
                AudioCommand::Pause => playback.pause(),
                AudioCommand::Resume => playback.resume(),
                AudioCommand::Stop => playback.stop(),
                AudioCommand::SetVolume(volume) => playback.set_volume(volume),
                AudioCommand::IsPlaying { reply } => {
                    let _ = reply.send(playback.is_playing());
                }
                AudioCommand::IsPaused { reply } => {
                    let _ = reply.send(playback.is_paused());
                }
                AudioCommand::Position { reply } => {
                    let _ = reply.send(playback.position_secs());
                }
                AudioCommand::Shutdown => break,
            }
        }

        // `playback` is dropped here, on the audio thread.
        tracing::debug!("Audio thread shutting down");
    }
}

impl Drop for AudioThreadHandle {
    fn drop(&mut self) {
        // Best-effort shutdown - the thread may already be dead.
        let _ = self.cmd_tx.send(AudioCommand::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

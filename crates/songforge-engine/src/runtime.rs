//! Engine runtime - keeps the pipeline resident and queues requests.
//!
//! An actor task owns the child process; callers talk to it through an mpsc
//! channel with oneshot replies. Requests are processed strictly
//! sequentially, and once a request has been written to the engine there is
//! no cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{mpsc, oneshot};

use songforge_core::events::{AppEvent, GenerationStage};
use songforge_core::ports::{
    AppEventEmitter, EngineError, EngineLoadSpec, EnginePort, EngineRequest,
};

use crate::process::EngineProcess;
use crate::protocol::EngineEvent;
use crate::resolve::resolve_engine_binary;

/// Milliseconds of audio per generated frame.
const FRAME_MS: u64 = 80;

enum EngineCommand {
    Load {
        spec: EngineLoadSpec,
        reply: oneshot::Sender<Result<(), EngineError>>,
    },
    Generate {
        req: EngineRequest,
        reply: oneshot::Sender<Result<(), EngineError>>,
    },
    Unload {
        reply: oneshot::Sender<()>,
    },
}

/// `Send + Sync` handle to the engine actor.
///
/// Cloneable; all clones talk to the same resident process.
#[derive(Clone)]
pub struct EngineRuntime {
    cmd_tx: mpsc::Sender<EngineCommand>,
    loaded: Arc<AtomicBool>,
}

impl EngineRuntime {
    /// Spawn the engine actor. Must be called from within a tokio runtime.
    ///
    /// Stage and progress events observed during generation are forwarded
    /// through `emitter`.
    #[must_use]
    pub fn spawn(emitter: Arc<dyn AppEventEmitter>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let loaded = Arc::new(AtomicBool::new(false));
        tokio::spawn(run(cmd_rx, emitter, Arc::clone(&loaded)));
        Self { cmd_tx, loaded }
    }

    async fn send_and_recv<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, EngineError>>) -> EngineCommand,
    ) -> Result<T, EngineError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(build(tx))
            .await
            .map_err(|_| EngineError::Process("engine task terminated".to_string()))?;
        rx.await
            .map_err(|_| EngineError::Process("engine task terminated".to_string()))?
    }
}

#[async_trait::async_trait]
impl EnginePort for EngineRuntime {
    async fn load(&self, spec: EngineLoadSpec) -> Result<(), EngineError> {
        self.send_and_recv(|reply| EngineCommand::Load { spec, reply })
            .await
    }

    async fn generate(&self, req: EngineRequest) -> Result<(), EngineError> {
        self.send_and_recv(|reply| EngineCommand::Generate { req, reply })
            .await
    }

    fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    async fn unload(&self) {
        let (tx, rx) = oneshot::channel();
        if self
            .cmd_tx
            .send(EngineCommand::Unload { reply: tx })
            .await
            .is_ok()
        {
            let _ = rx.await;
        }
    }
}

/// The actor body. Owns the engine process for its entire lifetime.
async fn run(
    mut cmd_rx: mpsc::Receiver<EngineCommand>,
    emitter: Arc<dyn AppEventEmitter>,
    loaded: Arc<AtomicBool>,
) {
    let mut process: Option<EngineProcess> = None;

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            EngineCommand::Load { spec, reply } => {
                // A reload replaces any resident process
                if let Some(old) = process.take() {
                    loaded.store(false, Ordering::SeqCst);
                    old.shutdown().await;
                }

                let result = load_process(&spec).await;
                match result {
                    Ok(p) => {
                        process = Some(p);
                        loaded.store(true, Ordering::SeqCst);
                        let _ = reply.send(Ok(()));
                    }
                    Err(e) => {
                        let _ = reply.send(Err(e));
                    }
                }
            }

            EngineCommand::Generate { req, reply } => {
                let Some(p) = process.as_mut() else {
                    let _ = reply.send(Err(EngineError::NotLoaded));
                    continue;
                };

                let estimated_frames = req.max_audio_length_ms / FRAME_MS;
                let result = p
                    .generate(&req, |event| {
                        forward_event(&*emitter, event, estimated_frames);
                    })
                    .await;

                // A process-level failure means the engine is gone
                if matches!(result, Err(EngineError::Process(_))) {
                    process = None;
                    loaded.store(false, Ordering::SeqCst);
                }

                let _ = reply.send(result);
            }

            EngineCommand::Unload { reply } => {
                if let Some(p) = process.take() {
                    loaded.store(false, Ordering::SeqCst);
                    p.shutdown().await;
                }
                let _ = reply.send(());
            }
        }
    }

    // Channel closed: drop the process with the actor
    if let Some(p) = process.take() {
        p.shutdown().await;
    }
}

async fn load_process(spec: &EngineLoadSpec) -> Result<EngineProcess, EngineError> {
    let binary = resolve_engine_binary()?;
    let mut process = EngineProcess::spawn(&binary, spec).await?;
    process.wait_loaded().await?;
    Ok(process)
}

/// Map protocol events onto the app event union.
fn forward_event(emitter: &dyn AppEventEmitter, event: &EngineEvent, estimated_frames: u64) {
    match event {
        EngineEvent::Stage { stage, frames } => {
            // The frames stage always carries a total, estimating when the
            // engine omits it (80 ms of audio per frame).
            let frames = if *stage == GenerationStage::Frames {
                frames.or(Some(estimated_frames))
            } else {
                *frames
            };
            emitter.emit(AppEvent::GenerationStage {
                stage: *stage,
                frames,
            });
        }
        EngineEvent::Progress { frame, total } => {
            emitter.emit(AppEvent::GenerationProgress {
                frame: *frame,
                total: *total,
            });
        }
        // Loading/Loaded never appear mid-generation; Complete/Error are
        // reported through the request result.
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use songforge_core::ports::NoopEmitter;

    #[tokio::test]
    async fn test_generate_before_load_is_rejected() {
        let runtime = EngineRuntime::spawn(Arc::new(NoopEmitter));
        assert!(!runtime.is_loaded());

        let req = EngineRequest {
            lyrics: "la".to_string(),
            tags: "pop".to_string(),
            max_audio_length_ms: 10_000,
            save_path: "/tmp/x.mp3".to_string(),
            topk: 50,
            temperature: 1.0,
            cfg_scale: 1.5,
            seed: 1,
        };

        assert!(matches!(
            runtime.generate(req).await,
            Err(EngineError::NotLoaded)
        ));
    }

    #[tokio::test]
    async fn test_unload_without_load_is_a_noop() {
        let runtime = EngineRuntime::spawn(Arc::new(NoopEmitter));
        runtime.unload().await;
        assert!(!runtime.is_loaded());
    }
}

//! Engine child-process supervision.
//!
//! Spawns the `songgen` binary with the load-time flags, then exchanges
//! JSON lines with it: requests go in on stdin, events come back on stdout.
//! stderr is drained continuously into a bounded tail buffer so that a crash
//! can be reported with context.

use std::collections::VecDeque;
use std::path::Path;
use std::process::Stdio;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

use songforge_core::ports::{EngineError, EngineLoadSpec, EngineRequest};

use crate::protocol::{EngineEvent, ProtocolError, parse_line};

/// How many stderr lines to keep for crash reports.
const STDERR_TAIL_LINES: usize = 40;

/// A running engine process with its protocol streams.
pub struct EngineProcess {
    child: Child,
    stdin: ChildStdin,
    lines: Lines<BufReader<ChildStdout>>,
    stderr_tail: Arc<Mutex<VecDeque<String>>>,
}

impl EngineProcess {
    /// Spawn the engine with the given load spec.
    ///
    /// The returned process has not necessarily finished loading; call
    /// [`wait_loaded`](Self::wait_loaded) next.
    pub async fn spawn(binary: &Path, spec: &EngineLoadSpec) -> Result<Self, EngineError> {
        let mut cmd = Command::new(binary);
        cmd.arg("--ckpt")
            .arg(&spec.checkpoint_dir)
            .arg("--version")
            .arg(spec.version.as_str())
            .arg("--device")
            .arg(spec.device.as_str())
            .arg("--dtype")
            .arg(spec.dtype.as_str());

        if spec.lazy_load {
            cmd.arg("--lazy-load");
        }
        if spec.quantization.is_some_and(|q| q.load_in_8bit) {
            cmd.arg("--load-in-8bit");
        }

        cmd.kill_on_drop(true)
            .env("PYTHONUNBUFFERED", "1")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::info!(binary = %binary.display(), "Spawning engine process");

        let mut child = cmd.spawn().map_err(|e| {
            EngineError::Process(format!("Failed to spawn {}: {e}", binary.display()))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::Process("Missing stdin".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Process("Missing stdout".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| EngineError::Process("Missing stderr".to_string()))?;

        // Drain stderr continuously; keep the tail for crash reports.
        let stderr_tail = Arc::new(Mutex::new(VecDeque::with_capacity(STDERR_TAIL_LINES)));
        let tail = Arc::clone(&stderr_tail);
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                tracing::debug!(target: "songgen", "{line}");
                let mut tail = tail.lock().unwrap();
                if tail.len() == STDERR_TAIL_LINES {
                    tail.pop_front();
                }
                tail.push_back(line);
            }
        });

        Ok(Self {
            child,
            stdin,
            lines: BufReader::new(stdout).lines(),
            stderr_tail,
        })
    }

    /// Read events until the engine reports its weights resident.
    pub async fn wait_loaded(&mut self) -> Result<(), EngineError> {
        loop {
            match self.next_event().await? {
                EngineEvent::Loading => tracing::debug!("Engine loading weights"),
                EngineEvent::Loaded => return Ok(()),
                EngineEvent::Error { message } => return Err(EngineError::Load(message)),
                other => {
                    return Err(EngineError::Protocol(format!(
                        "unexpected event while loading: {other:?}"
                    )));
                }
            }
        }
    }

    /// Run one generation request to completion.
    ///
    /// Every event before the terminal one is forwarded to `on_event`
    /// (including the final `Complete`).
    pub async fn generate(
        &mut self,
        req: &EngineRequest,
        mut on_event: impl FnMut(&EngineEvent),
    ) -> Result<(), EngineError> {
        let line =
            serde_json::to_string(req).map_err(|e| EngineError::Protocol(e.to_string()))?;

        self.stdin
            .write_all(line.as_bytes())
            .await
            .map_err(|e| EngineError::Process(format!("Failed to write request: {e}")))?;
        self.stdin
            .write_all(b"\n")
            .await
            .map_err(|e| EngineError::Process(format!("Failed to write request: {e}")))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| EngineError::Process(format!("Failed to flush request: {e}")))?;

        loop {
            let event = self.next_event().await?;
            match event {
                EngineEvent::Complete { .. } => {
                    on_event(&event);
                    return Ok(());
                }
                EngineEvent::Error { message } => return Err(EngineError::Generation(message)),
                ref other => on_event(other),
            }
        }
    }

    /// Read the next protocol event, skipping blank and non-JSON lines.
    async fn next_event(&mut self) -> Result<EngineEvent, EngineError> {
        loop {
            let line = self
                .lines
                .next_line()
                .await
                .map_err(|e| EngineError::Process(e.to_string()))?;

            let Some(line) = line else {
                // stdout closed: the process is gone
                return Err(EngineError::Process(self.exit_reason().await));
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match parse_line(trimmed) {
                Ok(event) => return Ok(event),
                Err(ProtocolError::InvalidJson(_)) => {
                    // Non-protocol output from the engine's own logging
                    tracing::debug!(target: "songgen", "{trimmed}");
                }
                Err(e) => return Err(EngineError::Protocol(e.to_string())),
            }
        }
    }

    /// Describe why the process went away, including the stderr tail.
    async fn exit_reason(&mut self) -> String {
        let status = match self.child.wait().await {
            Ok(status) => format!("engine exited with {status}"),
            Err(e) => format!("engine exited ({e})"),
        };

        let tail: Vec<String> = self
            .stderr_tail
            .lock()
            .unwrap()
            .iter()
            .cloned()
            .collect();

        if tail.is_empty() {
            status
        } else {
            format!("{status}: {}", tail.join(" | "))
        }
    }

    /// Kill the process and release its resources.
    pub async fn shutdown(mut self) {
        let _ = self.child.kill().await;
        tracing::debug!("Engine process shut down");
    }
}

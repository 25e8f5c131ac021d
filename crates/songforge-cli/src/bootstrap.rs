//! CLI composition root: repositories, services, console event printing.

use std::sync::Arc;

use anyhow::Context;

use songforge_core::events::AppEvent;
use songforge_core::paths::{history_path, settings_path};
use songforge_core::ports::AppEventEmitter;
use songforge_core::services::{HistoryService, SettingsService};
use songforge_store::{JsonHistoryRepository, JsonSettingsRepository};

/// Services shared by every handler.
pub struct CliContext {
    pub settings: Arc<SettingsService>,
    pub history: Arc<HistoryService>,
    pub emitter: Arc<dyn AppEventEmitter>,
}

/// Build the CLI service stack over the JSON stores.
pub fn build_context() -> anyhow::Result<CliContext> {
    let emitter: Arc<dyn AppEventEmitter> = Arc::new(ConsoleEmitter);

    let settings_repo = Arc::new(JsonSettingsRepository::new(
        settings_path().context("resolving settings path")?,
    ));
    let history_repo = Arc::new(JsonHistoryRepository::new(
        history_path().context("resolving history path")?,
    ));

    Ok(CliContext {
        settings: Arc::new(SettingsService::new(settings_repo)),
        history: Arc::new(HistoryService::new(history_repo, Arc::clone(&emitter))),
        emitter,
    })
}

/// Event emitter that narrates progress on stdout.
///
/// The GUI renders these events in its log panel; on the command line they
/// become plain progress lines.
#[derive(Debug, Clone, Default)]
pub struct ConsoleEmitter;

impl AppEventEmitter for ConsoleEmitter {
    fn emit(&self, event: AppEvent) {
        match event {
            AppEvent::EngineLoadStarted => {
                println!("Loading model... This may take a few minutes.");
            }
            AppEvent::EngineLoaded { version, device } => {
                println!("Model loaded ({version} on {device})");
            }
            AppEvent::GenerationStarted { save_path } => {
                println!("Generating -> {save_path}");
            }
            AppEvent::GenerationStage { stage, frames } => match frames {
                Some(frames) => println!("  stage: {stage:?} ({frames} frames)"),
                None => println!("  stage: {stage:?}"),
            },
            AppEvent::GenerationProgress { frame, total } => {
                // Keep the noise down: every ~10% only
                if total > 0 && (frame % (total / 10).max(1) == 0 || frame == total) {
                    println!("  frames: {frame}/{total}");
                }
            }
            AppEvent::GenerationCompleted {
                record,
                elapsed_secs,
            } => {
                let minutes = (elapsed_secs / 60.0).floor();
                let seconds = elapsed_secs % 60.0;
                println!(
                    "Generated {} in {minutes:.0} min {seconds:.0} sec",
                    record.file_path
                );
            }
            AppEvent::DownloadStarted { repo } => println!("Downloading {repo}..."),
            AppEvent::DownloadProgress {
                file,
                files_done,
                files_total,
                ..
            } => {
                println!("  [{files_done}/{files_total}] {file}");
            }
            AppEvent::DownloadCompleted { repo } => println!("Downloaded {repo}"),
            AppEvent::DownloadFailed { repo, error } => {
                eprintln!("Download of {repo} failed: {error}");
            }
            AppEvent::HistoryPruned { removed } => {
                println!("Cleaned up {removed} deleted file(s) from library");
            }
            // Batch and playback events have no CLI surface
            _ => {}
        }
    }

    fn clone_box(&self) -> Box<dyn AppEventEmitter> {
        Box::new(self.clone())
    }
}

//! Composition root for the GUI backend.
//!
//! Wires the JSON repositories, services, engine runtime and audio thread
//! into a [`Backend`]. Must be called from within a tokio runtime (the
//! engine actor is spawned here).

use std::sync::Arc;

use anyhow::Context;

use songforge_audio::AudioThreadHandle;
use songforge_core::paths::{history_path, settings_path};
use songforge_core::ports::{AppEventEmitter, EnginePort};
use songforge_core::services::{GenerationService, HistoryService, SettingsService};
use songforge_engine::EngineRuntime;
use songforge_store::{JsonHistoryRepository, JsonSettingsRepository};

use crate::backend::Backend;

/// Build the full backend stack.
///
/// On startup the history is pruned of records whose audio files were
/// deleted, and the engine is loaded in the background when `auto_load`
/// is set.
pub async fn bootstrap(emitter: Arc<dyn AppEventEmitter>) -> anyhow::Result<Arc<Backend>> {
    let settings_repo = Arc::new(JsonSettingsRepository::new(
        settings_path().context("resolving settings path")?,
    ));
    let history_repo = Arc::new(JsonHistoryRepository::new(
        history_path().context("resolving history path")?,
    ));

    let settings = Arc::new(SettingsService::new(settings_repo));
    let history = Arc::new(HistoryService::new(history_repo, Arc::clone(&emitter)));

    let engine: Arc<dyn EnginePort> = Arc::new(EngineRuntime::spawn(Arc::clone(&emitter)));
    let generation = Arc::new(GenerationService::new(
        Arc::clone(&engine),
        Arc::clone(&history),
        Arc::clone(&settings),
        Arc::clone(&emitter),
    ));

    let audio = Arc::new(AudioThreadHandle::spawn().context("initializing audio output")?);

    let pruned = history.prune_missing().await?;
    if pruned > 0 {
        tracing::info!(pruned, "Cleaned up deleted files from library on startup");
    }

    let backend = Arc::new(Backend::new(
        settings,
        history,
        generation,
        engine,
        audio,
        emitter,
    ));

    if backend
        .settings_get()
        .await
        .is_ok_and(|s| s.auto_load.unwrap_or(false))
    {
        let auto = Arc::clone(&backend);
        tokio::spawn(async move {
            if let Err(e) = auto.load_engine().await {
                tracing::error!(error = %e, "Auto-load of the engine failed");
            }
        });
    }

    Ok(backend)
}

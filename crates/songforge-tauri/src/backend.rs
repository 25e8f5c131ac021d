//! Backend facade for the Tauri commands.
//!
//! One struct holding every service the GUI talks to, plus the two pieces of
//! UI-session state that live outside the services: the batch queue and the
//! stop flag of the active playback watcher.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use songforge_audio::{AudioThreadHandle, PositionWatcher, Waveform};
use songforge_core::domain::{BatchQueue, GenerationParams, GenerationRecord, validate_params};
use songforge_core::ports::{AppEventEmitter, EngineLoadSpec, EnginePort};
use songforge_core::services::{GenerationService, HistoryService, SettingsService};
use songforge_core::settings::{Settings, SettingsUpdate};
use songforge_core::verify::VerifyReport;
use songforge_core::paths::checkpoint_dir;
use songforge_engine::{load_sidecar, run_verification};

use crate::error::BackendError;

/// Everything the GUI needs, behind one `Arc`.
pub struct Backend {
    settings: Arc<SettingsService>,
    history: Arc<HistoryService>,
    generation: Arc<GenerationService>,
    engine: Arc<dyn EnginePort>,
    audio: Arc<AudioThreadHandle>,
    emitter: Arc<dyn AppEventEmitter>,
    batch: Mutex<BatchQueue>,
    /// Stop flag of the active position watcher, if one is running.
    watcher_stop: Mutex<Option<Arc<AtomicBool>>>,
}

impl Backend {
    pub(crate) fn new(
        settings: Arc<SettingsService>,
        history: Arc<HistoryService>,
        generation: Arc<GenerationService>,
        engine: Arc<dyn EnginePort>,
        audio: Arc<AudioThreadHandle>,
        emitter: Arc<dyn AppEventEmitter>,
    ) -> Self {
        Self {
            settings,
            history,
            generation,
            engine,
            audio,
            emitter,
            batch: Mutex::new(BatchQueue::new()),
            watcher_stop: Mutex::new(None),
        }
    }

    // ── Engine ─────────────────────────────────────────────────────

    /// Load the engine with the persisted settings. The quantization
    /// sidecar, when present in the checkpoint directory, is applied
    /// automatically.
    pub async fn load_engine(&self) -> Result<(), BackendError> {
        let settings = self.settings.get().await?;
        let ckpt = checkpoint_dir()?;
        let quantization = load_sidecar(&ckpt);

        let spec = EngineLoadSpec {
            checkpoint_dir: ckpt,
            version: settings.effective_model_version(),
            device: settings.effective_device(),
            dtype: settings.effective_dtype(),
            lazy_load: settings.lazy_load.unwrap_or(false),
            quantization,
        };

        self.generation.load_engine(spec).await?;
        Ok(())
    }

    /// Whether the engine has a loaded model.
    pub fn engine_loaded(&self) -> bool {
        self.engine.is_loaded()
    }

    /// Whether a generation or batch is in flight.
    pub fn is_generating(&self) -> bool {
        self.generation.is_busy()
    }

    // ── Generation ─────────────────────────────────────────────────

    /// Run a single generation.
    pub async fn generate(
        &self,
        params: GenerationParams,
    ) -> Result<GenerationRecord, BackendError> {
        Ok(self.generation.generate(params).await?)
    }

    // ── Batch queue ────────────────────────────────────────────────

    /// Validate and queue a batch item, returning its 1-based position.
    pub fn batch_add(&self, params: GenerationParams) -> Result<usize, BackendError> {
        validate_params(&params).map_err(songforge_core::ports::CoreError::from)?;
        let position = self.batch.lock().unwrap().add(params);
        tracing::info!(position, "Added to batch queue");
        Ok(position)
    }

    /// Remove a queued item by index.
    pub fn batch_remove(&self, index: usize) -> Option<GenerationParams> {
        self.batch.lock().unwrap().remove(index)
    }

    /// Clear the batch queue.
    pub fn batch_clear(&self) {
        self.batch.lock().unwrap().clear();
    }

    /// Snapshot of the queued items.
    pub fn batch_items(&self) -> Vec<GenerationParams> {
        self.batch.lock().unwrap().items().to_vec()
    }

    /// Process the batch queue sequentially. The queue is cleared only on
    /// success; on failure the items stay queued for a retry.
    pub async fn run_batch(&self) -> Result<Vec<GenerationRecord>, BackendError> {
        let items = self.batch.lock().unwrap().items().to_vec();
        let records = self.generation.run_batch(items).await?;
        self.batch.lock().unwrap().clear();
        Ok(records)
    }

    // ── Library ────────────────────────────────────────────────────

    pub async fn history_list(&self) -> Result<Vec<GenerationRecord>, BackendError> {
        Ok(self.history.list().await?)
    }

    pub async fn history_prune(&self) -> Result<usize, BackendError> {
        Ok(self.history.prune_missing().await?)
    }

    pub async fn history_remove(&self, index: usize) -> Result<GenerationRecord, BackendError> {
        Ok(self.history.remove(index).await?)
    }

    pub async fn history_clear(&self) -> Result<(), BackendError> {
        Ok(self.history.clear().await?)
    }

    // ── Playback ───────────────────────────────────────────────────

    /// Start playing a library track and watch its position.
    ///
    /// `duration_secs` comes from the waveform the card already loaded, so
    /// the track is not decoded twice.
    pub fn player_play(&self, path: String, duration_secs: f64) -> Result<(), BackendError> {
        self.stop_watcher();
        self.audio.play(PathBuf::from(&path))?;

        let stop = Arc::new(AtomicBool::new(false));
        *self.watcher_stop.lock().unwrap() = Some(Arc::clone(&stop));
        PositionWatcher::spawn(
            Arc::clone(&self.audio) as Arc<dyn songforge_audio::PlaybackProbe>,
            path,
            duration_secs,
            Arc::clone(&self.emitter),
            stop,
        );
        Ok(())
    }

    pub fn player_pause(&self) {
        self.audio.pause();
    }

    pub fn player_resume(&self) {
        self.audio.resume();
    }

    /// Stop playback. The watcher ends silently (no finished event).
    pub fn player_stop(&self) {
        self.stop_watcher();
        self.audio.stop();
    }

    pub fn player_set_volume(&self, volume: f32) {
        self.audio.set_volume(volume);
    }

    /// Decimated waveform for a library card.
    pub fn waveform(&self, path: &Path) -> Result<Waveform, BackendError> {
        Ok(Waveform::from_file(path, Waveform::DEFAULT_MAX_POINTS)?)
    }

    fn stop_watcher(&self) {
        if let Some(stop) = self.watcher_stop.lock().unwrap().take() {
            stop.store(true, Ordering::SeqCst);
        }
    }

    // ── Settings & verification ────────────────────────────────────

    pub async fn settings_get(&self) -> Result<Settings, BackendError> {
        Ok(self.settings.get().await?)
    }

    pub async fn settings_update(&self, update: SettingsUpdate) -> Result<Settings, BackendError> {
        Ok(self.settings.update(update).await?)
    }

    /// Run the installation verification probes.
    pub async fn verify_report(&self) -> Result<VerifyReport, BackendError> {
        let settings = self.settings.get().await?;
        Ok(run_verification(&settings))
    }
}

//! Generation orchestration - single-item and batch.
//!
//! One worker at a time: a compare-and-swap busy gate rejects a second
//! generation (or batch) while one is running. Once a request has been
//! dispatched into the engine there is no cancellation and no timeout;
//! the gate clears when the call returns.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::domain::{
    GenerationParams, GenerationRecord, GenerationSettings, RANDOM_SEED, resolve_seed,
    validate_params,
};
use crate::events::AppEvent;
use crate::paths::{default_output_dir, ensure_directory};
use crate::ports::{AppEventEmitter, CoreError, EngineLoadSpec, EnginePort, EngineRequest};
use crate::services::{HistoryService, SettingsService};
use crate::settings::Settings;

/// Resolve the output file path for a generation.
///
/// With timestamping on, the stem gets a `_%Y%m%d_%H%M%S` suffix. With it
/// off, name collisions are resolved by appending `_01`, `_02`, ... until the
/// name is free.
#[must_use]
pub fn resolve_output_path(dir: &Path, stem: &str, timestamp: bool) -> PathBuf {
    if timestamp {
        let stamped = format!("{stem}_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"));
        dir.join(format!("{stamped}.mp3"))
    } else {
        let mut name = stem.to_string();
        let mut counter = 1;
        while dir.join(format!("{name}.mp3")).exists() {
            name = format!("{stem}_{counter:02}");
            counter += 1;
        }
        dir.join(format!("{name}.mp3"))
    }
}

/// Clears the busy flag when the operation ends, however it ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Service orchestrating generation requests against the engine.
pub struct GenerationService {
    engine: Arc<dyn EnginePort>,
    history: Arc<HistoryService>,
    settings: Arc<SettingsService>,
    emitter: Arc<dyn AppEventEmitter>,
    busy: AtomicBool,
}

impl GenerationService {
    /// Create a new generation service.
    pub fn new(
        engine: Arc<dyn EnginePort>,
        history: Arc<HistoryService>,
        settings: Arc<SettingsService>,
        emitter: Arc<dyn AppEventEmitter>,
    ) -> Self {
        Self {
            engine,
            history,
            settings,
            emitter,
            busy: AtomicBool::new(false),
        }
    }

    /// Whether a generation or batch is currently running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Take the busy gate, or fail with [`CoreError::Busy`].
    fn begin(&self) -> Result<BusyGuard<'_>, CoreError> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| CoreError::Busy)?;
        Ok(BusyGuard(&self.busy))
    }

    /// Bring the engine up. Rejected while a generation is running.
    pub async fn load_engine(&self, spec: EngineLoadSpec) -> Result<(), CoreError> {
        if self.is_busy() {
            return Err(CoreError::Busy);
        }

        let version = spec.version;
        let device = spec.device;
        tracing::info!(%version, %device, "Loading model... This may take a few minutes.");
        self.emitter.emit(AppEvent::EngineLoadStarted);

        match self.engine.load(spec).await {
            Ok(()) => {
                tracing::info!("Model loaded successfully");
                self.emitter.emit(AppEvent::EngineLoaded { version, device });
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Error loading model");
                self.emitter.emit(AppEvent::EngineLoadFailed {
                    error: e.to_string(),
                });
                Err(e.into())
            }
        }
    }

    /// Run a single generation to completion and record it in the library.
    pub async fn generate(&self, params: GenerationParams) -> Result<GenerationRecord, CoreError> {
        let _guard = self.begin()?;
        validate_params(&params)?;

        let settings = self.settings.get().await?;
        let output_dir = effective_output_dir(&settings)?;
        ensure_directory(&output_dir)?;

        let save_path = resolve_output_path(
            &output_dir,
            params.filename.trim(),
            settings.effective_timestamp_outputs(),
        );
        let save_path = save_path.to_string_lossy().into_owned();

        let seed = resolve_seed(params.seed);
        if params.seed == RANDOM_SEED {
            tracing::info!(seed, "Using random seed");
        } else {
            tracing::info!(seed, "Using seed");
        }

        tracing::info!(tags = %params.tags, output = %save_path, "Generating music");
        self.emitter.emit(AppEvent::GenerationStarted {
            save_path: save_path.clone(),
        });

        let started = Instant::now();
        let request = build_request(&params, &save_path, seed);

        if let Err(e) = self.engine.generate(request).await {
            tracing::error!(error = %e, "Error during generation");
            self.emitter.emit(AppEvent::GenerationFailed {
                error: e.to_string(),
            });
            return Err(e.into());
        }

        let elapsed_secs = started.elapsed().as_secs_f64();
        let record = self
            .history
            .record(save_path, record_settings(&params, seed))
            .await?;

        tracing::info!(elapsed_secs, path = %record.file_path, "Music generated successfully");
        self.emitter.emit(AppEvent::GenerationCompleted {
            record: record.clone(),
            elapsed_secs,
        });
        Ok(record)
    }

    /// Process a batch queue sequentially.
    ///
    /// The first failing item aborts the batch; completed items stay in the
    /// library.
    pub async fn run_batch(
        &self,
        items: Vec<GenerationParams>,
    ) -> Result<Vec<GenerationRecord>, CoreError> {
        let _guard = self.begin()?;
        if items.is_empty() {
            return Err(CoreError::EmptyBatch);
        }

        let settings = self.settings.get().await?;
        let output_dir = effective_output_dir(&settings)?;
        ensure_directory(&output_dir)?;

        let total = items.len();
        self.emitter.emit(AppEvent::BatchStarted { total });
        let batch_started = Instant::now();
        let mut records = Vec::with_capacity(total);

        for (i, params) in items.into_iter().enumerate() {
            let index = i + 1;

            if let Err(e) = validate_params(&params) {
                self.emitter.emit(AppEvent::BatchFailed {
                    index,
                    error: e.to_string(),
                });
                return Err(e.into());
            }

            let save_path = resolve_output_path(
                &output_dir,
                params.filename.trim(),
                settings.effective_timestamp_outputs(),
            );
            let save_path = save_path.to_string_lossy().into_owned();
            let seed = resolve_seed(params.seed);

            tracing::info!(index, total, filename = %params.filename, "Processing batch item");
            self.emitter.emit(AppEvent::BatchItemStarted {
                index,
                total,
                filename: params.filename.clone(),
            });

            let item_started = Instant::now();
            let request = build_request(&params, &save_path, seed);

            if let Err(e) = self.engine.generate(request).await {
                tracing::error!(index, error = %e, "Error during batch processing");
                self.emitter.emit(AppEvent::BatchFailed {
                    index,
                    error: e.to_string(),
                });
                return Err(e.into());
            }

            let elapsed_secs = item_started.elapsed().as_secs_f64();
            let record = self
                .history
                .record(save_path.clone(), record_settings(&params, seed))
                .await?;
            records.push(record);

            tracing::info!(index, total, elapsed_secs, path = %save_path, "Completed batch item");
            self.emitter.emit(AppEvent::BatchItemCompleted {
                index,
                total,
                save_path,
                elapsed_secs,
            });
        }

        let elapsed_secs = batch_started.elapsed().as_secs_f64();
        tracing::info!(total, elapsed_secs, "Batch processing complete");
        self.emitter
            .emit(AppEvent::BatchCompleted { total, elapsed_secs });
        Ok(records)
    }
}

fn effective_output_dir(settings: &Settings) -> Result<PathBuf, CoreError> {
    match settings.output_dir {
        Some(ref dir) if !dir.trim().is_empty() => Ok(PathBuf::from(dir)),
        _ => default_output_dir().map_err(CoreError::from),
    }
}

fn build_request(params: &GenerationParams, save_path: &str, seed: i64) -> EngineRequest {
    EngineRequest {
        lyrics: params.lyrics.clone(),
        tags: params.tags.clone(),
        max_audio_length_ms: params.max_audio_length_ms,
        save_path: save_path.to_string(),
        topk: params.topk,
        temperature: params.temperature,
        cfg_scale: params.cfg_scale,
        seed,
    }
}

fn record_settings(params: &GenerationParams, seed: i64) -> GenerationSettings {
    GenerationSettings {
        tags: params.tags.clone(),
        lyrics: params.lyrics.clone(),
        max_length_ms: params.max_audio_length_ms,
        topk: params.topk,
        temperature: params.temperature,
        cfg_scale: params.cfg_scale,
        seed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{EngineError, RepositoryError, SettingsRepository};
    use async_trait::async_trait;
    use std::sync::Mutex;

    // ── Test doubles ───────────────────────────────────────────────

    struct MockEngine {
        requests: Mutex<Vec<EngineRequest>>,
        fail_on: Option<usize>,
        gate: tokio::sync::Mutex<Option<tokio::sync::oneshot::Receiver<()>>>,
    }

    impl MockEngine {
        fn new() -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                fail_on: None,
                gate: tokio::sync::Mutex::new(None),
            }
        }

        fn failing_on(n: usize) -> Self {
            Self {
                fail_on: Some(n),
                ..Self::new()
            }
        }

        fn gated() -> (Self, tokio::sync::oneshot::Sender<()>) {
            let (tx, rx) = tokio::sync::oneshot::channel();
            let engine = Self {
                gate: tokio::sync::Mutex::new(Some(rx)),
                ..Self::new()
            };
            (engine, tx)
        }
    }

    #[async_trait]
    impl EnginePort for MockEngine {
        async fn load(&self, _spec: EngineLoadSpec) -> Result<(), EngineError> {
            Ok(())
        }

        async fn generate(&self, req: EngineRequest) -> Result<(), EngineError> {
            if let Some(rx) = self.gate.lock().await.take() {
                let _ = rx.await;
            }
            let n = {
                let mut requests = self.requests.lock().unwrap();
                requests.push(req);
                requests.len()
            };
            if self.fail_on == Some(n) {
                return Err(EngineError::Generation("synthetic failure".to_string()));
            }
            Ok(())
        }

        fn is_loaded(&self) -> bool {
            true
        }

        async fn unload(&self) {}
    }

    struct FixedSettingsRepo(Settings);

    #[async_trait]
    impl SettingsRepository for FixedSettingsRepo {
        async fn load(&self) -> Result<Settings, RepositoryError> {
            Ok(self.0.clone())
        }

        async fn save(&self, _settings: &Settings) -> Result<(), RepositoryError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemHistoryRepo(Mutex<Vec<GenerationRecord>>);

    #[async_trait]
    impl crate::ports::HistoryRepository for MemHistoryRepo {
        async fn load(&self) -> Result<Vec<GenerationRecord>, RepositoryError> {
            Ok(self.0.lock().unwrap().clone())
        }

        async fn save(&self, records: &[GenerationRecord]) -> Result<(), RepositoryError> {
            *self.0.lock().unwrap() = records.to_vec();
            Ok(())
        }

        async fn clear(&self) -> Result<(), RepositoryError> {
            self.0.lock().unwrap().clear();
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct CollectingEmitter(Arc<Mutex<Vec<&'static str>>>);

    impl AppEventEmitter for CollectingEmitter {
        fn emit(&self, event: AppEvent) {
            self.0.lock().unwrap().push(event.event_name());
        }

        fn clone_box(&self) -> Box<dyn AppEventEmitter> {
            Box::new(self.clone())
        }
    }

    // ── Fixtures ───────────────────────────────────────────────────

    fn params(name: &str) -> GenerationParams {
        GenerationParams {
            tags: "pop,female vocal,energetic,medium".to_string(),
            lyrics: "[Verse]\nhello world".to_string(),
            filename: name.to_string(),
            seed: 42,
            ..GenerationParams::default()
        }
    }

    fn build(
        engine: MockEngine,
        output_dir: &Path,
    ) -> (Arc<GenerationService>, CollectingEmitter) {
        let emitter = CollectingEmitter::default();
        let emitter_arc: Arc<dyn AppEventEmitter> = Arc::new(emitter.clone());
        let settings = Settings {
            output_dir: Some(output_dir.to_string_lossy().into_owned()),
            timestamp_outputs: Some(false),
            ..Settings::with_defaults()
        };
        let service = GenerationService::new(
            Arc::new(engine),
            Arc::new(HistoryService::new(
                Arc::new(MemHistoryRepo::default()),
                emitter_arc.clone(),
            )),
            Arc::new(SettingsService::new(Arc::new(FixedSettingsRepo(settings)))),
            emitter_arc,
        );
        (Arc::new(service), emitter)
    }

    // ── Tests ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_generate_records_history_and_emits_events() {
        let temp = tempfile::tempdir().unwrap();
        let (service, emitter) = build(MockEngine::new(), temp.path());

        let record = service.generate(params("song")).await.unwrap();
        assert_eq!(record.filename, "song.mp3");
        assert_eq!(record.settings.seed, 42);

        let names = emitter.0.lock().unwrap().clone();
        assert_eq!(names, vec!["generation:started", "generation:completed"]);
    }

    #[tokio::test]
    async fn test_generate_rejects_invalid_params_without_events() {
        let temp = tempfile::tempdir().unwrap();
        let (service, emitter) = build(MockEngine::new(), temp.path());

        let mut bad = params("song");
        bad.tags = String::new();
        assert!(service.generate(bad).await.is_err());
        assert!(emitter.0.lock().unwrap().is_empty());

        // The gate must have cleared
        assert!(!service.is_busy());
    }

    #[tokio::test]
    async fn test_generate_failure_emits_failed_and_clears_gate() {
        let temp = tempfile::tempdir().unwrap();
        let (service, emitter) = build(MockEngine::failing_on(1), temp.path());

        assert!(service.generate(params("song")).await.is_err());
        let names = emitter.0.lock().unwrap().clone();
        assert_eq!(names, vec!["generation:started", "generation:failed"]);
        assert!(!service.is_busy());
    }

    #[tokio::test]
    async fn test_busy_gate_rejects_concurrent_generation() {
        let temp = tempfile::tempdir().unwrap();
        let (engine, release) = MockEngine::gated();
        let (service, _emitter) = build(engine, temp.path());

        let running = tokio::spawn({
            let service = Arc::clone(&service);
            async move { service.generate(params("first")).await }
        });

        // Let the spawned task run up to the engine call
        while !service.is_busy() {
            tokio::task::yield_now().await;
        }

        assert!(matches!(
            service.generate(params("second")).await,
            Err(CoreError::Busy)
        ));

        release.send(()).unwrap();
        running.await.unwrap().unwrap();
        assert!(!service.is_busy());
    }

    #[tokio::test]
    async fn test_run_batch_processes_sequentially() {
        let temp = tempfile::tempdir().unwrap();
        let (service, emitter) = build(MockEngine::new(), temp.path());

        let records = service
            .run_batch(vec![params("a"), params("b"), params("c")])
            .await
            .unwrap();
        assert_eq!(records.len(), 3);

        let names = emitter.0.lock().unwrap().clone();
        assert_eq!(
            names,
            vec![
                "batch:started",
                "batch:item_started",
                "batch:item_completed",
                "batch:item_started",
                "batch:item_completed",
                "batch:item_started",
                "batch:item_completed",
                "batch:completed",
            ]
        );
    }

    #[tokio::test]
    async fn test_run_batch_aborts_on_first_failure() {
        let temp = tempfile::tempdir().unwrap();
        let (service, emitter) = build(MockEngine::failing_on(2), temp.path());

        assert!(
            service
                .run_batch(vec![params("a"), params("b"), params("c")])
                .await
                .is_err()
        );

        let names = emitter.0.lock().unwrap().clone();
        assert_eq!(*names.last().unwrap(), "batch:failed");
        // Item 3 was never attempted
        assert_eq!(
            names
                .iter()
                .filter(|n| **n == "batch:item_started")
                .count(),
            2
        );
        assert!(!service.is_busy());
    }

    #[tokio::test]
    async fn test_run_batch_rejects_empty_queue() {
        let temp = tempfile::tempdir().unwrap();
        let (service, _emitter) = build(MockEngine::new(), temp.path());
        assert!(matches!(
            service.run_batch(Vec::new()).await,
            Err(CoreError::EmptyBatch)
        ));
    }

    #[test]
    fn test_resolve_output_path_collision_counter() {
        let temp = tempfile::tempdir().unwrap();

        let first = resolve_output_path(temp.path(), "song", false);
        assert_eq!(first, temp.path().join("song.mp3"));

        std::fs::write(&first, b"x").unwrap();
        let second = resolve_output_path(temp.path(), "song", false);
        assert_eq!(second, temp.path().join("song_01.mp3"));

        std::fs::write(&second, b"x").unwrap();
        let third = resolve_output_path(temp.path(), "song", false);
        assert_eq!(third, temp.path().join("song_02.mp3"));
    }

    #[test]
    fn test_resolve_output_path_timestamped() {
        let temp = tempfile::tempdir().unwrap();
        let path = resolve_output_path(temp.path(), "song", true);
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        // song_YYYYMMDD_HHMMSS.mp3
        assert!(name.starts_with("song_"));
        assert!(name.ends_with(".mp3"));
        assert_eq!(name.len(), "song_".len() + 15 + ".mp3".len());
    }
}

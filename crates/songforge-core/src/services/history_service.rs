//! Generation history service - library bookkeeping over the repository port.
//!
//! Records are kept newest-first. Pruning drops records whose audio file has
//! been deleted from disk; it never deletes audio files itself.

use std::path::Path;
use std::sync::Arc;

use crate::domain::{GenerationRecord, GenerationSettings};
use crate::events::AppEvent;
use crate::ports::{AppEventEmitter, CoreError, HistoryRepository};

/// Service for managing the generation library.
pub struct HistoryService {
    repo: Arc<dyn HistoryRepository>,
    emitter: Arc<dyn AppEventEmitter>,
}

impl HistoryService {
    /// Create a new history service.
    pub fn new(repo: Arc<dyn HistoryRepository>, emitter: Arc<dyn AppEventEmitter>) -> Self {
        Self { repo, emitter }
    }

    /// List all records, newest first.
    pub async fn list(&self) -> Result<Vec<GenerationRecord>, CoreError> {
        self.repo.load().await.map_err(CoreError::from)
    }

    /// Record a completed generation at the front of the history.
    pub async fn record(
        &self,
        file_path: impl Into<String> + Send,
        settings: GenerationSettings,
    ) -> Result<GenerationRecord, CoreError> {
        let record = GenerationRecord::now(file_path, settings);
        let mut records = self.repo.load().await?;
        records.insert(0, record.clone());
        self.repo.save(&records).await?;
        Ok(record)
    }

    /// Drop records whose audio file no longer exists on disk.
    ///
    /// Persists only when something was actually removed. Returns the number
    /// of records dropped.
    pub async fn prune_missing(&self) -> Result<usize, CoreError> {
        let records = self.repo.load().await?;
        let initial = records.len();

        let kept: Vec<GenerationRecord> = records
            .into_iter()
            .filter(|r| Path::new(&r.file_path).exists())
            .collect();

        let removed = initial - kept.len();
        if removed > 0 {
            self.repo.save(&kept).await?;
            tracing::info!(removed, "Pruned deleted files from library");
            self.emitter.emit(AppEvent::HistoryPruned { removed });
        }
        Ok(removed)
    }

    /// Remove one record by position. The audio file is left on disk.
    pub async fn remove(&self, index: usize) -> Result<GenerationRecord, CoreError> {
        let mut records = self.repo.load().await?;
        if index >= records.len() {
            return Err(CoreError::HistoryIndex(index));
        }
        let removed = records.remove(index);
        self.repo.save(&records).await?;
        Ok(removed)
    }

    /// Clear the entire history. Generated files are not deleted.
    pub async fn clear(&self) -> Result<(), CoreError> {
        self.repo.clear().await.map_err(CoreError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{NoopEmitter, RepositoryError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockHistoryRepo {
        records: Mutex<Vec<GenerationRecord>>,
    }

    #[async_trait]
    impl HistoryRepository for MockHistoryRepo {
        async fn load(&self) -> Result<Vec<GenerationRecord>, RepositoryError> {
            Ok(self.records.lock().unwrap().clone())
        }

        async fn save(&self, records: &[GenerationRecord]) -> Result<(), RepositoryError> {
            *self.records.lock().unwrap() = records.to_vec();
            Ok(())
        }

        async fn clear(&self) -> Result<(), RepositoryError> {
            self.records.lock().unwrap().clear();
            Ok(())
        }
    }

    fn settings() -> GenerationSettings {
        GenerationSettings {
            tags: "pop".to_string(),
            lyrics: "la".to_string(),
            max_length_ms: 30_000,
            topk: 50,
            temperature: 1.0,
            cfg_scale: 1.5,
            seed: 7,
        }
    }

    fn service() -> HistoryService {
        HistoryService::new(Arc::new(MockHistoryRepo::default()), Arc::new(NoopEmitter))
    }

    #[tokio::test]
    async fn test_record_inserts_newest_first() {
        let service = service();
        service.record("first.mp3", settings()).await.unwrap();
        service.record("second.mp3", settings()).await.unwrap();

        let records = service.list().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].filename, "second.mp3");
        assert_eq!(records[1].filename, "first.mp3");
    }

    #[tokio::test]
    async fn test_prune_missing_drops_dead_paths() {
        let temp = tempfile::tempdir().unwrap();
        let alive = temp.path().join("alive.mp3");
        std::fs::write(&alive, b"mp3").unwrap();

        let service = service();
        service
            .record(alive.to_string_lossy().into_owned(), settings())
            .await
            .unwrap();
        service
            .record(
                temp.path().join("gone.mp3").to_string_lossy().into_owned(),
                settings(),
            )
            .await
            .unwrap();

        let removed = service.prune_missing().await.unwrap();
        assert_eq!(removed, 1);

        let records = service.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].filename, "alive.mp3");

        // Idempotent
        assert_eq!(service.prune_missing().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_remove_by_index() {
        let service = service();
        service.record("a.mp3", settings()).await.unwrap();
        service.record("b.mp3", settings()).await.unwrap();

        let removed = service.remove(1).await.unwrap();
        assert_eq!(removed.filename, "a.mp3");
        assert_eq!(service.list().await.unwrap().len(), 1);

        assert!(matches!(
            service.remove(5).await,
            Err(CoreError::HistoryIndex(5))
        ));
    }

    #[tokio::test]
    async fn test_clear() {
        let service = service();
        service.record("a.mp3", settings()).await.unwrap();
        service.clear().await.unwrap();
        assert!(service.list().await.unwrap().is_empty());
    }
}

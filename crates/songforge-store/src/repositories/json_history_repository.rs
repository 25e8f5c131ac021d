//! Generation history repository backed by a flat JSON array file.

use std::path::PathBuf;

use async_trait::async_trait;
use songforge_core::domain::GenerationRecord;
use songforge_core::{HistoryRepository, RepositoryError};

use crate::io::{read_json, remove_if_exists, write_json_atomic};

/// JSON-file implementation of [`HistoryRepository`].
pub struct JsonHistoryRepository {
    path: PathBuf,
}

impl JsonHistoryRepository {
    /// Create a repository over the given document path.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl HistoryRepository for JsonHistoryRepository {
    async fn load(&self) -> Result<Vec<GenerationRecord>, RepositoryError> {
        Ok(read_json::<Vec<GenerationRecord>>(&self.path)
            .await?
            .unwrap_or_default())
    }

    async fn save(&self, records: &[GenerationRecord]) -> Result<(), RepositoryError> {
        write_json_atomic(&self.path, &records).await
    }

    async fn clear(&self) -> Result<(), RepositoryError> {
        remove_if_exists(&self.path).await
    }
}

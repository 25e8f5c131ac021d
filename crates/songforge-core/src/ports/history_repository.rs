//! Generation history persistence port.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::GenerationRecord;

/// Repository for the generation history document.
///
/// The stored order is meaningful (newest first); `load` must preserve it and
/// `save` replaces the whole list. A missing document loads as an empty list.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Load all records in stored order.
    async fn load(&self) -> Result<Vec<GenerationRecord>, RepositoryError>;

    /// Replace the stored records with `records`.
    async fn save(&self, records: &[GenerationRecord]) -> Result<(), RepositoryError>;

    /// Remove the backing document entirely.
    async fn clear(&self) -> Result<(), RepositoryError>;
}

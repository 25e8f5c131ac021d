//! Settings repository backed by a flat JSON file.

use std::path::PathBuf;

use async_trait::async_trait;
use songforge_core::{RepositoryError, Settings, SettingsRepository};

use crate::io::{read_json, write_json_atomic};

/// JSON-file implementation of [`SettingsRepository`].
pub struct JsonSettingsRepository {
    path: PathBuf,
}

impl JsonSettingsRepository {
    /// Create a repository over the given document path.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl SettingsRepository for JsonSettingsRepository {
    async fn load(&self) -> Result<Settings, RepositoryError> {
        match read_json::<Settings>(&self.path).await? {
            Some(settings) => Ok(settings),
            None => Ok(Settings::with_defaults()),
        }
    }

    async fn save(&self, settings: &Settings) -> Result<(), RepositoryError> {
        write_json_atomic(&self.path, settings).await?;
        tracing::debug!(path = %self.path.display(), "Settings saved");
        Ok(())
    }
}

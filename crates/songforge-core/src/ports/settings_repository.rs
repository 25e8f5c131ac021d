//! Settings persistence port.

use async_trait::async_trait;

use super::RepositoryError;
use crate::settings::Settings;

/// Repository for the persisted settings document.
///
/// Implementations decide where and how the document lives (the shipped
/// adapter is a flat JSON file). A missing document loads as defaults.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Load current settings, falling back to defaults if nothing is stored.
    async fn load(&self) -> Result<Settings, RepositoryError>;

    /// Persist the given settings.
    async fn save(&self, settings: &Settings) -> Result<(), RepositoryError>;
}

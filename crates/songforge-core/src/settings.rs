//! Settings domain types and validation.
//!
//! These are pure domain types with no infrastructure dependencies; the
//! JSON-file persistence lives in `songforge-store`.

use serde::{Deserialize, Serialize};

use crate::domain::{DType, Device, ModelVersion};

/// Theme name used when none has been persisted yet.
pub const DEFAULT_THEME: &str = "Dark Blue/Grey";

/// Application settings structure.
///
/// All fields are optional to support partial updates and graceful defaults.
/// Unknown keys in the persisted file are ignored on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Directory where generated MP3 files are written.
    pub output_dir: Option<String>,

    /// Model weights variant served by the engine.
    pub model_version: Option<ModelVersion>,

    /// Compute device requested from the engine.
    pub device: Option<Device>,

    /// Weight/activation data type requested from the engine.
    pub dtype: Option<DType>,

    /// Load the engine automatically on startup.
    pub auto_load: Option<bool>,

    /// Append a timestamp to output filenames.
    pub timestamp_outputs: Option<bool>,

    /// Ask the engine to load submodels on demand (lower VRAM footprint).
    pub lazy_load: Option<bool>,

    /// UI color-scheme name. Opaque to the backend.
    pub theme: Option<String>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            output_dir: None,
            model_version: Some(ModelVersion::ThreeB),
            device: Some(Device::Cuda),
            dtype: Some(DType::BFloat16),
            auto_load: Some(false),
            timestamp_outputs: Some(true),
            lazy_load: Some(false),
            theme: Some(DEFAULT_THEME.to_string()),
        }
    }

    /// Get the effective model version (with default fallback).
    #[must_use]
    pub fn effective_model_version(&self) -> ModelVersion {
        self.model_version.unwrap_or(ModelVersion::ThreeB)
    }

    /// Get the effective device (with default fallback).
    #[must_use]
    pub fn effective_device(&self) -> Device {
        self.device.unwrap_or(Device::Cuda)
    }

    /// Get the effective data type (with default fallback).
    #[must_use]
    pub fn effective_dtype(&self) -> DType {
        self.dtype.unwrap_or(DType::BFloat16)
    }

    /// Whether output filenames get a timestamp suffix (defaults to true).
    #[must_use]
    pub fn effective_timestamp_outputs(&self) -> bool {
        self.timestamp_outputs.unwrap_or(true)
    }

    /// Merge another settings into this one, only updating fields that are Some.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(ref dir) = other.output_dir {
            self.output_dir.clone_from(dir);
        }
        if let Some(ref version) = other.model_version {
            self.model_version = *version;
        }
        if let Some(ref device) = other.device {
            self.device = *device;
        }
        if let Some(ref dtype) = other.dtype {
            self.dtype = *dtype;
        }
        if let Some(ref auto) = other.auto_load {
            self.auto_load = *auto;
        }
        if let Some(ref stamp) = other.timestamp_outputs {
            self.timestamp_outputs = *stamp;
        }
        if let Some(ref lazy) = other.lazy_load {
            self.lazy_load = *lazy;
        }
        if let Some(ref theme) = other.theme {
            self.theme.clone_from(theme);
        }
    }
}

/// Partial settings update.
///
/// Each field is `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = set field to None/null
/// - `Some(Some(value))` = set field to value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub output_dir: Option<Option<String>>,
    pub model_version: Option<Option<ModelVersion>>,
    pub device: Option<Option<Device>>,
    pub dtype: Option<Option<DType>>,
    pub auto_load: Option<Option<bool>>,
    pub timestamp_outputs: Option<Option<bool>>,
    pub lazy_load: Option<Option<bool>>,
    pub theme: Option<Option<String>>,
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("Output directory cannot be empty")]
    EmptyOutputDir,

    #[error("Theme name cannot be empty")]
    EmptyTheme,
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if settings
        .output_dir
        .as_ref()
        .is_some_and(|p| p.trim().is_empty())
    {
        return Err(SettingsError::EmptyOutputDir);
    }

    if settings.theme.as_ref().is_some_and(|t| t.trim().is_empty()) {
        return Err(SettingsError::EmptyTheme);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::with_defaults();
        assert_eq!(settings.model_version, Some(ModelVersion::ThreeB));
        assert_eq!(settings.device, Some(Device::Cuda));
        assert_eq!(settings.dtype, Some(DType::BFloat16));
        assert_eq!(settings.timestamp_outputs, Some(true));
        assert_eq!(settings.output_dir, None);
        assert_eq!(settings.theme.as_deref(), Some(DEFAULT_THEME));
    }

    #[test]
    fn test_validate_settings_valid() {
        let settings = Settings::with_defaults();
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_validate_empty_output_dir() {
        let settings = Settings {
            output_dir: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::EmptyOutputDir)
        ));
    }

    #[test]
    fn test_validate_empty_theme() {
        let settings = Settings {
            theme: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::EmptyTheme)
        ));
    }

    #[test]
    fn test_merge_settings() {
        let mut settings = Settings::with_defaults();
        let update = SettingsUpdate {
            device: Some(Some(Device::Cpu)),
            output_dir: Some(None), // Clear output dir
            ..Default::default()
        };
        settings.merge(&update);

        assert_eq!(settings.device, Some(Device::Cpu));
        assert_eq!(settings.output_dir, None);
        assert_eq!(settings.model_version, Some(ModelVersion::ThreeB)); // Unchanged
    }

    #[test]
    fn test_effective_fallbacks() {
        let empty = Settings::default();
        assert_eq!(empty.effective_model_version(), ModelVersion::ThreeB);
        assert_eq!(empty.effective_device(), Device::Cuda);
        assert_eq!(empty.effective_dtype(), DType::BFloat16);
        assert!(empty.effective_timestamp_outputs());
    }

    #[test]
    fn test_unknown_keys_ignored_on_load() {
        let json = r#"{"output_dir": "/tmp/out", "no_such_field": 42}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.output_dir.as_deref(), Some("/tmp/out"));
    }
}

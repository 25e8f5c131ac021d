//! Reduced-precision sidecar persistence.
//!
//! `quantization_config.json` in the checkpoint directory records that the
//! installation wants 8-bit weights. When present, engine loads pick it up
//! automatically.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use songforge_core::domain::{Device, ModelVersion, QuantizationConfig};

/// Sidecar filename inside the checkpoint directory.
pub const SIDECAR_FILE: &str = "quantization_config.json";

/// The persisted sidecar document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantizationSidecar {
    pub quantization_method: String,
    #[serde(flatten)]
    pub config: QuantizationConfig,
    pub model_version: ModelVersion,
    pub device: Device,
}

impl QuantizationSidecar {
    /// Build the standard sidecar for the given installation.
    #[must_use]
    pub fn new(config: QuantizationConfig, model_version: ModelVersion, device: Device) -> Self {
        Self {
            quantization_method: "fp8_bitsandbytes".to_string(),
            config,
            model_version,
            device,
        }
    }
}

/// Write the sidecar into `dir`, returning its path.
pub fn write_sidecar(dir: &Path, sidecar: &QuantizationSidecar) -> std::io::Result<PathBuf> {
    let path = dir.join(SIDECAR_FILE);
    let json = serde_json::to_string_pretty(sidecar)?;
    std::fs::write(&path, json)?;
    tracing::info!(path = %path.display(), "Saved quantization config");
    Ok(path)
}

/// Load the quantization config from `dir`, if a readable sidecar exists.
///
/// A malformed sidecar is treated as absent (with a warning) rather than an
/// error - quantization is optional.
#[must_use]
pub fn load_sidecar(dir: &Path) -> Option<QuantizationConfig> {
    let path = dir.join(SIDECAR_FILE);
    let text = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str::<QuantizationSidecar>(&text) {
        Ok(sidecar) => Some(sidecar.config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed quantization sidecar");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidecar_round_trip() {
        let temp = tempfile::tempdir().unwrap();
        let sidecar = QuantizationSidecar::new(
            QuantizationConfig::default(),
            ModelVersion::ThreeB,
            Device::Cuda,
        );

        let path = write_sidecar(temp.path(), &sidecar).unwrap();
        assert_eq!(path, temp.path().join(SIDECAR_FILE));

        let config = load_sidecar(temp.path()).unwrap();
        assert!(config.load_in_8bit);
    }

    #[test]
    fn test_sidecar_wire_format() {
        let sidecar = QuantizationSidecar::new(
            QuantizationConfig::default(),
            ModelVersion::ThreeB,
            Device::Cuda,
        );
        let json = serde_json::to_string(&sidecar).unwrap();
        assert!(json.contains("\"quantization_method\":\"fp8_bitsandbytes\""));
        assert!(json.contains("\"load_in_8bit\":true"));
        assert!(json.contains("\"model_version\":\"3B\""));
    }

    #[test]
    fn test_missing_and_malformed_sidecars_are_none() {
        let temp = tempfile::tempdir().unwrap();
        assert!(load_sidecar(temp.path()).is_none());

        std::fs::write(temp.path().join(SIDECAR_FILE), b"{ nope").unwrap();
        assert!(load_sidecar(temp.path()).is_none());
    }
}

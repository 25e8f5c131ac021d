//! Domain types shared across services and adapters.

mod generation;
mod quant;
mod record;

pub use generation::{
    BatchQueue, GenerationParams, MAX_AUDIO_LENGTH_MS, MIN_AUDIO_LENGTH_MS, ParamsError,
    RANDOM_SEED, TagPrompt, resolve_seed, validate_params,
};
pub use quant::QuantizationConfig;
pub use record::{GenerationRecord, GenerationSettings};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Model weights variant served by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelVersion {
    #[serde(rename = "3B")]
    ThreeB,
    #[serde(rename = "7B")]
    SevenB,
}

impl ModelVersion {
    /// The wire/CLI spelling of this variant.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ThreeB => "3B",
            Self::SevenB => "7B",
        }
    }

    /// Directory name of this variant's weights under the checkpoint root.
    #[must_use]
    pub const fn weights_dir(self) -> &'static str {
        match self {
            Self::ThreeB => "model-3b",
            Self::SevenB => "model-7b",
        }
    }
}

impl fmt::Display for ModelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "3B" => Ok(Self::ThreeB),
            "7B" => Ok(Self::SevenB),
            other => Err(format!("unknown model version '{other}' (expected 3B or 7B)")),
        }
    }
}

/// Compute device requested from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Cuda,
    Cpu,
}

impl Device {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cuda => "cuda",
            Self::Cpu => "cpu",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Device {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cuda" => Ok(Self::Cuda),
            "cpu" => Ok(Self::Cpu),
            other => Err(format!("unknown device '{other}' (expected cuda or cpu)")),
        }
    }
}

/// Weight/activation data type requested from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    BFloat16,
    Float16,
    Float32,
}

impl DType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BFloat16 => "bfloat16",
            Self::Float16 => "float16",
            Self::Float32 => "float32",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bfloat16" | "bf16" => Ok(Self::BFloat16),
            "float16" | "fp16" => Ok(Self::Float16),
            "float32" | "fp32" => Ok(Self::Float32),
            other => Err(format!(
                "unknown dtype '{other}' (expected bfloat16, float16 or float32)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_version_wire_format() {
        assert_eq!(
            serde_json::to_string(&ModelVersion::ThreeB).unwrap(),
            "\"3B\""
        );
        let parsed: ModelVersion = serde_json::from_str("\"7B\"").unwrap();
        assert_eq!(parsed, ModelVersion::SevenB);
    }

    #[test]
    fn test_device_dtype_wire_format() {
        assert_eq!(serde_json::to_string(&Device::Cuda).unwrap(), "\"cuda\"");
        assert_eq!(
            serde_json::to_string(&DType::BFloat16).unwrap(),
            "\"bfloat16\""
        );
    }

    #[test]
    fn test_from_str_round_trips() {
        assert_eq!("3b".parse::<ModelVersion>().unwrap(), ModelVersion::ThreeB);
        assert_eq!("CPU".parse::<Device>().unwrap(), Device::Cpu);
        assert_eq!("fp16".parse::<DType>().unwrap(), DType::Float16);
        assert!("tpu".parse::<Device>().is_err());
    }

    #[test]
    fn test_weights_dir() {
        assert_eq!(ModelVersion::ThreeB.weights_dir(), "model-3b");
        assert_eq!(ModelVersion::SevenB.weights_dir(), "model-7b");
    }
}

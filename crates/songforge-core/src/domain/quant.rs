//! Reduced-precision loading configuration.
//!
//! This is a parameter bundle handed through to the engine - songforge does
//! not quantize anything itself.

use serde::{Deserialize, Serialize};

/// 8-bit quantization parameters forwarded to the engine at load time.
///
/// Roughly halves weight memory at a small quality cost. The threshold and
/// fp16-weight fields follow the external quantizer's defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct QuantizationConfig {
    pub load_in_8bit: bool,
    pub llm_int8_threshold: f64,
    pub llm_int8_has_fp16_weight: bool,
}

impl Default for QuantizationConfig {
    fn default() -> Self {
        Self {
            load_in_8bit: true,
            llm_int8_threshold: 6.0,
            llm_int8_has_fp16_weight: false,
        }
    }
}

//! Installation verification probes.
//!
//! Active system probing: GPU hardware, CUDA toolkit, checkpoint files,
//! output directory writability. The results are plain data
//! ([`VerifyReport`]) rendered by the CLI table or the GUI.

use std::path::Path;
use std::process::Command;

use songforge_core::domain::{Device, ModelVersion};
use songforge_core::paths::{checkpoint_dir, default_output_dir, ensure_directory, verify_writable};
use songforge_core::settings::Settings;
use songforge_core::verify::{CheckOutcome, VerifyReport};

use crate::quant::load_sidecar;
use crate::resolve::resolve_engine_binary;

/// Detect whether NVIDIA GPU hardware is present (regardless of toolkit).
pub fn detect_nvidia_gpu() -> bool {
    Command::new("nvidia-smi")
        .arg("--list-gpus")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Check whether the CUDA toolkit is installed, returning its version.
pub fn cuda_toolkit_version() -> Option<String> {
    let output = Command::new("nvcc").arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    // Extract version from "Cuda compilation tools, release 12.0, V12.0.140"
    let line = stdout.lines().find(|l| l.contains("release"))?;
    let release = line.split("release").nth(1)?;
    let version = release.trim().trim_end_matches(',').split(',').next()?;
    Some(version.trim().to_string())
}

/// The checkpoint entries a complete installation contains.
#[must_use]
pub fn required_checkpoint_entries(version: ModelVersion) -> Vec<&'static str> {
    vec![
        "codec",
        version.weights_dir(),
        "gen_config.json",
        "tokenizer.json",
    ]
}

/// Run every installation check against the current settings.
pub fn run_verification(settings: &Settings) -> VerifyReport {
    let mut checks = Vec::new();

    // 1. Engine binary (critical)
    match resolve_engine_binary() {
        Ok(path) => checks.push(CheckOutcome::pass(
            "Engine binary",
            path.display().to_string(),
            true,
        )),
        Err(e) => checks.push(CheckOutcome::fail("Engine binary", e.to_string(), true)),
    }

    // 2. CUDA (critical only when the configured device needs it)
    let device = settings.effective_device();
    checks.push(cuda_check(device));

    // 3. Checkpoint files (missing weights are fixable, so warn-only)
    checks.extend(checkpoint_checks(settings.effective_model_version()));

    // 4. Output directory (critical)
    checks.push(output_dir_check(settings));

    // 5. Quantization sidecar (informational)
    checks.push(quantization_check());

    VerifyReport { checks }
}

fn cuda_check(device: Device) -> CheckOutcome {
    let has_gpu = detect_nvidia_gpu();
    let toolkit = cuda_toolkit_version();

    match device {
        Device::Cpu => CheckOutcome::warn(
            "CUDA",
            "Device is set to cpu - generation will be very slow",
        ),
        Device::Cuda => {
            if has_gpu {
                let detail = toolkit.map_or_else(
                    || "GPU present (nvidia-smi); CUDA toolkit not found".to_string(),
                    |v| format!("GPU present, CUDA toolkit {v}"),
                );
                CheckOutcome::pass("CUDA", detail, true)
            } else {
                CheckOutcome::fail(
                    "CUDA",
                    "No NVIDIA GPU detected. Fix the driver install or switch Device to cpu",
                    true,
                )
            }
        }
    }
}

fn checkpoint_checks(version: ModelVersion) -> Vec<CheckOutcome> {
    let Ok(ckpt) = checkpoint_dir() else {
        return vec![CheckOutcome::warn(
            "Checkpoints",
            "Cannot resolve checkpoint directory",
        )];
    };

    if !ckpt.exists() {
        return vec![CheckOutcome::warn(
            "Checkpoints",
            format!(
                "{} not found - run `songforge download` first",
                ckpt.display()
            ),
        )];
    }

    required_checkpoint_entries(version)
        .into_iter()
        .map(|entry| {
            let path = ckpt.join(entry);
            if path.exists() {
                CheckOutcome::pass(format!("Checkpoint: {entry}"), path.display().to_string(), false)
            } else {
                CheckOutcome::warn(
                    format!("Checkpoint: {entry}"),
                    "missing - run `songforge download`",
                )
            }
        })
        .collect()
}

fn output_dir_check(settings: &Settings) -> CheckOutcome {
    let dir = match settings.output_dir {
        Some(ref dir) if !dir.trim().is_empty() => Path::new(dir).to_path_buf(),
        _ => match default_output_dir() {
            Ok(dir) => dir,
            Err(e) => return CheckOutcome::fail("Output folder", e.to_string(), true),
        },
    };

    if let Err(e) = ensure_directory(&dir) {
        return CheckOutcome::fail("Output folder", e.to_string(), true);
    }
    if let Err(e) = verify_writable(&dir) {
        return CheckOutcome::fail("Output folder", e.to_string(), true);
    }
    CheckOutcome::pass("Output folder", dir.display().to_string(), true)
}

fn quantization_check() -> CheckOutcome {
    let sidecar = checkpoint_dir().ok().and_then(|dir| load_sidecar(&dir));
    match sidecar {
        Some(config) if config.load_in_8bit => {
            CheckOutcome::pass("8-bit quantization", "enabled via sidecar", false)
        }
        Some(_) => CheckOutcome::pass("8-bit quantization", "sidecar present, disabled", false),
        None => CheckOutcome::warn(
            "8-bit quantization",
            "not configured (optional) - run `songforge optimize`",
        ),
    }
}

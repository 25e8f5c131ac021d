//! Reduced-precision configuration handler.
//!
//! Writes the quantization sidecar into the checkpoint directory so that
//! subsequent engine loads (GUI or CLI) pick it up, optionally benchmarking
//! a short generation first.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};

use songforge_core::domain::{GenerationParams, QuantizationConfig};
use songforge_core::paths::{checkpoint_dir, ensure_directory};
use songforge_core::ports::{EngineLoadSpec, EnginePort};
use songforge_core::services::GenerationService;
use songforge_engine::{EngineRuntime, QuantizationSidecar, write_sidecar};

use crate::bootstrap::CliContext;

const BENCHMARK_LENGTH_MS: u64 = 10_000;

/// Execute the optimize command.
pub async fn execute(ctx: &CliContext, benchmark: bool, no_8bit: bool) -> Result<()> {
    let settings = ctx.settings.get().await?;
    let ckpt = checkpoint_dir().context("resolving checkpoint directory")?;
    ensure_directory(&ckpt)?;

    let config = QuantizationConfig {
        load_in_8bit: !no_8bit,
        ..QuantizationConfig::default()
    };

    if config.load_in_8bit {
        println!("Configuring 8-bit model loading (~50% less weight memory)");
    } else {
        println!("Configuring full-precision model loading");
    }

    if benchmark {
        run_benchmark(ctx, &ckpt, config).await?;
    }

    let sidecar = QuantizationSidecar::new(
        config,
        settings.effective_model_version(),
        settings.effective_device(),
    );
    let path = write_sidecar(&ckpt, &sidecar).context("writing quantization sidecar")?;
    println!("Saved quantization config to {}", path.display());
    println!("The GUI and CLI will apply it on the next model load.");
    Ok(())
}

/// Load the engine with the candidate config and time a 10-second track.
async fn run_benchmark(
    ctx: &CliContext,
    ckpt: &std::path::Path,
    config: QuantizationConfig,
) -> Result<()> {
    let settings = ctx.settings.get().await?;

    let engine: Arc<dyn EnginePort> = Arc::new(EngineRuntime::spawn(Arc::clone(&ctx.emitter)));
    let generation = GenerationService::new(
        Arc::clone(&engine),
        Arc::clone(&ctx.history),
        Arc::clone(&ctx.settings),
        Arc::clone(&ctx.emitter),
    );

    let spec = EngineLoadSpec {
        checkpoint_dir: ckpt.to_path_buf(),
        version: settings.effective_model_version(),
        device: settings.effective_device(),
        dtype: settings.effective_dtype(),
        lazy_load: false,
        quantization: Some(config),
    };
    generation.load_engine(spec).await?;

    println!("\nRunning benchmark...");
    let started = Instant::now();
    generation
        .generate(GenerationParams {
            tags: "piano,happy,pop".to_string(),
            lyrics: "[Verse]\nTest lyrics for benchmark\n[Chorus]\nBenchmark test".to_string(),
            max_audio_length_ms: BENCHMARK_LENGTH_MS,
            filename: "benchmark_output".to_string(),
            seed: 1234,
            ..GenerationParams::default()
        })
        .await?;
    let generation_time = started.elapsed().as_secs_f64();

    #[allow(clippy::cast_precision_loss)]
    let audio_length = BENCHMARK_LENGTH_MS as f64 / 1000.0;
    let rtf = generation_time / audio_length;

    let results = serde_json::json!({
        "generation_time_seconds": generation_time,
        "audio_length_seconds": audio_length,
        "rtf": rtf,
    });
    let results_path = ckpt.join("benchmark_results.json");
    std::fs::write(&results_path, serde_json::to_string_pretty(&results)?)
        .context("writing benchmark results")?;

    println!("\n=== Benchmark Results ===");
    println!("Generation Time: {generation_time:.2} seconds");
    println!("Audio Length: {audio_length:.0} seconds");
    println!("Real-Time Factor (RTF): {rtf:.2}x");
    println!("=========================");
    println!("Saved benchmark results to {}", results_path.display());

    engine.unload().await;
    Ok(())
}

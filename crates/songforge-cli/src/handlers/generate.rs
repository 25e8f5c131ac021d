//! Headless single-track generation handler.

use std::sync::Arc;

use anyhow::{Context, Result};

use songforge_core::domain::GenerationParams;
use songforge_core::paths::checkpoint_dir;
use songforge_core::ports::{EngineLoadSpec, EnginePort};
use songforge_core::services::GenerationService;
use songforge_engine::{EngineRuntime, load_sidecar};

use crate::bootstrap::CliContext;
use crate::commands::GenerateArgs;

/// Execute the generate command.
pub async fn execute(ctx: &CliContext, args: GenerateArgs) -> Result<()> {
    let lyrics = std::fs::read_to_string(&args.lyrics_file)
        .with_context(|| format!("reading lyrics from {}", args.lyrics_file.display()))?;

    let settings = ctx.settings.get().await?;
    let ckpt = checkpoint_dir().context("resolving checkpoint directory")?;

    let engine: Arc<dyn EnginePort> = Arc::new(EngineRuntime::spawn(Arc::clone(&ctx.emitter)));
    let generation = GenerationService::new(
        Arc::clone(&engine),
        Arc::clone(&ctx.history),
        Arc::clone(&ctx.settings),
        Arc::clone(&ctx.emitter),
    );

    let spec = EngineLoadSpec {
        checkpoint_dir: ckpt.clone(),
        version: settings.effective_model_version(),
        device: settings.effective_device(),
        dtype: settings.effective_dtype(),
        lazy_load: settings.lazy_load.unwrap_or(false),
        quantization: load_sidecar(&ckpt),
    };
    generation.load_engine(spec).await?;

    let record = generation
        .generate(GenerationParams {
            tags: args.tags,
            lyrics,
            max_audio_length_ms: args.length_secs * 1000,
            topk: args.topk,
            temperature: args.temperature,
            cfg_scale: args.cfg_scale,
            seed: args.seed,
            filename: args.output,
        })
        .await?;

    println!("Track recorded in the library: {}", record.file_path);
    engine.unload().await;
    Ok(())
}

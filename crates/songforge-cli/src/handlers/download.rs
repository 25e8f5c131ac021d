//! Checkpoint download handler.

use anyhow::{Context, Result};

use songforge_core::paths::checkpoint_dir;
use songforge_engine::{download_checkpoints, download_repo};

use crate::bootstrap::CliContext;

/// Execute the download command.
pub async fn execute(ctx: &CliContext, repo: Option<String>) -> Result<()> {
    let settings = ctx.settings.get().await?;
    let ckpt = checkpoint_dir().context("resolving checkpoint directory")?;

    match repo {
        Some(repo) => {
            download_repo(&repo, &ckpt, &*ctx.emitter)
                .await
                .with_context(|| format!("downloading {repo}"))?;
        }
        None => {
            download_checkpoints(&ckpt, settings.effective_model_version(), &*ctx.emitter)
                .await
                .context("downloading the default checkpoint set")?;
        }
    }

    println!("Checkpoints ready under {}", ckpt.display());
    Ok(())
}

//! Checkpoint downloads from the Hugging Face Hub.
//!
//! A complete installation is three repositories fetched into the checkpoint
//! directory: the bundle root (generation config + tokenizer), the
//! per-version model weights, and the audio codec.

use std::path::{Path, PathBuf};

use hf_hub::api::tokio::Api;
use thiserror::Error;

use songforge_core::domain::ModelVersion;
use songforge_core::events::AppEvent;
use songforge_core::ports::AppEventEmitter;

/// Errors that can occur while fetching checkpoints.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Hub error for {repo}: {reason}")]
    Hub { repo: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The default checkpoint set: `(repo_id, subdirectory)` pairs relative to
/// the checkpoint root. An empty subdirectory means the root itself.
#[must_use]
pub fn default_checkpoint_repos(version: ModelVersion) -> Vec<(String, &'static str)> {
    vec![
        ("songforge/songgen".to_string(), ""),
        (
            format!("songforge/songgen-{}", version.as_str().to_lowercase()),
            version.weights_dir(),
        ),
        ("songforge/songgen-codec".to_string(), "codec"),
    ]
}

/// Download every file of one Hub repository into `dest`.
///
/// Emits `DownloadStarted` / per-file `DownloadProgress` /
/// `DownloadCompleted`; a failure emits `DownloadFailed` and returns the
/// error.
pub async fn download_repo(
    repo_id: &str,
    dest: &Path,
    emitter: &dyn AppEventEmitter,
) -> Result<(), DownloadError> {
    emitter.emit(AppEvent::DownloadStarted {
        repo: repo_id.to_string(),
    });
    tracing::info!(repo = repo_id, dest = %dest.display(), "Downloading checkpoint repository");

    match fetch_repo(repo_id, dest, emitter).await {
        Ok(()) => {
            tracing::info!(repo = repo_id, "Download complete");
            emitter.emit(AppEvent::DownloadCompleted {
                repo: repo_id.to_string(),
            });
            Ok(())
        }
        Err(e) => {
            tracing::error!(repo = repo_id, error = %e, "Download failed");
            emitter.emit(AppEvent::DownloadFailed {
                repo: repo_id.to_string(),
                error: e.to_string(),
            });
            Err(e)
        }
    }
}

/// Download the full default checkpoint set into `ckpt_root`.
pub async fn download_checkpoints(
    ckpt_root: &Path,
    version: ModelVersion,
    emitter: &dyn AppEventEmitter,
) -> Result<(), DownloadError> {
    for (repo_id, subdir) in default_checkpoint_repos(version) {
        let dest = join_subdir(ckpt_root, subdir);
        download_repo(&repo_id, &dest, emitter).await?;
    }
    Ok(())
}

fn join_subdir(root: &Path, subdir: &str) -> PathBuf {
    if subdir.is_empty() {
        root.to_path_buf()
    } else {
        root.join(subdir)
    }
}

async fn fetch_repo(
    repo_id: &str,
    dest: &Path,
    emitter: &dyn AppEventEmitter,
) -> Result<(), DownloadError> {
    let hub_err = |e: hf_hub::api::tokio::ApiError| DownloadError::Hub {
        repo: repo_id.to_string(),
        reason: e.to_string(),
    };

    let api = Api::new().map_err(hub_err)?;
    let repo = api.model(repo_id.to_string());
    let info = repo.info().await.map_err(hub_err)?;

    let files_total = info.siblings.len();
    tokio::fs::create_dir_all(dest).await?;

    for (i, sibling) in info.siblings.iter().enumerate() {
        // get() downloads into the hub cache; mirror into the checkpoint tree
        let cached = repo.get(&sibling.rfilename).await.map_err(hub_err)?;

        let target = dest.join(&sibling.rfilename);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(&cached, &target).await?;

        emitter.emit(AppEvent::DownloadProgress {
            repo: repo_id.to_string(),
            file: sibling.rfilename.clone(),
            files_done: i + 1,
            files_total,
        });
    }

    Ok(())
}

//! Shared JSON document I/O.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use songforge_core::RepositoryError;

fn read_err(path: &Path, reason: impl ToString) -> RepositoryError {
    RepositoryError::Read {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

fn write_err(path: &Path, reason: impl ToString) -> RepositoryError {
    RepositoryError::Write {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Read and parse a JSON document. `Ok(None)` when the file does not exist.
pub(crate) async fn read_json<T: DeserializeOwned>(
    path: &Path,
) -> Result<Option<T>, RepositoryError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(read_err(path, e)),
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| RepositoryError::Corrupt {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
}

/// Serialize `value` pretty-printed and atomically replace `path` with it.
pub(crate) async fn write_json_atomic<T: Serialize + Sync>(
    path: &Path,
    value: &T,
) -> Result<(), RepositoryError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| write_err(path, e))?;
    }

    let bytes = serde_json::to_vec_pretty(value).map_err(|e| write_err(path, e))?;

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &bytes)
        .await
        .map_err(|e| write_err(&tmp, e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| write_err(path, e))?;

    Ok(())
}

/// Remove a document, ignoring a missing file.
pub(crate) async fn remove_if_exists(path: &Path) -> Result<(), RepositoryError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(write_err(path, e)),
    }
}

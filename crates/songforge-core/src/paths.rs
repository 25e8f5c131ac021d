//! Application path resolution.
//!
//! Everything songforge persists lives under a single data root:
//! settings.json, history.json, the default output directory, the engine
//! binary and the model checkpoints.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable overriding the data root.
pub const DATA_DIR_ENV: &str = "SONGFORGE_DATA_DIR";

/// Environment variable overriding the checkpoint directory.
pub const CKPT_DIR_ENV: &str = "SONGFORGE_CKPT_DIR";

/// Errors that can occur during path resolution and directory operations.
#[derive(Debug, Error)]
pub enum PathError {
    /// Could not determine the system data directory.
    #[error("Cannot determine system data directory")]
    NoDataDir,

    /// A path was expected to be a directory but was not.
    #[error("{0} exists but is not a directory")]
    NotADirectory(PathBuf),

    /// Failed to create a directory.
    #[error("Failed to create directory {path}: {reason}")]
    CreateFailed { path: PathBuf, reason: String },

    /// A directory is not writable.
    #[error("Directory {path} is not writable: {reason}")]
    NotWritable { path: PathBuf, reason: String },
}

/// Get the root directory for application data.
///
/// Resolution order:
/// 1. `SONGFORGE_DATA_DIR` environment variable (highest priority)
/// 2. System data directory (e.g. `~/.local/share/songforge`)
///
/// The directory is created if it does not exist.
pub fn data_root() -> Result<PathBuf, PathError> {
    if let Ok(path) = env::var(DATA_DIR_ENV) {
        let root = PathBuf::from(path);
        ensure_directory(&root)?;
        return Ok(root);
    }

    let data_dir = dirs::data_local_dir().ok_or(PathError::NoDataDir)?;
    let root = data_dir.join("songforge");
    ensure_directory(&root)?;
    Ok(root)
}

/// Path of the persisted settings document.
pub fn settings_path() -> Result<PathBuf, PathError> {
    Ok(data_root()?.join("settings.json"))
}

/// Path of the persisted generation history document.
pub fn history_path() -> Result<PathBuf, PathError> {
    Ok(data_root()?.join("history.json"))
}

/// Default directory for generated audio when none is configured.
pub fn default_output_dir() -> Result<PathBuf, PathError> {
    Ok(data_root()?.join("output"))
}

/// Directory holding the model checkpoints.
///
/// `SONGFORGE_CKPT_DIR` overrides; otherwise `{data_root}/ckpt`.
pub fn checkpoint_dir() -> Result<PathBuf, PathError> {
    if let Ok(path) = env::var(CKPT_DIR_ENV) {
        return Ok(PathBuf::from(path));
    }
    Ok(data_root()?.join("ckpt"))
}

/// Create `path` if missing; error if it exists but is not a directory.
pub fn ensure_directory(path: &Path) -> Result<(), PathError> {
    if path.exists() {
        if !path.is_dir() {
            return Err(PathError::NotADirectory(path.to_path_buf()));
        }
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|e| PathError::CreateFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Verify `path` is writable by creating and removing a probe file.
pub fn verify_writable(path: &Path) -> Result<(), PathError> {
    let probe = path.join(".songforge_write_probe");
    fs::write(&probe, b"probe").map_err(|e| PathError::NotWritable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let _ = fs::remove_file(&probe);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::tempdir;

    // Environment variables are process-global; serialize the tests that touch them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    struct EnvGuard {
        key: &'static str,
        previous: Option<String>,
    }

    impl EnvGuard {
        #[allow(unsafe_code)]
        fn set(key: &'static str, value: &str) -> Self {
            let previous = env::var(key).ok();
            unsafe {
                env::set_var(key, value);
            }
            Self { key, previous }
        }
    }

    impl Drop for EnvGuard {
        #[allow(unsafe_code)]
        fn drop(&mut self) {
            if let Some(ref value) = self.previous {
                unsafe {
                    env::set_var(self.key, value);
                }
            } else {
                unsafe {
                    env::remove_var(self.key);
                }
            }
        }
    }

    #[test]
    fn test_data_root_honors_env_override() {
        let _lock = ENV_LOCK.lock().unwrap();
        let temp = tempdir().unwrap();
        let _guard = EnvGuard::set(DATA_DIR_ENV, temp.path().to_str().unwrap());

        let root = data_root().unwrap();
        assert_eq!(root, temp.path());
        assert_eq!(settings_path().unwrap(), temp.path().join("settings.json"));
        assert_eq!(history_path().unwrap(), temp.path().join("history.json"));
    }

    #[test]
    fn test_checkpoint_dir_env_override() {
        let _lock = ENV_LOCK.lock().unwrap();
        let temp = tempdir().unwrap();
        let ckpt = temp.path().join("weights");
        let _guard = EnvGuard::set(CKPT_DIR_ENV, ckpt.to_str().unwrap());

        assert_eq!(checkpoint_dir().unwrap(), ckpt);
    }

    #[test]
    fn test_ensure_directory_creates_and_rejects_files() {
        let temp = tempdir().unwrap();

        let nested = temp.path().join("a/b/c");
        ensure_directory(&nested).unwrap();
        assert!(nested.is_dir());

        let file = temp.path().join("plain.txt");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(
            ensure_directory(&file),
            Err(PathError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_verify_writable() {
        let temp = tempdir().unwrap();
        verify_writable(temp.path()).unwrap();
        // Probe file must not linger
        assert!(!temp.path().join(".songforge_write_probe").exists());
    }
}

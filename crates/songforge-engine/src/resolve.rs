//! Engine binary resolution.

use std::env;
use std::path::PathBuf;

use songforge_core::paths::data_root;
use songforge_core::ports::EngineError;

/// Environment variable pointing directly at the engine binary.
pub const ENGINE_ENV: &str = "SONGFORGE_ENGINE";

/// Name of the engine binary.
#[cfg(windows)]
pub const ENGINE_BIN: &str = "songgen.exe";
/// Name of the engine binary.
#[cfg(not(windows))]
pub const ENGINE_BIN: &str = "songgen";

/// Locate the engine binary.
///
/// Resolution order:
/// 1. `SONGFORGE_ENGINE` environment variable (authoritative; an invalid
///    value is an error rather than a silent fallback)
/// 2. `{data_root}/engine/songgen`
/// 3. `PATH` lookup
pub fn resolve_engine_binary() -> Result<PathBuf, EngineError> {
    if let Ok(path) = env::var(ENGINE_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            tracing::debug!(path = %path.display(), "Using engine from {ENGINE_ENV}");
            return Ok(path);
        }
        return Err(EngineError::BinaryNotFound(format!(
            "{} (from {ENGINE_ENV})",
            path.display()
        )));
    }

    if let Ok(root) = data_root() {
        let candidate = root.join("engine").join(ENGINE_BIN);
        if candidate.exists() {
            tracing::debug!(path = %candidate.display(), "Using engine from data dir");
            return Ok(candidate);
        }
    }

    which::which(ENGINE_BIN).map_err(|_| {
        EngineError::BinaryNotFound(format!(
            "'{ENGINE_BIN}' not on PATH; set {ENGINE_ENV} or install the engine"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    #[allow(unsafe_code)]
    fn test_env_override_wins_and_validates() {
        let _lock = ENV_LOCK.lock().unwrap();
        let temp = tempfile::tempdir().unwrap();

        // Invalid override is an error, not a fallback
        let missing = temp.path().join("nope");
        unsafe {
            env::set_var(ENGINE_ENV, &missing);
        }
        assert!(matches!(
            resolve_engine_binary(),
            Err(EngineError::BinaryNotFound(_))
        ));

        // Valid override resolves
        let binary = temp.path().join(ENGINE_BIN);
        std::fs::write(&binary, b"#!/bin/sh\n").unwrap();
        unsafe {
            env::set_var(ENGINE_ENV, &binary);
        }
        assert_eq!(resolve_engine_binary().unwrap(), binary);

        unsafe {
            env::remove_var(ENGINE_ENV);
        }
    }
}

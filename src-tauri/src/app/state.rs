//! Shared Tauri-managed state.

use std::sync::Arc;

use songforge_tauri::Backend;

/// State handed to every command via `tauri::State`.
pub struct AppState {
    /// The backend facade built by `songforge_tauri::bootstrap`.
    pub backend: Arc<Backend>,
}

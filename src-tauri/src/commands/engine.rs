//! Engine lifecycle commands.

use serde::Serialize;

use crate::app::state::AppState;

/// Engine state snapshot for the settings tab.
#[derive(Debug, Serialize)]
pub struct EngineStatus {
    pub loaded: bool,
    pub generating: bool,
}

/// Load the model with the persisted settings.
///
/// Rejected with a busy message while a generation is running; the frontend
/// shows it as a warning dialog.
#[tauri::command]
pub async fn engine_load(state: tauri::State<'_, AppState>) -> Result<(), String> {
    state.backend.load_engine().await.map_err(|e| e.to_string())
}

/// Report whether the model is loaded and whether a generation is running.
#[tauri::command]
pub fn engine_status(state: tauri::State<'_, AppState>) -> EngineStatus {
    EngineStatus {
        loaded: state.backend.engine_loaded(),
        generating: state.backend.is_generating(),
    }
}

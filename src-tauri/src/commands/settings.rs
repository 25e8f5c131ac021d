//! Settings and verification commands.

use songforge_core::settings::{Settings, SettingsUpdate};
use songforge_core::verify::VerifyReport;

use crate::app::state::AppState;

/// Current persisted settings (with defaults filled in on first run).
#[tauri::command]
pub async fn settings_get(state: tauri::State<'_, AppState>) -> Result<Settings, String> {
    state.backend.settings_get().await.map_err(|e| e.to_string())
}

/// Apply a partial settings update and return the merged result.
#[tauri::command]
pub async fn settings_update(
    update: SettingsUpdate,
    state: tauri::State<'_, AppState>,
) -> Result<Settings, String> {
    state
        .backend
        .settings_update(update)
        .await
        .map_err(|e| e.to_string())
}

/// Run the installation verification probes for the settings tab.
#[tauri::command]
pub async fn verify_report(state: tauri::State<'_, AppState>) -> Result<VerifyReport, String> {
    state.backend.verify_report().await.map_err(|e| e.to_string())
}

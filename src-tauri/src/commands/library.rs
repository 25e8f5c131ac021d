//! Music library commands.

use std::path::PathBuf;

use songforge_audio::Waveform;
use songforge_core::domain::GenerationRecord;

use crate::app::state::AppState;

/// List all library records, newest first.
#[tauri::command]
pub async fn history_list(
    state: tauri::State<'_, AppState>,
) -> Result<Vec<GenerationRecord>, String> {
    state.backend.history_list().await.map_err(|e| e.to_string())
}

/// Remove one record (the audio file stays on disk).
#[tauri::command]
pub async fn history_remove(
    index: usize,
    state: tauri::State<'_, AppState>,
) -> Result<GenerationRecord, String> {
    state
        .backend
        .history_remove(index)
        .await
        .map_err(|e| e.to_string())
}

/// Clear the whole library (generated files are not deleted).
#[tauri::command]
pub async fn history_clear(state: tauri::State<'_, AppState>) -> Result<(), String> {
    state.backend.history_clear().await.map_err(|e| e.to_string())
}

/// Drop records whose audio files were deleted; returns how many.
#[tauri::command]
pub async fn history_prune(state: tauri::State<'_, AppState>) -> Result<usize, String> {
    state.backend.history_prune().await.map_err(|e| e.to_string())
}

/// Decimated waveform for a library card's plot.
#[tauri::command]
pub fn waveform(path: PathBuf, state: tauri::State<'_, AppState>) -> Result<Waveform, String> {
    state.backend.waveform(&path).map_err(|e| e.to_string())
}

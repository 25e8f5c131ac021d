//! Inline player commands.
//!
//! Position updates stream over the `playback:position` event while a track
//! plays; `playback:finished` fires once when it drains naturally.

use crate::app::state::AppState;

/// Start playing a library track.
///
/// `duration_secs` comes from the waveform the card already loaded, so the
/// file is not decoded a second time just for the time label.
#[tauri::command]
pub fn player_play(
    path: String,
    duration_secs: f64,
    state: tauri::State<'_, AppState>,
) -> Result<(), String> {
    state
        .backend
        .player_play(path, duration_secs)
        .map_err(|e| e.to_string())
}

/// Pause playback (the position clock freezes).
#[tauri::command]
pub fn player_pause(state: tauri::State<'_, AppState>) {
    state.backend.player_pause();
}

/// Resume paused playback.
#[tauri::command]
pub fn player_resume(state: tauri::State<'_, AppState>) {
    state.backend.player_resume();
}

/// Stop playback and reset the position marker.
#[tauri::command]
pub fn player_stop(state: tauri::State<'_, AppState>) {
    state.backend.player_stop();
}

/// Set playback volume (0.0 - 1.0).
#[tauri::command]
pub fn player_set_volume(volume: f32, state: tauri::State<'_, AppState>) {
    state.backend.player_set_volume(volume);
}

//! Generation and batch queue commands.

use songforge_core::domain::{GenerationParams, GenerationRecord, TagPrompt};

use crate::app::state::AppState;

/// Build the comma-joined tag string for the tag-builder preview label.
#[tauri::command]
pub fn build_tags(prompt: TagPrompt) -> String {
    prompt.build()
}

/// Run a single generation. Returns the library record on success.
///
/// Completion, stage and progress updates stream separately over the
/// `generation:*` events.
#[tauri::command]
pub async fn generate(
    params: GenerationParams,
    state: tauri::State<'_, AppState>,
) -> Result<GenerationRecord, String> {
    state
        .backend
        .generate(params)
        .await
        .map_err(|e| e.to_string())
}

/// Validate and queue a batch item; returns its 1-based position.
#[tauri::command]
pub fn batch_add(
    params: GenerationParams,
    state: tauri::State<'_, AppState>,
) -> Result<usize, String> {
    state.backend.batch_add(params).map_err(|e| e.to_string())
}

/// Remove a queued batch item by index.
#[tauri::command]
pub fn batch_remove(index: usize, state: tauri::State<'_, AppState>) -> bool {
    state.backend.batch_remove(index).is_some()
}

/// Clear the batch queue.
#[tauri::command]
pub fn batch_clear(state: tauri::State<'_, AppState>) {
    state.backend.batch_clear();
}

/// Snapshot of the queued items.
#[tauri::command]
pub fn batch_list(state: tauri::State<'_, AppState>) -> Vec<GenerationParams> {
    state.backend.batch_items()
}

/// Process the batch queue sequentially. The queue is cleared only when
/// every item succeeds.
#[tauri::command]
pub async fn batch_run(
    state: tauri::State<'_, AppState>,
) -> Result<Vec<GenerationRecord>, String> {
    state.backend.run_batch().await.map_err(|e| e.to_string())
}

//! Tauri command wrappers.
//!
//! Thin `#[tauri::command]` shims over the backend facade; every error is
//! stringified for the frontend, which surfaces it as a modal dialog plus a
//! line in the status log.

pub mod engine;
pub mod generation;
pub mod library;
pub mod player;
pub mod settings;

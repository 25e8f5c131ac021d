//! Tauri GUI backend adapter for songforge.
//!
//! The app shell under `src-tauri/` stays thin: it registers `#[tauri::command]`
//! wrappers that delegate to the [`Backend`] facade built here, and wires the
//! [`TauriEventEmitter`] so backend events reach the frontend.

pub mod backend;
pub mod bootstrap;
pub mod error;
pub mod event_emitter;

pub use backend::Backend;
pub use bootstrap::bootstrap;
pub use error::BackendError;
pub use event_emitter::TauriEventEmitter;

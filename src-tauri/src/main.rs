// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod commands;

use std::sync::Arc;

use dotenvy::dotenv;
use tauri::Manager;
use tracing::info;

use app::state::AppState;
use songforge_core::ports::AppEventEmitter;
use songforge_tauri::{TauriEventEmitter, bootstrap};

/// Initialize tracing with a file appender for persistent logs.
///
/// Logs are written to:
/// - stdout (for console viewing)
/// - {data_dir}/logs/songforge-{date}.log (daily rotation via tracing-appender)
///
/// Log level is controlled by RUST_LOG environment variable (default: warn).
fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let log_dir = match songforge_core::paths::data_root() {
        Ok(root) => root.join("logs"),
        Err(e) => {
            eprintln!("Failed to get data root for logs: {e}");
            std::path::PathBuf::from(".")
        }
    };

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Failed to create log directory: {e}");
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, "songforge");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .compact(),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .compact(),
        )
        .try_init()
        .ok();

    // Keep the appender guard alive for the app lifetime
    std::mem::forget(guard);
}

fn main() {
    let _ = dotenv();

    init_tracing();
    info!("songforge starting");

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            // Bootstrap inside setup() where the AppHandle exists for real
            // event emission
            let emitter: Arc<dyn AppEventEmitter> =
                Arc::new(TauriEventEmitter::new(app.handle().clone()));

            let backend = tauri::async_runtime::block_on(bootstrap(emitter))
                .expect("Failed to bootstrap application");

            app.manage(AppState { backend });
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::engine::engine_load,
            commands::engine::engine_status,
            commands::generation::build_tags,
            commands::generation::generate,
            commands::generation::batch_add,
            commands::generation::batch_remove,
            commands::generation::batch_clear,
            commands::generation::batch_list,
            commands::generation::batch_run,
            commands::library::history_list,
            commands::library::history_remove,
            commands::library::history_clear,
            commands::library::history_prune,
            commands::library::waveform,
            commands::player::player_play,
            commands::player::player_pause,
            commands::player::player_resume,
            commands::player::player_stop,
            commands::player::player_set_volume,
            commands::settings::settings_get,
            commands::settings::settings_update,
            commands::settings::verify_report,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

//! `songforge` CLI entry point.

mod bootstrap;
mod commands;
mod handlers;
mod parser;

use clap::Parser;

use commands::Commands;
use parser::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(ref dir) = cli.data_dir {
        apply_data_dir(dir);
    }

    init_tracing(cli.verbose);

    let ctx = bootstrap::build_context()?;

    match cli.command {
        Commands::Verify => handlers::verify::execute(&ctx).await,
        Commands::Download { repo } => handlers::download::execute(&ctx, repo).await,
        Commands::Optimize { benchmark, no_8bit } => {
            handlers::optimize::execute(&ctx, benchmark, no_8bit).await
        }
        Commands::Generate(args) => handlers::generate::execute(&ctx, args).await,
        Commands::Settings { set } => handlers::settings::execute(&ctx, set).await,
    }
}

/// Point the whole process at an alternate data directory.
///
/// Runs before tracing and any worker threads, so the env mutation is safe
/// in practice.
#[allow(unsafe_code)]
fn apply_data_dir(dir: &str) {
    unsafe {
        std::env::set_var(songforge_core::paths::DATA_DIR_ENV, dir);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

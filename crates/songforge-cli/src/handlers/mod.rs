//! Subcommand handlers.

pub mod download;
pub mod generate;
pub mod optimize;
pub mod settings;
pub mod verify;

//! Subcommand definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Verify the installation: engine binary, CUDA, checkpoints, output folder
    Verify,

    /// Download model checkpoints from the Hugging Face Hub
    Download {
        /// Download a single repository instead of the default set
        #[arg(long)]
        repo: Option<String>,
    },

    /// Configure reduced-precision (8-bit) model loading
    Optimize {
        /// Run a 10-second benchmark generation after configuring
        #[arg(long)]
        benchmark: bool,

        /// Write the sidecar with 8-bit loading disabled
        #[arg(long = "no-8bit")]
        no_8bit: bool,
    },

    /// Generate one track headlessly
    Generate(GenerateArgs),

    /// Show or update persisted settings
    Settings {
        /// key=value pairs, e.g. --set device=cpu --set theme="Dark"
        #[arg(long = "set")]
        set: Vec<String>,
    },
}

/// Arguments for `songforge generate`.
#[derive(Args)]
pub struct GenerateArgs {
    /// Comma-joined style tags, e.g. "pop,female vocal,energetic,medium"
    #[arg(long)]
    pub tags: String,

    /// File containing the lyrics (section markers like [Verse] supported)
    #[arg(long = "lyrics-file")]
    pub lyrics_file: PathBuf,

    /// Requested audio length in seconds (1-240)
    #[arg(long = "length-secs", default_value_t = 30)]
    pub length_secs: u64,

    /// Top-K sampling cutoff (1-100)
    #[arg(long, default_value_t = 50)]
    pub topk: u32,

    /// Sampling temperature
    #[arg(long, default_value_t = 1.0)]
    pub temperature: f64,

    /// Classifier-free-guidance scale (>= 1.0)
    #[arg(long = "cfg-scale", default_value_t = 1.5)]
    pub cfg_scale: f64,

    /// Seed; -1 picks a random one
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub seed: i64,

    /// Output filename stem
    #[arg(long, default_value = "output")]
    pub output: String,
}

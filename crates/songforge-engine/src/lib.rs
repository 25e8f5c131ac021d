//! Adapter for the external `songgen` generation pipeline.
//!
//! The pipeline is an opaque black box: a resident child process that loads
//! the model weights once and then serves generation requests over a
//! JSON-line stdin/stdout protocol. This crate supervises that process and
//! also carries the setup tooling around it: checkpoint downloads from the
//! Hugging Face Hub, installation verification probes, and the reduced-
//! precision sidecar.

pub mod download;
pub mod probe;
pub mod process;
pub mod protocol;
pub mod quant;
pub mod resolve;
pub mod runtime;

pub use download::{DownloadError, default_checkpoint_repos, download_checkpoints, download_repo};
pub use probe::run_verification;
pub use protocol::{EngineEvent, ProtocolError, parse_line};
pub use quant::{QuantizationSidecar, SIDECAR_FILE, load_sidecar, write_sidecar};
pub use resolve::{ENGINE_BIN, ENGINE_ENV, resolve_engine_binary};
pub use runtime::EngineRuntime;

//! `slr` — a deterministic, checkpoint-gated pipeline that turns a raw
//! research idea into a reproducible systematic-literature-review search
//! strategy: structured concepts, database-specific Boolean queries,
//! executed searches, deduplicated results, and exportable protocol
//! artifacts.
//!
//! This crate is a thin root: the CLI lives in [`slr_cli`], the orchestrator
//! facade in [`slr_orchestrator::Controller`], and every other concern
//! (artifact storage, query synthesis, search execution, dedup, export) in
//! its own `slr-*` crate. `src/main.rs` only calls [`run`].

/// Returns this build's version string (`CARGO_PKG_VERSION`).
#[must_use]
pub fn slr_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// Re-exported so embedders depending on the root crate (rather than the
// individual `slr-*` crates directly) have one stable entry point.
pub use slr_artifact::{AnyArtifact, ArtifactStore, ArtifactType};
pub use slr_config::Config;
pub use slr_orchestrator::Controller;
pub use slr_utils::error::{Result, SlrError};
pub use slr_utils::exit_codes::ExitCode;

/// Parses argv and runs the selected subcommand to completion, printing
/// output or an error report as appropriate.
pub async fn run() -> std::result::Result<(), ExitCode> {
    slr_cli::run().await
}

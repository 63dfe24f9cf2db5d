//! Configuration model, discovery, and validation for the SLR pipeline.
//!
//! Layering, highest precedence first: CLI args > `.slr/config.toml`
//! (discovered by walking up from the working directory) > compiled-in
//! defaults. No process-wide singleton — a [`Config`] is a value passed
//! into the orchestrator's `Controller` constructor.

pub mod builder;
pub mod cli_args;
pub mod discovery;
pub mod model;
pub mod sources;
pub mod validation;

pub use cli_args::CliArgs;
pub use discovery::{discover, discover_from, find_config_file};
pub use model::{
    Config, DedupConfig, ExecutorSettings, LlmConfig, LlmProvider, ProviderRate, RetryConfig,
    TomlConfig,
};
pub use sources::{ConfigSource, SourceAttribution};

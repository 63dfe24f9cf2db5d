//! CLI-layer overrides. `slr-cli` populates this from `clap` matches and
//! passes it to [`crate::discovery::discover`]; kept transport-agnostic so
//! non-CLI embedders (tests, a future HTTP wrapper) can construct one
//! directly.

use crate::model::LlmProvider;
use camino::Utf8PathBuf;

/// Every field is an override: `None` means "don't touch this layer's
/// value", not "set it to the default".
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config_path: Option<Utf8PathBuf>,
    pub base_dir: Option<Utf8PathBuf>,
    pub llm_provider: Option<LlmProvider>,
    pub llm_api_key: Option<String>,
    pub max_results_per_db: Option<usize>,
    pub concurrency: Option<usize>,
    pub dedup_enabled: Option<bool>,
}

//! Layered discovery: CLI args (highest) over `.slr/config.toml` (found by
//! walking up from the working directory, matching the teacher's config
//! discovery walk) over compiled-in defaults (lowest). Every resolved field
//! records which layer won in a [`SourceAttribution`].

use crate::cli_args::CliArgs;
use crate::model::{Config, TomlConfig};
use crate::sources::{ConfigSource, SourceAttribution};
use camino::Utf8PathBuf;
use slr_utils::error::{Result, SlrError};
use std::path::Path;

const CONFIG_RELATIVE_PATH: &str = ".slr/config.toml";

/// Walks from `start_dir` up to the filesystem root looking for
/// `.slr/config.toml`. Returns `None` if no ancestor has one.
#[must_use]
pub fn find_config_file(start_dir: &Path) -> Option<Utf8PathBuf> {
    let mut dir = Some(start_dir);
    while let Some(d) = dir {
        let candidate = d.join(CONFIG_RELATIVE_PATH);
        if candidate.is_file() {
            return Utf8PathBuf::from_path_buf(candidate).ok();
        }
        dir = d.parent();
    }
    None
}

/// Resolves a [`Config`] starting the file-discovery walk from the current
/// working directory.
pub fn discover(cli_args: &CliArgs) -> Result<(Config, SourceAttribution)> {
    let cwd = std::env::current_dir().map_err(SlrError::Io)?;
    discover_from(&cwd, cli_args)
}

/// The path-driven variant, used by tests to avoid depending on the
/// process's actual working directory.
pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<(Config, SourceAttribution)> {
    let mut config = Config::default();
    let mut sources = SourceAttribution::new();
    sources.set("base_dir", ConfigSource::Default);
    sources.set("llm", ConfigSource::Default);
    sources.set("executor", ConfigSource::Default);
    sources.set("dedup", ConfigSource::Default);

    let config_file = cli_args
        .config_path
        .clone()
        .or_else(|| find_config_file(start_dir));

    if let Some(path) = &config_file {
        let raw = slr_utils::atomic_write::read_file_with_crlf_tolerance(path)
            .map_err(|e| SlrError::Internal(format!("reading config file {path}: {e}")))?;
        let parsed: TomlConfig = toml::from_str(&raw)
            .map_err(|e| SlrError::validation(format!("invalid config file {path}: {e}")))?;
        apply_file_layer(&mut config, &mut sources, parsed);
    }

    apply_cli_layer(&mut config, &mut sources, cli_args);

    crate::validation::validate(&config)?;
    Ok((config, sources))
}

fn apply_file_layer(config: &mut Config, sources: &mut SourceAttribution, file: TomlConfig) {
    if let Some(base_dir) = file.base_dir {
        config.base_dir = base_dir;
        sources.set("base_dir", ConfigSource::File);
    }
    if let Some(llm) = file.llm {
        config.llm = llm;
        sources.set("llm", ConfigSource::File);
    }
    if let Some(executor) = file.executor {
        config.executor = executor;
        sources.set("executor", ConfigSource::File);
    }
    if let Some(dedup) = file.dedup {
        config.dedup = dedup;
        sources.set("dedup", ConfigSource::File);
    }
    for (name, section) in file.provider {
        config.provider_rates.insert(name, section.rate);
    }
}

fn apply_cli_layer(config: &mut Config, sources: &mut SourceAttribution, cli: &CliArgs) {
    if let Some(base_dir) = &cli.base_dir {
        config.base_dir = base_dir.clone();
        sources.set("base_dir", ConfigSource::Cli);
    }
    if let Some(provider) = cli.llm_provider {
        config.llm.provider = provider;
        sources.set("llm", ConfigSource::Cli);
    }
    if let Some(api_key) = &cli.llm_api_key {
        config.llm.api_key = Some(api_key.clone());
        sources.set("llm", ConfigSource::Cli);
    }
    if let Some(max_results) = cli.max_results_per_db {
        config.executor.max_results_per_db = max_results;
        sources.set("executor", ConfigSource::Cli);
    }
    if let Some(concurrency) = cli.concurrency {
        config.executor.concurrency = concurrency;
        sources.set("executor", ConfigSource::Cli);
    }
    if let Some(enabled) = cli.dedup_enabled {
        config.dedup.enabled = enabled;
        sources.set("dedup", ConfigSource::Cli);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_when_no_file_present() {
        let dir = tempfile::tempdir().unwrap();
        let (config, sources) = discover_from(dir.path(), &CliArgs::default()).unwrap();
        assert_eq!(config.executor.concurrency, 4);
        assert_eq!(sources.get("base_dir"), Some(ConfigSource::Default));
    }

    #[test]
    fn file_layer_overrides_defaults_and_cli_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".slr")).unwrap();
        let mut file = std::fs::File::create(dir.path().join(".slr/config.toml")).unwrap();
        writeln!(file, "base_dir = \"/tmp/from-file\"").unwrap();
        writeln!(file, "[executor]").unwrap();
        writeln!(file, "max_results_per_db = 50").unwrap();
        writeln!(file, "concurrency = 2").unwrap();
        writeln!(file, "per_call_timeout_seconds = 60").unwrap();
        writeln!(file, "overall_timeout_seconds = 300").unwrap();
        drop(file);

        let (config, sources) = discover_from(dir.path(), &CliArgs::default()).unwrap();
        assert_eq!(config.base_dir, Utf8PathBuf::from("/tmp/from-file"));
        assert_eq!(config.executor.max_results_per_db, 50);
        assert_eq!(sources.get("base_dir"), Some(ConfigSource::File));

        let cli = CliArgs {
            base_dir: Some(Utf8PathBuf::from("/tmp/from-cli")),
            ..Default::default()
        };
        let (config, sources) = discover_from(dir.path(), &cli).unwrap();
        assert_eq!(config.base_dir, Utf8PathBuf::from("/tmp/from-cli"));
        assert_eq!(sources.get("base_dir"), Some(ConfigSource::Cli));
    }

    #[test]
    fn tolerates_crlf_line_endings_in_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".slr")).unwrap();
        std::fs::write(
            dir.path().join(".slr/config.toml"),
            "base_dir = \"/tmp/from-crlf\"\r\n[executor]\r\nconcurrency = 3\r\n",
        )
        .unwrap();

        let (config, _) = discover_from(dir.path(), &CliArgs::default()).unwrap();
        assert_eq!(config.base_dir, Utf8PathBuf::from("/tmp/from-crlf"));
        assert_eq!(config.executor.concurrency, 3);
    }

    #[test]
    fn finds_config_file_from_nested_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".slr")).unwrap();
        std::fs::write(dir.path().join(".slr/config.toml"), "base_dir = \"/tmp/x\"").unwrap();
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();

        let found = find_config_file(&nested).unwrap();
        assert_eq!(found, Utf8PathBuf::from_path_buf(dir.path().join(".slr/config.toml")).unwrap());
    }
}

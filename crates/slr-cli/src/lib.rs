//! Command-line interface for the SLR pipeline orchestrator.
//!
//! Thin by design: every subcommand parses its flags, builds a
//! [`slr_config::CliArgs`] override layer, resolves a [`slr_config::Config`],
//! constructs a [`slr_orchestrator::Controller`], and prints the result as
//! JSON. All decision-making (gating, persistence, dialect compilation,
//! provider fan-out) lives in the library crates; this crate only wires
//! `clap` to `Controller` and maps errors to exit codes.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use slr_artifact::ArtifactType;
use slr_config::{CliArgs as ConfigCliArgs, LlmProvider};
use slr_orchestrator::Controller;
use slr_utils::error::SlrError;
use slr_utils::exit_codes::ExitCode;
use slr_utils::types::ApprovalStatus;
use std::str::FromStr;

/// `slr` — a human-in-the-loop systematic-literature-review pipeline.
#[derive(Parser)]
#[command(name = "slr")]
#[command(about = "Turns a research idea into a reproducible SLR search strategy")]
#[command(long_about = r#"
slr is a deterministic, checkpoint-gated pipeline that carries a research idea
through problem framing, concept modeling, Boolean query synthesis, multi-
database search execution, deduplication, and protocol export. Every stage
produces a draft artifact; nothing downstream runs until a human approves it.

EXAMPLES:
  # Start a new project from a raw idea
  slr start-project "Impact of LLM hallucination mitigation techniques"

  # Inspect a project's current state
  slr get-project proj_a1b2c3d4

  # Run the next stage once its upstream artifacts are approved
  slr run-stage proj_a1b2c3d4 problem-framing

  # Approve a draft artifact, optionally editing fields first
  slr approve-artifact proj_a1b2c3d4 ProblemFraming --status approved

  # Inspect one artifact as JSON
  slr get-artifact proj_a1b2c3d4 DatabaseQueryPlan

CONFIGURATION:
  Resolved with precedence: CLI flags > .slr/config.toml (discovered by
  walking up from the working directory) > compiled-in defaults.
"#)]
#[command(version)]
pub struct Cli {
    /// Path to an explicit config file (skips discovery).
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Storage root for projects (default: .slr-data).
    #[arg(long, global = true)]
    pub base_dir: Option<Utf8PathBuf>,

    /// LLM drafter backend for text-artifact stages.
    #[arg(long, global = true, value_parser = ["openai", "mock", "deterministic"])]
    pub llm_provider: Option<String>,

    /// API key for the openai drafter backend.
    #[arg(long, global = true)]
    pub llm_api_key: Option<String>,

    /// Per-provider result cap for query-execution.
    #[arg(long, global = true)]
    pub max_results_per_db: Option<usize>,

    /// Parallel provider workers for query-execution.
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    /// Disable automatic deduplication after query-execution.
    #[arg(long, global = true)]
    pub no_dedup: bool,

    /// Emit structured debug logs instead of the compact default.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start a new project from a raw natural-language idea.
    StartProject {
        /// The research idea, as free text.
        idea: String,
    },
    /// Show a project's artifact statuses and current stage.
    GetProject { project_id: String },
    /// List every project under the storage root.
    ListProjects,
    /// Print one artifact's JSON, or 404 if absent.
    GetArtifact {
        project_id: String,
        /// e.g. ProjectContext, ProblemFraming, DatabaseQueryPlan.
        artifact_type: String,
    },
    /// Run a named stage; fails with `PreconditionFailed` if upstream
    /// artifacts aren't approved yet.
    RunStage {
        project_id: String,
        stage_name: String,
        /// Optional JSON blob of stage-specific inputs.
        #[arg(long)]
        inputs: Option<String>,
    },
    /// Approve (or otherwise transition) a draft artifact.
    ApproveArtifact {
        project_id: String,
        artifact_type: String,
        /// Optional JSON blob of field overrides, merged before saving.
        #[arg(long)]
        edits: Option<String>,
        /// Target status; defaults to `approved`.
        #[arg(long)]
        status: Option<String>,
        /// Free-text note attached to the artifact's model metadata.
        #[arg(long)]
        notes: Option<String>,
    },
    /// List the stages available to run next for a project.
    ListAvailableStages { project_id: String },
}

impl Cli {
    fn to_config_cli_args(&self) -> ConfigCliArgs {
        ConfigCliArgs {
            config_path: self.config.clone(),
            base_dir: self.base_dir.clone(),
            llm_provider: self.llm_provider.as_deref().map(|p| match p {
                "openai" => LlmProvider::Openai,
                "mock" => LlmProvider::Mock,
                _ => LlmProvider::Deterministic,
            }),
            llm_api_key: self.llm_api_key.clone(),
            max_results_per_db: self.max_results_per_db,
            concurrency: self.concurrency,
            dedup_enabled: if self.no_dedup { Some(false) } else { None },
        }
    }
}

/// Parses argv, resolves configuration, builds a `Controller`, and runs the
/// selected subcommand. Returns `Ok(())` after printing JSON output, or
/// `Err(ExitCode)` after printing the error — `main` only maps the code to
/// a process exit, it never prints.
pub async fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();
    run_parsed(cli).await
}

async fn run_parsed(cli: Cli) -> Result<(), ExitCode> {
    if let Err(e) = slr_utils::logging::init_tracing(cli.verbose) {
        eprintln!("warning: failed to initialize logging: {e}");
    }

    let config_cli_args = cli.to_config_cli_args();
    let (config, _sources) = slr_config::discover(&config_cli_args).map_err(|e| report(&e))?;

    let controller = Controller::new(config).map_err(|e| report(&e))?;

    let output = dispatch(&controller, cli.command).await.map_err(|e| report(&e))?;
    println!(
        "{}",
        serde_json::to_string_pretty(&output).expect("output always serializes")
    );
    Ok(())
}

async fn dispatch(
    controller: &Controller,
    command: Commands,
) -> slr_utils::error::Result<serde_json::Value> {
    match command {
        Commands::StartProject { idea } => {
            let (project_id, result) = controller.start_project(&idea).await?;
            Ok(serde_json::json!({
                "project_id": project_id,
                "stage_result": stage_result_json(&result),
            }))
        }
        Commands::GetProject { project_id } => {
            let summary = controller.get_project(&project_id)?;
            Ok(serde_json::json!({
                "id": summary.id,
                "title": summary.title,
                "current_stage": summary.current_stage,
                "artifacts": summary
                    .artifacts
                    .iter()
                    .map(|(ty, status)| (ty.as_str().to_string(), status.as_str()))
                    .collect::<std::collections::BTreeMap<_, _>>(),
                "created_at": summary.created_at,
                "updated_at": summary.updated_at,
            }))
        }
        Commands::ListProjects => {
            let projects = controller.list_projects()?;
            Ok(serde_json::Value::Array(
                projects
                    .into_iter()
                    .map(|summary| {
                        serde_json::json!({
                            "id": summary.id,
                            "title": summary.title,
                            "current_stage": summary.current_stage,
                            "updated_at": summary.updated_at,
                        })
                    })
                    .collect(),
            ))
        }
        Commands::GetArtifact { project_id, artifact_type } => {
            let artifact_type = parse_artifact_type(&artifact_type)?;
            controller.get_artifact(&project_id, artifact_type)
        }
        Commands::RunStage { project_id, stage_name, inputs } => {
            let inputs = inputs
                .map(|raw| serde_json::from_str(&raw))
                .transpose()
                .map_err(|e| SlrError::validation(format!("invalid --inputs JSON: {e}")))?;
            let result = controller.run_stage(&project_id, &stage_name, inputs).await?;
            Ok(stage_result_json(&result))
        }
        Commands::ApproveArtifact { project_id, artifact_type, edits, status, notes } => {
            let artifact_type = parse_artifact_type(&artifact_type)?;
            let edits = edits
                .map(|raw| serde_json::from_str(&raw))
                .transpose()
                .map_err(|e| SlrError::validation(format!("invalid --edits JSON: {e}")))?;
            let status = status
                .map(|s| ApprovalStatus::from_str(&s))
                .transpose()
                .map_err(|e| SlrError::validation(e.to_string()))?;
            let outcome =
                controller.approve_artifact(&project_id, artifact_type, edits, status, notes)?;
            Ok(serde_json::json!({
                "success": true,
                "next_available_stages": outcome.next_available_stages,
            }))
        }
        Commands::ListAvailableStages { project_id } => {
            let stages = controller.list_available_stages(&project_id)?;
            Ok(serde_json::json!(stages))
        }
    }
}

fn parse_artifact_type(raw: &str) -> slr_utils::error::Result<ArtifactType> {
    ArtifactType::from_str(raw).map_err(|e| SlrError::validation(e.to_string()))
}

fn stage_result_json(result: &slr_stage_api::StageResult) -> serde_json::Value {
    serde_json::json!({
        "stage_name": result.stage_name,
        "draft_artifact": result.draft_artifact.as_ref().map(slr_artifact::AnyArtifact::to_json),
        "extra_artifacts": result.extra_artifacts.iter().map(slr_artifact::AnyArtifact::to_json).collect::<Vec<_>>(),
        "metadata": result.metadata,
        "prompts": result.prompts,
        "warnings": result.warnings,
        "validation_errors": result.validation_errors,
    })
}

/// Prints a one-line error report the way every other surface of this
/// pipeline does, and maps the error to its exit code.
fn report(err: &SlrError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from_error(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_start_project_subcommand() {
        let cli = Cli::parse_from(["slr", "start-project", "a research idea"]);
        match cli.command {
            Commands::StartProject { idea } => assert_eq!(idea, "a research idea"),
            _ => panic!("wrong subcommand parsed"),
        }
    }

    #[test]
    fn parses_global_flags_before_subcommand() {
        let cli = Cli::parse_from([
            "slr",
            "--base-dir",
            "/tmp/data",
            "--llm-provider",
            "mock",
            "get-project",
            "proj-1",
        ]);
        assert_eq!(cli.base_dir, Some(Utf8PathBuf::from("/tmp/data")));
        assert_eq!(cli.llm_provider.as_deref(), Some("mock"));
    }

    #[tokio::test]
    async fn full_dispatch_round_trip_through_a_real_controller() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from([
            "slr",
            "--base-dir",
            dir.path().to_str().unwrap(),
            "--llm-provider",
            "mock",
            "start-project",
            "Impact of remote work on team communication",
        ]);
        run_parsed(cli).await.unwrap();

        let listing = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(listing, 1, "one project directory should have been created");
    }

    #[tokio::test]
    async fn get_artifact_on_an_unknown_project_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from([
            "slr",
            "--base-dir",
            dir.path().to_str().unwrap(),
            "get-artifact",
            "no-such-project",
            "ProjectContext",
        ]);
        let err = run_parsed(cli).await.unwrap_err();
        assert_eq!(err, ExitCode::NOT_FOUND);
    }
}

//! Logging and observability infrastructure for the pipeline.
//!
//! Structured logging via `tracing`, with a compact human format by default
//! and a verbose structured format (`project_id`, `stage`, `duration_ms`)
//! behind `--verbose` / `RUST_LOG`.

use std::io::IsTerminal;
use std::time::Instant;
use tracing::{Level, error, info, span};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Returns true only when stdout is a TTY and `NO_COLOR` is unset.
fn use_color() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` always takes precedence; otherwise `verbose` selects between
/// a compact default (`info,warn`) and a structured `debug` format that
/// includes span open/close events.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            if verbose {
                EnvFilter::try_new("slr=debug,info")
            } else {
                EnvFilter::try_new("slr=info,warn")
            }
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let ansi = use_color();

    if verbose {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(ansi)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_ansi(ansi).compact())
            .try_init()?;
    }

    Ok(())
}

/// Span covering one `RunStage` invocation.
#[must_use]
pub fn stage_span(project_id: &str, stage: &str) -> tracing::Span {
    span!(
        Level::INFO,
        "stage_execution",
        project_id = %project_id,
        stage = %stage,
    )
}

pub fn log_stage_start(project_id: &str, stage: &str) {
    info!(project_id = %project_id, stage = %stage, "starting stage");
}

pub fn log_stage_complete(project_id: &str, stage: &str, duration_ms: u128) {
    info!(project_id = %project_id, stage = %stage, duration_ms, "stage completed");
}

pub fn log_stage_error(project_id: &str, stage: &str, error_msg: &str, duration_ms: u128) {
    error!(project_id = %project_id, stage = %stage, duration_ms, error = %error_msg, "stage failed");
}

/// Timer for ad-hoc operation timing outside of a `#[tracing::instrument]`
/// span, e.g. wrapping a single provider call for the executor's
/// `execution_time_seconds` field.
pub struct Timer {
    start: Instant,
}

impl Timer {
    #[must_use]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    #[must_use]
    pub fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }

    #[must_use]
    pub fn elapsed_secs_f64(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_reports_nonzero_elapsed_after_work() {
        let t = Timer::start();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(t.elapsed_ms() >= 1);
    }
}

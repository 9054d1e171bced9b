// src/lib.rs

pub mod cli;
pub mod config;
pub mod driver;
pub mod errors;
pub mod groups;
pub mod logging;
pub mod metrics;
pub mod plan;
pub mod report;
pub mod sched;
pub mod types;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::groups::GroupExecutor;
use crate::metrics::Metrics;
use crate::plan::{ExecutionPlan, TaskFilter};
use crate::report::RunReport;
use crate::types::Mode;

/// Environment variable that overrides the plan's global mode (ignored when
/// empty, and superseded by `--mode`).
pub const MODE_ENV_VAR: &str = "PLANRUN_MODE";

/// How often the monitor emits a liveness line while tasks are running.
pub const MONITOR_INTERVAL: Duration = Duration::from_secs(3600);

/// Per-run wiring shared by the group executor, schedulers and drivers.
///
/// Constructed once at startup and passed explicitly; there is no
/// process-wide mutable state.
#[derive(Debug)]
pub struct RunContext {
    /// Directory holding per-task log files, partitioned one file per task
    /// name so concurrent writers never contend.
    pub log_dir: PathBuf,
    pub metrics: Arc<Metrics>,
    pub report: Arc<RunReport>,
}

impl RunContext {
    pub fn new(log_dir: PathBuf) -> Self {
        Self {
            log_dir,
            metrics: Arc::new(Metrics::new()),
            report: Arc::new(RunReport::new()),
        }
    }
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - plan loading and validation
/// - the task filter
/// - log-directory bootstrap
/// - the group executor under the liveness monitor
/// - the final metrics summary
///
/// Returns `Ok(true)` when every executed group passed. Configuration
/// problems surface as errors before any task runs.
pub async fn run(args: CliArgs) -> Result<bool> {
    let cfg = load_and_validate(&args.config)?;
    let filter = TaskFilter::parse(&args.tasks)?;
    let plan = ExecutionPlan::from_config(&cfg, &filter)?;

    let mode_override = resolve_mode_override(args.mode.as_deref())?;

    let working_dir = std::env::current_dir().context("resolving working directory")?;
    let log_dir = prepare_log_dir(&working_dir)?;
    let ctx = RunContext::new(log_dir);

    info!(
        config = %args.config,
        tasks = plan.task_count(),
        groups = plan.group_order.len(),
        "starting pre-merge validation"
    );

    let passed = run_and_monitor(&plan, mode_override, &ctx).await;

    // The summary table prints regardless of outcome.
    ctx.metrics.print_summary();

    if passed {
        info!("pre-merge validation passed");
    } else {
        error!("pre-merge validation failed");
    }

    Ok(passed)
}

/// Drive the group executor, waking at a fixed interval purely to emit a
/// liveness message for long console sessions. The heartbeat never affects
/// scheduling.
pub async fn run_and_monitor(
    plan: &ExecutionPlan,
    mode_override: Option<Mode>,
    ctx: &RunContext,
) -> bool {
    let executor = GroupExecutor::new(ctx);
    let run = executor.run_groups(plan, mode_override);
    tokio::pin!(run);

    let started = Instant::now();
    let mut heartbeat = tokio::time::interval(MONITOR_INTERVAL);
    // The first tick completes immediately; consume it so the heartbeat
    // fires one full interval from now.
    heartbeat.tick().await;

    loop {
        tokio::select! {
            passed = &mut run => break passed,
            _ = heartbeat.tick() => {
                let hours = started.elapsed().as_secs_f64() / 3600.0;
                info!(
                    "The tasks are still running. It has been running for about {hours:.1} hours."
                );
            }
        }
    }
}

/// Resolve the global mode override: CLI flag first, then a non-empty
/// `PLANRUN_MODE` environment variable.
pub fn resolve_mode_override(cli_mode: Option<&str>) -> Result<Option<Mode>> {
    let raw = match cli_mode {
        Some(m) => Some(m.to_string()),
        None => std::env::var(MODE_ENV_VAR).ok().filter(|v| !v.is_empty()),
    };

    match raw {
        Some(value) => Ok(Some(value.parse::<Mode>()?)),
        None => Ok(None),
    }
}

/// Create a fresh per-run log directory under the working directory,
/// removing any leftovers from a previous run.
pub fn prepare_log_dir(working_dir: &Path) -> Result<PathBuf> {
    let log_dir = working_dir.join(".planrun_log");

    if log_dir.exists() {
        std::fs::remove_dir_all(&log_dir)
            .with_context(|| format!("removing stale log dir {log_dir:?}"))?;
    }
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log dir {log_dir:?}"))?;

    Ok(log_dir)
}

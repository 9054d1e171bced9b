// src/config/model.rs

use serde::Deserialize;

use crate::types::{Mode, Strategy};

/// Minutes a task may run before it is force-terminated.
pub const DEFAULT_TASK_TIMEOUT_IN_MINUTES: u64 = 5;

/// Top-level plan as read from a YAML file, before semantic validation.
///
/// This is a direct mapping of the plan format:
///
/// ```yaml
/// mode: waitall
///
/// groups:
///   - Group: "Group 1"
///     Strategy: sequential
///   - Group: "Group 2"
///     Strategy: parallel
///     Mode: runalways
///
/// tasks:
///   - Name: Build
///     Command: make build
///     Group: "Group 1"
///     TimeoutInMinutes: 30
///     RunCommandOnTimeout: make clean
/// ```
///
/// Strategy and mode values are kept as strings here so that validation can
/// report them with the dedicated error variants. Use
/// [`PlanFile::try_from`] to obtain the validated, typed form.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlanFile {
    /// Global failure-propagation mode for the run.
    pub mode: String,

    /// Ordered list of group declarations. Order is significant: groups
    /// execute in this order.
    #[serde(default)]
    pub groups: Vec<RawGroupEntry>,

    /// All tasks, each referencing one of the declared groups.
    #[serde(default)]
    pub tasks: Vec<RawTaskEntry>,
}

/// One entry of the `groups` list.
#[derive(Debug, Clone, Deserialize)]
pub struct RawGroupEntry {
    #[serde(rename = "Group")]
    pub name: String,

    #[serde(rename = "Strategy")]
    pub strategy: String,

    /// Optional per-group mode override; falls back to the run's global mode.
    #[serde(rename = "Mode", default)]
    pub mode: Option<String>,
}

/// One entry of the `tasks` list.
///
/// `Name` and `Command` are required by the loader contract; they are
/// optional here only so that their absence can be reported as
/// `MissingTaskParameter` rather than a generic serde error.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTaskEntry {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,

    #[serde(rename = "Command", default)]
    pub command: Option<String>,

    #[serde(rename = "Group", default)]
    pub group: Option<String>,

    #[serde(rename = "TimeoutInMinutes", default)]
    pub timeout_in_minutes: Option<u64>,

    /// Optional command to run synchronously after a timeout fired and the
    /// task's process tree was terminated.
    #[serde(rename = "RunCommandOnTimeout", default)]
    pub run_command_on_timeout: Option<String>,
}

/// Validated plan file. Construct via `TryFrom<RawPlanFile>`.
#[derive(Debug, Clone)]
pub struct PlanFile {
    pub mode: Mode,
    pub groups: Vec<GroupEntry>,
    pub tasks: Vec<TaskEntry>,
}

impl PlanFile {
    /// Construct without re-running validation. Only `validate.rs` should
    /// call this, after all checks passed.
    pub(crate) fn new_unchecked(
        mode: Mode,
        groups: Vec<GroupEntry>,
        tasks: Vec<TaskEntry>,
    ) -> Self {
        Self {
            mode,
            groups,
            tasks,
        }
    }
}

/// Validated group declaration.
#[derive(Debug, Clone)]
pub struct GroupEntry {
    pub name: String,
    pub strategy: Strategy,
    pub mode: Option<Mode>,
}

/// Validated task declaration.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    pub name: String,
    pub command: String,
    pub group: String,
    pub timeout_in_minutes: u64,
    pub run_command_on_timeout: Option<String>,
}

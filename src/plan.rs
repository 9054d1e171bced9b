// src/plan.rs

//! Execution plan: the validated plan file joined with the task filter and
//! reshaped for the group executor.
//!
//! A [`TaskSpec`] is an immutable task definition. Results are never written
//! back into the plan; the driver produces a separate
//! [`crate::report::TaskResult`] joined by task id.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use regex::Regex;

use crate::config::model::PlanFile;
use crate::errors::{PlanrunError, Result};
use crate::report::TaskId;
use crate::types::{Mode, Strategy};

/// Task ids are unique for the lifetime of the process, regardless of how
/// many plans are built.
static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(0);

fn next_task_id() -> TaskId {
    NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed)
}

/// Immutable definition of one unit of work.
#[derive(Debug, Clone)]
pub struct TaskSpec {
    /// Monotonically assigned id, unique for the process lifetime.
    pub id: TaskId,
    pub name: String,
    pub command: String,
    pub group: String,
    pub timeout: Duration,
    pub run_command_on_timeout: Option<String>,
}

impl TaskSpec {
    /// Display name used in log lines, results and the metrics table.
    pub fn display_name(&self) -> String {
        format!("[{}] {}", self.id, self.name)
    }
}

/// A named bucket of tasks sharing a strategy and an optional mode override.
#[derive(Debug, Clone)]
pub struct GroupPlan {
    pub name: String,
    pub strategy: Strategy,
    pub mode: Option<Mode>,
    pub tasks: Vec<TaskSpec>,
}

/// The global mode, the group order and the group map.
///
/// Read-only after construction, except that callers (test harnesses in
/// particular) may override the global mode or individual task commands via
/// the public fields and [`ExecutionPlan::task_mut`].
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    pub mode: Mode,
    pub group_order: Vec<String>,
    pub groups: BTreeMap<String, GroupPlan>,
}

impl ExecutionPlan {
    /// Build the plan from a validated plan file, keeping only tasks that
    /// pass the filter. Task ids are assigned here.
    pub fn from_config(cfg: &PlanFile, filter: &TaskFilter) -> Result<Self> {
        let mut group_order = Vec::with_capacity(cfg.groups.len());
        let mut groups = BTreeMap::new();

        for group in &cfg.groups {
            group_order.push(group.name.clone());
            groups.insert(
                group.name.clone(),
                GroupPlan {
                    name: group.name.clone(),
                    strategy: group.strategy,
                    mode: group.mode,
                    tasks: Vec::new(),
                },
            );
        }

        for task in &cfg.tasks {
            if !filter.matches(&task.command) {
                continue;
            }

            // Validation guarantees the group exists; a missing entry here
            // would be a bug in the loader.
            let Some(group) = groups.get_mut(&task.group) else {
                return Err(PlanrunError::ConfigError(format!(
                    "task '{}' references undeclared group '{}'",
                    task.name, task.group
                )));
            };

            group.tasks.push(TaskSpec {
                id: next_task_id(),
                name: task.name.clone(),
                command: task.command.clone(),
                group: task.group.clone(),
                timeout: Duration::from_secs(task.timeout_in_minutes * 60),
                run_command_on_timeout: task.run_command_on_timeout.clone(),
            });
        }

        Ok(Self {
            mode: cfg.mode,
            group_order,
            groups,
        })
    }

    pub fn group(&self, name: &str) -> Option<&GroupPlan> {
        self.groups.get(name)
    }

    /// Mutable access to a task, keyed by group name and position.
    ///
    /// Supported override path for test harnesses that want to swap a task's
    /// command between runs of the same plan.
    pub fn task_mut(&mut self, group: &str, index: usize) -> Option<&mut TaskSpec> {
        self.groups.get_mut(group)?.tasks.get_mut(index)
    }

    /// Total number of tasks that survived filtering.
    pub fn task_count(&self) -> usize {
        self.groups.values().map(|g| g.tasks.len()).sum()
    }
}

/// Selects which tasks of the plan participate in a run.
///
/// The filter is a whitespace-separated list of regexes matched against the
/// full task command. The literal value `all` selects every task.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    patterns: Vec<Regex>,
}

impl TaskFilter {
    /// Filter that matches everything.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn parse(spec: &str) -> Result<Self> {
        let parts: Vec<&str> = spec.split_whitespace().collect();

        if parts.is_empty() || parts[0] == "all" {
            return Ok(Self::all());
        }

        let mut patterns = Vec::with_capacity(parts.len());
        for part in parts {
            // Anchor so each pattern must match the whole command.
            let anchored = format!("^(?:{part})$");
            let re = Regex::new(&anchored).map_err(|source| PlanrunError::InvalidTaskFilter {
                pattern: part.to_string(),
                source,
            })?;
            patterns.push(re);
        }

        Ok(Self { patterns })
    }

    pub fn matches(&self, command: &str) -> bool {
        if self.patterns.is_empty() {
            return true;
        }
        self.patterns.iter().any(|re| re.is_match(command))
    }
}

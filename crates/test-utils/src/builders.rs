#![allow(dead_code)]

use std::time::Duration;

use planrun::config::{PlanFile, RawGroupEntry, RawPlanFile, RawTaskEntry};
use planrun::plan::{ExecutionPlan, TaskFilter, TaskSpec};

/// Builder for a raw plan file, validated on `build`. Simplifies test setup
/// for group/mode scenarios.
pub struct PlanBuilder {
    raw: RawPlanFile,
}

impl PlanBuilder {
    pub fn new(mode: &str) -> Self {
        Self {
            raw: RawPlanFile {
                mode: mode.to_string(),
                groups: Vec::new(),
                tasks: Vec::new(),
            },
        }
    }

    pub fn group(self, name: &str, strategy: &str) -> Self {
        self.group_entry(name, strategy, None)
    }

    pub fn group_with_mode(self, name: &str, strategy: &str, mode: &str) -> Self {
        self.group_entry(name, strategy, Some(mode.to_string()))
    }

    fn group_entry(mut self, name: &str, strategy: &str, mode: Option<String>) -> Self {
        self.raw.groups.push(RawGroupEntry {
            name: name.to_string(),
            strategy: strategy.to_string(),
            mode,
        });
        self
    }

    pub fn task(mut self, name: &str, command: &str, group: &str) -> Self {
        self.raw.tasks.push(RawTaskEntry {
            name: Some(name.to_string()),
            command: Some(command.to_string()),
            group: Some(group.to_string()),
            timeout_in_minutes: None,
            run_command_on_timeout: None,
        });
        self
    }

    pub fn raw_task(mut self, task: RawTaskEntry) -> Self {
        self.raw.tasks.push(task);
        self
    }

    pub fn build_file(self) -> PlanFile {
        PlanFile::try_from(self.raw).expect("Failed to build valid plan from builder")
    }

    /// Validate and reshape into an `ExecutionPlan` with no task filter.
    pub fn build(self) -> ExecutionPlan {
        let file = self.build_file();
        ExecutionPlan::from_config(&file, &TaskFilter::all())
            .expect("Failed to build execution plan from builder")
    }
}

/// Builder for a standalone `TaskSpec`, for driving the task driver directly
/// (e.g. with sub-minute timeouts that the YAML model cannot express).
pub struct TaskSpecBuilder {
    spec: TaskSpec,
}

impl TaskSpecBuilder {
    pub fn new(id: u64, name: &str, command: &str) -> Self {
        Self {
            spec: TaskSpec {
                id,
                name: name.to_string(),
                command: command.to_string(),
                group: "test".to_string(),
                timeout: Duration::from_secs(5 * 60),
                run_command_on_timeout: None,
            },
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.spec.timeout = timeout;
        self
    }

    pub fn run_command_on_timeout(mut self, command: &str) -> Self {
        self.spec.run_command_on_timeout = Some(command.to_string());
        self
    }

    pub fn build(self) -> TaskSpec {
        self.spec
    }
}

// src/config/validate.rs

use std::collections::BTreeSet;

use crate::config::model::{
    DEFAULT_TASK_TIMEOUT_IN_MINUTES, GroupEntry, PlanFile, RawPlanFile, TaskEntry,
};
use crate::errors::{PlanrunError, Result};
use crate::types::Mode;

impl TryFrom<RawPlanFile> for PlanFile {
    type Error = PlanrunError;

    fn try_from(raw: RawPlanFile) -> std::result::Result<Self, Self::Error> {
        let mode: Mode = raw.mode.parse()?;

        let groups = validate_groups(&raw)?;
        let tasks = validate_tasks(&raw, &groups)?;

        Ok(PlanFile::new_unchecked(mode, groups, tasks))
    }
}

fn validate_groups(raw: &RawPlanFile) -> Result<Vec<GroupEntry>> {
    if raw.groups.is_empty() {
        return Err(PlanrunError::ConfigError(
            "plan must declare at least one group".to_string(),
        ));
    }

    let mut seen = BTreeSet::new();
    let mut groups = Vec::with_capacity(raw.groups.len());

    for group in &raw.groups {
        if !seen.insert(group.name.clone()) {
            return Err(PlanrunError::ConfigError(format!(
                "group '{}' is declared more than once",
                group.name
            )));
        }

        let strategy = group.strategy.parse()?;
        let mode = group.mode.as_deref().map(str::parse).transpose()?;

        groups.push(GroupEntry {
            name: group.name.clone(),
            strategy,
            mode,
        });
    }

    Ok(groups)
}

fn validate_tasks(raw: &RawPlanFile, groups: &[GroupEntry]) -> Result<Vec<TaskEntry>> {
    let mut tasks = Vec::with_capacity(raw.tasks.len());

    for task in &raw.tasks {
        let name = required_field(task.name.as_deref(), "Name")?;
        let command = required_field(task.command.as_deref(), "Command")?;
        let group = required_field(task.group.as_deref(), "Group")?;

        if !groups.iter().any(|g| g.name == group) {
            let valid = groups
                .iter()
                .map(|g| g.name.as_str())
                .collect::<Vec<_>>()
                .join(",");
            return Err(PlanrunError::UnknownGroup {
                group: group.to_string(),
                task: name.to_string(),
                valid,
            });
        }

        tasks.push(TaskEntry {
            name: name.to_string(),
            command: command.to_string(),
            group: group.to_string(),
            timeout_in_minutes: task
                .timeout_in_minutes
                .unwrap_or(DEFAULT_TASK_TIMEOUT_IN_MINUTES),
            run_command_on_timeout: task.run_command_on_timeout.clone(),
        });
    }

    Ok(tasks)
}

fn required_field<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(PlanrunError::MissingTaskParameter(field)),
    }
}

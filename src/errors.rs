// src/errors.rs

//! Crate-wide error type and `Result` alias.
//!
//! Configuration errors are fatal: they are raised before any task runs and
//! never recovered. Task execution errors never surface here; they become
//! `Fail` results and propagate as booleans.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanrunError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Strategy '{0}' not found in valid strategies. Valid values: sequential, parallel")]
    InvalidStrategy(String),

    #[error("Mode '{0}' not found in valid modes. Valid values: failfast, waitall, waitcurrent, runalways")]
    InvalidMode(String),

    #[error("Configuration error: '{0}' not provided for a task")]
    MissingTaskParameter(&'static str),

    #[error("Configuration error: invalid group '{group}' for task '{task}'. Valid values: {valid}")]
    UnknownGroup {
        group: String,
        task: String,
        valid: String,
    },

    #[error("Invalid task filter pattern '{pattern}': {source}")]
    InvalidTaskFilter {
        pattern: String,
        source: regex::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PlanrunError>;

// src/types.rs

use std::fmt;
use std::str::FromStr;

use crate::errors::PlanrunError;

/// How the tasks of a group are executed.
///
/// - `Sequential`: tasks run one after another, in plan order, inheriting
///   the console so their output is visible live.
/// - `Parallel`: tasks run concurrently on a bounded worker pool, each with
///   its own log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Sequential,
    Parallel,
}

impl FromStr for Strategy {
    type Err = PlanrunError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sequential" => Ok(Strategy::Sequential),
            "parallel" => Ok(Strategy::Parallel),
            other => Err(PlanrunError::InvalidStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Sequential => write!(f, "sequential"),
            Strategy::Parallel => write!(f, "parallel"),
        }
    }
}

/// Failure-propagation policy for a run or a single group.
///
/// - `WaitAll`: schedule everything, ignore failures until the end, then
///   report the aggregate.
/// - `WaitCurrent`: after a failure, let already-running tasks finish but
///   don't schedule new ones.
/// - `FailFast`: after a failure, stop scheduling and attempt to abort
///   in-flight work (best effort).
/// - `RunAlways`: group-level override; such a group executes even after an
///   earlier group aborted the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    WaitAll,
    WaitCurrent,
    FailFast,
    RunAlways,
}

impl FromStr for Mode {
    type Err = PlanrunError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "waitall" => Ok(Mode::WaitAll),
            "waitcurrent" => Ok(Mode::WaitCurrent),
            "failfast" => Ok(Mode::FailFast),
            "runalways" => Ok(Mode::RunAlways),
            other => Err(PlanrunError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::WaitAll => write!(f, "waitall"),
            Mode::WaitCurrent => write!(f, "waitcurrent"),
            Mode::FailFast => write!(f, "failfast"),
            Mode::RunAlways => write!(f, "runalways"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_round_trips_through_str() {
        for s in ["sequential", "parallel"] {
            let parsed: Strategy = s.parse().unwrap();
            assert_eq!(parsed.to_string(), s);
        }
    }

    #[test]
    fn mode_round_trips_through_str() {
        for s in ["waitall", "waitcurrent", "failfast", "runalways"] {
            let parsed: Mode = s.parse().unwrap();
            assert_eq!(parsed.to_string(), s);
        }
    }

    #[test]
    fn unknown_values_are_rejected() {
        assert!("eventually".parse::<Strategy>().is_err());
        assert!("bailout".parse::<Mode>().is_err());
    }
}

// tests/config_validation.rs

use std::error::Error;
use std::io::Write;

use planrun::config::{PlanFile, RawPlanFile, load_and_validate};
use planrun::errors::PlanrunError;
use planrun::types::{Mode, Strategy};

type TestResult = Result<(), Box<dyn Error>>;

fn parse_plan(yaml: &str) -> Result<PlanFile, PlanrunError> {
    let raw: RawPlanFile = serde_yaml::from_str(yaml).map_err(PlanrunError::from)?;
    PlanFile::try_from(raw)
}

const VALID_PLAN: &str = r#"
mode: waitall

groups:
  - Group: "Group 1"
    Strategy: sequential
  - Group: "Group 2"
    Strategy: parallel
    Mode: runalways

tasks:
  - Name: Task A
    Command: echo A
    Group: "Group 1"
  - Name: Task B
    Command: echo B
    Group: "Group 2"
    TimeoutInMinutes: 30
    RunCommandOnTimeout: echo cleanup
"#;

#[test]
fn valid_plan_parses_with_defaults() -> TestResult {
    let plan = parse_plan(VALID_PLAN)?;

    assert_eq!(plan.mode, Mode::WaitAll);
    assert_eq!(plan.groups.len(), 2);
    assert_eq!(plan.groups[0].strategy, Strategy::Sequential);
    assert_eq!(plan.groups[0].mode, None);
    assert_eq!(plan.groups[1].mode, Some(Mode::RunAlways));

    assert_eq!(plan.tasks[0].timeout_in_minutes, 5);
    assert_eq!(plan.tasks[1].timeout_in_minutes, 30);
    assert_eq!(
        plan.tasks[1].run_command_on_timeout.as_deref(),
        Some("echo cleanup")
    );

    Ok(())
}

#[test]
fn invalid_mode_is_rejected() {
    let err = parse_plan(
        r#"
mode: explode
groups:
  - Group: g
    Strategy: sequential
tasks: []
"#,
    )
    .unwrap_err();

    assert!(matches!(err, PlanrunError::InvalidMode(ref m) if m == "explode"));
}

#[test]
fn invalid_strategy_is_rejected() {
    let err = parse_plan(
        r#"
mode: waitall
groups:
  - Group: g
    Strategy: eventually
tasks: []
"#,
    )
    .unwrap_err();

    assert!(matches!(err, PlanrunError::InvalidStrategy(ref s) if s == "eventually"));
}

#[test]
fn invalid_group_mode_is_rejected() {
    let err = parse_plan(
        r#"
mode: waitall
groups:
  - Group: g
    Strategy: sequential
    Mode: sometimes
tasks: []
"#,
    )
    .unwrap_err();

    assert!(matches!(err, PlanrunError::InvalidMode(_)));
}

#[test]
fn missing_command_is_rejected() {
    let err = parse_plan(
        r#"
mode: waitall
groups:
  - Group: g
    Strategy: sequential
tasks:
  - Name: no command here
    Group: g
"#,
    )
    .unwrap_err();

    assert!(matches!(err, PlanrunError::MissingTaskParameter("Command")));
}

#[test]
fn missing_name_is_rejected() {
    let err = parse_plan(
        r#"
mode: waitall
groups:
  - Group: g
    Strategy: sequential
tasks:
  - Command: echo hello
    Group: g
"#,
    )
    .unwrap_err();

    assert!(matches!(err, PlanrunError::MissingTaskParameter("Name")));
}

#[test]
fn unknown_group_reference_is_rejected() {
    let err = parse_plan(
        r#"
mode: waitall
groups:
  - Group: g
    Strategy: sequential
tasks:
  - Name: t
    Command: echo hello
    Group: nowhere
"#,
    )
    .unwrap_err();

    match err {
        PlanrunError::UnknownGroup { group, task, valid } => {
            assert_eq!(group, "nowhere");
            assert_eq!(task, "t");
            assert_eq!(valid, "g");
        }
        other => panic!("expected UnknownGroup, got {other:?}"),
    }
}

#[test]
fn duplicate_groups_are_rejected() {
    let err = parse_plan(
        r#"
mode: waitall
groups:
  - Group: g
    Strategy: sequential
  - Group: g
    Strategy: parallel
tasks: []
"#,
    )
    .unwrap_err();

    assert!(matches!(err, PlanrunError::ConfigError(_)));
}

#[test]
fn plan_without_groups_is_rejected() {
    let err = parse_plan("mode: waitall\ngroups: []\ntasks: []\n").unwrap_err();
    assert!(matches!(err, PlanrunError::ConfigError(_)));
}

#[test]
fn load_and_validate_reads_from_disk() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("planrun.yaml");
    let mut file = std::fs::File::create(&path)?;
    file.write_all(VALID_PLAN.as_bytes())?;

    let plan = load_and_validate(&path)?;
    assert_eq!(plan.tasks.len(), 2);

    Ok(())
}

#[test]
fn load_from_missing_file_is_an_io_error() {
    let err = load_and_validate("/definitely/not/here.yaml").unwrap_err();
    assert!(matches!(err, PlanrunError::Io(_)));
}

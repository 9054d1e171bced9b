// tests/exec_groups_parallel.rs

//! Scenario matrix for parallel groups.
//!
//! Parallel completion order is unspecified, so these tests only assert
//! what the modes guarantee: which tasks have results at all, and the
//! overall boolean.

use std::error::Error;

use planrun::RunContext;
use planrun::groups::GroupExecutor;
use planrun::plan::ExecutionPlan;
use planrun::report::TaskStatus;
use planrun::sched::parallel::worker_pool_size;
use planrun::types::Mode;

use planrun_test_utils::builders::PlanBuilder;
use planrun_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

const GROUP1: &str = "Group 1";
const GROUP2: &str = "Group 2";

fn two_group_plan() -> ExecutionPlan {
    PlanBuilder::new("waitall")
        .group(GROUP1, "parallel")
        .group(GROUP2, "parallel")
        .task("Task A", "echo A", GROUP1)
        .task("Task B", "echo B", GROUP1)
        .task("Task C", "echo C", GROUP2)
        .build()
}

fn test_ctx() -> (tempfile::TempDir, RunContext) {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = RunContext::new(dir.path().to_path_buf());
    (dir, ctx)
}

fn task_id(plan: &ExecutionPlan, group: &str, index: usize) -> u64 {
    plan.groups[group].tasks[index].id
}

#[test]
fn pool_size_is_half_the_cpus_but_at_least_one() {
    let size = worker_pool_size();
    assert!(size >= 1);
    assert!(size <= num_cpus::get().max(1));
}

#[tokio::test]
async fn all_passing_parallel_tasks_yield_overall_pass() -> TestResult {
    init_tracing();
    let (_dir, ctx) = test_ctx();
    let plan = two_group_plan();

    let passed = with_timeout(GroupExecutor::new(&ctx).run_groups(&plan, None)).await;

    assert!(passed);
    for (group, index) in [(GROUP1, 0), (GROUP1, 1), (GROUP2, 0)] {
        assert_eq!(
            ctx.report.status_of(task_id(&plan, group, index)),
            Some(TaskStatus::Pass),
            "task {index} of {group}"
        );
    }

    Ok(())
}

#[tokio::test]
async fn waitall_schedules_every_parallel_task_despite_failure() -> TestResult {
    init_tracing();
    let (_dir, ctx) = test_ctx();
    let mut plan = two_group_plan();
    plan.task_mut(GROUP1, 0).expect("task exists").command = "exit 1".to_string();

    let passed = with_timeout(GroupExecutor::new(&ctx).run_groups(&plan, None)).await;

    assert!(!passed);
    assert_eq!(ctx.report.status_of(task_id(&plan, GROUP1, 0)), Some(TaskStatus::Fail));
    // waitall means the sibling and the next group still ran.
    assert_eq!(ctx.report.status_of(task_id(&plan, GROUP1, 1)), Some(TaskStatus::Pass));
    assert_eq!(ctx.report.status_of(task_id(&plan, GROUP2, 0)), Some(TaskStatus::Pass));

    Ok(())
}

#[tokio::test]
async fn failfast_aborts_following_groups() -> TestResult {
    init_tracing();
    let (_dir, ctx) = test_ctx();
    let mut plan = two_group_plan();
    plan.mode = Mode::FailFast;
    plan.task_mut(GROUP1, 0).expect("task exists").command = "exit 1".to_string();

    let passed = with_timeout(GroupExecutor::new(&ctx).run_groups(&plan, None)).await;

    assert!(!passed);
    assert_eq!(ctx.report.status_of(task_id(&plan, GROUP1, 0)), Some(TaskStatus::Fail));
    // The group after the aborted one never executed at all.
    assert!(ctx.report.result_for(task_id(&plan, GROUP2, 0)).is_none());

    Ok(())
}

#[tokio::test]
async fn waitcurrent_blocks_new_work_after_a_failure() -> TestResult {
    init_tracing();
    let (_dir, ctx) = test_ctx();

    // One failing task plus more tasks than the pool can run at once: tasks
    // dispatched after the failure signal must end up Skip, never Fail/Pass.
    let mut builder = PlanBuilder::new("waitcurrent")
        .group(GROUP1, "parallel")
        .group(GROUP2, "parallel")
        .task("bad task", "exit 1", GROUP1)
        .task("after group", "echo later", GROUP2);

    let trailing = worker_pool_size() * 2 + 2;
    for i in 0..trailing {
        builder = builder.task(&format!("trailing {i}"), "sleep 0.2", GROUP1);
    }
    let plan = builder.build();

    let passed = with_timeout(GroupExecutor::new(&ctx).run_groups(&plan, None)).await;

    assert!(!passed);
    assert_eq!(ctx.report.status_of(task_id(&plan, GROUP1, 0)), Some(TaskStatus::Fail));

    // Every trailing task has a result (waitcurrent never cancels), and at
    // least the ones dispatched after the signal were skipped.
    let mut skipped = 0;
    for i in 1..=trailing {
        match ctx.report.status_of(task_id(&plan, GROUP1, i)) {
            Some(TaskStatus::Skip) => skipped += 1,
            Some(_) => {}
            None => panic!("trailing task {i} has no result under waitcurrent"),
        }
    }
    assert!(skipped > 0, "expected at least one skipped task");

    // The next group aborted wholesale.
    assert!(ctx.report.result_for(task_id(&plan, GROUP2, 0)).is_none());

    Ok(())
}

#[tokio::test]
async fn failfast_never_passes_work_queued_after_a_failure() -> TestResult {
    init_tracing();
    let (_dir, ctx) = test_ctx();

    // One instantly failing task plus more sleepers than the pool can hold.
    // Under failfast the sleepers end up skipped (saw the ledger before
    // spawning) or aborted (no result at all); none may run to completion.
    let mut builder = PlanBuilder::new("failfast")
        .group(GROUP1, "parallel")
        .group(GROUP2, "parallel")
        .task("bad task", "exit 1", GROUP1)
        .task("after group", "echo later", GROUP2);

    let trailing = worker_pool_size() * 2 + 2;
    for i in 0..trailing {
        builder = builder.task(&format!("trailing {i}"), "sleep 0.3", GROUP1);
    }
    let plan = builder.build();

    let passed = with_timeout(GroupExecutor::new(&ctx).run_groups(&plan, None)).await;

    assert!(!passed);
    assert_eq!(ctx.report.status_of(task_id(&plan, GROUP1, 0)), Some(TaskStatus::Fail));

    for i in 1..=trailing {
        match ctx.report.status_of(task_id(&plan, GROUP1, i)) {
            Some(TaskStatus::Skip) | None => {}
            Some(status) => panic!("trailing task {i} finished as {status} under failfast"),
        }
    }

    // The next group aborted wholesale.
    assert!(ctx.report.result_for(task_id(&plan, GROUP2, 0)).is_none());

    Ok(())
}

#[tokio::test]
async fn runalways_parallel_group_executes_after_abort() -> TestResult {
    init_tracing();
    let (_dir, ctx) = test_ctx();

    let plan = PlanBuilder::new("failfast")
        .group("gate", "parallel")
        .group("skipped", "parallel")
        .group_with_mode("cleanup", "parallel", "runalways")
        .task("gate task", "exit 1", "gate")
        .task("skipped task", "echo skipped", "skipped")
        .task("cleanup task", "echo cleanup", "cleanup")
        .build();

    let passed = with_timeout(GroupExecutor::new(&ctx).run_groups(&plan, None)).await;

    assert!(!passed);
    assert!(ctx.report.result_for(task_id(&plan, "skipped", 0)).is_none());
    assert_eq!(
        ctx.report.status_of(task_id(&plan, "cleanup", 0)),
        Some(TaskStatus::Pass)
    );

    Ok(())
}

#[tokio::test]
async fn mixed_strategies_share_one_report() -> TestResult {
    init_tracing();
    let (_dir, ctx) = test_ctx();

    let plan = PlanBuilder::new("waitall")
        .group("build", "sequential")
        .group("checks", "parallel")
        .task("compile", "echo compiling", "build")
        .task("lint", "echo linting", "checks")
        .task("unit tests", "echo testing", "checks")
        .build();

    let passed = with_timeout(GroupExecutor::new(&ctx).run_groups(&plan, None)).await;

    assert!(passed);
    assert_eq!(ctx.report.len(), 3);
    assert_eq!(ctx.metrics.len(), 3);

    Ok(())
}

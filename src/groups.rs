// src/groups.rs

//! Group executor: iterates the plan's groups in order and applies the
//! cross-group continuation policy.
//!
//! States: running at some group index, aborted at an index, or completed.
//! A group result of false under an effective mode other than `waitall`
//! aborts normal iteration. A second pass then executes every remaining,
//! unexecuted group whose own mode is explicitly `runalways`; all other
//! remaining groups never execute and their tasks keep no result.

use tracing::{info, warn};

use crate::RunContext;
use crate::plan::ExecutionPlan;
use crate::sched::run_group;
use crate::types::Mode;

pub struct GroupExecutor<'a> {
    ctx: &'a RunContext,
}

impl<'a> GroupExecutor<'a> {
    pub fn new(ctx: &'a RunContext) -> Self {
        Self { ctx }
    }

    /// Execute the plan's groups in order and return the overall result.
    ///
    /// `mode_override` takes precedence over the plan's global mode; per
    /// group, an explicit group mode takes precedence over both.
    pub async fn run_groups(&self, plan: &ExecutionPlan, mode_override: Option<Mode>) -> bool {
        let global_mode = mode_override.unwrap_or(plan.mode);
        info!(mode = %global_mode, "starting validation run");

        let mut overall_pass = true;
        // Index right after the aborting group; groups before it already ran.
        let mut resume_from = plan.group_order.len();

        for (index, name) in plan.group_order.iter().enumerate() {
            let Some(group) = plan.group(name) else {
                warn!(group = %name, "group in order list has no definition; skipping");
                continue;
            };

            let mode = group.mode.unwrap_or(global_mode);
            info!(group = %name, strategy = %group.strategy, mode = %mode, "executing group");

            let result = run_group(group, mode, self.ctx).await;
            overall_pass = overall_pass && result;

            if !result && mode != Mode::WaitAll {
                warn!(group = %name, "group failed; aborting remaining groups");
                resume_from = index + 1;
                break;
            }
        }

        // Second pass: remaining unexecuted groups run only when their own
        // mode says runalways.
        for name in plan.group_order.iter().skip(resume_from) {
            let Some(group) = plan.group(name) else {
                continue;
            };

            if group.mode == Some(Mode::RunAlways) {
                info!(group = %name, "executing runalways group after abort");
                let result = run_group(group, Mode::RunAlways, self.ctx).await;
                overall_pass = overall_pass && result;
            }
        }

        overall_pass
    }
}

// src/driver/proc_tree.rs

//! Best-effort termination of a task's descendant processes.
//!
//! Shell commands routinely fork; when a task times out, killing only the
//! shell would leave its children running. This module enumerates the
//! descendant tree and force-kills whatever is still runnable or sleeping.
//! Races with exiting processes are tolerated, never retried, and never
//! surface as errors: callers must not assume cleanup is guaranteed.

use sysinfo::{Pid, ProcessStatus, System};
use tracing::{debug, warn};

/// Kill every descendant of `root_pid` (recursively) that is still in a
/// runnable or sleeping state. The root process itself is left to the
/// caller; the current process is never targeted.
///
/// Returns the number of processes a kill signal was delivered to.
pub fn kill_process_tree(root_pid: u32) -> usize {
    if root_pid == std::process::id() {
        warn!(pid = root_pid, "refusing to kill our own process tree");
        return 0;
    }

    let sys = System::new_all();
    let mut descendants = Vec::new();
    collect_descendants(&sys, Pid::from_u32(root_pid), &mut descendants);

    let mut killed = 0;
    for pid in descendants {
        // A process may have exited between enumeration and now.
        let Some(process) = sys.process(pid) else {
            continue;
        };

        match process.status() {
            ProcessStatus::Run | ProcessStatus::Sleep => {
                if process.kill() {
                    debug!(pid = pid.as_u32(), name = process.name(), "killed descendant process");
                    killed += 1;
                } else {
                    debug!(
                        pid = pid.as_u32(),
                        "descendant process could not be killed (likely already exited)"
                    );
                }
            }
            status => {
                debug!(pid = pid.as_u32(), ?status, "descendant not runnable; leaving it alone");
            }
        }
    }

    killed
}

fn collect_descendants(sys: &System, parent: Pid, out: &mut Vec<Pid>) {
    for (pid, process) in sys.processes() {
        if process.parent() == Some(parent) {
            out.push(*pid);
            collect_descendants(sys, *pid, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_targets_own_process() {
        assert_eq!(kill_process_tree(std::process::id()), 0);
    }

    #[test]
    fn tolerates_nonexistent_pid() {
        // Nothing should be parented to a pid that (almost certainly)
        // doesn't exist; the call must still return cleanly.
        assert_eq!(kill_process_tree(u32::MAX - 1), 0);
    }
}

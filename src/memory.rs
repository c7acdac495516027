//! Coarse memory sampling around the Generator subprocess.
//!
//! The sampler reads the harness's own resident set before and after the
//! child runs. The delta captures harness-side allocations made while the
//! subprocess executed, not the child's RSS; it is a signal, not a strict
//! benchmark metric. The reported value is always populated and never
//! negative.

use sysinfo::{Pid, ProcessesToUpdate, System};

/// Samples the current process's resident memory.
pub struct MemorySampler {
    system: System,
    pid: Pid,
}

impl MemorySampler {
    /// Create a sampler for the current process, or `None` when the pid
    /// cannot be determined (the delta is then reported as zero).
    #[must_use]
    pub fn new() -> Option<Self> {
        let pid = sysinfo::get_current_pid().ok()?;
        Some(Self {
            system: System::new(),
            pid,
        })
    }

    /// Resident set size in bytes, 0 if the process cannot be read.
    pub fn sample(&mut self) -> u64 {
        self.system
            .refresh_processes(ProcessesToUpdate::Some(&[self.pid]), true);
        self.system.process(self.pid).map_or(0, |p| p.memory())
    }
}

/// Clamped before/after delta in bytes.
#[must_use]
pub fn delta(before: u64, after: u64) -> u64 {
    after.saturating_sub(before)
}

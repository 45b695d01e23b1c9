//! Per-unit sequencing state.
//!
//! Holds everything the controller advances once per step: the program
//! counter, the delayed branch, the end-of-program countdown, the
//! informational and debug bits, and the cycle counter.

use serde::{Deserialize, Serialize};

/// Program counter, branch, flag-bit and cycle state of one unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineState {
    /// Address of the next micro-word to fetch.
    pub pc: u32,
    /// Address following the micro-word being executed.
    pub tpc: u32,
    /// Steps until the pending branch takes effect; 0 when none is pending.
    pub branch: u8,
    /// Target of the pending branch.
    pub branch_target: u32,
    /// Steps left of the end-of-program countdown; 0 when not counting.
    pub ebit: u8,
    /// An M bit was seen and not yet taken.
    pub mbit: bool,
    /// A D bit raised a debug break.
    pub dbit: bool,
    /// A T bit raised a debug halt.
    pub tbit: bool,
    /// A program is running.
    pub busy: bool,
    /// Cycles elapsed, stalls included.
    pub cycle: u64,
}

impl PipelineState {
    /// Creates an idle state at address 0.
    pub const fn new() -> Self {
        Self {
            pc: 0,
            tpc: 0,
            branch: 0,
            branch_target: 0,
            ebit: 0,
            mbit: false,
            dbit: false,
            tbit: false,
            busy: false,
            cycle: 0,
        }
    }

    /// Schedules a branch to `target` after the delay slot.
    ///
    /// The branch takes effect at the fetch following the next one, so the
    /// micro-word after the branch (the delay slot) still executes.
    pub const fn schedule_branch(&mut self, target: u32) {
        self.branch = 1;
        self.branch_target = target;
    }

    /// Counts down a pending branch at fetch time.
    ///
    /// # Returns
    ///
    /// The branch target when the branch is due at this fetch.
    pub const fn take_due_branch(&mut self) -> Option<u32> {
        if self.branch == 0 {
            return None;
        }
        self.branch -= 1;
        if self.branch == 0 {
            Some(self.branch_target)
        } else {
            None
        }
    }

    /// Returns `true` while the end-of-program countdown runs.
    pub const fn completing(&self) -> bool {
        self.ebit > 0
    }
}

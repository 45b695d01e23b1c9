//! Dual-issue hazard resolution.
//!
//! Both halves of a micro-word issue in the same cycle, but the simulator runs
//! the upper instruction first and the lower one second. This module keeps the
//! pair behaving as if it were simultaneous:
//! 1. **Write/write:** When both halves write the same vector register, the upper
//!    result wins and the lower instruction is discarded entirely.
//! 2. **Write/read:** When the lower half reads a vector register the upper half
//!    writes, the lower half runs against the value from before the upper half.
//! 3. **Clip flag:** The same two rules apply to the clip flag, which `CLIP`
//!    writes directly.
//!
//! The read case is implemented by explicit value capture: `Bypass` copies the
//! register before the upper half, swaps it in after, and swaps the upper
//! result back once the lower half is done.

use crate::common::reg::{RegisterFile, Special};
use crate::core::analyzer::Usage;
use crate::core::arch::vf::{Lanes, Vector};

/// How the two halves of one micro-word are to be run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IssuePlan {
    /// The lower word is an immediate, not an instruction.
    pub skip_lower: bool,
    /// The lower instruction is suppressed by a write/write conflict.
    pub discard_lower: bool,
    /// Vector register the lower instruction must read pre-upper.
    pub snapshot_vf: Option<u8>,
    /// The lower instruction must read the pre-upper clip flag.
    pub snapshot_clip: bool,
}

impl IssuePlan {
    /// Returns `true` if the lower instruction executes.
    pub const fn runs_lower(&self) -> bool {
        !self.skip_lower && !self.discard_lower
    }
}

/// Decides how to issue one micro-word.
///
/// # Arguments
///
/// * `upper` - Usage of the upper instruction.
/// * `lower` - Usage of the lower instruction; ignored when `immediate` is set.
/// * `immediate` - The micro-word's I bit.
///
/// # Returns
///
/// The issue plan. A discard supersedes any snapshot.
pub fn resolve(upper: &Usage, lower: &Usage, immediate: bool) -> IssuePlan {
    let mut plan = IssuePlan::default();
    if immediate {
        plan.skip_lower = true;
        return plan;
    }

    if let Some(reg) = upper.vf_write {
        if lower.writes_vf(reg) {
            plan.discard_lower = true;
            return plan;
        }
        if lower.reads_vf(reg) {
            plan.snapshot_vf = Some(reg);
        }
    }

    if upper.writes_special(Special::Clip) {
        if lower.writes_special(Special::Clip) {
            return IssuePlan {
                discard_lower: true,
                ..IssuePlan::default()
            };
        }
        if lower.reads_special(Special::Clip) {
            plan.snapshot_clip = true;
        }
    }
    plan
}

/// Values swapped around the lower instruction of a write/read hazard.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bypass {
    vf: Option<(usize, Vector)>,
    clip: Option<u32>,
}

impl Bypass {
    /// Captures the pre-upper values `plan` asks for. Call before the upper half.
    pub fn capture(plan: &IssuePlan, regs: &RegisterFile) -> Self {
        Self {
            vf: plan.snapshot_vf.map(|r| {
                let r = usize::from(r);
                (r, regs.vf(r))
            }),
            clip: plan
                .snapshot_clip
                .then(|| regs.special(Special::Clip)),
        }
    }

    /// Exchanges the captured values with the registers' current contents.
    ///
    /// Called once after the upper half, which puts the pre-upper values in
    /// place, and once after the lower half, which puts the upper results back.
    pub fn swap(&mut self, regs: &mut RegisterFile) {
        if let Some((reg, saved)) = self.vf.as_mut() {
            let current = regs.vf(*reg);
            regs.set_vf(*reg, Lanes::ALL, *saved);
            *saved = current;
        }
        if let Some(saved) = self.clip.as_mut() {
            let current = regs.special(Special::Clip);
            regs.set_special(Special::Clip, *saved);
            *saved = current;
        }
    }

    /// Returns `true` if nothing was captured.
    pub const fn is_empty(&self) -> bool {
        self.vf.is_none() && self.clip.is_none()
    }
}

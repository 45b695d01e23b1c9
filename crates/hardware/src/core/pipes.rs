//! Functional unit result pipes.
//!
//! Results of the FMAC, divide and elementary function units become visible a
//! fixed number of cycles after issue. This module tracks in-flight results:
//! 1. **FMAC:** Up to `FMAC_DEPTH` entries, each naming the vector lanes or the
//!    clip flag it writes and carrying the MAC, status and clip flags it makes
//!    visible on retirement.
//! 2. **Divide:** One Q result with its status flag.
//! 3. **Elementary functions:** One P result.
//!
//! A read of a pending register stalls the unit until the entry retires. Stalls
//! are charged to the cycle counter passed in by the controller.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::constants::{FMAC_DEPTH, FMAC_LATENCY};
use crate::common::reg::{RegisterFile, Special};
use crate::core::analyzer::Usage;
use crate::core::arch::vf::Lanes;
use crate::isa::dispatch::Pipe;

/// Destination of an FMAC pipe entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FmacTarget {
    /// Flags only.
    #[default]
    None,
    /// Lanes of a vector register.
    Vf {
        /// Register index.
        reg: u8,
        /// Lanes written.
        lanes: Lanes,
    },
    /// The clip flag.
    Clip,
}

/// An in-flight FMAC result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FmacEntry {
    /// What the entry writes.
    pub target: FmacTarget,
    /// Issue cycle.
    pub start: u64,
    /// Cycles until visible.
    pub latency: u64,
    /// MAC flag made visible on retirement.
    pub mac: u32,
    /// Status flag made visible on retirement.
    pub status: u32,
    /// Clip flag made visible on retirement.
    pub clip: u32,
}

impl FmacEntry {
    const fn expired(&self, now: u64) -> bool {
        now.saturating_sub(self.start) >= self.latency
    }

    const fn retire(&self, regs: &mut RegisterFile) {
        regs.set_special(Special::Mac, self.mac);
        regs.set_special(Special::Status, self.status);
        regs.set_special(Special::Clip, self.clip);
    }

    const fn blocks(&self, reg: u8, lanes: Lanes) -> bool {
        match self.target {
            FmacTarget::Vf { reg: r, lanes: l } => r == reg && l.intersects(lanes),
            _ => false,
        }
    }
}

/// An in-flight divide unit result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FdivEntry {
    /// Issue cycle.
    pub start: u64,
    /// Cycles until visible.
    pub latency: u64,
    /// Q value.
    pub q: u32,
    /// Status flag made visible with Q.
    pub status: u32,
}

/// An in-flight elementary function result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EfuEntry {
    /// Issue cycle.
    pub start: u64,
    /// Cycles until visible.
    pub latency: u64,
    /// P value.
    pub p: u32,
}

/// All in-flight results of one unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipes {
    fmac: Vec<FmacEntry>,
    fdiv: Option<FdivEntry>,
    efu: Option<EfuEntry>,
}

impl Pipes {
    /// Creates empty pipes.
    pub const fn new() -> Self {
        Self {
            fmac: Vec::new(),
            fdiv: None,
            efu: None,
        }
    }

    /// In-flight FMAC entries, oldest first.
    pub fn fmac(&self) -> &[FmacEntry] {
        &self.fmac
    }

    /// The in-flight divide result.
    pub const fn fdiv(&self) -> Option<&FdivEntry> {
        self.fdiv.as_ref()
    }

    /// The in-flight elementary function result.
    pub const fn efu(&self) -> Option<&EfuEntry> {
        self.efu.as_ref()
    }

    /// Returns `true` if nothing is in flight.
    pub fn is_empty(&self) -> bool {
        self.fmac.is_empty() && self.fdiv.is_none() && self.efu.is_none()
    }

    /// Drops every in-flight result without making it visible.
    pub fn clear(&mut self) {
        self.fmac.clear();
        self.fdiv = None;
        self.efu = None;
    }

    /// Makes every result whose latency has elapsed at `now` visible.
    pub fn retire_expired(&mut self, regs: &mut RegisterFile, now: u64) {
        self.fmac.retain(|e| {
            if e.expired(now) {
                e.retire(regs);
                false
            } else {
                true
            }
        });
        if let Some(e) = self.fdiv.take_if(|e| now.saturating_sub(e.start) >= e.latency) {
            regs.set_special(Special::Q, e.q);
            regs.set_special(Special::Status, e.status);
        }
        if let Some(e) = self.efu.take_if(|e| now.saturating_sub(e.start) >= e.latency) {
            regs.set_special(Special::P, e.p);
        }
    }

    /// Stalls until the FMAC entry writing `lanes` of `reg` retires, if any.
    fn wait_fmac(&mut self, regs: &mut RegisterFile, reg: u8, lanes: Lanes, cycle: &mut u64) -> u64 {
        let Some(i) = self.fmac.iter().position(|e| e.blocks(reg, lanes)) else {
            return 0;
        };
        let e = self.fmac[i];
        let elapsed = cycle.saturating_sub(e.start);
        let stall = e.latency.saturating_sub(elapsed) + 1;
        // Entries retire in issue order so flags never step backwards.
        for older in self.fmac.drain(..=i) {
            older.retire(regs);
        }
        debug!(reg, stall, "fmac stall");
        *cycle += stall;
        self.retire_expired(regs, *cycle);
        stall
    }

    fn wait_reads(&mut self, usage: &Usage, regs: &mut RegisterFile, cycle: &mut u64) -> u64 {
        let mut stall = 0;
        for (reg, lanes) in usage.vf_read.iter().zip(usage.vf_read_lanes) {
            if let Some(reg) = *reg {
                stall += self.wait_fmac(regs, reg, lanes, cycle);
            }
        }
        stall
    }

    fn wait_fdiv(&mut self, regs: &mut RegisterFile, cycle: &mut u64) -> u64 {
        let Some(e) = self.fdiv.take() else {
            return 0;
        };
        let stall = e.latency.saturating_sub(cycle.saturating_sub(e.start));
        if stall > 0 {
            debug!(stall, "fdiv stall");
        }
        *cycle += stall;
        regs.set_special(Special::Q, e.q);
        regs.set_special(Special::Status, e.status);
        stall
    }

    fn wait_efu(&mut self, regs: &mut RegisterFile, cycle: &mut u64) -> u64 {
        let Some(e) = self.efu.take() else {
            return 0;
        };
        let stall = e.latency.saturating_sub(cycle.saturating_sub(e.start));
        if stall > 0 {
            debug!(stall, "efu stall");
        }
        *cycle += stall;
        regs.set_special(Special::P, e.p);
        stall
    }

    /// Applies the stalls an upper instruction incurs before it can run.
    ///
    /// # Returns
    ///
    /// The number of cycles stalled.
    pub fn test_upper(&mut self, usage: &Usage, regs: &mut RegisterFile, cycle: &mut u64) -> u64 {
        match usage.pipe {
            Pipe::Fmac => self.wait_reads(usage, regs, cycle),
            _ => 0,
        }
    }

    /// Applies the stalls a lower instruction incurs before it can run.
    ///
    /// FMAC-class instructions wait for their vector operands. Divide and
    /// elementary function instructions wait for the unit's previous result.
    pub fn test_lower(&mut self, usage: &Usage, regs: &mut RegisterFile, cycle: &mut u64) -> u64 {
        match usage.pipe {
            Pipe::Fmac => self.wait_reads(usage, regs, cycle),
            Pipe::Fdiv => self.wait_fdiv(regs, cycle),
            Pipe::Efu => self.wait_efu(regs, cycle),
            _ => 0,
        }
    }

    fn push_fmac(&mut self, usage: &Usage, regs: &mut RegisterFile, now: u64, timed: bool) {
        let target = match usage.vf_write {
            Some(reg) => FmacTarget::Vf {
                reg,
                lanes: usage.vf_write_lanes,
            },
            None if usage.writes_special(Special::Clip) => FmacTarget::Clip,
            None => FmacTarget::None,
        };
        let pending = *regs.pending();
        if target == FmacTarget::Clip {
            // The new clip is already visible; older entries must not restore theirs.
            for e in &mut self.fmac {
                e.clip = pending.clip;
            }
        }
        if self.fmac.len() >= FMAC_DEPTH {
            let oldest = self.fmac.remove(0);
            oldest.retire(regs);
        }
        self.fmac.push(FmacEntry {
            target,
            start: now,
            latency: if timed { FMAC_LATENCY } else { 0 },
            mac: pending.mac,
            status: pending.status,
            clip: pending.clip,
        });
    }

    /// Enters the results of an executed upper instruction.
    ///
    /// # Arguments
    ///
    /// * `usage` - The instruction's usage.
    /// * `regs` - Register file holding the pending latches the instruction set.
    /// * `now` - Current cycle.
    /// * `timed` - `false` makes results visible at the next retirement.
    pub fn add_upper(&mut self, usage: &Usage, regs: &mut RegisterFile, now: u64, timed: bool) {
        if usage.pipe == Pipe::Fmac {
            self.push_fmac(usage, regs, now, timed);
        }
    }

    /// Enters the results of an executed lower instruction.
    pub fn add_lower(&mut self, usage: &Usage, regs: &mut RegisterFile, now: u64, timed: bool) {
        let latency = if timed { u64::from(usage.cycles) } else { 0 };
        match usage.pipe {
            Pipe::Fmac => self.push_fmac(usage, regs, now, timed),
            Pipe::Fdiv if usage.writes_special(Special::Q) => {
                let pending = regs.pending();
                self.fdiv = Some(FdivEntry {
                    start: now,
                    latency,
                    q: pending.q,
                    status: pending.status,
                });
            }
            Pipe::Efu if usage.writes_special(Special::P) => {
                self.efu = Some(EfuEntry {
                    start: now,
                    latency,
                    p: regs.pending().p,
                });
            }
            _ => {}
        }
    }

    /// Retires everything in flight, one cycle at a time.
    ///
    /// Advances `cycle` at least once, even when nothing is pending.
    pub fn flush_all(&mut self, regs: &mut RegisterFile, cycle: &mut u64) {
        loop {
            let pending = !self.is_empty();
            self.retire_expired(regs, *cycle);
            *cycle += 1;
            if !pending {
                break;
            }
        }
    }
}

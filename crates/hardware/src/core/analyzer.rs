//! Register usage analysis.
//!
//! Runs an instruction's handler against a `Recorder` instead of the executing
//! core. The recorder performs no effects; it notes every register the handler
//! touches and returns neutral values. The result is the instruction's `Usage`,
//! which the hazard resolver and the stall pipes consume.
//!
//! `vf00` and `vi00` writes are never recorded since they have no effect, and
//! `vf00` reads are never recorded since `vf00` is never pending.

use crate::common::constants::REG_ACC;
use crate::common::reg::Special;
use crate::core::arch::vf::{Lanes, Vector};
use crate::isa::access::Access;
use crate::isa::dispatch::{self, Handler, LOWER, Pipe, Table, UPPER};

/// Registers an instruction reads and writes, and the unit it issues to.
///
/// The integer masks use bits 0-15 for `vi00`-`vi15` and the ids in
/// `common::constants` (`REG_STATUS_FLAG` ... `REG_ACC`) for the special
/// registers and the accumulator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Usage {
    /// Functional unit.
    pub pipe: Pipe,
    /// Vector register written, if any.
    pub vf_write: Option<u8>,
    /// Lanes of `vf_write` written.
    pub vf_write_lanes: Lanes,
    /// Up to two distinct vector registers read.
    pub vf_read: [Option<u8>; 2],
    /// Lanes read of each `vf_read` entry.
    pub vf_read_lanes: [Lanes; 2],
    /// Integer and special registers read.
    pub vi_read: u32,
    /// Integer and special registers written.
    pub vi_write: u32,
    /// Divide or elementary function latency.
    pub cycles: u8,
}

impl Usage {
    /// Usage of an instruction that touches nothing.
    pub const EMPTY: Self = Self {
        pipe: Pipe::None,
        vf_write: None,
        vf_write_lanes: Lanes::NONE,
        vf_read: [None; 2],
        vf_read_lanes: [Lanes::NONE; 2],
        vi_read: 0,
        vi_write: 0,
        cycles: 0,
    };

    /// Returns `true` if vector register `reg` is written.
    pub fn writes_vf(&self, reg: u8) -> bool {
        self.vf_write == Some(reg)
    }

    /// Returns `true` if vector register `reg` is read.
    pub fn reads_vf(&self, reg: u8) -> bool {
        self.vf_read.contains(&Some(reg))
    }

    /// Lanes of `reg` read, empty if it is not read.
    pub fn read_lanes(&self, reg: u8) -> Lanes {
        self.vf_read
            .iter()
            .zip(self.vf_read_lanes)
            .filter(|(r, _)| **r == Some(reg))
            .fold(Lanes::NONE, |acc, (_, lanes)| acc.union(lanes))
    }

    /// Returns `true` if integer register `reg` is read.
    pub const fn reads_vi(&self, reg: usize) -> bool {
        self.vi_read & (1 << reg) != 0
    }

    /// Returns `true` if integer register `reg` is written.
    pub const fn writes_vi(&self, reg: usize) -> bool {
        self.vi_write & (1 << reg) != 0
    }

    /// Returns `true` if special register `reg` is read.
    pub const fn reads_special(&self, reg: Special) -> bool {
        self.vi_read & reg.bit() != 0
    }

    /// Returns `true` if special register `reg` is written.
    pub const fn writes_special(&self, reg: Special) -> bool {
        self.vi_write & reg.bit() != 0
    }

    /// Returns `true` if the accumulator is written.
    pub const fn writes_acc(&self) -> bool {
        self.vi_write & (1 << REG_ACC) != 0
    }
}

/// Analysis-mode handler context.
#[derive(Debug, Default)]
pub struct Recorder {
    usage: Usage,
}

impl Recorder {
    /// Creates a recorder with nothing recorded.
    pub const fn new() -> Self {
        Self {
            usage: Usage::EMPTY,
        }
    }

    /// Everything recorded so far.
    pub const fn usage(&self) -> &Usage {
        &self.usage
    }

    fn read_vf(&mut self, reg: usize, lanes: Lanes) {
        if reg == 0 {
            return;
        }
        let reg = reg as u8;
        let u = &mut self.usage;
        if let Some(i) = u.vf_read.iter().position(|r| *r == Some(reg)) {
            u.vf_read_lanes[i] = u.vf_read_lanes[i].union(lanes);
            return;
        }
        let free = u.vf_read.iter().position(Option::is_none);
        debug_assert!(free.is_some(), "more than two vector registers read");
        if let Some(i) = free {
            u.vf_read[i] = Some(reg);
            u.vf_read_lanes[i] = lanes;
        }
    }

    const fn read_bit(&mut self, bit: u32) {
        self.usage.vi_read |= bit;
    }

    const fn write_bit(&mut self, bit: u32) {
        self.usage.vi_write |= bit;
    }
}

impl Access for Recorder {
    fn data_mask(&self) -> u32 {
        u32::MAX
    }

    fn micro_mask(&self) -> u32 {
        u32::MAX
    }

    fn vf(&mut self, reg: usize, lanes: Lanes) -> Vector {
        self.read_vf(reg, lanes);
        [0; 4]
    }

    fn set_vf(&mut self, reg: usize, lanes: Lanes, _val: Vector) {
        if reg == 0 || lanes.is_empty() {
            return;
        }
        self.usage.vf_write = Some(reg as u8);
        self.usage.vf_write_lanes = self.usage.vf_write_lanes.union(lanes);
    }

    fn acc(&mut self, _lanes: Lanes) -> Vector {
        self.read_bit(1 << REG_ACC);
        [0; 4]
    }

    fn set_acc(&mut self, _lanes: Lanes, _val: Vector) {
        self.write_bit(1 << REG_ACC);
    }

    fn vi(&mut self, reg: usize) -> u16 {
        self.read_bit(1 << (reg & 0xF));
        0
    }

    fn set_vi(&mut self, reg: usize, _val: u16) {
        if reg != 0 {
            self.write_bit(1 << (reg & 0xF));
        }
    }

    fn special(&mut self, reg: Special) -> u32 {
        self.read_bit(reg.bit());
        0
    }

    fn set_special(&mut self, reg: Special, _val: u32) {
        self.write_bit(reg.bit());
    }

    fn latch(&mut self, reg: Special) -> u32 {
        self.read_bit(reg.bit());
        0
    }

    fn set_latch(&mut self, reg: Special, _val: u32) {
        self.write_bit(reg.bit());
    }

    fn tpc(&self) -> u32 {
        0
    }

    fn branch(&mut self, _target: u32) {}

    fn load_quad(&mut self, _addr: u32, _lanes: Lanes) -> Vector {
        [0; 4]
    }

    fn store_quad(&mut self, _addr: u32, _lanes: Lanes, _val: Vector) {}

    fn vif_top(&mut self) -> u16 {
        0
    }

    fn vif_itop(&mut self) -> u16 {
        0
    }

    fn gif_kick(&mut self, _addr: u32) {}
}

/// Analyzes `code` against the table rooted at `root`.
///
/// # Returns
///
/// The instruction's descriptor and its usage.
pub fn analyze(root: &'static Table, code: u32) -> (&'static Handler, Usage) {
    let mut rec = Recorder::new();
    let handler = dispatch::dispatch(root, code, &mut rec);
    let mut usage = rec.usage;
    usage.pipe = handler.pipe();
    usage.cycles = handler.cycles();
    (handler, usage)
}

/// Analyzes an upper instruction word.
pub fn analyze_upper(code: u32) -> (&'static Handler, Usage) {
    analyze(&UPPER, code)
}

/// Analyzes a lower instruction word.
pub fn analyze_lower(code: u32) -> (&'static Handler, Usage) {
    analyze(&LOWER, code)
}

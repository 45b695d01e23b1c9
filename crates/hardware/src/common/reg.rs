//! Unified Register File.
//!
//! This module provides the `RegisterFile` struct, the complete architectural register
//! state of one vector unit. It provides:
//! 1. **Unified Storage:** The vector bank, the integer bank, the accumulator and the
//!    special scalar registers (status, MAC, clip, R, I, Q, P).
//! 2. **Pending Latches:** The flag and result values an instruction has produced but
//!    whose pipe has not yet retired them into the visible registers.
//! 3. **Observability:** Debugging utilities for dumping register state.

use serde::{Deserialize, Serialize};

use crate::common::constants::{
    ONE_F32, REG_CLIP_FLAG, REG_I, REG_MAC_FLAG, REG_P, REG_Q, REG_R, REG_STATUS_FLAG,
};
use crate::core::arch::vf::{Lanes, Vector, VfBank};
use crate::core::arch::vi::ViBank;

/// Special scalar registers addressable outside the two banks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Special {
    /// Status flag register (sticky and current FMAC/FDIV flags).
    Status,
    /// MAC flag register (per-lane zero/sign/underflow/overflow).
    Mac,
    /// Clip flag register (four 6-bit judgements).
    Clip,
    /// Random number register.
    R,
    /// Immediate register.
    I,
    /// Divide/square-root result register.
    Q,
    /// Elementary function result register.
    P,
}

impl Special {
    /// Bit position of this register in a usage descriptor's integer masks.
    pub const fn id(self) -> u8 {
        match self {
            Self::Status => REG_STATUS_FLAG,
            Self::Mac => REG_MAC_FLAG,
            Self::Clip => REG_CLIP_FLAG,
            Self::R => REG_R,
            Self::I => REG_I,
            Self::Q => REG_Q,
            Self::P => REG_P,
        }
    }

    /// Mask bit of this register in a usage descriptor's integer masks.
    pub const fn bit(self) -> u32 {
        1 << self.id()
    }
}

/// Values produced by in-flight operations, not yet architecturally visible.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Latches {
    /// Pending status flag.
    pub status: u32,
    /// Pending MAC flag.
    pub mac: u32,
    /// Pending clip flag.
    pub clip: u32,
    /// Pending Q result.
    pub q: u32,
    /// Pending P result.
    pub p: u32,
}

/// Complete register state of one vector unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterFile {
    vf: VfBank,
    vi: ViBank,
    acc: Vector,
    status: u32,
    mac: u32,
    clip: u32,
    r: u32,
    i: u32,
    q: u32,
    p: u32,
    pending: Latches,
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    /// Creates a register file in its power-on state.
    ///
    /// # Returns
    ///
    /// A new `RegisterFile` with `vf00` at `(0, 0, 0, 1.0)`, R at `1.0` and
    /// everything else zeroed.
    pub const fn new() -> Self {
        Self {
            vf: VfBank::new(),
            vi: ViBank::new(),
            acc: [0; 4],
            status: 0,
            mac: 0,
            clip: 0,
            r: ONE_F32,
            i: 0,
            q: 0,
            p: 0,
            pending: Latches {
                status: 0,
                mac: 0,
                clip: 0,
                q: 0,
                p: 0,
            },
        }
    }

    /// Reads a whole vector register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31). `vf00` always returns its constant.
    pub const fn vf(&self, idx: usize) -> Vector {
        self.vf.read(idx)
    }

    /// Writes the selected lanes of a vector register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31). Writes to `vf00` are ignored.
    /// * `lanes` - Destination lanes.
    /// * `val` - Source lane patterns.
    pub const fn set_vf(&mut self, idx: usize, lanes: Lanes, val: Vector) {
        self.vf.write(idx, lanes, val);
    }

    /// Reads an integer register. `vi00` always returns 0.
    pub const fn vi(&self, idx: usize) -> u16 {
        self.vi.read(idx)
    }

    /// Writes an integer register. Writes to `vi00` are ignored.
    pub const fn set_vi(&mut self, idx: usize, val: u16) {
        self.vi.write(idx, val);
    }

    /// Reads the accumulator.
    pub const fn acc(&self) -> Vector {
        self.acc
    }

    /// Writes the selected lanes of the accumulator.
    pub const fn set_acc(&mut self, lanes: Lanes, val: Vector) {
        let mut lane = 0;
        while lane < 4 {
            if lanes.contains(lane) {
                self.acc[lane] = val[lane];
            }
            lane += 1;
        }
    }

    /// Reads the visible value of a special register.
    pub const fn special(&self, reg: Special) -> u32 {
        match reg {
            Special::Status => self.status,
            Special::Mac => self.mac,
            Special::Clip => self.clip,
            Special::R => self.r,
            Special::I => self.i,
            Special::Q => self.q,
            Special::P => self.p,
        }
    }

    /// Writes the visible value of a special register.
    pub const fn set_special(&mut self, reg: Special, val: u32) {
        match reg {
            Special::Status => self.status = val,
            Special::Mac => self.mac = val,
            Special::Clip => self.clip = val,
            Special::R => self.r = val,
            Special::I => self.i = val,
            Special::Q => self.q = val,
            Special::P => self.p = val,
        }
    }

    /// Pending (not yet retired) flag and result values.
    pub const fn pending(&self) -> &Latches {
        &self.pending
    }

    /// Mutable access to the pending latches.
    pub const fn pending_mut(&mut self) -> &mut Latches {
        &mut self.pending
    }

    /// Returns `true` while `vf00` and `vi00` hold their architectural constants.
    pub fn is_pinned(&self) -> bool {
        self.vf.is_pinned() && self.vi.is_pinned()
    }

    /// Zeroes every register, restoring the power-on state.
    pub const fn clear(&mut self) {
        *self = Self::new();
    }

    /// Dumps the contents of all registers to stdout.
    pub fn dump(&self) {
        self.vf.dump();
        self.vi.dump();
        println!(
            "acc = ({:#010x}, {:#010x}, {:#010x}, {:#010x})",
            self.acc[0], self.acc[1], self.acc[2], self.acc[3]
        );
        println!(
            "status={:#06x} mac={:#06x} clip={:#08x} r={:#010x} i={:#010x} q={:#010x} p={:#010x}",
            self.status, self.mac, self.clip, self.r, self.i, self.q, self.p
        );
    }
}

//! Vector Register Bank.
//!
//! This module implements the thirty-two 128-bit vector registers (`vf00`-`vf31`).
//! It provides:
//! 1. **Lane Masks:** The `Lanes` destination mask (x = 8, y = 4, z = 2, w = 1).
//! 2. **Storage:** Raw 32-bit lane patterns, so save-states round-trip bit for bit.
//! 3. **Invariant Enforcement:** `vf00` always reads `(0, 0, 0, 1.0)`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::constants::{VF_COUNT, VF0_VALUE};

/// One vector register value as raw lane patterns, ordered x, y, z, w.
pub type Vector = [u32; 4];

/// Four-bit lane selection mask as encoded in the instruction `dest` field.
///
/// Bit 3 selects x, bit 2 y, bit 1 z and bit 0 w. Lane indices used throughout
/// the crate run x = 0 to w = 3.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lanes(u8);

impl Lanes {
    /// No lanes.
    pub const NONE: Self = Self(0);
    /// The x lane.
    pub const X: Self = Self(0x8);
    /// The y lane.
    pub const Y: Self = Self(0x4);
    /// The z lane.
    pub const Z: Self = Self(0x2);
    /// The w lane.
    pub const W: Self = Self(0x1);
    /// The x, y and z lanes.
    pub const XYZ: Self = Self(0xE);
    /// All four lanes.
    pub const ALL: Self = Self(0xF);

    /// Builds a mask from its four-bit encoding; higher bits are dropped.
    #[inline(always)]
    pub const fn new(bits: u8) -> Self {
        Self(bits & 0xF)
    }

    /// Mask selecting the single lane `lane` (0 = x ... 3 = w).
    #[inline(always)]
    pub const fn single(lane: usize) -> Self {
        Self(0x8 >> (lane & 3))
    }

    /// Four-bit encoding of the mask.
    #[inline(always)]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` if `lane` (0 = x ... 3 = w) is selected.
    #[inline(always)]
    pub const fn contains(self, lane: usize) -> bool {
        self.0 & (0x8 >> (lane & 3)) != 0
    }

    /// Returns `true` if no lane is selected.
    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if both masks select at least one common lane.
    #[inline(always)]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Lanes selected by either mask.
    #[inline(always)]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Source lanes read by a one-lane rotation (`MR32`): x takes y, ..., w takes x.
    #[inline(always)]
    #[must_use]
    pub const fn rotated(self) -> Self {
        Self(((self.0 >> 1) | (self.0 << 3)) & 0xF)
    }

    /// Index of the last selected lane in x, y, z, w order.
    pub const fn last(self) -> Option<usize> {
        if self.0 & 0x1 != 0 {
            Some(3)
        } else if self.0 & 0x2 != 0 {
            Some(2)
        } else if self.0 & 0x4 != 0 {
            Some(1)
        } else if self.0 & 0x8 != 0 {
            Some(0)
        } else {
            None
        }
    }
}

impl fmt::Debug for Lanes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = ['x', 'y', 'z', 'w'];
        let mut s = String::with_capacity(4);
        for (lane, name) in names.iter().enumerate() {
            if self.contains(lane) {
                s.push(*name);
            }
        }
        if s.is_empty() {
            s.push('-');
        }
        write!(f, "Lanes({s})")
    }
}

/// Vector register bank.
///
/// Register `vf00` is hardwired to `(0.0, 0.0, 0.0, 1.0)`; writes to it are dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VfBank {
    regs: [Vector; VF_COUNT],
}

impl Default for VfBank {
    fn default() -> Self {
        Self::new()
    }
}

impl VfBank {
    /// Creates a new bank with `vf00` at its constant and the rest zeroed.
    pub const fn new() -> Self {
        let mut regs = [[0; 4]; VF_COUNT];
        regs[0] = VF0_VALUE;
        Self { regs }
    }

    /// Reads a whole vector register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31). Higher bits are ignored.
    ///
    /// # Returns
    ///
    /// The raw lane patterns. `vf00` always returns its constant.
    #[inline]
    pub const fn read(&self, idx: usize) -> Vector {
        let idx = idx & (VF_COUNT - 1);
        if idx == 0 { VF0_VALUE } else { self.regs[idx] }
    }

    /// Writes the selected lanes of a vector register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31). Writes to `vf00` are ignored.
    /// * `lanes` - Lanes to update; unselected lanes keep their value.
    /// * `val` - Source lane patterns (only selected lanes are used).
    #[inline]
    pub const fn write(&mut self, idx: usize, lanes: Lanes, val: Vector) {
        let idx = idx & (VF_COUNT - 1);
        if idx == 0 {
            return;
        }
        let mut lane = 0;
        while lane < 4 {
            if lanes.contains(lane) {
                self.regs[idx][lane] = val[lane];
            }
            lane += 1;
        }
    }

    /// Returns `true` while `vf00` still holds its architectural constant.
    pub fn is_pinned(&self) -> bool {
        self.regs[0] == VF0_VALUE
    }

    /// Zeroes every register except the `vf00` constant.
    pub const fn clear(&mut self) {
        *self = Self::new();
    }

    /// Dumps all vector registers to stdout as floats.
    pub fn dump(&self) {
        for (i, v) in self.regs.iter().enumerate() {
            println!(
                "vf{:02} = ({:>12.4}, {:>12.4}, {:>12.4}, {:>12.4})",
                i,
                f32::from_bits(v[0]),
                f32::from_bits(v[1]),
                f32::from_bits(v[2]),
                f32::from_bits(v[3])
            );
        }
    }
}

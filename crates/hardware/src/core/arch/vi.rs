//! Integer Register Bank.
//!
//! This module implements the sixteen 16-bit integer registers (`vi00`-`vi15`).
//! It performs the following:
//! 1. **Storage:** Maintains the sixteen integer registers.
//! 2. **Invariant Enforcement:** Ensures that register `vi00` is hardwired to zero.
//! 3. **Debugging:** Provides utilities for dumping the complete register state.

use serde::{Deserialize, Serialize};

use crate::common::constants::VI_COUNT;

/// Integer register bank.
///
/// Holds the sixteen integer registers used for addressing, loop counters and
/// branch conditions. Register `vi00` is hardwired to zero and cannot be modified.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViBank {
    regs: [u16; VI_COUNT],
}

impl ViBank {
    /// Creates a new integer bank with all registers initialized to zero.
    pub const fn new() -> Self {
        Self {
            regs: [0; VI_COUNT],
        }
    }

    /// Reads an integer register value.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-15). Higher bits are ignored.
    ///
    /// # Returns
    ///
    /// The 16-bit value stored in the register. Register `vi00` always returns 0.
    #[inline]
    pub const fn read(&self, idx: usize) -> u16 {
        let idx = idx & (VI_COUNT - 1);
        if idx == 0 { 0 } else { self.regs[idx] }
    }

    /// Writes a value to an integer register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-15). Writes to `vi00` are ignored.
    /// * `val` - The 16-bit value to write.
    #[inline]
    pub const fn write(&mut self, idx: usize, val: u16) {
        let idx = idx & (VI_COUNT - 1);
        if idx != 0 {
            self.regs[idx] = val;
        }
    }

    /// Returns `true` while `vi00` still holds its architectural zero.
    pub const fn is_pinned(&self) -> bool {
        self.regs[0] == 0
    }

    /// Zeroes every register.
    pub const fn clear(&mut self) {
        self.regs = [0; VI_COUNT];
    }

    /// Dumps the contents of all integer registers to stdout.
    pub fn dump(&self) {
        for i in (0..VI_COUNT).step_by(4) {
            println!(
                "vi{:02}={:#06x} vi{:02}={:#06x} vi{:02}={:#06x} vi{:02}={:#06x}",
                i,
                self.regs[i],
                i + 1,
                self.regs[i + 1],
                i + 2,
                self.regs[i + 2],
                i + 3,
                self.regs[i + 3]
            );
        }
    }
}

//! Downstream transfer interface link.
//!
//! The vector interface feeding a unit owns a status register whose `VEW` bit
//! reads set while the unit is running a program, and the double-buffer `TOP`
//! and `ITOP` registers that `XTOP`/`XITOP` read. `VifLink` is the slice of that
//! state a unit touches.

use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};

/// State shared between a unit and its vector interface.
#[derive(Debug, Default)]
pub struct VifLink {
    vew: AtomicBool,
    top: AtomicU16,
    itop: AtomicU16,
}

impl VifLink {
    /// Creates a link with `VEW` clear and both registers zero.
    pub const fn new() -> Self {
        Self {
            vew: AtomicBool::new(false),
            top: AtomicU16::new(0),
            itop: AtomicU16::new(0),
        }
    }

    /// Returns `true` while the interface waits on the unit.
    pub fn vew(&self) -> bool {
        self.vew.load(Ordering::Acquire)
    }

    /// Sets or clears the `VEW` bit.
    pub fn set_vew(&self, waiting: bool) {
        self.vew.store(waiting, Ordering::Release);
    }

    /// Current `TOP` value.
    pub fn top(&self) -> u16 {
        self.top.load(Ordering::Acquire)
    }

    /// Replaces the `TOP` value.
    pub fn set_top(&self, val: u16) {
        self.top.store(val, Ordering::Release);
    }

    /// Current `ITOP` value.
    pub fn itop(&self) -> u16 {
        self.itop.load(Ordering::Acquire)
    }

    /// Replaces the `ITOP` value.
    pub fn set_itop(&self, val: u16) {
        self.itop.store(val, Ordering::Release);
    }
}

//! Shared vector unit control registers.
//!
//! Both units read their break-enable bits from one `FBRST` register and report
//! busy/debug status in one `VPU_STAT` register, each using its own bit group.
//! The block is shared between the units and the host through an `Arc`.

use std::sync::atomic::{AtomicU32, Ordering};

/// The `FBRST` and `VPU_STAT` registers shared by both units.
#[derive(Debug, Default)]
pub struct ControlBlock {
    fbrst: AtomicU32,
    vpu_stat: AtomicU32,
}

impl ControlBlock {
    /// Creates a block with both registers cleared.
    pub const fn new() -> Self {
        Self {
            fbrst: AtomicU32::new(0),
            vpu_stat: AtomicU32::new(0),
        }
    }

    /// Current `FBRST` value.
    pub fn fbrst(&self) -> u32 {
        self.fbrst.load(Ordering::Acquire)
    }

    /// Replaces the `FBRST` value.
    pub fn set_fbrst(&self, val: u32) {
        self.fbrst.store(val, Ordering::Release);
    }

    /// Returns `true` if every bit of `mask` is set in `FBRST`.
    pub fn fbrst_enabled(&self, mask: u32) -> bool {
        self.fbrst() & mask == mask
    }

    /// Current `VPU_STAT` value.
    pub fn vpu_stat(&self) -> u32 {
        self.vpu_stat.load(Ordering::Acquire)
    }

    /// Sets the bits of `mask` in `VPU_STAT`.
    pub fn set_stat(&self, mask: u32) {
        let _ = self.vpu_stat.fetch_or(mask, Ordering::AcqRel);
    }

    /// Clears the bits of `mask` in `VPU_STAT`.
    pub fn clear_stat(&self, mask: u32) {
        let _ = self.vpu_stat.fetch_and(!mask, Ordering::AcqRel);
    }
}

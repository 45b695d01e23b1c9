//! System-side collaborators of a vector unit.
//!
//! A unit does not own the registers and signal paths it shares with the rest of
//! the machine. This module models them at their boundary:
//! 1. **Control:** The shared `FBRST`/`VPU_STAT` register block.
//! 2. **Transfer interface:** The `VEW` completion bit and the `TOP`/`ITOP` registers.
//! 3. **Signals:** Interrupt and graphics-path sink traits.
//!
//! `Collaborators` bundles one of each for construction.

/// Shared control register block.
pub mod control;

/// Collaborator traits and the no-op sink.
pub mod traits;

/// Downstream transfer interface link.
pub mod vif;

use std::fmt;
use std::sync::Arc;

pub use control::ControlBlock;
pub use traits::{GifSink, InterruptSink, NullSink};
pub use vif::VifLink;

/// External state and signal paths a unit is wired to.
#[derive(Clone)]
pub struct Collaborators {
    /// Shared `FBRST`/`VPU_STAT` registers.
    pub control: Arc<ControlBlock>,
    /// Interrupt controller.
    pub interrupts: Arc<dyn InterruptSink>,
    /// Transfer interface link.
    pub vif: Arc<VifLink>,
    /// Graphics path.
    pub gif: Arc<dyn GifSink>,
}

impl Collaborators {
    /// Wires a unit to its own private control block and link, dropping all signals.
    pub fn detached() -> Self {
        Self {
            control: Arc::new(ControlBlock::new()),
            interrupts: Arc::new(NullSink),
            vif: Arc::new(VifLink::new()),
            gif: Arc::new(NullSink),
        }
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::detached()
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators")
            .field("control", &self.control)
            .field("vif", &self.vif)
            .finish_non_exhaustive()
    }
}

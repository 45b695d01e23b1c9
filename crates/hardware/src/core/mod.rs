//! Vector unit core.
//!
//! This module contains the per-unit machinery: the architectural register
//! banks, the usage analyzer and hazard resolver that make dual issue behave as
//! simultaneous, the result pipes, and the controller that steps micro-words.

/// Architectural register banks (vector and integer).
pub mod arch;

/// Register-usage analysis of decoded instructions.
pub mod analyzer;

/// Executing core: state plus the handler access surface.
pub mod exec;

/// Dual-issue hazard resolution.
pub mod hazards;

/// Program counter, branch, flag-bit and cycle state.
pub mod pipeline;

/// FMAC, divide and elementary function result pipes.
pub mod pipes;

/// Save-state snapshots.
pub mod state;

/// The stepped controller.
pub mod vu;

pub use self::state::VuSnapshot;
pub use self::vu::{RunSummary, StepOutcome, Vu, VuState};

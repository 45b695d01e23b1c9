//! PS2-style vector unit simulator library.
//!
//! This crate implements the dual-issue VLIW vector coprocessor (VU0/VU1) with the following:
//! 1. **ISA:** Field extraction and nested dispatch tables whose handlers serve both analysis and execution.
//! 2. **Core:** Register-usage analysis, dual-issue hazard resolution, result pipes and the stepped controller.
//! 3. **SoC:** The shared control block, interrupt and graphics-path sinks, and the transfer interface link.
//! 4. **Host:** Configuration, save-states, program loading and statistics.

/// Common types and constants (registers, flag bits, errors).
pub mod common;
/// Unit configuration (defaults, unit kinds, JSON loading).
pub mod config;
/// Vector unit core (analyzer, hazards, pipes, controller, save-state).
pub mod core;
/// Instruction set (fields, dispatch tables, upper and lower handlers).
pub mod isa;
/// Program image loading.
pub mod sim;
/// System-side collaborators (control block, sinks, transfer link).
pub mod soc;
/// Execution statistics collection and reporting.
pub mod stats;

/// Host-side error type.
pub use crate::common::error::VuError;
/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Save-state of one unit.
pub use crate::core::VuSnapshot;
/// The stepped vector unit.
pub use crate::core::Vu;
/// Collaborators a unit is wired to; `Collaborators::detached()` for standalone use.
pub use crate::soc::Collaborators;

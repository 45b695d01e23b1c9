//! Common utilities and types used throughout the vector unit core.
//!
//! This module provides fundamental building blocks that are shared across all components
//! of the unit. It includes:
//! 1. **Constants:** Register counts, flag bits, numeric clamps, and pipe latencies.
//! 2. **Error Handling:** The host-side error type and result alias.
//! 3. **Register Management:** A unified interface for the vector, integer, and special registers.

/// Common constants used throughout the unit.
pub mod constants;

/// Host-side error type.
pub mod error;

/// Register file implementation.
pub mod reg;

pub use error::{Result, VuError};
pub use reg::{Latches, RegisterFile, Special};

//! Host-side error definitions.
//!
//! Guest programs can never make the vector unit fail: reserved opcodes are no-ops
//! and a runaway program counter simply halts the unit. The errors here cover the
//! host operations around the core instead. It provides:
//! 1. **Save-state errors:** Snapshots that do not fit the unit they are loaded into.
//! 2. **Loading errors:** Program images that cannot be read or do not fit micro memory.
//! 3. **Configuration errors:** Inconsistent memory sizing.

use thiserror::Error;

use crate::config::UnitKind;

/// Errors returned by fallible host-side vector unit operations.
#[derive(Debug, Error)]
pub enum VuError {
    /// A snapshot region has a different size than the target unit's region.
    #[error("snapshot {what} is {found} bytes, unit expects {expected}")]
    SnapshotMismatch {
        /// Which region disagreed (`"micro memory"` or `"data memory"`).
        what: &'static str,
        /// Size of the region in the target unit.
        expected: usize,
        /// Size of the region in the snapshot.
        found: usize,
    },

    /// A snapshot taken from one unit kind was loaded into another.
    #[error("snapshot belongs to {found:?}, unit is {expected:?}")]
    UnitMismatch {
        /// Kind of the target unit.
        expected: UnitKind,
        /// Kind recorded in the snapshot.
        found: UnitKind,
    },

    /// A program image does not fit micro memory at the requested offset.
    #[error("program of {size} bytes does not fit micro memory of {capacity} bytes")]
    ProgramTooLarge {
        /// Offset plus image length.
        size: usize,
        /// Micro memory capacity.
        capacity: usize,
    },

    /// The configuration is internally inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON encoding or decoding failed.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A program file could not be read.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for host-side vector unit operations.
pub type Result<T> = std::result::Result<T, VuError>;

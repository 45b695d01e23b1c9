//! # Simulation Utilities

/// Program image loading from disk.
pub mod loader;

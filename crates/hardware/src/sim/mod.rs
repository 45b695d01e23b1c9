//! Host-side utilities.
//!
//! Provides program image loading for the standalone unit.

pub mod loader;

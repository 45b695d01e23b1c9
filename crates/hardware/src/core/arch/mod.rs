//! Vector unit architectural register banks.
//!
//! This module contains the two register banks of the unit.
//! It includes the following modules:
//! 1. **VF:** The 128-bit vector bank and its lane masks.
//! 2. **VI:** The 16-bit integer bank.

/// Vector (VF) register bank and lane masks.
pub mod vf;

/// Integer (VI) register bank.
pub mod vi;

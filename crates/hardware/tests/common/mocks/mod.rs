//! # Mock Collaborators
//!
//! Stand-ins for the interrupt controller and the graphics interface.


/// Interrupt sinks: a `mockall` mock and a recorder.
pub mod interrupts;

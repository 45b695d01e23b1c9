//! # System Collaborators
//!
//! Tests for the state a unit shares with the rest of the machine.

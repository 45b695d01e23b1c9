//! # Test Infrastructure
//!
//! Builders, the unit harness and mock collaborators shared by every test module.


/// `TestContext`: a unit plus convenience setters and getters.
pub mod harness;

/// Mock and recording collaborators.
pub mod mocks;

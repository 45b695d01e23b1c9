//! Save-state snapshots.
//!
//! A `VuSnapshot` holds everything that influences later execution of a unit:
//! the register file with its pending latches, both memories, the sequencing
//! state and the in-flight pipe entries. Statistics are not part of it.

use serde::{Deserialize, Serialize};

use crate::common::error::Result;
use crate::common::reg::RegisterFile;
use crate::config::UnitKind;
use crate::core::pipeline::PipelineState;
use crate::core::pipes::Pipes;

/// Serialized state of one vector unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VuSnapshot {
    /// Unit the snapshot was taken from.
    pub unit: UnitKind,
    /// Registers and pending latches.
    pub regs: RegisterFile,
    /// Micro memory contents.
    pub micro: Vec<u8>,
    /// Data memory contents.
    pub data: Vec<u8>,
    /// Program counter, branch, flag-bit and cycle state.
    pub pipeline: PipelineState,
    /// In-flight results.
    pub pipes: Pipes,
}

impl VuSnapshot {
    /// Encodes the snapshot as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes a snapshot from JSON produced by `to_json`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

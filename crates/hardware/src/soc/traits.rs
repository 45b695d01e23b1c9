//! Collaborator traits for the units' outgoing signals.
//!
//! This module defines the traits a host implements to receive what a vector unit
//! sends to the rest of the machine. It provides:
//! 1. **Interrupts:** `InterruptSink::raise`, called on enabled debug requests.
//! 2. **Graphics path:** `GifSink::kick`, called by `XGKICK` once all pipes have drained.
//! 3. **Detached operation:** `NullSink`, which accepts and drops both signals.
//!
//! All implementors must be `Send + Sync`; the units only ever call them and never
//! hold them across steps.

/// Interrupt controller notification primitive.
pub trait InterruptSink: Send + Sync {
    /// Raises `line`. Fire-and-forget; the unit consumes no result.
    fn raise(&self, line: u32);
}

/// Receiver of graphics packets sent by `XGKICK`.
pub trait GifSink: Send + Sync {
    /// Accepts the packet starting at byte `address` of `memory`.
    ///
    /// # Arguments
    ///
    /// * `address` - Byte offset of the packet's first quadword in data memory.
    /// * `memory` - The unit's whole data memory; packets wrap at its end.
    fn kick(&self, address: u32, memory: &[u8]);
}

/// Sink that ignores everything sent to it.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl InterruptSink for NullSink {
    fn raise(&self, _line: u32) {}
}

impl GifSink for NullSink {
    fn kick(&self, _address: u32, _memory: &[u8]) {}
}

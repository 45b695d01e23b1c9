//! Vector Unit Instruction Set.
//!
//! Contains field extraction, the handler state interface, every instruction
//! handler, and the tables that map encodings to handlers.
//!
//! # Slots
//!
//! * `upper`: FMAC instructions issued from the upper half of a micro-word.
//! * `lower`: Memory, integer, divide, elementary function, flag and branch
//!   instructions issued from the lower half.

/// Register, memory and control primitives every handler is written against.
pub mod access;

/// Static opcode tables and handler descriptors.
pub mod dispatch;

/// Instruction field extraction.
pub mod fields;

/// Clamping, flag and fixed-point helpers of the floating-point datapath.
pub mod float;

/// Lower-slot instruction handlers.
pub mod lower;

/// Upper-slot (FMAC) instruction handlers.
pub mod upper;

pub use access::Access;
pub use dispatch::{Handler, LOWER, Pipe, UPPER};
pub use fields::MicroBits;

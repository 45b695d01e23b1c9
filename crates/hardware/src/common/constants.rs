//! Global Vector Unit Constants.
//!
//! This module defines constants shared across the vector unit core. It includes:
//! 1. **Register Constants:** Bank sizes, pinned register values, and special register ids.
//! 2. **Micro-word Constants:** Fetch unit size and the upper-word flag bits.
//! 3. **Numeric Constants:** Clamp values used by the floating-point datapath.
//! 4. **Pipeline Constants:** Pipe depths, latencies, and countdown lengths.

/// Number of vector (VF) registers.
pub const VF_COUNT: usize = 32;

/// Number of integer (VI) registers.
pub const VI_COUNT: usize = 16;

/// Raw lane pattern of `1.0f32`.
pub const ONE_F32: u32 = 0x3F80_0000;

/// Architectural value of VF0: `(0.0, 0.0, 0.0, 1.0)`.
pub const VF0_VALUE: [u32; 4] = [0, 0, 0, ONE_F32];

/// Size of one micro-word (lower + upper instruction) in bytes.
pub const MICROWORD_BYTES: u32 = 8;

/// Size of one data-memory quadword in bytes.
pub const QUAD_BYTES: u32 = 16;

/// Upper-word flag: the lower word is an immediate loaded into I.
pub const FLAG_I: u32 = 0x8000_0000;

/// Upper-word flag: end of micro-program.
pub const FLAG_E: u32 = 0x4000_0000;

/// Upper-word flag: informational M bit.
pub const FLAG_M: u32 = 0x2000_0000;

/// Upper-word flag: debug break request.
pub const FLAG_D: u32 = 0x1000_0000;

/// Upper-word flag: debug halt request.
pub const FLAG_T: u32 = 0x0800_0000;

/// Usage-mask id of the status flag register.
pub const REG_STATUS_FLAG: u8 = 16;

/// Usage-mask id of the MAC flag register.
pub const REG_MAC_FLAG: u8 = 17;

/// Usage-mask id of the clip flag register.
pub const REG_CLIP_FLAG: u8 = 18;

/// Usage-mask id of the random register R.
pub const REG_R: u8 = 20;

/// Usage-mask id of the immediate register I.
pub const REG_I: u8 = 21;

/// Usage-mask id of the divide result register Q.
pub const REG_Q: u8 = 22;

/// Usage-mask id of the elementary function result register P.
pub const REG_P: u8 = 23;

/// Usage-mask id of the accumulator.
pub const REG_ACC: u8 = 25;

/// Largest finite single-precision magnitude; infinities clamp to it.
pub const FLOAT_MAX: u32 = 0x7F7F_FFFF;

/// Sign bit of a lane pattern.
pub const SIGN_BIT: u32 = 0x8000_0000;

/// Clip flag register width mask (four judgements of six bits).
pub const CLIP_MASK: u32 = 0x00FF_FFFF;

/// Number of FMAC pipe entries that may be in flight.
pub const FMAC_DEPTH: usize = 8;

/// FMAC result latency in cycles.
pub const FMAC_LATENCY: u64 = 3;

/// Length of the end-of-program countdown in steps.
pub const EBIT_COUNTDOWN: u8 = 2;

/// Steps between periodic trace status lines.
pub const STATUS_UPDATE_INTERVAL: u64 = 100_000;

//! Floating-point datapath conventions.
//!
//! The unit is not IEEE 754 compliant. This module provides the pieces every
//! arithmetic handler shares:
//! 1. **Operand Clamping:** Denormals read as signed zero, infinities and NaNs as
//!    the signed largest finite value.
//! 2. **MAC Flags:** The per-lane zero, sign, underflow and overflow nibbles.
//! 3. **Status Flags:** Folding the MAC flag into the status flag.
//! 4. **Fixed Point:** The scales used by `FTOI`/`ITOF`.

use crate::common::constants::{FLOAT_MAX, SIGN_BIT};

/// Decodes an operand lane pattern, clamping out-of-range encodings.
#[inline]
pub fn clamp(bits: u32) -> f32 {
    match bits & 0x7F80_0000 {
        0 => f32::from_bits(bits & SIGN_BIT),
        0x7F80_0000 => f32::from_bits((bits & SIGN_BIT) | FLOAT_MAX),
        _ => f32::from_bits(bits),
    }
}

/// MAC flag bit shift of `lane` (x = 3 ... w = 0).
#[inline(always)]
const fn shift(lane: usize) -> u32 {
    3 - (lane as u32 & 3)
}

/// Records the flags of one result lane and returns the lane pattern to commit.
///
/// # Arguments
///
/// * `mac` - MAC flag being built.
/// * `lane` - Result lane (0 = x ... 3 = w).
/// * `value` - Raw arithmetic result.
///
/// # Returns
///
/// The committed pattern: signed zero on underflow, the signed largest finite
/// value on overflow, otherwise `value` unchanged.
pub fn mac_update(mac: &mut u32, lane: usize, value: f32) -> u32 {
    let s = shift(lane);
    let bits = value.to_bits();
    let sign = bits & SIGN_BIT;

    if sign != 0 {
        *mac |= 0x0010 << s;
    } else {
        *mac &= !(0x0010 << s);
    }

    if value == 0.0 {
        *mac = (*mac & !(0x1100 << s)) | (0x0001 << s);
        return bits;
    }

    match (bits >> 23) & 0xFF {
        0 => {
            *mac = (*mac & !(0x1000 << s)) | (0x0101 << s);
            sign
        }
        0xFF => {
            *mac = (*mac & !(0x0101 << s)) | (0x1000 << s);
            sign | FLOAT_MAX
        }
        _ => {
            *mac &= !(0x1101 << s);
            bits
        }
    }
}

/// Clears every flag of a lane that produced no result.
#[inline]
pub const fn mac_clear(mac: &mut u32, lane: usize) {
    *mac &= !(0x1111 << shift(lane));
}

/// Folds a MAC flag into the status flag.
///
/// Bits 0-3 become the new zero/sign/underflow/overflow summary and the previous
/// summary moves to bits 6-9. The divide flags (bits 4-5, 10-11) are preserved.
pub const fn status_update(status: u32, mac: u32) -> u32 {
    let mut new = 0;
    if mac & 0x000F != 0 {
        new |= 0x1;
    }
    if mac & 0x00F0 != 0 {
        new |= 0x2;
    }
    if mac & 0x0F00 != 0 {
        new |= 0x4;
    }
    if mac & 0xF000 != 0 {
        new |= 0x8;
    }
    (status & 0xC30) | new | ((status & 0xF) << 6)
}

/// Status flag before a divide-unit result: divide flags move to their sticky bits.
pub const fn status_divide(status: u32) -> u32 {
    (status & 0xFCF) | ((status & 0x30) << 6)
}

/// Fixed-point scale of `FTOI`/`ITOF` variant 0, 4, 12 or 15.
pub const fn fixed_scale(frac_bits: u32) -> f32 {
    match frac_bits {
        4 => 16.0,
        12 => 4096.0,
        15 => 32768.0,
        _ => 1.0,
    }
}

/// Converts a clamped float to fixed point, saturating at the `i32` range.
#[inline]
pub fn to_fixed(value: f32, scale: f32) -> u32 {
    ((value * scale) as i32) as u32
}

/// Converts a fixed-point lane to float.
#[inline]
pub fn from_fixed(bits: u32, scale: f32) -> u32 {
    ((bits as i32) as f32 / scale).to_bits()
}

/// `MAX` ordering on raw patterns, without clamping or flags.
pub const fn max_bits(a: u32, b: u32) -> u32 {
    match (a & SIGN_BIT != 0, b & SIGN_BIT != 0) {
        (true, true) => {
            if (a & !SIGN_BIT) > (b & !SIGN_BIT) {
                b
            } else {
                a
            }
        }
        (true, false) => b,
        (false, true) => a,
        (false, false) => {
            if (a & !SIGN_BIT) > (b & !SIGN_BIT) {
                a
            } else {
                b
            }
        }
    }
}

/// `MINI` ordering on raw patterns, without clamping or flags.
pub const fn min_bits(a: u32, b: u32) -> u32 {
    match (a & SIGN_BIT != 0, b & SIGN_BIT != 0) {
        (true, true) => {
            if (a & !SIGN_BIT) > (b & !SIGN_BIT) {
                a
            } else {
                b
            }
        }
        (true, false) => a,
        (false, true) => b,
        (false, false) => {
            if (a & !SIGN_BIT) > (b & !SIGN_BIT) {
                b
            } else {
                a
            }
        }
    }
}

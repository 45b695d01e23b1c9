//! Micro-instruction field extraction.
//!
//! Provides bit extraction for the 32-bit upper and lower instruction words of a
//! vector unit micro-word. Every input decodes to some field values; whether they
//! mean anything depends on the opcode.

use crate::common::constants::{FLAG_D, FLAG_E, FLAG_I, FLAG_M, FLAG_T};
use crate::core::arch::vf::Lanes;

/// Bit mask for a 5-bit register field.
pub const REG_MASK: u32 = 0x1F;
/// Bit mask for a 6-bit function field (upper opcode, lower special opcode).
pub const FUNCT_MASK: u32 = 0x3F;
/// Bit mask for the 7-bit lower opcode field.
pub const LOWER_OP_MASK: u32 = 0x7F;

/// Trait for extracting instruction fields from encoded micro-instructions.
pub trait MicroBits {
    /// Upper-word opcode field (bits 0-5).
    fn upper_op(&self) -> u32;

    /// Lower-word primary opcode field (bits 25-31).
    fn lower_op(&self) -> u32;

    /// Function field (bits 0-5), used by the lower special group.
    fn funct(&self) -> u32;

    /// `ft` register field (bits 16-20).
    fn ft(&self) -> usize;

    /// `fs` register field (bits 11-15).
    fn fs(&self) -> usize;

    /// `fd` register field (bits 6-10). Also the sub-opcode of the grouped tables.
    fn fd(&self) -> usize;

    /// Shift-amount alias of `fd` (bits 6-10).
    fn sa(&self) -> u32;

    /// Integer register `it` (low 4 bits of `ft`).
    fn it(&self) -> usize;

    /// Integer register `is` (low 4 bits of `fs`).
    fn is(&self) -> usize;

    /// Integer register `id` (low 4 bits of `fd`).
    fn id(&self) -> usize;

    /// Destination lane mask (bits 21-24: x = 24, y = 23, z = 22, w = 21).
    fn dest(&self) -> Lanes;

    /// Broadcast lane selector (bits 0-1: 0 = x ... 3 = w).
    fn bc(&self) -> usize;

    /// `fs` field selector (bits 21-22).
    fn fsf(&self) -> usize;

    /// `ft` field selector (bits 23-24).
    fn ftf(&self) -> usize;

    /// Sign-extended 11-bit immediate (bits 0-10).
    fn imm11(&self) -> i32;

    /// Unsigned 11-bit immediate (bits 0-10).
    fn uimm11(&self) -> u32;

    /// Sign-extended 5-bit immediate of `IADDI` (bits 6-10).
    fn imm5(&self) -> i16;

    /// 12-bit immediate of the status flag ops (bit 21 then bits 0-10).
    fn imm12(&self) -> u32;

    /// 15-bit immediate of `IADDIU`/`ISUBIU` (bits 21-24 then bits 0-10).
    fn imm15(&self) -> u16;

    /// 24-bit immediate of the clip flag ops (bits 0-23).
    fn imm24(&self) -> u32;

    /// Sign-extended low 16 bits.
    fn simm16(&self) -> i32;

    /// Upper-word I bit (31): the lower word is immediate data.
    fn i_bit(&self) -> bool;

    /// Upper-word E bit (30): end of micro-program.
    fn e_bit(&self) -> bool;

    /// Upper-word M bit (29).
    fn m_bit(&self) -> bool;

    /// Upper-word D bit (28): debug break request.
    fn d_bit(&self) -> bool;

    /// Upper-word T bit (27): debug halt request.
    fn t_bit(&self) -> bool;
}

impl MicroBits for u32 {
    #[inline(always)]
    fn upper_op(&self) -> u32 {
        self & FUNCT_MASK
    }

    #[inline(always)]
    fn lower_op(&self) -> u32 {
        (self >> 25) & LOWER_OP_MASK
    }

    #[inline(always)]
    fn funct(&self) -> u32 {
        self & FUNCT_MASK
    }

    #[inline(always)]
    fn ft(&self) -> usize {
        ((self >> 16) & REG_MASK) as usize
    }

    #[inline(always)]
    fn fs(&self) -> usize {
        ((self >> 11) & REG_MASK) as usize
    }

    #[inline(always)]
    fn fd(&self) -> usize {
        ((self >> 6) & REG_MASK) as usize
    }

    #[inline(always)]
    fn sa(&self) -> u32 {
        (self >> 6) & REG_MASK
    }

    #[inline(always)]
    fn it(&self) -> usize {
        ((self >> 16) & 0xF) as usize
    }

    #[inline(always)]
    fn is(&self) -> usize {
        ((self >> 11) & 0xF) as usize
    }

    #[inline(always)]
    fn id(&self) -> usize {
        ((self >> 6) & 0xF) as usize
    }

    #[inline(always)]
    fn dest(&self) -> Lanes {
        Lanes::new(((self >> 21) & 0xF) as u8)
    }

    #[inline(always)]
    fn bc(&self) -> usize {
        (self & 0x3) as usize
    }

    #[inline(always)]
    fn fsf(&self) -> usize {
        ((self >> 21) & 0x3) as usize
    }

    #[inline(always)]
    fn ftf(&self) -> usize {
        ((self >> 23) & 0x3) as usize
    }

    #[inline(always)]
    fn imm11(&self) -> i32 {
        // Shift the 11-bit field to the top, then arithmetic-shift it back.
        ((self << 21) as i32) >> 21
    }

    #[inline(always)]
    fn uimm11(&self) -> u32 {
        self & 0x7FF
    }

    #[inline(always)]
    fn imm5(&self) -> i16 {
        ((((self >> 6) & 0x1F) << 11) as u16 as i16) >> 11
    }

    #[inline(always)]
    fn imm12(&self) -> u32 {
        (((self >> 21) & 0x1) << 11) | (self & 0x7FF)
    }

    #[inline(always)]
    fn imm15(&self) -> u16 {
        (((self >> 10) & 0x7800) | (self & 0x7FF)) as u16
    }

    #[inline(always)]
    fn imm24(&self) -> u32 {
        self & 0x00FF_FFFF
    }

    #[inline(always)]
    fn simm16(&self) -> i32 {
        i32::from(*self as u16 as i16)
    }

    #[inline(always)]
    fn i_bit(&self) -> bool {
        self & FLAG_I != 0
    }

    #[inline(always)]
    fn e_bit(&self) -> bool {
        self & FLAG_E != 0
    }

    #[inline(always)]
    fn m_bit(&self) -> bool {
        self & FLAG_M != 0
    }

    #[inline(always)]
    fn d_bit(&self) -> bool {
        self & FLAG_D != 0
    }

    #[inline(always)]
    fn t_bit(&self) -> bool {
        self & FLAG_T != 0
    }
}

//! Field Extraction Tests.
//!
//! Property tests that every field reads back what the encoders put in, for
//! arbitrary values of the surrounding bits.

use proptest::prelude::*;
use vusim_core::isa::fields::MicroBits;

proptest! {
    #[test]
    fn test_register_fields_round_trip(ft in 0u32..32, fs in 0u32..32, fd in 0u32..32, noise in any::<u32>()) {
        let code = (noise & !0x001F_FFC0) | (ft << 16) | (fs << 11) | (fd << 6);
        prop_assert_eq!(code.ft(), ft as usize);
        prop_assert_eq!(code.fs(), fs as usize);
        prop_assert_eq!(code.fd(), fd as usize);
        prop_assert_eq!(code.it(), (ft & 0xF) as usize);
        prop_assert_eq!(code.is(), (fs & 0xF) as usize);
        prop_assert_eq!(code.id(), (fd & 0xF) as usize);
    }

    #[test]
    fn test_dest_is_bits_21_to_24(dest in 0u32..16, noise in any::<u32>()) {
        let code = (noise & !(0xF << 21)) | (dest << 21);
        prop_assert_eq!(u32::from(code.dest().bits()), dest);
    }

    #[test]
    fn test_imm11_sign_extends(imm in -1024i32..1024, noise in any::<u32>()) {
        let code = (noise & !0x7FF) | ((imm as u32) & 0x7FF);
        prop_assert_eq!(code.imm11(), imm);
        prop_assert_eq!(code.uimm11(), (imm as u32) & 0x7FF);
    }

    #[test]
    fn test_imm15_splits_across_two_fields(imm in 0u16..0x8000, noise in any::<u32>()) {
        let imm32 = u32::from(imm);
        let code = (noise & !(0x01E0_07FF)) | (((imm32 >> 11) & 0xF) << 21) | (imm32 & 0x7FF);
        prop_assert_eq!(code.imm15(), imm);
    }

    #[test]
    fn test_imm12_takes_bit_21_as_msb(imm in 0u32..0x1000, noise in any::<u32>()) {
        let code = (noise & !(0x0020_07FF)) | (((imm >> 11) & 1) << 21) | (imm & 0x7FF);
        prop_assert_eq!(code.imm12(), imm);
    }

    #[test]
    fn test_imm5_sign_extends(imm in -16i16..16, noise in any::<u32>()) {
        let code = (noise & !(0x1F << 6)) | ((((imm as u16) & 0x1F) as u32) << 6);
        prop_assert_eq!(code.imm5(), imm);
    }

    #[test]
    fn test_scalar_selectors(fsf in 0usize..4, ftf in 0usize..4, noise in any::<u32>()) {
        let code = (noise & !(0xF << 21)) | ((ftf as u32) << 23) | ((fsf as u32) << 21);
        prop_assert_eq!(code.fsf(), fsf);
        prop_assert_eq!(code.ftf(), ftf);
    }
}

#[test]
fn test_flag_bits_are_independent() {
    let all: u32 = 0xF800_0000;
    assert!(all.i_bit() && all.e_bit() && all.m_bit() && all.d_bit() && all.t_bit());
    assert!(!(0x7800_0000u32).i_bit());
    assert!(!(0xB800_0000u32).e_bit());
    assert!(!(0xD800_0000u32).m_bit());
    assert!(!(0xE800_0000u32).d_bit());
    assert!(!(0xF000_0000u32).t_bit());
}

#[test]
fn test_opcode_fields() {
    let code: u32 = (0x40 << 25) | (0x0E << 6) | 0x3C;
    assert_eq!(code.lower_op(), 0x40);
    assert_eq!(code.funct(), 0x3C);
    assert_eq!(code.upper_op(), 0x3C);
    assert_eq!(code.sa(), 0x0E);
    assert_eq!(0xFFFF_u32.simm16(), -1);
    assert_eq!(0x00FF_FFFF_u32.imm24(), 0x00FF_FFFF);
    assert_eq!(0xFFFF_FFFF_u32.imm24(), 0x00FF_FFFF);
}

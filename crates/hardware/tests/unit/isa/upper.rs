//! Upper (FMAC) Handler Tests.
//!
//! Runs each upper instruction through the controller on an untimed unit, so
//! that flag results are visible at the end of the step, and checks:
//! 1. **Arithmetic:** Vector, broadcast, I and Q operand forms and accumulator targets.
//! 2. **Flags:** MAC lane bits and the status summary.
//! 3. **Clamping:** Infinities, NaNs and denormals as operands and results.
//! 4. **Special forms:** `MAX`/`MINI`, conversions, `CLIP` and the outer product.

use pretty_assertions::assert_eq;
use vusim_core::common::constants::FLOAT_MAX;
use vusim_core::common::reg::Special;
use vusim_core::core::arch::vf::Lanes;

use crate::common::builder::micro::{self, flags};
use crate::common::builder::program::Program;
use crate::common::harness::TestContext;

/// Runs `uppers` in sequence, each with a lower `NOP`.
fn run_uppers(setup: impl FnOnce(&mut TestContext), uppers: &[u32]) -> TestContext {
    let mut program = Program::new();
    for &u in uppers {
        program = program.upper(u);
    }
    let mut ctx = TestContext::untimed().load(&program);
    setup(&mut ctx);
    ctx.step_n(uppers.len());
    ctx
}

fn mac(ctx: &TestContext) -> u32 {
    ctx.vu.regs().special(Special::Mac)
}

fn status(ctx: &TestContext) -> u32 {
    ctx.vu.regs().special(Special::Status)
}

// ─── Arithmetic ────────────────────────────────────────────────────────────

#[test]
fn test_add_all_lanes() {
    let ctx = run_uppers(
        |c| {
            c.set_vf_f32(1, [1.0, 2.0, 3.0, 4.0]);
            c.set_vf_f32(2, [10.0, 20.0, 30.0, 40.0]);
        },
        &[micro::add(Lanes::ALL, 3, 1, 2)],
    );
    assert_eq!(ctx.vf_f32(3), [11.0, 22.0, 33.0, 44.0]);
}

#[test]
fn test_dest_mask_preserves_other_lanes() {
    let ctx = run_uppers(
        |c| {
            c.set_vf_f32(1, [1.0, 2.0, 3.0, 4.0]);
            c.set_vf_f32(2, [1.0, 1.0, 1.0, 1.0]);
            c.set_vf_f32(3, [-1.0, -2.0, -3.0, -4.0]);
        },
        &[micro::add(Lanes::X.union(Lanes::Z), 3, 1, 2)],
    );
    assert_eq!(ctx.vf_f32(3), [2.0, -2.0, 4.0, -4.0]);
}

#[test]
fn test_sub_and_mul() {
    let ctx = run_uppers(
        |c| {
            c.set_vf_f32(1, [5.0, 6.0, 7.0, 8.0]);
            c.set_vf_f32(2, [1.0, 2.0, 3.0, 4.0]);
        },
        &[micro::sub(Lanes::ALL, 3, 1, 2), micro::mul(Lanes::ALL, 4, 1, 2)],
    );
    assert_eq!(ctx.vf_f32(3), [4.0, 4.0, 4.0, 4.0]);
    assert_eq!(ctx.vf_f32(4), [5.0, 12.0, 21.0, 32.0]);
}

#[test]
fn test_broadcast_uses_selected_lane() {
    let ctx = run_uppers(
        |c| {
            c.set_vf_f32(1, [1.0, 2.0, 3.0, 4.0]);
            c.set_vf_f32(2, [10.0, 20.0, 30.0, 40.0]);
        },
        &[micro::add_bc(Lanes::ALL, 3, 1, 2, 2), micro::mul_bc(Lanes::ALL, 4, 1, 2, 3)],
    );
    assert_eq!(ctx.vf_f32(3), [31.0, 32.0, 33.0, 34.0]);
    assert_eq!(ctx.vf_f32(4), [40.0, 80.0, 120.0, 160.0]);
}

#[test]
fn test_vf0_is_a_usable_operand() {
    let ctx = run_uppers(|c| c.set_vf_f32(1, [1.0; 4]), &[micro::add(Lanes::ALL, 2, 1, 0)]);
    assert_eq!(ctx.vf_f32(2), [1.0, 1.0, 1.0, 2.0]);
}

#[test]
fn test_results_to_vf0_are_dropped() {
    let ctx = run_uppers(|c| c.set_vf_f32(1, [3.0; 4]), &[micro::add(Lanes::ALL, 0, 1, 1)]);
    assert_eq!(ctx.vf_f32(0), [0.0, 0.0, 0.0, 1.0]);
    assert!(ctx.vu.regs().is_pinned());
}

#[test]
fn test_i_operand_from_immediate_word() {
    // The I load lands after the upper half of its own word.
    let program = Program::new()
        .pair(micro::add_i(Lanes::ALL, 2, 1) | flags::I, 2.0f32.to_bits())
        .upper(micro::add_i(Lanes::ALL, 3, 1));
    let mut ctx = TestContext::untimed().load(&program);
    ctx.set_vf_f32(1, [1.0; 4]);
    ctx.vu.regs_mut().set_special(Special::I, 10.0f32.to_bits());
    ctx.step_n(2);
    assert_eq!(ctx.vf_f32(2), [11.0; 4]);
    assert_eq!(ctx.vf_f32(3), [3.0; 4]);
    assert_eq!(ctx.vu.regs().special(Special::I), 2.0f32.to_bits());
}

#[test]
fn test_q_operand() {
    let ctx = run_uppers(
        |c| {
            c.set_vf_f32(1, [1.0, 2.0, 3.0, 4.0]);
            c.vu.regs_mut().set_special(Special::Q, 0.5f32.to_bits());
        },
        &[micro::mul_q(Lanes::ALL, 2, 1)],
    );
    assert_eq!(ctx.vf_f32(2), [0.5, 1.0, 1.5, 2.0]);
}

#[test]
fn test_accumulator_forms() {
    let ctx = run_uppers(
        |c| {
            c.set_vf_f32(1, [1.0, 2.0, 3.0, 4.0]);
            c.set_vf_f32(2, [2.0, 2.0, 2.0, 2.0]);
        },
        &[
            micro::mula(Lanes::ALL, 1, 2),
            micro::madd(Lanes::ALL, 3, 1, 2),
            micro::adda(Lanes::ALL, 1, 1),
        ],
    );
    // MULA: acc = 2, 4, 6, 8; MADD: vf3 = acc + 2, 4, 6, 8.
    assert_eq!(ctx.vf_f32(3), [4.0, 8.0, 12.0, 16.0]);
    let acc = ctx.vu.regs().acc().map(f32::from_bits);
    assert_eq!(acc, [2.0, 4.0, 6.0, 8.0]);
}

// ─── Flags ─────────────────────────────────────────────────────────────────

#[test]
fn test_mac_zero_and_sign_bits() {
    let ctx = run_uppers(
        |c| {
            c.set_vf_f32(1, [1.0, -1.0, 2.0, 0.0]);
            c.set_vf_f32(2, [1.0, 1.0, 1.0, 0.0]);
        },
        &[micro::sub(Lanes::ALL, 3, 1, 2)],
    );
    // x zero (bit 3), w zero (bit 0), y sign (bit 6).
    assert_eq!(mac(&ctx), 0x0008 | 0x0001 | 0x0040);
    assert_eq!(status(&ctx) & 0xF, 0x3);
}

#[test]
fn test_mac_overflow_clamps_result() {
    let ctx = run_uppers(
        |c| c.set_vf_f32(1, [3.0e38, 1.0, 1.0, 1.0]),
        &[micro::mul(Lanes::X, 2, 1, 1)],
    );
    assert_eq!(ctx.vu.regs().vf(2)[0], FLOAT_MAX);
    assert_eq!(mac(&ctx), 0x8000);
    assert_eq!(status(&ctx) & 0xF, 0x8);
}

#[test]
fn test_mac_underflow_flushes_to_zero() {
    let ctx = run_uppers(
        |c| c.set_vf_f32(1, [1.0e-20, 1.0, 1.0, 1.0]),
        &[micro::mul(Lanes::X, 2, 1, 1)],
    );
    assert_eq!(ctx.vu.regs().vf(2)[0], 0);
    // underflow and zero on x
    assert_eq!(mac(&ctx), 0x0800 | 0x0008);
    assert_eq!(status(&ctx) & 0x4, 0x4);
}

#[test]
fn test_unwritten_lanes_clear_their_flags() {
    let ctx = run_uppers(
        |c| c.set_vf_f32(1, [0.0; 4]),
        &[micro::add(Lanes::ALL, 2, 1, 1), micro::add(Lanes::X, 3, 1, 1)],
    );
    assert_eq!(mac(&ctx), 0x0008);
}

#[test]
fn test_status_keeps_previous_summary() {
    let ctx = run_uppers(
        |c| {
            c.set_vf_f32(1, [0.0; 4]);
            c.set_vf_f32(2, [1.0; 4]);
        },
        &[micro::add(Lanes::ALL, 3, 1, 1), micro::add(Lanes::ALL, 4, 2, 2)],
    );
    // Second op is non-zero; the first op's zero summary moves up six bits.
    assert_eq!(status(&ctx) & 0xF, 0);
    assert_eq!(status(&ctx) & 0x3C0, 0x040);
}

// ─── Clamping ──────────────────────────────────────────────────────────────

#[test]
fn test_infinite_operand_reads_as_max() {
    let ctx = run_uppers(
        |c| c.set_vf(1, [0x7F80_0000, 0xFF80_0000, 0x7FC0_0000, 0]),
        &[micro::add(Lanes::ALL, 2, 1, 0)],
    );
    let vf2 = ctx.vu.regs().vf(2);
    assert_eq!(vf2[0], FLOAT_MAX);
    assert_eq!(vf2[1], FLOAT_MAX | 0x8000_0000);
    assert_eq!(vf2[2], FLOAT_MAX);
}

#[test]
fn test_denormal_operand_reads_as_zero() {
    let ctx = run_uppers(
        |c| c.set_vf(1, [0x0000_0001, 0x8000_0001, 0, 0]),
        &[micro::mul(Lanes::X.union(Lanes::Y), 2, 1, 1)],
    );
    assert_eq!(ctx.vu.regs().vf(2)[0], 0);
    assert_eq!(mac(&ctx) & 0x000C, 0x000C);
}

// ─── MAX, MINI, ABS ────────────────────────────────────────────────────────

#[test]
fn test_max_and_mini_order_lanes() {
    let ctx = run_uppers(
        |c| {
            c.set_vf_f32(1, [-1.0, 5.0, -3.0, 0.0]);
            c.set_vf_f32(2, [2.0, 4.0, -2.0, -0.0]);
        },
        &[micro::max(Lanes::ALL, 3, 1, 2), micro::mini(Lanes::ALL, 4, 1, 2)],
    );
    assert_eq!(ctx.vf_f32(3)[..3], [2.0, 5.0, -2.0]);
    assert_eq!(ctx.vf_f32(4)[..3], [-1.0, 4.0, -3.0]);
    assert_eq!(mac(&ctx), 0, "MAX and MINI set no flags");
}

#[test]
fn test_abs_clears_sign() {
    let ctx = run_uppers(
        |c| c.set_vf_f32(1, [-3.0, 2.0, -0.5, -0.0]),
        &[micro::abs(Lanes::ALL, 2, 1)],
    );
    assert_eq!(ctx.vf_f32(2), [3.0, 2.0, 0.5, 0.0]);
}

// ─── Conversions ───────────────────────────────────────────────────────────

#[test]
fn test_ftoi_truncates() {
    let ctx = run_uppers(
        |c| c.set_vf_f32(1, [2.7, -2.7, 1.5, 0.0]),
        &[micro::ftoi0(Lanes::ALL, 2, 1), micro::ftoi4(Lanes::ALL, 3, 1)],
    );
    assert_eq!(ctx.vu.regs().vf(2), [2, (-2i32) as u32, 1, 0]);
    assert_eq!(ctx.vu.regs().vf(3)[2], 24);
}

#[test]
fn test_ftoi_saturates() {
    let ctx = run_uppers(
        |c| c.set_vf_f32(1, [3.0e38, -3.0e38, 0.0, 0.0]),
        &[micro::ftoi0(Lanes::X.union(Lanes::Y), 2, 1)],
    );
    assert_eq!(ctx.vu.regs().vf(2)[0], i32::MAX as u32);
    assert_eq!(ctx.vu.regs().vf(2)[1], i32::MIN as u32);
}

#[test]
fn test_itof_converts_signed() {
    let ctx = run_uppers(
        |c| c.set_vf(1, [5, (-7i32) as u32, 0, 100]),
        &[micro::itof0(Lanes::ALL, 2, 1)],
    );
    assert_eq!(ctx.vf_f32(2), [5.0, -7.0, 0.0, 100.0]);
}

// ─── CLIP ──────────────────────────────────────────────────────────────────

#[test]
fn test_clip_judgements() {
    let ctx = run_uppers(
        |c| {
            c.set_vf_f32(1, [2.0, -3.0, 0.5, 0.0]);
            c.set_vf_f32(2, [0.0, 0.0, 0.0, -1.0]);
        },
        &[micro::clip(1, 2)],
    );
    // +x (bit 0) and -y (bit 3); the w limit is taken as |w|.
    assert_eq!(ctx.vu.regs().special(Special::Clip), 0x09);
}

#[test]
fn test_clip_shifts_history() {
    let ctx = run_uppers(
        |c| {
            c.set_vf_f32(1, [2.0, 0.0, 0.0, 0.0]);
            c.set_vf_f32(2, [0.0, 0.0, -5.0, 1.0]);
        },
        &[micro::clip(1, 0), micro::clip(2, 0)],
    );
    // First: +x. Second: -z.
    assert_eq!(ctx.vu.regs().special(Special::Clip), (0x01 << 6) | 0x20);
}

#[test]
fn test_clip_history_is_24_bits() {
    let mut uppers = vec![micro::clip(1, 0); 5];
    uppers.push(micro::nop());
    let ctx = run_uppers(|c| c.set_vf_f32(1, [2.0, 0.0, 0.0, 0.0]), &uppers);
    assert_eq!(ctx.vu.regs().special(Special::Clip), 0x0004_1041);
}

// ─── Outer product ─────────────────────────────────────────────────────────

#[test]
fn test_outer_product_is_cross_product() {
    let ctx = run_uppers(
        |c| {
            c.set_vf_f32(1, [1.0, 2.0, 3.0, 0.0]);
            c.set_vf_f32(2, [4.0, 5.0, 6.0, 0.0]);
            c.set_vf_f32(3, [0.0, 0.0, 0.0, 9.0]);
        },
        &[micro::opmula(1, 2), micro::opmsub(3, 2, 1)],
    );
    // (1, 2, 3) x (4, 5, 6) = (-3, 6, -3); w is untouched.
    assert_eq!(ctx.vf_f32(3), [-3.0, 6.0, -3.0, 9.0]);
}

#[test]
fn test_nop_changes_nothing() {
    let mut ctx = TestContext::untimed().load(&Program::new().upper(micro::nop()));
    ctx.set_vf_f32(1, [1.0; 4]);
    let before = ctx.vu.regs().clone();
    ctx.step_n(1);
    assert_eq!(*ctx.vu.regs(), before);
}

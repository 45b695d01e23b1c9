//! Controller Tests.
//!
//! Drives `Vu::step` and `Vu::run` through whole programs and checks the
//! sequencing rules:
//! 1. **Fetch:** Halting when the program counter leaves micro memory.
//! 2. **Flag bits:** I, E, M, D and T handling.
//! 3. **Run control:** Step limits, stop requests, disable and reset.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use vusim_core::common::reg::Special;
use vusim_core::config::{UnitKind, VuConfig};
use vusim_core::core::arch::vf::Lanes;
use vusim_core::core::{StepOutcome, VuState};
use vusim_core::soc::NullSink;

use crate::common::builder::micro::{self, flags};
use crate::common::builder::program::Program;
use crate::common::harness::{TestContext, links_with};
use crate::common::mocks::interrupts::{MockInterrupts, RecordingInterrupts};

// ─── Fetch and halt ────────────────────────────────────────────────────────

#[test]
fn test_idle_unit_ignores_steps() {
    let mut ctx = TestContext::new();
    assert_eq!(ctx.step(), StepOutcome::Idle);
    assert_eq!(ctx.vu.stats().steps, 0);
}

#[test]
fn test_start_outside_micro_memory_halts() {
    let mut ctx = TestContext::new();
    ctx.set_vi(3, 5);
    let before = ctx.vu.regs().clone();
    ctx.vu.start(0x4000);

    assert_eq!(ctx.step(), StepOutcome::Halted);
    assert_eq!(*ctx.vu.regs(), before);
    assert_eq!(ctx.vu.state(), VuState::Halted);
    assert_eq!(ctx.vu.pipeline().pc, 0);
    assert_eq!(ctx.vu.pipeline().cycle, 1);
    assert_eq!(ctx.vu.stats().halts, 1);
    assert_eq!(ctx.links.control.vpu_stat() & 0x100, 0);
}

#[test]
fn test_running_off_the_end_halts() {
    let mut ctx = TestContext::new();
    let last = ctx.vu.micro_mem().len() - 8;
    let word = Program::new().lower(micro::iaddiu(1, 0, 1));
    ctx.vu.load_program(last, &word.bytes()).unwrap();
    ctx.vu.start(last as u32);

    assert_eq!(ctx.step(), StepOutcome::Executed);
    assert_eq!(ctx.step(), StepOutcome::Halted);
    assert_eq!(ctx.vi(1), 1);
}

#[test]
fn test_run_stops_at_halt() {
    let mut ctx = TestContext::new();
    ctx.vu.start(0x4000);
    let summary = ctx.vu.run(10, &AtomicBool::new(false));
    assert_eq!(summary.steps, 0);
    assert_eq!(summary.outcome, StepOutcome::Halted);
}

// ─── Flag bits ─────────────────────────────────────────────────────────────

#[test]
fn test_e_bit_runs_one_more_word() {
    let program = Program::new()
        .pair(micro::nop() | flags::E, micro::lnop())
        .lower(micro::iaddiu(1, 0, 1))
        .lower(micro::iaddiu(2, 0, 1));
    let mut ctx = TestContext::new().load(&program);
    assert!(ctx.links.vif.vew());

    assert_eq!(ctx.step(), StepOutcome::Executed);
    assert_eq!(ctx.vu.state(), VuState::Completing);
    assert_eq!(ctx.step(), StepOutcome::Completed);
    assert_eq!(ctx.step(), StepOutcome::Idle);

    assert_eq!((ctx.vi(1), ctx.vi(2)), (1, 0));
    assert_eq!(ctx.vu.state(), VuState::Halted);
    assert!(!ctx.links.vif.vew());
    assert_eq!(ctx.links.control.vpu_stat() & 0x100, 0);
    assert_eq!(ctx.vu.stats().completions, 1);
}

#[test]
fn test_e_bit_in_delay_word_does_not_restart() {
    let program = Program::new()
        .pair(micro::nop() | flags::E, micro::lnop())
        .pair(micro::nop() | flags::E, micro::lnop())
        .nops(2);
    let mut ctx = TestContext::new().load(&program);
    let summary = ctx.run();
    assert_eq!(summary.steps, 2);
    assert_eq!(summary.outcome, StepOutcome::Completed);
}

#[test]
fn test_e_bit_in_branch_delay_slot() {
    let program = Program::new()
        .lower(micro::b(2))
        .pair(micro::nop() | flags::E, micro::lnop())
        .lower(micro::iaddiu(1, 0, 1))
        .lower(micro::iaddiu(2, 0, 1));
    let mut ctx = TestContext::new().load(&program);
    let summary = ctx.run();
    // The word after the delay slot is the branch target.
    assert_eq!(summary.steps, 3);
    assert_eq!((ctx.vi(1), ctx.vi(2)), (0, 1));
}

#[test]
fn test_i_bit_loads_lower_word() {
    let program = Program::new().pair(micro::nop() | flags::I, micro::iaddiu(1, 0, 1));
    let mut ctx = TestContext::new().load(&program);
    ctx.step_n(1);
    assert_eq!(ctx.vi(1), 0);
    assert_eq!(ctx.vu.regs().special(Special::I), micro::iaddiu(1, 0, 1));
    assert_eq!(ctx.vu.stats().immediate_loads, 1);
}

#[test]
fn test_m_bit_is_taken_once() {
    let program = Program::new().pair(micro::nop() | flags::M, micro::lnop()).nops(1);
    let mut ctx = TestContext::new().load(&program);
    assert!(!ctx.vu.take_mbit());
    ctx.step_n(1);
    assert!(ctx.vu.take_mbit());
    assert!(!ctx.vu.take_mbit());
}

fn debug_program(flag: u32) -> Program {
    Program::new().pair(micro::nop() | flag, micro::lnop()).nops(1)
}

#[test]
fn test_enabled_d_bit_raises_interrupt() {
    let mut mock = MockInterrupts::new();
    let _ = mock.expect_raise().with(eq(7)).times(1).return_const(());
    let links = links_with(Arc::new(mock), Arc::new(NullSink));
    links.control.set_fbrst(0x400);

    let mut ctx =
        TestContext::with(VuConfig::for_unit(UnitKind::Vu1), links).load(&debug_program(flags::D));
    ctx.step_n(2);
    assert!(ctx.vu.pipeline().dbit);
    assert_eq!(ctx.links.control.vpu_stat() & 0x200, 0x200);
    assert_eq!(ctx.vu.stats().interrupts_raised, 1);
}

#[test]
fn test_enabled_t_bit_raises_interrupt() {
    let irq = Arc::new(RecordingInterrupts::new());
    let links = links_with(irq.clone(), Arc::new(NullSink));
    links.control.set_fbrst(0x800);

    let mut ctx =
        TestContext::with(VuConfig::for_unit(UnitKind::Vu1), links).load(&debug_program(flags::T));
    ctx.step_n(1);
    assert_eq!(irq.raised(), vec![7]);
    assert!(ctx.vu.pipeline().tbit);
    assert_eq!(ctx.links.control.vpu_stat() & 0x400, 0x400);
}

#[test]
fn test_disabled_debug_bits_are_ignored() {
    let mut mock = MockInterrupts::new();
    let _ = mock.expect_raise().never();
    let links = links_with(Arc::new(mock), Arc::new(NullSink));
    // D enabled for the other unit only.
    links.control.set_fbrst(0x004);

    let mut ctx = TestContext::with(VuConfig::for_unit(UnitKind::Vu1), links)
        .load(&debug_program(flags::D | flags::T));
    ctx.step_n(2);
    assert!(!ctx.vu.pipeline().dbit);
    assert_eq!(ctx.links.control.vpu_stat() & 0x600, 0);
}

#[test]
fn test_vu0_uses_its_own_line() {
    let irq = Arc::new(RecordingInterrupts::new());
    let links = links_with(irq.clone(), Arc::new(NullSink));
    links.control.set_fbrst(0x004);

    let mut ctx =
        TestContext::with(VuConfig::for_unit(UnitKind::Vu0), links).load(&debug_program(flags::D));
    ctx.step_n(1);
    assert_eq!(irq.raised(), vec![6]);
    assert_eq!(ctx.links.control.vpu_stat() & 0x002, 0x002);
}

#[test]
fn test_start_clears_debug_status() {
    let links = links_with(Arc::new(NullSink), Arc::new(NullSink));
    links.control.set_fbrst(0x400);
    let mut ctx =
        TestContext::with(VuConfig::for_unit(UnitKind::Vu1), links).load(&debug_program(flags::D));
    ctx.step_n(1);
    ctx.vu.start(0);
    assert_eq!(ctx.links.control.vpu_stat() & 0x200, 0);
    assert!(!ctx.vu.pipeline().dbit);
}

// ─── Run control ───────────────────────────────────────────────────────────

#[test]
fn test_run_respects_step_limit() {
    let mut ctx = TestContext::new().load(&Program::new().nops(10).end());
    let summary = ctx.vu.run(4, &AtomicBool::new(false));
    assert_eq!(summary.steps, 4);
    assert_eq!(summary.outcome, StepOutcome::Executed);
    assert!(!summary.stopped);
    assert_eq!(ctx.vu.pipeline().pc, 32);
}

#[test]
fn test_run_honours_stop_request() {
    let mut ctx = TestContext::new().load(&Program::new().nops(10).end());
    let summary = ctx.vu.run(100, &AtomicBool::new(true));
    assert!(summary.stopped);
    assert_eq!(summary.steps, 0);
    assert_eq!(ctx.vu.state(), VuState::Running);
}

#[test]
fn test_run_to_completion() {
    let mut ctx = TestContext::new().load(&Program::new().nops(3).end());
    let summary = ctx.run();
    assert_eq!(summary.steps, 5);
    assert_eq!(summary.outcome, StepOutcome::Completed);
}

#[test]
fn test_disable_stops_the_unit() {
    let mut ctx = TestContext::new().load(&Program::new().nops(4));
    ctx.step_n(1);
    ctx.vu.disable();
    assert_eq!(ctx.vu.state(), VuState::Halted);
    assert_eq!(ctx.step(), StepOutcome::Idle);
    assert_eq!(ctx.links.control.vpu_stat() & 0x100, 0);
}

#[test]
fn test_reset_keeps_registers() {
    let program = Program::new().upper(micro::add(Lanes::ALL, 3, 1, 1)).nops(1);
    let mut ctx = TestContext::new().load(&program);
    ctx.set_vf_f32(1, [1.0; 4]);
    ctx.step_n(1);
    ctx.vu.reset();

    assert_eq!(ctx.vu.state(), VuState::Halted);
    assert!(ctx.vu.pipes().is_empty());
    assert_eq!(ctx.vu.pipeline().cycle, 0);
    assert_eq!(ctx.vf_f32(3), [2.0; 4]);
    // The in-flight flags were dropped.
    assert_eq!(ctx.vu.regs().special(Special::Mac), 0);
}

#[test]
fn test_clear_registers_restores_power_on() {
    let mut ctx = TestContext::new();
    ctx.set_vf_f32(5, [3.0; 4]);
    ctx.set_vi(5, 3);
    ctx.vu.clear_registers();
    assert_eq!(ctx.vf_f32(5), [0.0; 4]);
    assert_eq!(ctx.vi(5), 0);
    assert_eq!(ctx.vf_f32(0), [0.0, 0.0, 0.0, 1.0]);
}

#[test]
fn test_restart_after_completion() {
    let program = Program::new().lower(micro::iaddiu(1, 1, 1)).end();
    let mut ctx = TestContext::new().load(&program);
    let _ = ctx.run();
    ctx.vu.start(0);
    assert!(ctx.links.vif.vew());
    let _ = ctx.run();
    assert_eq!(ctx.vi(1), 2);
    assert_eq!(ctx.vu.stats().completions, 2);
}

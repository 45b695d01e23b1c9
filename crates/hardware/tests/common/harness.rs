use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use vusim_core::config::{Config, UnitKind, VuConfig};
use vusim_core::core::arch::vf::{Lanes, Vector};
use vusim_core::core::{RunSummary, StepOutcome, Vu};
use vusim_core::soc::Collaborators;

use super::builder::program::Program;

/// Steps allowed to `TestContext::run` before a test is considered hung.
const RUN_LIMIT: u64 = 10_000;

pub struct TestContext {
    pub vu: Vu,
    pub links: Collaborators,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// A VU1 with stall accounting enabled and detached collaborators.
    pub fn new() -> Self {
        Self::with(VuConfig::for_unit(UnitKind::Vu1), Collaborators::detached())
    }

    /// A VU1 whose results retire at the end of their step.
    pub fn untimed() -> Self {
        let mut config = VuConfig::for_unit(UnitKind::Vu1);
        config.stall_accounting = false;
        Self::with(config, Collaborators::detached())
    }

    /// A unit with explicit configuration and collaborators.
    pub fn with(config: VuConfig, links: Collaborators) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let config = Config { vu: config };
        let vu = Vu::new(&config, links.clone()).unwrap();
        Self { vu, links }
    }

    /// Loads `program` at address 0 and starts it there.
    pub fn load(mut self, program: &Program) -> Self {
        self.vu.load_program(0, &program.bytes()).unwrap();
        self.vu.start(0);
        self
    }

    pub fn set_vf(&mut self, reg: usize, val: Vector) {
        self.vu.regs_mut().set_vf(reg, Lanes::ALL, val);
    }

    pub fn set_vf_f32(&mut self, reg: usize, val: [f32; 4]) {
        self.set_vf(reg, val.map(f32::to_bits));
    }

    pub fn vf_f32(&self, reg: usize) -> [f32; 4] {
        self.vu.regs().vf(reg).map(f32::from_bits)
    }

    pub fn set_vi(&mut self, reg: usize, val: u16) {
        self.vu.regs_mut().set_vi(reg, val);
    }

    pub fn vi(&self, reg: usize) -> u16 {
        self.vu.regs().vi(reg)
    }

    pub fn step(&mut self) -> StepOutcome {
        self.vu.step()
    }

    /// Steps `count` times, asserting each step executed a micro-word.
    pub fn step_n(&mut self, count: usize) {
        for i in 0..count {
            let outcome = self.vu.step();
            assert_eq!(outcome, StepOutcome::Executed, "step {i}");
        }
    }

    /// Runs until the unit stops.
    pub fn run(&mut self) -> RunSummary {
        let summary = self.vu.run(RUN_LIMIT, &AtomicBool::new(false));
        assert!(summary.steps < RUN_LIMIT, "program did not finish");
        summary
    }
}

/// Collaborators sharing the given sinks, with fresh control block and link.
pub fn links_with(
    interrupts: Arc<dyn vusim_core::soc::InterruptSink>,
    gif: Arc<dyn vusim_core::soc::GifSink>,
) -> Collaborators {
    Collaborators {
        interrupts,
        gif,
        ..Collaborators::detached()
    }
}

//! Vector unit controller.
//!
//! `Vu` is the externally stepped state machine of one unit. Each step runs one
//! micro-word:
//! 1. **Fetch:** Halts when the program counter has left micro memory, otherwise
//!    fetches the micro-word and resolves a due branch.
//! 2. **Flag bits:** Handles the I, E, M, D and T bits of the upper word.
//! 3. **Issue:** Analyzes both halves, resolves dual-issue hazards, charges pipe
//!    stalls and executes upper then lower.
//! 4. **Retire:** Enters new results into the pipes, advances the cycle counter
//!    and runs the end-of-program countdown.
//!
//! The unit never fails on guest input; host-side loading and save-state
//! operations return `Result`.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, trace, warn};

use crate::common::constants::{EBIT_COUNTDOWN, MICROWORD_BYTES, STATUS_UPDATE_INTERVAL};
use crate::common::error::{Result, VuError};
use crate::common::reg::{RegisterFile, Special};
use crate::config::{Config, VuConfig};
use crate::core::analyzer::{self, Usage};
use crate::core::exec::Core;
use crate::core::hazards::{self, Bypass};
use crate::core::pipeline::PipelineState;
use crate::core::pipes::Pipes;
use crate::core::state::VuSnapshot;
use crate::isa::dispatch::{self, Handler, LOWER, UPPER};
use crate::isa::fields::MicroBits;
use crate::sim::loader;
use crate::soc::Collaborators;
use crate::stats::VuStats;

/// What a single call to `Vu::step` did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StepOutcome {
    /// The unit is not running; nothing happened.
    #[default]
    Idle,
    /// The program counter was outside micro memory; the unit stopped.
    Halted,
    /// A micro-word executed.
    Executed,
    /// A micro-word executed and ended the end-of-program countdown.
    Completed,
}

/// Externally visible run state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VuState {
    /// Executing micro-words.
    Running,
    /// Not running: never started, halted, completed or disabled.
    Halted,
    /// Executing the micro-words after an E bit.
    Completing,
}

/// Result of `Vu::run`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Micro-words executed.
    pub steps: u64,
    /// Outcome of the last step taken.
    pub outcome: StepOutcome,
    /// The run ended on a stop request.
    pub stopped: bool,
}

/// One vector unit.
#[derive(Debug)]
pub struct Vu {
    core: Core,
    config: VuConfig,
    trace: bool,
    stats: VuStats,
}

impl Vu {
    /// Creates a stopped unit with zeroed memories.
    ///
    /// # Arguments
    ///
    /// * `config` - Unit configuration; validated before use.
    /// * `links` - Shared control block and signal paths.
    ///
    /// # Returns
    ///
    /// The unit, or `VuError::InvalidConfig` for inconsistent memory sizing.
    pub fn new(config: &Config, links: Collaborators) -> Result<Self> {
        let config = config.vu.clone();
        config.validate()?;
        let core = Core::new(config.unit, config.micro_size(), config.data_size(), links);
        Ok(Self {
            core,
            trace: config.trace || cfg!(feature = "always-trace"),
            config,
            stats: VuStats::default(),
        })
    }

    /// Starts a micro-program at `pc`.
    ///
    /// Aligns `pc` to a micro-word, sets the busy status, clears the debug
    /// status bits and any end-of-program or branch state left from the
    /// previous program.
    pub fn start(&mut self, pc: u32) {
        let unit = self.core.unit;
        let p = &mut self.core.pipeline;
        p.pc = pc & !(MICROWORD_BYTES - 1);
        p.tpc = p.pc;
        p.branch = 0;
        p.ebit = 0;
        p.dbit = false;
        p.tbit = false;
        p.busy = true;
        let control = &self.core.links.control;
        control.clear_stat(unit.stat_dbit() | unit.stat_tbit());
        control.set_stat(unit.stat_busy());
        self.core.links.vif.set_vew(true);
        debug!(pc = p.pc, ?unit, "start");
    }

    /// Returns the unit's run state.
    pub const fn state(&self) -> VuState {
        let p = &self.core.pipeline;
        if !p.busy {
            VuState::Halted
        } else if p.completing() {
            VuState::Completing
        } else {
            VuState::Running
        }
    }

    /// Reinitializes the sequencing state and drops in-flight results.
    ///
    /// Registers and memories are left untouched.
    pub fn reset(&mut self) {
        self.core.pipeline = PipelineState::new();
        self.core.pipes.clear();
        let unit = self.core.unit;
        self.core
            .links
            .control
            .clear_stat(unit.stat_busy() | unit.stat_dbit() | unit.stat_tbit());
    }

    /// Returns every register to its power-on value.
    pub fn clear_registers(&mut self) {
        self.core.regs.clear();
        self.core.pipes.clear();
    }

    /// Stops the unit on external request.
    pub fn disable(&mut self) {
        if self.core.pipeline.busy {
            info!(pc = self.core.pipeline.pc, "disabled");
        }
        self.stop();
    }

    fn stop(&mut self) {
        self.core.pipeline.busy = false;
        self.core.links.control.clear_stat(self.core.unit.stat_busy());
    }

    fn halt(&mut self) {
        let pc = self.core.pipeline.pc;
        info!(pc, size = self.core.micro.len(), "pc outside micro memory, halting");
        self.stop();
        self.core.pipeline.pc = 0;
        self.core.pipeline.cycle += 1;
        self.stats.halts += 1;
        self.stats.cycles = self.core.pipeline.cycle;
    }

    /// Handles the D and T request bits of an upper word.
    fn debug_requests(&mut self, upper: u32) {
        let unit = self.core.unit;
        let links = &self.core.links;
        let requests = [
            (upper.d_bit(), unit.fbrst_de(), unit.stat_dbit()),
            (upper.t_bit(), unit.fbrst_te(), unit.stat_tbit()),
        ];
        for (i, (requested, enable, stat)) in requests.into_iter().enumerate() {
            if !requested || !links.control.fbrst_enabled(enable) {
                continue;
            }
            links.control.set_stat(stat);
            if i == 0 {
                self.core.pipeline.dbit = true;
            } else {
                self.core.pipeline.tbit = true;
            }
            links.interrupts.raise(unit.irq_line());
            self.stats.interrupts_raised += 1;
            debug!(line = unit.irq_line(), stat, "debug request");
        }
    }

    /// Executes one micro-word.
    ///
    /// # Returns
    ///
    /// What the step did. A unit that is not running returns
    /// `StepOutcome::Idle` without touching any state.
    ///
    /// # Panics
    ///
    /// In debug builds, if `vf00` or `vi00` no longer holds its constant.
    pub fn step(&mut self) -> StepOutcome {
        if !self.core.pipeline.busy {
            return StepOutcome::Idle;
        }
        let pc = self.core.pipeline.pc;
        if pc as usize >= self.core.micro.len() {
            self.halt();
            return StepOutcome::Halted;
        }

        let (lower, upper) = self.core.fetch(pc);
        let follow = pc.wrapping_add(MICROWORD_BYTES);
        self.core.pipeline.tpc = follow;
        self.core.pipeline.pc = match self.core.pipeline.take_due_branch() {
            Some(target) => {
                debug!(from = pc, to = target, "branch taken");
                self.stats.branches_taken += 1;
                target
            }
            None => follow,
        };

        if upper.e_bit() && self.core.pipeline.ebit == 0 {
            self.core.pipeline.ebit = EBIT_COUNTDOWN;
        }
        if upper.m_bit() {
            self.core.pipeline.mbit = true;
        }
        if upper.d_bit() || upper.t_bit() {
            self.debug_requests(upper);
        }

        let immediate = upper.i_bit();
        let (uh, uu) = analyzer::analyze_upper(upper);
        let (lh, mut lu) = if immediate {
            (None, Usage::EMPTY)
        } else {
            let (h, u) = analyzer::analyze_lower(lower);
            (Some(h), u)
        };
        let plan = hazards::resolve(&uu, &lu, immediate);
        if plan.discard_lower {
            warn!(
                pc,
                upper = uh.name(),
                lower = lh.map_or("", Handler::name),
                "both slots write the same destination, lower discarded"
            );
            self.stats.lower_discards += 1;
            lu = Usage::EMPTY;
        }

        if self.trace {
            trace!(pc, upper = uh.name(), lower = lh.map_or("LOI", Handler::name), "step");
        }

        let c = &mut self.core;
        let cycle = &mut c.pipeline.cycle;
        c.pipes.retire_expired(&mut c.regs, *cycle);
        let mut stall = c.pipes.test_upper(&uu, &mut c.regs, cycle);
        stall += c.pipes.test_lower(&lu, &mut c.regs, cycle);
        self.stats.stall_cycles += stall;

        if immediate {
            let _ = dispatch::dispatch(&UPPER, upper, &mut self.core);
            self.core.regs.set_special(Special::I, lower);
            self.stats.immediate_loads += 1;
        } else if plan.runs_lower() {
            let mut bypass = Bypass::capture(&plan, &self.core.regs);
            let _ = dispatch::dispatch(&UPPER, upper, &mut self.core);
            if !bypass.is_empty() {
                bypass.swap(&mut self.core.regs);
                self.stats.snapshot_substitutions += 1;
            }
            let _ = dispatch::dispatch(&LOWER, lower, &mut self.core);
            bypass.swap(&mut self.core.regs);
        } else {
            let _ = dispatch::dispatch(&UPPER, upper, &mut self.core);
        }

        let timed = self.config.stall_accounting;
        let c = &mut self.core;
        let now = c.pipeline.cycle;
        c.pipes.add_upper(&uu, &mut c.regs, now, timed);
        c.pipes.add_lower(&lu, &mut c.regs, now, timed);
        c.pipes.retire_expired(&mut c.regs, now);
        c.pipeline.cycle += 1;
        self.stats.steps += 1;

        let mut outcome = StepOutcome::Executed;
        if self.core.pipeline.ebit > 0 {
            self.core.pipeline.ebit -= 1;
            if self.core.pipeline.ebit == 0 {
                self.core.flush_pipes();
                self.stop();
                self.core.links.vif.set_vew(false);
                self.stats.completions += 1;
                info!(pc, cycle = self.core.pipeline.cycle, "program complete");
                outcome = StepOutcome::Completed;
            }
        }
        self.stats.cycles = self.core.pipeline.cycle;

        debug_assert!(self.core.regs.is_pinned(), "vf00 or vi00 was overwritten");
        outcome
    }

    /// Steps until the unit stops, `max_steps` micro-words have executed, or
    /// `stop` is set.
    ///
    /// `stop` is only checked between steps.
    pub fn run(&mut self, max_steps: u64, stop: &AtomicBool) -> RunSummary {
        let mut summary = RunSummary::default();
        while summary.steps < max_steps {
            if stop.load(Ordering::Relaxed) {
                summary.stopped = true;
                break;
            }
            summary.outcome = self.step();
            match summary.outcome {
                StepOutcome::Executed => summary.steps += 1,
                StepOutcome::Completed => {
                    summary.steps += 1;
                    break;
                }
                StepOutcome::Idle | StepOutcome::Halted => break,
            }
            if summary.steps.is_multiple_of(STATUS_UPDATE_INTERVAL) {
                debug!(
                    steps = summary.steps,
                    cycle = self.core.pipeline.cycle,
                    pc = self.core.pipeline.pc,
                    "status"
                );
            }
        }
        summary
    }

    /// Register file.
    pub const fn regs(&self) -> &RegisterFile {
        &self.core.regs
    }

    /// Mutable register file. Only valid between steps.
    pub const fn regs_mut(&mut self) -> &mut RegisterFile {
        &mut self.core.regs
    }

    /// Sequencing state.
    pub const fn pipeline(&self) -> &PipelineState {
        &self.core.pipeline
    }

    /// In-flight results.
    pub const fn pipes(&self) -> &Pipes {
        &self.core.pipes
    }

    /// Micro memory contents.
    pub fn micro_mem(&self) -> &[u8] {
        &self.core.micro
    }

    /// Data memory contents.
    pub fn data_mem(&self) -> &[u8] {
        &self.core.data
    }

    /// Execution statistics.
    pub const fn stats(&self) -> &VuStats {
        &self.stats
    }

    /// Unit configuration.
    pub const fn config(&self) -> &VuConfig {
        &self.config
    }

    /// Returns and clears the M bit seen since the last call.
    pub const fn take_mbit(&mut self) -> bool {
        let seen = self.core.pipeline.mbit;
        self.core.pipeline.mbit = false;
        seen
    }

    /// Copies a program image into micro memory.
    ///
    /// # Arguments
    ///
    /// * `offset` - Byte offset in micro memory.
    /// * `bytes` - Image, little-endian 64-bit micro-words.
    ///
    /// # Returns
    ///
    /// `VuError::ProgramTooLarge` if the image does not fit at `offset`.
    pub fn load_program(&mut self, offset: usize, bytes: &[u8]) -> Result<()> {
        let capacity = self.core.micro.len();
        let size = offset.saturating_add(bytes.len());
        let Some(dst) = self.core.micro.get_mut(offset..size) else {
            return Err(VuError::ProgramTooLarge { size, capacity });
        };
        dst.copy_from_slice(bytes);
        debug!(offset, len = bytes.len(), "program loaded");
        Ok(())
    }

    /// Reads a program image from disk into micro memory at offset 0.
    pub fn load_program_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = loader::load_binary(path)?;
        self.load_program(0, &bytes)
    }

    /// Writes bytes into data memory; addresses wrap at the memory size.
    pub fn write_data(&mut self, offset: usize, bytes: &[u8]) {
        let mask = self.core.data.len() - 1;
        for (i, b) in bytes.iter().enumerate() {
            self.core.data[offset.wrapping_add(i) & mask] = *b;
        }
    }

    /// Reads `len` bytes of data memory; addresses wrap at the memory size.
    pub fn read_data(&self, offset: usize, len: usize) -> Vec<u8> {
        let mask = self.core.data.len() - 1;
        (0..len)
            .map(|i| self.core.data[offset.wrapping_add(i) & mask])
            .collect()
    }

    /// Captures the unit's complete execution state.
    pub fn save_state(&self) -> VuSnapshot {
        VuSnapshot {
            unit: self.core.unit,
            regs: self.core.regs.clone(),
            micro: self.core.micro.clone(),
            data: self.core.data.clone(),
            pipeline: self.core.pipeline.clone(),
            pipes: self.core.pipes.clone(),
        }
    }

    /// Restores a state captured by `save_state`.
    ///
    /// # Returns
    ///
    /// An error if the snapshot comes from the other unit kind or its memory
    /// sizes differ from this unit's; the unit is unchanged in that case. A
    /// running snapshot whose pc is not micro-word aligned is restored stopped.
    pub fn load_state(&mut self, snapshot: &VuSnapshot) -> Result<()> {
        if snapshot.unit != self.core.unit {
            return Err(VuError::UnitMismatch {
                expected: self.core.unit,
                found: snapshot.unit,
            });
        }
        for (what, expected, found) in [
            ("micro memory", self.core.micro.len(), snapshot.micro.len()),
            ("data memory", self.core.data.len(), snapshot.data.len()),
        ] {
            if expected != found {
                return Err(VuError::SnapshotMismatch {
                    what,
                    expected,
                    found,
                });
            }
        }
        self.core.regs = snapshot.regs.clone();
        self.core.micro.copy_from_slice(&snapshot.micro);
        self.core.data.copy_from_slice(&snapshot.data);
        self.core.pipeline = snapshot.pipeline.clone();
        self.core.pipes = snapshot.pipes.clone();

        let p = &mut self.core.pipeline;
        if p.busy && !p.pc.is_multiple_of(MICROWORD_BYTES) {
            warn!(pc = p.pc, "snapshot pc is not micro-word aligned, stopping");
            p.busy = false;
        }

        let unit = self.core.unit;
        let control = &self.core.links.control;
        if self.core.pipeline.busy {
            control.set_stat(unit.stat_busy());
        } else {
            control.clear_stat(unit.stat_busy());
        }
        Ok(())
    }

    /// Prints the register file to stdout.
    pub fn dump_state(&self) {
        let p = &self.core.pipeline;
        println!(
            "PC: {:#06x}  TPC: {:#06x}  cycle: {}  busy: {}",
            p.pc, p.tpc, p.cycle, p.busy
        );
        self.core.regs.dump();
    }
}

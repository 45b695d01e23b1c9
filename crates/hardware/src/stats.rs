//! Vector unit statistics collection and reporting.
//!
//! This module tracks execution metrics for one vector unit. It provides:
//! 1. **Cycles and steps:** Micro-words executed, cycles elapsed, and stall cycles.
//! 2. **Dual issue:** Lower-slot discards, snapshot substitutions, and immediate loads.
//! 3. **Control:** Branches taken, interrupts raised, completions, and halts.

use std::time::Instant;

/// Vector unit statistics.
///
/// Counters are updated by the controller once per step and are never part of
/// a save-state.
#[derive(Clone, Debug)]
pub struct VuStats {
    start_time: Instant,
    /// Micro-words executed.
    pub steps: u64,
    /// Cycles elapsed, stalls included.
    pub cycles: u64,
    /// Cycles spent waiting on pipe results.
    pub stall_cycles: u64,

    /// Branches whose target replaced the sequential PC.
    pub branches_taken: u64,
    /// Lower slots skipped because both slots wrote the same destination.
    pub lower_discards: u64,
    /// Lower slots that ran against a pre-upper register snapshot.
    pub snapshot_substitutions: u64,
    /// Micro-words whose lower half was loaded into I.
    pub immediate_loads: u64,

    /// Debug-request interrupts raised.
    pub interrupts_raised: u64,
    /// Programs finished through the E bit.
    pub completions: u64,
    /// Halts caused by the PC leaving micro memory.
    pub halts: u64,
}

impl Default for VuStats {
    /// Returns the default value.
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            steps: 0,
            cycles: 0,
            stall_cycles: 0,
            branches_taken: 0,
            lower_discards: 0,
            snapshot_substitutions: 0,
            immediate_loads: 0,
            interrupts_raised: 0,
            completions: 0,
            halts: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"dual_issue"`, `"control"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "dual_issue", "control"];

impl VuStats {
    /// Prints only the requested statistics sections to stdout.
    ///
    /// # Arguments
    ///
    /// * `sections` - Slice of section names to print, or empty for all.
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();
        let cyc = self.cycles.max(1);
        let steps = self.steps.max(1);

        if want("summary") {
            let khz = (self.cycles as f64 / seconds) / 1000.0;
            println!("\n==========================================================");
            println!("VECTOR UNIT STATISTICS");
            println!("==========================================================");
            println!("host_seconds             {seconds:.4} s");
            println!("vu_cycles                {}", self.cycles);
            println!("vu_freq                  {khz:.2} kHz");
            println!("vu_steps                 {}", self.steps);
            println!("vu_cycles_per_step       {:.4}", cyc as f64 / steps as f64);
            println!(
                "stalls                   {} ({:.2}%)",
                self.stall_cycles,
                (self.stall_cycles as f64 / cyc as f64) * 100.0
            );
            println!("----------------------------------------------------------");
        }
        if want("dual_issue") {
            println!("DUAL ISSUE");
            println!(
                "  lower.discarded        {} ({:.2}%)",
                self.lower_discards,
                (self.lower_discards as f64 / steps as f64) * 100.0
            );
            println!(
                "  lower.substituted      {} ({:.2}%)",
                self.snapshot_substitutions,
                (self.snapshot_substitutions as f64 / steps as f64) * 100.0
            );
            println!(
                "  lower.immediate        {} ({:.2}%)",
                self.immediate_loads,
                (self.immediate_loads as f64 / steps as f64) * 100.0
            );
            println!("----------------------------------------------------------");
        }
        if want("control") {
            println!("CONTROL");
            println!("  branches.taken         {}", self.branches_taken);
            println!("  interrupts.raised      {}", self.interrupts_raised);
            println!("  programs.completed     {}", self.completions);
            println!("  programs.halted        {}", self.halts);
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}

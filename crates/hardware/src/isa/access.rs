//! Register, memory and control primitives used by instruction handlers.
//!
//! Every instruction is written once, generic over `Access`. Run against the
//! executing core it performs the instruction; run against the usage recorder it
//! reports which registers the same code path touches. Handlers must reach state
//! only through this trait so the two runs cannot disagree.

use crate::common::reg::Special;
use crate::core::arch::vf::{Lanes, Vector};

/// State primitives available to an instruction handler.
pub trait Access {
    /// Byte address mask of data memory.
    fn data_mask(&self) -> u32;

    /// Byte address mask of micro memory.
    fn micro_mask(&self) -> u32;

    /// Reads the selected lanes of a vector register.
    ///
    /// Unselected lanes of the returned vector are unspecified and must not be used.
    fn vf(&mut self, reg: usize, lanes: Lanes) -> Vector;

    /// Writes the selected lanes of a vector register.
    fn set_vf(&mut self, reg: usize, lanes: Lanes, val: Vector);

    /// Reads the selected lanes of the accumulator.
    fn acc(&mut self, lanes: Lanes) -> Vector;

    /// Writes the selected lanes of the accumulator.
    fn set_acc(&mut self, lanes: Lanes, val: Vector);

    /// Reads an integer register.
    fn vi(&mut self, reg: usize) -> u16;

    /// Writes an integer register.
    fn set_vi(&mut self, reg: usize, val: u16);

    /// Reads the visible value of a special register.
    fn special(&mut self, reg: Special) -> u32;

    /// Writes the visible value of a special register.
    fn set_special(&mut self, reg: Special, val: u32);

    /// Reads the pending value of a pipelined special register (status, MAC, clip, Q, P).
    fn latch(&mut self, reg: Special) -> u32;

    /// Writes the pending value of a pipelined special register.
    fn set_latch(&mut self, reg: Special, val: u32);

    /// Address of the micro-word following the executing one.
    fn tpc(&self) -> u32;

    /// Schedules a branch to `target` after the delay slot.
    fn branch(&mut self, target: u32);

    /// Loads the selected lanes of the data-memory quadword at `addr`.
    fn load_quad(&mut self, addr: u32, lanes: Lanes) -> Vector;

    /// Stores the selected lanes of `val` to the data-memory quadword at `addr`.
    fn store_quad(&mut self, addr: u32, lanes: Lanes, val: Vector);

    /// Reads the downstream interface's `TOP` register.
    fn vif_top(&mut self) -> u16;

    /// Reads the downstream interface's `ITOP` register.
    fn vif_itop(&mut self) -> u16;

    /// Hands the packet at data-memory address `addr` to the graphics interface.
    fn gif_kick(&mut self, addr: u32);
}

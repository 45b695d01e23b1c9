//! Executing core.
//!
//! `Core` owns the architectural state of one unit (registers, memories,
//! sequencing state and pipes) together with the links to its collaborators,
//! and implements `Access` so that instruction handlers run against it
//! directly.

use crate::common::reg::{RegisterFile, Special};
use crate::config::UnitKind;
use crate::core::arch::vf::{Lanes, Vector};
use crate::core::pipeline::PipelineState;
use crate::core::pipes::Pipes;
use crate::isa::access::Access;
use crate::soc::Collaborators;

/// Reads the little-endian word at `offset`, or 0 past the end of `mem`.
#[inline]
fn read_word(mem: &[u8], offset: usize) -> u32 {
    mem.get(offset..offset + 4)
        .and_then(|b| b.try_into().ok())
        .map_or(0, u32::from_le_bytes)
}

/// Writes the little-endian word at `offset`; writes past the end are dropped.
#[inline]
fn write_word(mem: &mut [u8], offset: usize, val: u32) {
    if let Some(b) = mem.get_mut(offset..offset + 4) {
        b.copy_from_slice(&val.to_le_bytes());
    }
}

/// Architectural state of one vector unit.
pub struct Core {
    pub(crate) unit: UnitKind,
    pub(crate) regs: RegisterFile,
    pub(crate) micro: Vec<u8>,
    pub(crate) data: Vec<u8>,
    pub(crate) pipeline: PipelineState,
    pub(crate) pipes: Pipes,
    pub(crate) links: Collaborators,
    data_mask: u32,
    micro_mask: u32,
}

impl std::fmt::Debug for Core {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Core")
            .field("unit", &self.unit)
            .field("pipeline", &self.pipeline)
            .field("micro_len", &self.micro.len())
            .field("data_len", &self.data.len())
            .finish_non_exhaustive()
    }
}

impl Core {
    /// Creates a core with zeroed memories of the given sizes.
    ///
    /// # Arguments
    ///
    /// * `unit` - Which unit this core models.
    /// * `micro_size` - Micro memory size in bytes; a power of two.
    /// * `data_size` - Data memory size in bytes; a power of two.
    /// * `links` - Collaborators the core signals.
    pub fn new(unit: UnitKind, micro_size: usize, data_size: usize, links: Collaborators) -> Self {
        Self {
            unit,
            regs: RegisterFile::new(),
            micro: vec![0; micro_size],
            data: vec![0; data_size],
            pipeline: PipelineState::new(),
            pipes: Pipes::new(),
            links,
            data_mask: (data_size as u32).wrapping_sub(1),
            micro_mask: (micro_size as u32).wrapping_sub(1),
        }
    }

    /// Fetches the micro-word at `pc`.
    ///
    /// # Returns
    ///
    /// `(lower, upper)`: the lower word sits at the lower address.
    pub fn fetch(&self, pc: u32) -> (u32, u32) {
        let at = pc as usize;
        (read_word(&self.micro, at), read_word(&self.micro, at + 4))
    }

    /// Drains every pipe, advancing the cycle counter.
    pub fn flush_pipes(&mut self) {
        self.pipes.flush_all(&mut self.regs, &mut self.pipeline.cycle);
    }
}

impl Access for Core {
    #[inline(always)]
    fn data_mask(&self) -> u32 {
        self.data_mask
    }

    #[inline(always)]
    fn micro_mask(&self) -> u32 {
        self.micro_mask
    }

    #[inline(always)]
    fn vf(&mut self, reg: usize, _lanes: Lanes) -> Vector {
        self.regs.vf(reg)
    }

    #[inline(always)]
    fn set_vf(&mut self, reg: usize, lanes: Lanes, val: Vector) {
        self.regs.set_vf(reg, lanes, val);
    }

    #[inline(always)]
    fn acc(&mut self, _lanes: Lanes) -> Vector {
        self.regs.acc()
    }

    #[inline(always)]
    fn set_acc(&mut self, lanes: Lanes, val: Vector) {
        self.regs.set_acc(lanes, val);
    }

    #[inline(always)]
    fn vi(&mut self, reg: usize) -> u16 {
        self.regs.vi(reg)
    }

    #[inline(always)]
    fn set_vi(&mut self, reg: usize, val: u16) {
        self.regs.set_vi(reg, val);
    }

    fn special(&mut self, reg: Special) -> u32 {
        self.regs.special(reg)
    }

    fn set_special(&mut self, reg: Special, val: u32) {
        self.regs.set_special(reg, val);
    }

    fn latch(&mut self, reg: Special) -> u32 {
        let p = self.regs.pending();
        match reg {
            Special::Status => p.status,
            Special::Mac => p.mac,
            Special::Clip => p.clip,
            Special::Q => p.q,
            Special::P => p.p,
            Special::R | Special::I => self.regs.special(reg),
        }
    }

    fn set_latch(&mut self, reg: Special, val: u32) {
        let p = self.regs.pending_mut();
        match reg {
            Special::Status => p.status = val,
            Special::Mac => p.mac = val,
            Special::Clip => p.clip = val,
            Special::Q => p.q = val,
            Special::P => p.p = val,
            Special::R | Special::I => self.regs.set_special(reg, val),
        }
    }

    fn tpc(&self) -> u32 {
        self.pipeline.tpc
    }

    fn branch(&mut self, target: u32) {
        self.pipeline.schedule_branch(target);
    }

    fn load_quad(&mut self, addr: u32, lanes: Lanes) -> Vector {
        let base = (addr & self.data_mask) as usize;
        let mut out = [0; 4];
        for (lane, word) in out.iter_mut().enumerate() {
            if lanes.contains(lane) {
                *word = read_word(&self.data, base + lane * 4);
            }
        }
        out
    }

    fn store_quad(&mut self, addr: u32, lanes: Lanes, val: Vector) {
        let base = (addr & self.data_mask) as usize;
        for (lane, word) in val.iter().enumerate() {
            if lanes.contains(lane) {
                write_word(&mut self.data, base + lane * 4, *word);
            }
        }
    }

    fn vif_top(&mut self) -> u16 {
        self.links.vif.top()
    }

    fn vif_itop(&mut self) -> u16 {
        self.links.vif.itop()
    }

    fn gif_kick(&mut self, addr: u32) {
        self.flush_pipes();
        self.links.gif.kick(addr, &self.data);
    }
}

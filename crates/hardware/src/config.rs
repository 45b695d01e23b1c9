//! Configuration system for the vector unit core.
//!
//! This module defines the configuration structures used to parameterize a unit.
//! It provides:
//! 1. **Defaults:** Baseline per-unit hardware constants (memory sizes, status bits, interrupt lines).
//! 2. **Structures:** The root `Config` and the per-unit `VuConfig`.
//! 3. **Enums:** `UnitKind`, which selects between the VU0 and VU1 parameter sets.
//!
//! Configuration is supplied as JSON via `Config::from_json` or built with `Config::default()`.

use serde::{Deserialize, Serialize};

use crate::common::error::{Result, VuError};

/// Default configuration constants for the vector units.
///
/// These values define the hardware parameters of the two units when not
/// explicitly overridden.
mod defaults {
    /// VU0 micro memory size (4 KiB).
    pub const VU0_MICRO_SIZE: usize = 4 * 1024;

    /// VU0 data memory size (4 KiB).
    pub const VU0_DATA_SIZE: usize = 4 * 1024;

    /// VU1 micro memory size (16 KiB).
    pub const VU1_MICRO_SIZE: usize = 16 * 1024;

    /// VU1 data memory size (16 KiB).
    pub const VU1_DATA_SIZE: usize = 16 * 1024;

    /// Interrupt line raised by VU0 debug requests.
    pub const VU0_IRQ_LINE: u32 = 6;

    /// Interrupt line raised by VU1 debug requests.
    pub const VU1_IRQ_LINE: u32 = 7;

    /// Stall accounting is on unless a tool turns it off.
    pub const STALL_ACCOUNTING: bool = true;
}

/// Which of the two vector units a configuration describes.
///
/// The two units share the instruction set and differ only in memory sizing,
/// status-register bit positions and interrupt line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// Vector unit 0 (coprocessor-attached, small memories).
    Vu0,
    /// Vector unit 1 (standalone geometry unit, large memories).
    #[default]
    Vu1,
}

impl UnitKind {
    /// Default micro memory size in bytes.
    pub const fn micro_mem_size(self) -> usize {
        match self {
            Self::Vu0 => defaults::VU0_MICRO_SIZE,
            Self::Vu1 => defaults::VU1_MICRO_SIZE,
        }
    }

    /// Default data memory size in bytes.
    pub const fn data_mem_size(self) -> usize {
        match self {
            Self::Vu0 => defaults::VU0_DATA_SIZE,
            Self::Vu1 => defaults::VU1_DATA_SIZE,
        }
    }

    /// Busy bit of this unit in the shared VPU status register.
    pub const fn stat_busy(self) -> u32 {
        match self {
            Self::Vu0 => 0x001,
            Self::Vu1 => 0x100,
        }
    }

    /// D-bit (debug break) status bit of this unit.
    pub const fn stat_dbit(self) -> u32 {
        match self {
            Self::Vu0 => 0x002,
            Self::Vu1 => 0x200,
        }
    }

    /// T-bit (debug halt) status bit of this unit.
    pub const fn stat_tbit(self) -> u32 {
        match self {
            Self::Vu0 => 0x004,
            Self::Vu1 => 0x400,
        }
    }

    /// Break-enable bit for D requests in the shared FBRST register.
    pub const fn fbrst_de(self) -> u32 {
        match self {
            Self::Vu0 => 0x004,
            Self::Vu1 => 0x400,
        }
    }

    /// Break-enable bit for T requests in the shared FBRST register.
    pub const fn fbrst_te(self) -> u32 {
        match self {
            Self::Vu0 => 0x008,
            Self::Vu1 => 0x800,
        }
    }

    /// Interrupt line raised for this unit's debug requests.
    pub const fn irq_line(self) -> u32 {
        match self {
            Self::Vu0 => defaults::VU0_IRQ_LINE,
            Self::Vu1 => defaults::VU1_IRQ_LINE,
        }
    }
}

/// Root configuration for the vector unit core.
///
/// # Examples
///
/// ```
/// use vusim_core::config::{Config, UnitKind};
///
/// let config = Config::from_json(r#"{ "vu": { "unit": "vu0", "trace": true } }"#).unwrap();
/// assert_eq!(config.vu.unit, UnitKind::Vu0);
/// assert!(config.vu.trace);
/// assert!(config.vu.stall_accounting);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Unit configuration
    #[serde(default)]
    pub vu: VuConfig,
}

impl Config {
    /// Parses and validates a configuration from JSON.
    ///
    /// # Arguments
    ///
    /// * `json` - Configuration document. Missing fields take their defaults.
    ///
    /// # Returns
    ///
    /// The parsed configuration, or an error if the document is malformed or the
    /// memory sizing is inconsistent.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.vu.validate()?;
        Ok(config)
    }
}

/// Per-unit settings.
#[derive(Debug, Clone, Deserialize)]
pub struct VuConfig {
    /// Unit parameter set
    #[serde(default)]
    pub unit: UnitKind,

    /// Emit a trace event for every executed micro-word
    #[serde(default)]
    pub trace: bool,

    /// Model pipe latencies and stalls. When false, results retire at the end of their step.
    #[serde(default = "VuConfig::default_stall_accounting")]
    pub stall_accounting: bool,

    /// Micro memory size override in bytes (defaults to the unit's size)
    #[serde(default)]
    pub micro_mem_size: Option<usize>,

    /// Data memory size override in bytes (defaults to the unit's size)
    #[serde(default)]
    pub data_mem_size: Option<usize>,
}

impl VuConfig {
    /// Stall accounting is enabled by default.
    const fn default_stall_accounting() -> bool {
        defaults::STALL_ACCOUNTING
    }

    /// Builds the default configuration of the given unit.
    pub const fn for_unit(unit: UnitKind) -> Self {
        Self {
            unit,
            trace: false,
            stall_accounting: defaults::STALL_ACCOUNTING,
            micro_mem_size: None,
            data_mem_size: None,
        }
    }

    /// Effective micro memory size in bytes.
    pub fn micro_size(&self) -> usize {
        self.micro_mem_size.unwrap_or_else(|| self.unit.micro_mem_size())
    }

    /// Effective data memory size in bytes.
    pub fn data_size(&self) -> usize {
        self.data_mem_size.unwrap_or_else(|| self.unit.data_mem_size())
    }

    /// Checks that both memory sizes are non-zero powers of two holding whole quadwords.
    ///
    /// # Returns
    ///
    /// `Ok(())` when consistent, otherwise `VuError::InvalidConfig` naming the bad size.
    pub fn validate(&self) -> Result<()> {
        for (what, size) in [("micro_mem_size", self.micro_size()), ("data_mem_size", self.data_size())] {
            if size < 16 || !size.is_power_of_two() {
                return Err(VuError::InvalidConfig(format!(
                    "{what} must be a non-zero power of two multiple of 16, got {size}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for VuConfig {
    fn default() -> Self {
        Self::for_unit(UnitKind::default())
    }
}

//! Opcode dispatch tables.
//!
//! Each instruction has exactly one `Handler` descriptor. It names the
//! instruction, gives its pipeline class and latency, and holds two function
//! pointers instantiated from the same generic handler: one that records usage
//! and one that executes. The descriptors hang off static nested tables that
//! are indexed by instruction fields:
//! 1. **Upper:** 64 slots by bits 0-5; slots `0x3C`-`0x3F` open 32-slot
//!    tables indexed by bits 6-10.
//! 2. **Lower:** 128 slots by bits 25-31; slot `0x40` opens a 64-slot table by
//!    bits 0-5 whose slots `0x3C`-`0x3F` open 32-slot tables by bits 6-10.
//!
//! Every slot not assigned to an instruction holds the shared `UNKNOWN` leaf.

use serde::{Deserialize, Serialize};

use crate::core::analyzer::Recorder;
use crate::core::exec::Core;
use crate::isa::access::Access;
use crate::isa::fields::{FUNCT_MASK, LOWER_OP_MASK, REG_MASK};
use crate::isa::{lower, upper};

/// Functional unit an instruction issues to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pipe {
    /// No unit; the instruction has no timing.
    #[default]
    None,
    /// Floating-point multiply accumulate.
    Fmac,
    /// Divide and square root unit (Q).
    Fdiv,
    /// Elementary function unit (P).
    Efu,
    /// Integer arithmetic and integer load/store.
    Ialu,
    /// Branches and jumps.
    Branch,
    /// Graphics interface transfer.
    Xgkick,
}

/// Static description of one instruction.
pub struct Handler {
    name: &'static str,
    pipe: Pipe,
    cycles: u8,
    analyze: fn(&mut Recorder, u32),
    execute: fn(&mut Core, u32),
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.name)
            .field("pipe", &self.pipe)
            .field("cycles", &self.cycles)
            .finish_non_exhaustive()
    }
}

impl Handler {
    /// Mnemonic.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Functional unit.
    pub const fn pipe(&self) -> Pipe {
        self.pipe
    }

    /// Result latency in cycles for the divide and elementary function units.
    pub const fn cycles(&self) -> u8 {
        self.cycles
    }

    /// Returns `true` for the reserved-opcode leaf.
    pub fn is_unknown(&self) -> bool {
        std::ptr::eq(self, &UNKNOWN)
    }
}

/// Execution context a handler can be run against.
///
/// Implemented by the usage recorder and the executing core; selects which of
/// a handler's two instantiations applies.
pub trait Mode: Access + Sized {
    /// Handler instantiation for this context.
    fn handler_fn(handler: &Handler) -> fn(&mut Self, u32);
}

impl Mode for Recorder {
    #[inline(always)]
    fn handler_fn(handler: &Handler) -> fn(&mut Self, u32) {
        handler.analyze
    }
}

impl Mode for Core {
    #[inline(always)]
    fn handler_fn(handler: &Handler) -> fn(&mut Self, u32) {
        handler.execute
    }
}

/// Instruction field a table is indexed by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    /// Upper opcode, bits 0-5.
    UpperOp,
    /// Lower opcode, bits 25-31.
    LowerOp,
    /// Lower special function, bits 0-5.
    Funct,
    /// Sub-opcode in the `fd` position, bits 6-10.
    Fd,
}

impl Field {
    /// Extracts the index this field selects from `code`.
    #[inline(always)]
    pub const fn extract(self, code: u32) -> usize {
        (match self {
            Self::UpperOp | Self::Funct => code & FUNCT_MASK,
            Self::LowerOp => (code >> 25) & LOWER_OP_MASK,
            Self::Fd => (code >> 6) & REG_MASK,
        }) as usize
    }

    /// Width of the field in bits.
    pub const fn width(self) -> u32 {
        match self {
            Self::UpperOp | Self::Funct => 6,
            Self::LowerOp => 7,
            Self::Fd => 5,
        }
    }
}

/// One table entry.
#[derive(Clone, Copy, Debug)]
pub enum Slot {
    /// A terminal instruction descriptor.
    Leaf(&'static Handler),
    /// A nested table selected by a further field.
    Table(&'static Table),
}

/// A dispatch table level.
#[derive(Debug)]
pub struct Table {
    name: &'static str,
    field: Field,
    slots: &'static [Slot],
}

impl Table {
    /// Table name as used in diagnostics.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Field this table is indexed by.
    pub const fn field(&self) -> Field {
        self.field
    }

    /// All slots, in index order.
    pub const fn slots(&self) -> &'static [Slot] {
        self.slots
    }

    /// Every distinct handler reachable from this table, nested tables included.
    pub fn handlers(&'static self) -> Vec<&'static Handler> {
        let mut out: Vec<&'static Handler> = Vec::new();
        let mut pending = vec![self];
        while let Some(table) = pending.pop() {
            for slot in table.slots {
                match *slot {
                    Slot::Leaf(h) => {
                        if !out.iter().any(|seen| std::ptr::eq(*seen, h)) {
                            out.push(h);
                        }
                    }
                    Slot::Table(t) => pending.push(t),
                }
            }
        }
        out
    }
}

/// Resolves `code` to its handler, walking nested tables from `root`.
///
/// # Arguments
///
/// * `root` - `UPPER` or `LOWER`.
/// * `code` - The instruction word.
///
/// # Returns
///
/// The instruction's descriptor; reserved encodings yield `UNKNOWN`.
pub fn lookup(root: &'static Table, code: u32) -> &'static Handler {
    let mut table = root;
    loop {
        let idx = table.field.extract(code);
        debug_assert!(
            idx < table.slots.len(),
            "table {} has {} slots, index {idx}",
            table.name,
            table.slots.len()
        );
        match table.slots.get(idx) {
            Some(Slot::Leaf(h)) => return h,
            Some(Slot::Table(t)) => table = t,
            None => return &UNKNOWN,
        }
    }
}

/// Resolves `code` and runs the handler instantiation matching `ctx`.
///
/// # Returns
///
/// The descriptor that ran.
pub fn dispatch<M: Mode>(root: &'static Table, code: u32, ctx: &mut M) -> &'static Handler {
    let handler = lookup(root, code);
    M::handler_fn(handler)(ctx, code);
    handler
}

/// Reserved encoding: no effect.
const fn unknown<A: Access>(_a: &mut A, _code: u32) {}

macro_rules! handlers {
    ($($id:ident: $name:literal, $pipe:ident, $cycles:literal, $m:ident::$f:ident;)*) => {
        $(
            static $id: Handler = Handler {
                name: $name,
                pipe: Pipe::$pipe,
                cycles: $cycles,
                analyze: $m::$f::<Recorder>,
                execute: $m::$f::<Core>,
            };
        )*
    };
}

/// Shared leaf of every reserved encoding.
pub static UNKNOWN: Handler = Handler {
    name: "unknown",
    pipe: Pipe::None,
    cycles: 0,
    analyze: unknown::<Recorder>,
    execute: unknown::<Core>,
};

handlers! {
    ADD: "ADD", Fmac, 0, upper::add;
    ADD_BC: "ADDbc", Fmac, 0, upper::add_bc;
    ADD_I: "ADDi", Fmac, 0, upper::add_i;
    ADD_Q: "ADDq", Fmac, 0, upper::add_q;
    ADDA: "ADDA", Fmac, 0, upper::adda;
    ADDA_BC: "ADDAbc", Fmac, 0, upper::adda_bc;
    ADDA_I: "ADDAi", Fmac, 0, upper::adda_i;
    ADDA_Q: "ADDAq", Fmac, 0, upper::adda_q;
    SUB: "SUB", Fmac, 0, upper::sub;
    SUB_BC: "SUBbc", Fmac, 0, upper::sub_bc;
    SUB_I: "SUBi", Fmac, 0, upper::sub_i;
    SUB_Q: "SUBq", Fmac, 0, upper::sub_q;
    SUBA: "SUBA", Fmac, 0, upper::suba;
    SUBA_BC: "SUBAbc", Fmac, 0, upper::suba_bc;
    SUBA_I: "SUBAi", Fmac, 0, upper::suba_i;
    SUBA_Q: "SUBAq", Fmac, 0, upper::suba_q;
    MUL: "MUL", Fmac, 0, upper::mul;
    MUL_BC: "MULbc", Fmac, 0, upper::mul_bc;
    MUL_I: "MULi", Fmac, 0, upper::mul_i;
    MUL_Q: "MULq", Fmac, 0, upper::mul_q;
    MULA: "MULA", Fmac, 0, upper::mula;
    MULA_BC: "MULAbc", Fmac, 0, upper::mula_bc;
    MULA_I: "MULAi", Fmac, 0, upper::mula_i;
    MULA_Q: "MULAq", Fmac, 0, upper::mula_q;
    MADD: "MADD", Fmac, 0, upper::madd;
    MADD_BC: "MADDbc", Fmac, 0, upper::madd_bc;
    MADD_I: "MADDi", Fmac, 0, upper::madd_i;
    MADD_Q: "MADDq", Fmac, 0, upper::madd_q;
    MADDA: "MADDA", Fmac, 0, upper::madda;
    MADDA_BC: "MADDAbc", Fmac, 0, upper::madda_bc;
    MADDA_I: "MADDAi", Fmac, 0, upper::madda_i;
    MADDA_Q: "MADDAq", Fmac, 0, upper::madda_q;
    MSUB: "MSUB", Fmac, 0, upper::msub;
    MSUB_BC: "MSUBbc", Fmac, 0, upper::msub_bc;
    MSUB_I: "MSUBi", Fmac, 0, upper::msub_i;
    MSUB_Q: "MSUBq", Fmac, 0, upper::msub_q;
    MSUBA: "MSUBA", Fmac, 0, upper::msuba;
    MSUBA_BC: "MSUBAbc", Fmac, 0, upper::msuba_bc;
    MSUBA_I: "MSUBAi", Fmac, 0, upper::msuba_i;
    MSUBA_Q: "MSUBAq", Fmac, 0, upper::msuba_q;
    MAX: "MAX", Fmac, 0, upper::max;
    MAX_BC: "MAXbc", Fmac, 0, upper::max_bc;
    MAX_I: "MAXi", Fmac, 0, upper::max_i;
    MINI: "MINI", Fmac, 0, upper::mini;
    MINI_BC: "MINIbc", Fmac, 0, upper::mini_bc;
    MINI_I: "MINIi", Fmac, 0, upper::mini_i;
    ABS: "ABS", Fmac, 0, upper::abs;
    FTOI0: "FTOI0", Fmac, 0, upper::ftoi0;
    FTOI4: "FTOI4", Fmac, 0, upper::ftoi4;
    FTOI12: "FTOI12", Fmac, 0, upper::ftoi12;
    FTOI15: "FTOI15", Fmac, 0, upper::ftoi15;
    ITOF0: "ITOF0", Fmac, 0, upper::itof0;
    ITOF4: "ITOF4", Fmac, 0, upper::itof4;
    ITOF12: "ITOF12", Fmac, 0, upper::itof12;
    ITOF15: "ITOF15", Fmac, 0, upper::itof15;
    CLIP: "CLIP", Fmac, 0, upper::clip;
    OPMULA: "OPMULA", Fmac, 0, upper::opmula;
    OPMSUB: "OPMSUB", Fmac, 0, upper::opmsub;
    NOP: "NOP", None, 0, upper::nop;

    LQ: "LQ", Fmac, 0, lower::lq;
    LQI: "LQI", Fmac, 0, lower::lqi;
    LQD: "LQD", Fmac, 0, lower::lqd;
    SQ: "SQ", Fmac, 0, lower::sq;
    SQI: "SQI", Fmac, 0, lower::sqi;
    SQD: "SQD", Fmac, 0, lower::sqd;
    ILW: "ILW", Ialu, 3, lower::ilw;
    ILWR: "ILWR", Ialu, 3, lower::ilwr;
    ISW: "ISW", Ialu, 0, lower::isw;
    ISWR: "ISWR", Ialu, 0, lower::iswr;
    IADD: "IADD", Ialu, 0, lower::iadd;
    ISUB: "ISUB", Ialu, 0, lower::isub;
    IAND: "IAND", Ialu, 0, lower::iand;
    IOR: "IOR", Ialu, 0, lower::ior;
    IADDI: "IADDI", Ialu, 0, lower::iaddi;
    IADDIU: "IADDIU", Ialu, 0, lower::iaddiu;
    ISUBIU: "ISUBIU", Ialu, 0, lower::isubiu;
    MOVE: "MOVE", Fmac, 0, lower::mov;
    MR32: "MR32", Fmac, 0, lower::mr32;
    MFIR: "MFIR", Fmac, 0, lower::mfir;
    MTIR: "MTIR", Fmac, 0, lower::mtir;
    MFP: "MFP", Fmac, 0, lower::mfp;
    DIV: "DIV", Fdiv, 6, lower::div;
    SQRT: "SQRT", Fdiv, 6, lower::sqrt;
    RSQRT: "RSQRT", Fdiv, 12, lower::rsqrt;
    WAITQ: "WAITQ", Fdiv, 0, lower::waitq;
    FSAND: "FSAND", Fmac, 0, lower::fsand;
    FSEQ: "FSEQ", Fmac, 0, lower::fseq;
    FSOR: "FSOR", Fmac, 0, lower::fsor;
    FSSET: "FSSET", Fmac, 0, lower::fsset;
    FMAND: "FMAND", Fmac, 0, lower::fmand;
    FMEQ: "FMEQ", Fmac, 0, lower::fmeq;
    FMOR: "FMOR", Fmac, 0, lower::fmor;
    FCAND: "FCAND", Fmac, 0, lower::fcand;
    FCEQ: "FCEQ", Fmac, 0, lower::fceq;
    FCOR: "FCOR", Fmac, 0, lower::fcor;
    FCSET: "FCSET", Fmac, 0, lower::fcset;
    FCGET: "FCGET", Fmac, 0, lower::fcget;
    B: "B", Branch, 0, lower::b;
    BAL: "BAL", Branch, 0, lower::bal;
    JR: "JR", Branch, 0, lower::jr;
    JALR: "JALR", Branch, 0, lower::jalr;
    IBEQ: "IBEQ", Branch, 0, lower::ibeq;
    IBNE: "IBNE", Branch, 0, lower::ibne;
    IBLTZ: "IBLTZ", Branch, 0, lower::ibltz;
    IBGTZ: "IBGTZ", Branch, 0, lower::ibgtz;
    IBLEZ: "IBLEZ", Branch, 0, lower::iblez;
    IBGEZ: "IBGEZ", Branch, 0, lower::ibgez;
    RINIT: "RINIT", Fmac, 0, lower::rinit;
    RGET: "RGET", Fmac, 0, lower::rget;
    RNEXT: "RNEXT", Fmac, 0, lower::rnext;
    RXOR: "RXOR", Fmac, 0, lower::rxor;
    ESADD: "ESADD", Efu, 10, lower::esadd;
    ERSADD: "ERSADD", Efu, 17, lower::ersadd;
    ELENG: "ELENG", Efu, 17, lower::eleng;
    ERLENG: "ERLENG", Efu, 23, lower::erleng;
    EATANXY: "EATANxy", Efu, 53, lower::eatanxy;
    EATANXZ: "EATANxz", Efu, 53, lower::eatanxz;
    ESUM: "ESUM", Efu, 11, lower::esum;
    ERCPR: "ERCPR", Efu, 11, lower::ercpr;
    ESQRT: "ESQRT", Efu, 11, lower::esqrt;
    ERSQRT: "ERSQRT", Efu, 17, lower::ersqrt;
    ESIN: "ESIN", Efu, 28, lower::esin;
    EATAN: "EATAN", Efu, 53, lower::eatan;
    EEXP: "EEXP", Efu, 43, lower::eexp;
    WAITP: "WAITP", Efu, 0, lower::waitp;
    XTOP: "XTOP", Ialu, 0, lower::xtop;
    XITOP: "XITOP", Ialu, 0, lower::xitop;
    XGKICK: "XGKICK", Xgkick, 0, lower::xgkick;
}

/// Builds a slot array of `UNKNOWN` leaves with the listed overrides.
macro_rules! slots {
    ($len:literal; $($idx:literal => $slot:expr),* $(,)?) => {{
        let mut t = [Slot::Leaf(&UNKNOWN); $len];
        $(t[$idx] = $slot;)*
        t
    }};
}

const fn leaf(h: &'static Handler) -> Slot {
    Slot::Leaf(h)
}

const fn table(t: &'static Table) -> Slot {
    Slot::Table(t)
}

// ─── Upper ─────────────────────────────────────────────────────────────────

static UPPER_SLOTS: [Slot; 64] = slots![64;
    0x00 => leaf(&ADD_BC), 0x01 => leaf(&ADD_BC), 0x02 => leaf(&ADD_BC), 0x03 => leaf(&ADD_BC),
    0x04 => leaf(&SUB_BC), 0x05 => leaf(&SUB_BC), 0x06 => leaf(&SUB_BC), 0x07 => leaf(&SUB_BC),
    0x08 => leaf(&MADD_BC), 0x09 => leaf(&MADD_BC), 0x0A => leaf(&MADD_BC), 0x0B => leaf(&MADD_BC),
    0x0C => leaf(&MSUB_BC), 0x0D => leaf(&MSUB_BC), 0x0E => leaf(&MSUB_BC), 0x0F => leaf(&MSUB_BC),
    0x10 => leaf(&MAX_BC), 0x11 => leaf(&MAX_BC), 0x12 => leaf(&MAX_BC), 0x13 => leaf(&MAX_BC),
    0x14 => leaf(&MINI_BC), 0x15 => leaf(&MINI_BC), 0x16 => leaf(&MINI_BC), 0x17 => leaf(&MINI_BC),
    0x18 => leaf(&MUL_BC), 0x19 => leaf(&MUL_BC), 0x1A => leaf(&MUL_BC), 0x1B => leaf(&MUL_BC),
    0x1C => leaf(&MUL_Q), 0x1D => leaf(&MAX_I), 0x1E => leaf(&MUL_I), 0x1F => leaf(&MINI_I),
    0x20 => leaf(&ADD_Q), 0x21 => leaf(&MADD_Q), 0x22 => leaf(&ADD_I), 0x23 => leaf(&MADD_I),
    0x24 => leaf(&SUB_Q), 0x25 => leaf(&MSUB_Q), 0x26 => leaf(&SUB_I), 0x27 => leaf(&MSUB_I),
    0x28 => leaf(&ADD), 0x29 => leaf(&MADD), 0x2A => leaf(&MUL), 0x2B => leaf(&MAX),
    0x2C => leaf(&SUB), 0x2D => leaf(&MSUB), 0x2E => leaf(&OPMSUB), 0x2F => leaf(&MINI),
    0x3C => table(&UPPER_FD_00), 0x3D => table(&UPPER_FD_01),
    0x3E => table(&UPPER_FD_10), 0x3F => table(&UPPER_FD_11),
];

static UPPER_FD_00_SLOTS: [Slot; 32] = slots![32;
    0x00 => leaf(&ADDA_BC), 0x01 => leaf(&SUBA_BC), 0x02 => leaf(&MADDA_BC), 0x03 => leaf(&MSUBA_BC),
    0x04 => leaf(&ITOF0), 0x05 => leaf(&FTOI0), 0x06 => leaf(&MULA_BC), 0x07 => leaf(&MULA_Q),
    0x08 => leaf(&ADDA_Q), 0x09 => leaf(&SUBA_Q), 0x0A => leaf(&ADDA), 0x0B => leaf(&SUBA),
];

static UPPER_FD_01_SLOTS: [Slot; 32] = slots![32;
    0x00 => leaf(&ADDA_BC), 0x01 => leaf(&SUBA_BC), 0x02 => leaf(&MADDA_BC), 0x03 => leaf(&MSUBA_BC),
    0x04 => leaf(&ITOF4), 0x05 => leaf(&FTOI4), 0x06 => leaf(&MULA_BC), 0x07 => leaf(&ABS),
    0x08 => leaf(&MADDA_Q), 0x09 => leaf(&MSUBA_Q), 0x0A => leaf(&MADDA), 0x0B => leaf(&MSUBA),
];

static UPPER_FD_10_SLOTS: [Slot; 32] = slots![32;
    0x00 => leaf(&ADDA_BC), 0x01 => leaf(&SUBA_BC), 0x02 => leaf(&MADDA_BC), 0x03 => leaf(&MSUBA_BC),
    0x04 => leaf(&ITOF12), 0x05 => leaf(&FTOI12), 0x06 => leaf(&MULA_BC), 0x07 => leaf(&MULA_I),
    0x08 => leaf(&ADDA_I), 0x09 => leaf(&SUBA_I), 0x0A => leaf(&MULA), 0x0B => leaf(&OPMULA),
];

static UPPER_FD_11_SLOTS: [Slot; 32] = slots![32;
    0x00 => leaf(&ADDA_BC), 0x01 => leaf(&SUBA_BC), 0x02 => leaf(&MADDA_BC), 0x03 => leaf(&MSUBA_BC),
    0x04 => leaf(&ITOF15), 0x05 => leaf(&FTOI15), 0x06 => leaf(&MULA_BC), 0x07 => leaf(&CLIP),
    0x08 => leaf(&MADDA_I), 0x09 => leaf(&MSUBA_I), 0x0B => leaf(&NOP),
];

static UPPER_FD_00: Table = Table { name: "upper.fd00", field: Field::Fd, slots: &UPPER_FD_00_SLOTS };
static UPPER_FD_01: Table = Table { name: "upper.fd01", field: Field::Fd, slots: &UPPER_FD_01_SLOTS };
static UPPER_FD_10: Table = Table { name: "upper.fd10", field: Field::Fd, slots: &UPPER_FD_10_SLOTS };
static UPPER_FD_11: Table = Table { name: "upper.fd11", field: Field::Fd, slots: &UPPER_FD_11_SLOTS };

/// Root table of upper instructions.
pub static UPPER: Table = Table {
    name: "upper",
    field: Field::UpperOp,
    slots: &UPPER_SLOTS,
};

// ─── Lower ─────────────────────────────────────────────────────────────────

static LOWER_SLOTS: [Slot; 128] = slots![128;
    0x00 => leaf(&LQ), 0x01 => leaf(&SQ), 0x04 => leaf(&ILW), 0x05 => leaf(&ISW),
    0x08 => leaf(&IADDIU), 0x09 => leaf(&ISUBIU),
    0x10 => leaf(&FCEQ), 0x11 => leaf(&FCSET), 0x12 => leaf(&FCAND), 0x13 => leaf(&FCOR),
    0x14 => leaf(&FSEQ), 0x15 => leaf(&FSSET), 0x16 => leaf(&FSAND), 0x17 => leaf(&FSOR),
    0x18 => leaf(&FMEQ), 0x1A => leaf(&FMAND), 0x1B => leaf(&FMOR), 0x1C => leaf(&FCGET),
    0x20 => leaf(&B), 0x21 => leaf(&BAL), 0x24 => leaf(&JR), 0x25 => leaf(&JALR),
    0x28 => leaf(&IBEQ), 0x29 => leaf(&IBNE), 0x2C => leaf(&IBLTZ), 0x2D => leaf(&IBGTZ),
    0x2E => leaf(&IBLEZ), 0x2F => leaf(&IBGEZ),
    0x40 => table(&LOWER_SPECIAL),
];

static LOWER_SPECIAL_SLOTS: [Slot; 64] = slots![64;
    0x30 => leaf(&IADD), 0x31 => leaf(&ISUB), 0x32 => leaf(&IADDI),
    0x34 => leaf(&IAND), 0x35 => leaf(&IOR),
    0x3C => table(&LOWER_T3_00), 0x3D => table(&LOWER_T3_01),
    0x3E => table(&LOWER_T3_10), 0x3F => table(&LOWER_T3_11),
];

static LOWER_T3_00_SLOTS: [Slot; 32] = slots![32;
    0x0C => leaf(&MOVE), 0x0D => leaf(&LQI), 0x0E => leaf(&DIV), 0x0F => leaf(&MTIR),
    0x10 => leaf(&RNEXT), 0x19 => leaf(&MFP), 0x1A => leaf(&XTOP), 0x1B => leaf(&XGKICK),
    0x1C => leaf(&ESADD), 0x1D => leaf(&EATANXY), 0x1E => leaf(&ESQRT), 0x1F => leaf(&ESIN),
];

static LOWER_T3_01_SLOTS: [Slot; 32] = slots![32;
    0x0C => leaf(&MR32), 0x0D => leaf(&SQI), 0x0E => leaf(&SQRT), 0x0F => leaf(&MFIR),
    0x10 => leaf(&RGET), 0x1A => leaf(&XITOP),
    0x1C => leaf(&ERSADD), 0x1D => leaf(&EATANXZ), 0x1E => leaf(&ERSQRT), 0x1F => leaf(&EATAN),
];

static LOWER_T3_10_SLOTS: [Slot; 32] = slots![32;
    0x0D => leaf(&LQD), 0x0E => leaf(&RSQRT), 0x0F => leaf(&ILWR), 0x10 => leaf(&RINIT),
    0x1C => leaf(&ELENG), 0x1D => leaf(&ESUM), 0x1E => leaf(&ERCPR), 0x1F => leaf(&EEXP),
];

static LOWER_T3_11_SLOTS: [Slot; 32] = slots![32;
    0x0D => leaf(&SQD), 0x0E => leaf(&WAITQ), 0x0F => leaf(&ISWR), 0x10 => leaf(&RXOR),
    0x1C => leaf(&ERLENG), 0x1E => leaf(&WAITP),
];

static LOWER_SPECIAL: Table = Table {
    name: "lower.special",
    field: Field::Funct,
    slots: &LOWER_SPECIAL_SLOTS,
};
static LOWER_T3_00: Table = Table { name: "lower.t3_00", field: Field::Fd, slots: &LOWER_T3_00_SLOTS };
static LOWER_T3_01: Table = Table { name: "lower.t3_01", field: Field::Fd, slots: &LOWER_T3_01_SLOTS };
static LOWER_T3_10: Table = Table { name: "lower.t3_10", field: Field::Fd, slots: &LOWER_T3_10_SLOTS };
static LOWER_T3_11: Table = Table { name: "lower.t3_11", field: Field::Fd, slots: &LOWER_T3_11_SLOTS };

/// Root table of lower instructions.
pub static LOWER: Table = Table {
    name: "lower",
    field: Field::LowerOp,
    slots: &LOWER_SLOTS,
};

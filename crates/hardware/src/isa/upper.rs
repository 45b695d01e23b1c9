//! Upper (FMAC) instruction handlers.
//!
//! The upper slot of a micro-word always issues to the floating-point multiply
//! accumulate unit. This module implements:
//! 1. **Arithmetic:** `ADD`, `SUB`, `MUL`, `MADD` and `MSUB` in their vector,
//!    broadcast, I and Q operand forms, writing either `fd` or the accumulator.
//! 2. **Comparisons:** `MAX` and `MINI`, which order raw patterns and set no flags.
//! 3. **Conversions:** `ABS`, `FTOI*` and `ITOF*`.
//! 4. **Special forms:** `CLIP`, `OPMULA`, `OPMSUB` and `NOP`.
//!
//! Arithmetic results update the pending MAC flag lane by lane and fold it into
//! the pending status flag; the FMAC pipe makes both visible later.

use crate::common::constants::{CLIP_MASK, SIGN_BIT};
use crate::common::reg::Special;
use crate::core::arch::vf::{Lanes, Vector};
use crate::isa::access::Access;
use crate::isa::fields::MicroBits;
use crate::isa::float::{
    clamp, fixed_scale, from_fixed, mac_clear, mac_update, max_bits, min_bits, status_update,
    to_fixed,
};

#[derive(Clone, Copy)]
enum Op {
    Add,
    Sub,
    Mul,
    Madd,
    Msub,
}

#[derive(Clone, Copy)]
enum Operand {
    Vector,
    Broadcast,
    I,
    Q,
}

#[derive(Clone, Copy)]
enum Target {
    Fd,
    Acc,
}

/// Reads the second operand of an upper op, splatted when it is scalar.
fn operand<A: Access>(a: &mut A, code: u32, form: Operand) -> Vector {
    match form {
        Operand::Vector => a.vf(code.ft(), code.dest()),
        Operand::Broadcast => {
            let bc = code.bc();
            let v = a.vf(code.ft(), Lanes::single(bc));
            [v[bc]; 4]
        }
        Operand::I => [a.special(Special::I); 4],
        Operand::Q => [a.special(Special::Q); 4],
    }
}

/// Publishes a freshly built MAC flag to the pending latches.
fn commit_flags<A: Access>(a: &mut A, mac: u32) {
    let status = a.latch(Special::Status);
    a.set_latch(Special::Mac, mac);
    a.set_latch(Special::Status, status_update(status, mac));
}

fn fmac<A: Access>(a: &mut A, code: u32, op: Op, form: Operand, target: Target) {
    let dest = code.dest();
    let fs = a.vf(code.fs(), dest);
    let ft = operand(a, code, form);
    let acc = match op {
        Op::Madd | Op::Msub => a.acc(dest),
        _ => [0; 4],
    };

    let mut mac = 0;
    let mut out = [0; 4];
    for lane in 0..4 {
        if !dest.contains(lane) {
            mac_clear(&mut mac, lane);
            continue;
        }
        let (s, t) = (clamp(fs[lane]), clamp(ft[lane]));
        let value = match op {
            Op::Add => s + t,
            Op::Sub => s - t,
            Op::Mul => s * t,
            Op::Madd => clamp(acc[lane]) + s * t,
            Op::Msub => clamp(acc[lane]) - s * t,
        };
        out[lane] = mac_update(&mut mac, lane, value);
    }

    match target {
        Target::Fd => a.set_vf(code.fd(), dest, out),
        Target::Acc => a.set_acc(dest, out),
    }
    commit_flags(a, mac);
}

macro_rules! fmac_ops {
    ($($(#[$doc:meta])* $name:ident => $op:ident, $form:ident, $target:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $name<A: Access>(a: &mut A, code: u32) {
                fmac(a, code, Op::$op, Operand::$form, Target::$target);
            }
        )*
    };
}

fmac_ops! {
    /// `ADD.dest fd, fs, ft`
    add => Add, Vector, Fd;
    /// `ADDbc.dest fd, fs, ft.bc`
    add_bc => Add, Broadcast, Fd;
    /// `ADDi.dest fd, fs, I`
    add_i => Add, I, Fd;
    /// `ADDq.dest fd, fs, Q`
    add_q => Add, Q, Fd;
    /// `ADDA.dest ACC, fs, ft`
    adda => Add, Vector, Acc;
    /// `ADDAbc.dest ACC, fs, ft.bc`
    adda_bc => Add, Broadcast, Acc;
    /// `ADDAi.dest ACC, fs, I`
    adda_i => Add, I, Acc;
    /// `ADDAq.dest ACC, fs, Q`
    adda_q => Add, Q, Acc;

    /// `SUB.dest fd, fs, ft`
    sub => Sub, Vector, Fd;
    /// `SUBbc.dest fd, fs, ft.bc`
    sub_bc => Sub, Broadcast, Fd;
    /// `SUBi.dest fd, fs, I`
    sub_i => Sub, I, Fd;
    /// `SUBq.dest fd, fs, Q`
    sub_q => Sub, Q, Fd;
    /// `SUBA.dest ACC, fs, ft`
    suba => Sub, Vector, Acc;
    /// `SUBAbc.dest ACC, fs, ft.bc`
    suba_bc => Sub, Broadcast, Acc;
    /// `SUBAi.dest ACC, fs, I`
    suba_i => Sub, I, Acc;
    /// `SUBAq.dest ACC, fs, Q`
    suba_q => Sub, Q, Acc;

    /// `MUL.dest fd, fs, ft`
    mul => Mul, Vector, Fd;
    /// `MULbc.dest fd, fs, ft.bc`
    mul_bc => Mul, Broadcast, Fd;
    /// `MULi.dest fd, fs, I`
    mul_i => Mul, I, Fd;
    /// `MULq.dest fd, fs, Q`
    mul_q => Mul, Q, Fd;
    /// `MULA.dest ACC, fs, ft`
    mula => Mul, Vector, Acc;
    /// `MULAbc.dest ACC, fs, ft.bc`
    mula_bc => Mul, Broadcast, Acc;
    /// `MULAi.dest ACC, fs, I`
    mula_i => Mul, I, Acc;
    /// `MULAq.dest ACC, fs, Q`
    mula_q => Mul, Q, Acc;

    /// `MADD.dest fd, fs, ft`
    madd => Madd, Vector, Fd;
    /// `MADDbc.dest fd, fs, ft.bc`
    madd_bc => Madd, Broadcast, Fd;
    /// `MADDi.dest fd, fs, I`
    madd_i => Madd, I, Fd;
    /// `MADDq.dest fd, fs, Q`
    madd_q => Madd, Q, Fd;
    /// `MADDA.dest ACC, fs, ft`
    madda => Madd, Vector, Acc;
    /// `MADDAbc.dest ACC, fs, ft.bc`
    madda_bc => Madd, Broadcast, Acc;
    /// `MADDAi.dest ACC, fs, I`
    madda_i => Madd, I, Acc;
    /// `MADDAq.dest ACC, fs, Q`
    madda_q => Madd, Q, Acc;

    /// `MSUB.dest fd, fs, ft`
    msub => Msub, Vector, Fd;
    /// `MSUBbc.dest fd, fs, ft.bc`
    msub_bc => Msub, Broadcast, Fd;
    /// `MSUBi.dest fd, fs, I`
    msub_i => Msub, I, Fd;
    /// `MSUBq.dest fd, fs, Q`
    msub_q => Msub, Q, Fd;
    /// `MSUBA.dest ACC, fs, ft`
    msuba => Msub, Vector, Acc;
    /// `MSUBAbc.dest ACC, fs, ft.bc`
    msuba_bc => Msub, Broadcast, Acc;
    /// `MSUBAi.dest ACC, fs, I`
    msuba_i => Msub, I, Acc;
    /// `MSUBAq.dest ACC, fs, Q`
    msuba_q => Msub, Q, Acc;
}

fn select<A: Access>(a: &mut A, code: u32, form: Operand, order: fn(u32, u32) -> u32) {
    let dest = code.dest();
    let fs = a.vf(code.fs(), dest);
    let ft = operand(a, code, form);
    let mut out = [0; 4];
    for lane in 0..4 {
        if dest.contains(lane) {
            out[lane] = order(fs[lane], ft[lane]);
        }
    }
    a.set_vf(code.fd(), dest, out);
}

/// `MAX.dest fd, fs, ft`
pub fn max<A: Access>(a: &mut A, code: u32) {
    select(a, code, Operand::Vector, max_bits);
}

/// `MAXbc.dest fd, fs, ft.bc`
pub fn max_bc<A: Access>(a: &mut A, code: u32) {
    select(a, code, Operand::Broadcast, max_bits);
}

/// `MAXi.dest fd, fs, I`
pub fn max_i<A: Access>(a: &mut A, code: u32) {
    select(a, code, Operand::I, max_bits);
}

/// `MINI.dest fd, fs, ft`
pub fn mini<A: Access>(a: &mut A, code: u32) {
    select(a, code, Operand::Vector, min_bits);
}

/// `MINIbc.dest fd, fs, ft.bc`
pub fn mini_bc<A: Access>(a: &mut A, code: u32) {
    select(a, code, Operand::Broadcast, min_bits);
}

/// `MINIi.dest fd, fs, I`
pub fn mini_i<A: Access>(a: &mut A, code: u32) {
    select(a, code, Operand::I, min_bits);
}

/// `ABS.dest ft, fs`
pub fn abs<A: Access>(a: &mut A, code: u32) {
    let dest = code.dest();
    let fs = a.vf(code.fs(), dest);
    a.set_vf(code.ft(), dest, fs.map(|v| clamp(v).to_bits() & !SIGN_BIT));
}

fn ftoi<A: Access>(a: &mut A, code: u32, frac_bits: u32) {
    let dest = code.dest();
    let scale = fixed_scale(frac_bits);
    let fs = a.vf(code.fs(), dest);
    a.set_vf(code.ft(), dest, fs.map(|v| to_fixed(clamp(v), scale)));
}

fn itof<A: Access>(a: &mut A, code: u32, frac_bits: u32) {
    let dest = code.dest();
    let scale = fixed_scale(frac_bits);
    let fs = a.vf(code.fs(), dest);
    a.set_vf(code.ft(), dest, fs.map(|v| from_fixed(v, scale)));
}

macro_rules! fixed_ops {
    ($($(#[$doc:meta])* $name:ident => $conv:ident, $bits:literal;)*) => {
        $(
            $(#[$doc])*
            pub fn $name<A: Access>(a: &mut A, code: u32) {
                $conv(a, code, $bits);
            }
        )*
    };
}

fixed_ops! {
    /// `FTOI0.dest ft, fs`
    ftoi0 => ftoi, 0;
    /// `FTOI4.dest ft, fs`
    ftoi4 => ftoi, 4;
    /// `FTOI12.dest ft, fs`
    ftoi12 => ftoi, 12;
    /// `FTOI15.dest ft, fs`
    ftoi15 => ftoi, 15;
    /// `ITOF0.dest ft, fs`
    itof0 => itof, 0;
    /// `ITOF4.dest ft, fs`
    itof4 => itof, 4;
    /// `ITOF12.dest ft, fs`
    itof12 => itof, 12;
    /// `ITOF15.dest ft, fs`
    itof15 => itof, 15;
}

/// `CLIPw.xyz fs, ft`
///
/// Shifts the previous judgements up by six bits and records whether each of
/// `fs.x`, `fs.y` and `fs.z` lies above `+|ft.w|` or below `-|ft.w|`. The new
/// clip value is visible immediately as well as through the pipe.
pub fn clip<A: Access>(a: &mut A, code: u32) {
    let fs = a.vf(code.fs(), Lanes::XYZ);
    let w = a.vf(code.ft(), Lanes::W)[3];
    let limit = clamp(w).abs();

    let mut judge = 0;
    for (lane, &bits) in fs.iter().enumerate().take(3) {
        let v = clamp(bits);
        if v > limit {
            judge |= 1 << (2 * lane);
        }
        if v < -limit {
            judge |= 2 << (2 * lane);
        }
    }

    let clip = ((a.latch(Special::Clip) << 6) | judge) & CLIP_MASK;
    a.set_latch(Special::Clip, clip);
    a.set_special(Special::Clip, clip);
}

/// Cross-product operands: (`fs.yzx`, `ft.zxy`) products for lanes x, y, z.
fn cross<A: Access>(a: &mut A, code: u32) -> [f32; 3] {
    let fs = a.vf(code.fs(), Lanes::XYZ);
    let ft = a.vf(code.ft(), Lanes::XYZ);
    [
        clamp(fs[1]) * clamp(ft[2]),
        clamp(fs[2]) * clamp(ft[0]),
        clamp(fs[0]) * clamp(ft[1]),
    ]
}

/// `OPMULA.xyz ACC, fs, ft`
///
/// First half of an outer product. The w lane and its MAC bits are untouched.
pub fn opmula<A: Access>(a: &mut A, code: u32) {
    let products = cross(a, code);
    let mut mac = a.latch(Special::Mac);
    let mut out = [0; 4];
    for (lane, &p) in products.iter().enumerate() {
        out[lane] = mac_update(&mut mac, lane, p);
    }
    a.set_acc(Lanes::XYZ, out);
    commit_flags(a, mac);
}

/// `OPMSUB.xyz fd, fs, ft`
///
/// Second half of an outer product: `fd = ACC - fs.yzx * ft.zxy`.
pub fn opmsub<A: Access>(a: &mut A, code: u32) {
    let products = cross(a, code);
    let acc = a.acc(Lanes::XYZ);
    let mut mac = a.latch(Special::Mac);
    let mut out = [0; 4];
    for (lane, &p) in products.iter().enumerate() {
        out[lane] = mac_update(&mut mac, lane, clamp(acc[lane]) - p);
    }
    a.set_vf(code.fd(), Lanes::XYZ, out);
    commit_flags(a, mac);
}

/// `NOP`
pub const fn nop<A: Access>(_a: &mut A, _code: u32) {}

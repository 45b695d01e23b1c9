//! Lower instruction handlers.
//!
//! The lower slot carries everything that is not an FMAC operation. This module
//! implements:
//! 1. **Memory:** Quadword loads and stores (`LQ`, `SQ` and their increment and
//!    decrement forms) and 16-bit integer transfers (`ILW`, `ISW`, `ILWR`, `ISWR`).
//! 2. **Integer arithmetic:** The `IADD` family, which wraps at 16 bits.
//! 3. **Register moves:** `MOVE`, `MR32`, `MFIR`, `MTIR` and `MFP`.
//! 4. **Divide unit:** `DIV`, `SQRT`, `RSQRT` and `WAITQ`.
//! 5. **Flag access:** The status, MAC and clip flag test and set ops.
//! 6. **Control flow:** Conditional and unconditional branches, jumps and links.
//! 7. **Random unit:** `RINIT`, `RGET`, `RNEXT` and `RXOR`.
//! 8. **Elementary functions:** The `E*` ops and `WAITP`.
//! 9. **Interfaces:** `XTOP`, `XITOP` and `XGKICK`.
//!
//! Integer register writes to `vi00` and vector writes to `vf00` are dropped by
//! the register file, so handlers never special-case register zero.

use crate::common::constants::{CLIP_MASK, FLOAT_MAX, ONE_F32, QUAD_BYTES, SIGN_BIT};
use crate::common::reg::Special;
use crate::core::arch::vf::{Lanes, Vector};
use crate::isa::access::Access;
use crate::isa::fields::MicroBits;
use crate::isa::float::{clamp, status_divide};

/// Integer register holding the clip test result.
const VI_CLIP_RESULT: usize = 1;

/// Mantissa bits kept by the random unit.
const R_MANTISSA: u32 = 0x007F_FFFF;

// ─── Memory ────────────────────────────────────────────────────────────────

/// Byte address of quadword `vi[base] + offset`, wrapped to data memory.
fn quad_addr<A: Access>(a: &mut A, base: usize, offset: i32) -> u32 {
    let index = offset + i32::from(a.vi(base) as i16);
    (index.wrapping_mul(QUAD_BYTES as i32) as u32) & a.data_mask()
}

/// Byte address of quadword `vi[base]` treated as unsigned.
fn quad_addr_unsigned<A: Access>(a: &mut A, base: usize) -> u32 {
    (u32::from(a.vi(base)) * QUAD_BYTES) & a.data_mask()
}

fn load_into<A: Access>(a: &mut A, addr: u32, code: u32) {
    let dest = code.dest();
    let val = a.load_quad(addr, dest);
    a.set_vf(code.ft(), dest, val);
}

fn store_from<A: Access>(a: &mut A, addr: u32, code: u32) {
    let dest = code.dest();
    let val = a.vf(code.fs(), dest);
    a.store_quad(addr, dest, val);
}

/// `LQ.dest ft, imm(is)`
pub fn lq<A: Access>(a: &mut A, code: u32) {
    let addr = quad_addr(a, code.is(), code.imm11());
    load_into(a, addr, code);
}

/// `LQI.dest ft, (is++)`
pub fn lqi<A: Access>(a: &mut A, code: u32) {
    let is = code.is();
    let addr = quad_addr_unsigned(a, is);
    load_into(a, addr, code);
    let next = a.vi(is).wrapping_add(1);
    a.set_vi(is, next);
}

/// `LQD.dest ft, (--is)`
pub fn lqd<A: Access>(a: &mut A, code: u32) {
    let is = code.is();
    let prev = a.vi(is).wrapping_sub(1);
    a.set_vi(is, prev);
    let addr = quad_addr_unsigned(a, is);
    load_into(a, addr, code);
}

/// `SQ.dest fs, imm(it)`
pub fn sq<A: Access>(a: &mut A, code: u32) {
    let addr = quad_addr(a, code.it(), code.imm11());
    store_from(a, addr, code);
}

/// `SQI.dest fs, (it++)`
pub fn sqi<A: Access>(a: &mut A, code: u32) {
    let it = code.it();
    let addr = quad_addr_unsigned(a, it);
    store_from(a, addr, code);
    let next = a.vi(it).wrapping_add(1);
    a.set_vi(it, next);
}

/// `SQD.dest fs, (--it)`
pub fn sqd<A: Access>(a: &mut A, code: u32) {
    let it = code.it();
    let prev = a.vi(it).wrapping_sub(1);
    a.set_vi(it, prev);
    let addr = quad_addr_unsigned(a, it);
    store_from(a, addr, code);
}

/// Loads the low half of the last selected lane into `it`.
fn load_int<A: Access>(a: &mut A, addr: u32, code: u32) {
    if let Some(lane) = code.dest().last() {
        let val = a.load_quad(addr, Lanes::single(lane));
        a.set_vi(code.it(), val[lane] as u16);
    }
}

/// Stores `it`, zero-extended, to every selected lane.
fn store_int<A: Access>(a: &mut A, addr: u32, code: u32) {
    let val = u32::from(a.vi(code.it()));
    a.store_quad(addr, code.dest(), [val; 4]);
}

/// `ILW.dest it, imm(is)`
pub fn ilw<A: Access>(a: &mut A, code: u32) {
    let addr = quad_addr(a, code.is(), code.imm11());
    load_int(a, addr, code);
}

/// `ILWR.dest it, (is)`
pub fn ilwr<A: Access>(a: &mut A, code: u32) {
    let addr = quad_addr_unsigned(a, code.is());
    load_int(a, addr, code);
}

/// `ISW.dest it, imm(is)`
pub fn isw<A: Access>(a: &mut A, code: u32) {
    let addr = quad_addr(a, code.is(), code.imm11());
    store_int(a, addr, code);
}

/// `ISWR.dest it, (is)`
pub fn iswr<A: Access>(a: &mut A, code: u32) {
    let addr = quad_addr_unsigned(a, code.is());
    store_int(a, addr, code);
}

// ─── Integer arithmetic ────────────────────────────────────────────────────

/// `IADD id, is, it`
pub fn iadd<A: Access>(a: &mut A, code: u32) {
    let val = a.vi(code.is()).wrapping_add(a.vi(code.it()));
    a.set_vi(code.id(), val);
}

/// `ISUB id, is, it`
pub fn isub<A: Access>(a: &mut A, code: u32) {
    let val = a.vi(code.is()).wrapping_sub(a.vi(code.it()));
    a.set_vi(code.id(), val);
}

/// `IAND id, is, it`
pub fn iand<A: Access>(a: &mut A, code: u32) {
    let val = a.vi(code.is()) & a.vi(code.it());
    a.set_vi(code.id(), val);
}

/// `IOR id, is, it`
pub fn ior<A: Access>(a: &mut A, code: u32) {
    let val = a.vi(code.is()) | a.vi(code.it());
    a.set_vi(code.id(), val);
}

/// `IADDI it, is, imm5`
pub fn iaddi<A: Access>(a: &mut A, code: u32) {
    let val = a.vi(code.is()).wrapping_add_signed(code.imm5());
    a.set_vi(code.it(), val);
}

/// `IADDIU it, is, imm15`
pub fn iaddiu<A: Access>(a: &mut A, code: u32) {
    let val = a.vi(code.is()).wrapping_add(code.imm15());
    a.set_vi(code.it(), val);
}

/// `ISUBIU it, is, imm15`
pub fn isubiu<A: Access>(a: &mut A, code: u32) {
    let val = a.vi(code.is()).wrapping_sub(code.imm15());
    a.set_vi(code.it(), val);
}

// ─── Register moves ────────────────────────────────────────────────────────

/// `MOVE.dest ft, fs`
pub fn mov<A: Access>(a: &mut A, code: u32) {
    let dest = code.dest();
    let val = a.vf(code.fs(), dest);
    a.set_vf(code.ft(), dest, val);
}

/// `MR32.dest ft, fs`: rotates `fs` one lane towards x.
pub fn mr32<A: Access>(a: &mut A, code: u32) {
    let dest = code.dest();
    let src = a.vf(code.fs(), dest.rotated());
    a.set_vf(code.ft(), dest, [src[1], src[2], src[3], src[0]]);
}

/// `MFIR.dest ft, is`: sign-extends `is` into every selected lane.
pub fn mfir<A: Access>(a: &mut A, code: u32) {
    let val = i32::from(a.vi(code.is()) as i16) as u32;
    a.set_vf(code.ft(), code.dest(), [val; 4]);
}

/// `MTIR it, fs.fsf`
pub fn mtir<A: Access>(a: &mut A, code: u32) {
    let fsf = code.fsf();
    let val = a.vf(code.fs(), Lanes::single(fsf))[fsf];
    a.set_vi(code.it(), val as u16);
}

/// `MFP.dest ft, P`
pub fn mfp<A: Access>(a: &mut A, code: u32) {
    let p = a.special(Special::P);
    a.set_vf(code.ft(), code.dest(), [p; 4]);
}

// ─── Divide unit ───────────────────────────────────────────────────────────

/// Reads the `fs.fsf` and `ft.ftf` scalars as raw patterns.
fn div_operands<A: Access>(a: &mut A, code: u32) -> (u32, u32) {
    let (fsf, ftf) = (code.fsf(), code.ftf());
    let s = a.vf(code.fs(), Lanes::single(fsf))[fsf];
    let t = a.vf(code.ft(), Lanes::single(ftf))[ftf];
    (s, t)
}

/// Publishes a divide unit result to the pending Q and status latches.
fn commit_q<A: Access>(a: &mut A, q: u32, status: u32) {
    a.set_latch(Special::Q, q);
    a.set_latch(Special::Status, status);
}

/// Rounds a result through the clamp applied to every stored Q value.
fn clamped(value: f32) -> u32 {
    clamp(value.to_bits()).to_bits()
}

/// `DIV Q, fs.fsf, ft.ftf`
///
/// Dividing by zero sets the divide-by-zero flag (or the invalid flag for
/// `0 / 0`) and returns the largest finite value signed by the operand signs.
pub fn div<A: Access>(a: &mut A, code: u32) {
    let (s_bits, t_bits) = div_operands(a, code);
    let (s, t) = (clamp(s_bits), clamp(t_bits));
    let mut status = status_divide(a.latch(Special::Status));

    let q = if t == 0.0 {
        status |= if s == 0.0 { 0x10 } else { 0x20 };
        ((s_bits ^ t_bits) & SIGN_BIT) | FLOAT_MAX
    } else {
        clamped(s / t)
    };
    commit_q(a, q, status);
}

/// `SQRT Q, ft.ftf`: square root of `|ft|`, flagging negative inputs.
pub fn sqrt<A: Access>(a: &mut A, code: u32) {
    let ftf = code.ftf();
    let t = clamp(a.vf(code.ft(), Lanes::single(ftf))[ftf]);
    let mut status = status_divide(a.latch(Special::Status));
    if t < 0.0 {
        status |= 0x10;
    }
    commit_q(a, clamped(t.abs().sqrt()), status);
}

/// `RSQRT Q, fs.fsf, ft.ftf`: `fs / sqrt(|ft|)`.
pub fn rsqrt<A: Access>(a: &mut A, code: u32) {
    let (s_bits, t_bits) = div_operands(a, code);
    let (s, t) = (clamp(s_bits), clamp(t_bits));
    let sign = (s_bits ^ t_bits) & SIGN_BIT;
    let mut status = status_divide(a.latch(Special::Status));

    let q = if t == 0.0 {
        status |= 0x20;
        if s == 0.0 {
            status |= 0x10;
            sign
        } else {
            sign | FLOAT_MAX
        }
    } else {
        if t < 0.0 {
            status |= 0x10;
        }
        clamped(s / t.abs().sqrt())
    };
    commit_q(a, q, status);
}

/// `WAITQ`: the stall is applied by the divide pipe; nothing executes.
pub const fn waitq<A: Access>(_a: &mut A, _code: u32) {}

// ─── Flag access ───────────────────────────────────────────────────────────

fn status_visible<A: Access>(a: &mut A) -> u16 {
    (a.special(Special::Status) & 0xFFF) as u16
}

/// `FSAND it, imm12`
pub fn fsand<A: Access>(a: &mut A, code: u32) {
    let val = status_visible(a) & code.imm12() as u16;
    a.set_vi(code.it(), val);
}

/// `FSEQ it, imm12`
pub fn fseq<A: Access>(a: &mut A, code: u32) {
    let val = u16::from(u32::from(status_visible(a)) == code.imm12());
    a.set_vi(code.it(), val);
}

/// `FSOR it, imm12`
pub fn fsor<A: Access>(a: &mut A, code: u32) {
    let val = status_visible(a) | code.imm12() as u16;
    a.set_vi(code.it(), val);
}

/// `FSSET imm12`: replaces the sticky status bits, keeping the current ones.
pub fn fsset<A: Access>(a: &mut A, code: u32) {
    let current = a.special(Special::Status) & 0x3F;
    a.set_latch(Special::Status, (code.imm12() & 0xFC0) | current);
}

fn mac_visible<A: Access>(a: &mut A) -> u16 {
    (a.special(Special::Mac) & 0xFFFF) as u16
}

/// `FMAND it, is`
pub fn fmand<A: Access>(a: &mut A, code: u32) {
    let val = a.vi(code.is()) & mac_visible(a);
    a.set_vi(code.it(), val);
}

/// `FMEQ it, is`
pub fn fmeq<A: Access>(a: &mut A, code: u32) {
    let val = u16::from(a.vi(code.is()) == mac_visible(a));
    a.set_vi(code.it(), val);
}

/// `FMOR it, is`
pub fn fmor<A: Access>(a: &mut A, code: u32) {
    let val = a.vi(code.is()) | mac_visible(a);
    a.set_vi(code.it(), val);
}

fn clip_visible<A: Access>(a: &mut A) -> u32 {
    a.special(Special::Clip) & CLIP_MASK
}

/// `FCAND vi01, imm24`
pub fn fcand<A: Access>(a: &mut A, code: u32) {
    let val = u16::from(clip_visible(a) & code.imm24() != 0);
    a.set_vi(VI_CLIP_RESULT, val);
}

/// `FCEQ vi01, imm24`
pub fn fceq<A: Access>(a: &mut A, code: u32) {
    let val = u16::from(clip_visible(a) == code.imm24());
    a.set_vi(VI_CLIP_RESULT, val);
}

/// `FCOR vi01, imm24`: 1 when every judgement bit is set after the OR.
pub fn fcor<A: Access>(a: &mut A, code: u32) {
    let val = u16::from(clip_visible(a) | code.imm24() == CLIP_MASK);
    a.set_vi(VI_CLIP_RESULT, val);
}

/// `FCSET imm24`
pub fn fcset<A: Access>(a: &mut A, code: u32) {
    let clip = code.imm24();
    a.set_latch(Special::Clip, clip);
    a.set_special(Special::Clip, clip);
}

/// `FCGET it`: the two most recent judgements.
pub fn fcget<A: Access>(a: &mut A, code: u32) {
    let val = (a.special(Special::Clip) & 0xFFF) as u16;
    a.set_vi(code.it(), val);
}

// ─── Control flow ──────────────────────────────────────────────────────────

/// PC-relative branch target, wrapped to micro memory.
fn branch_target<A: Access>(a: &A, code: u32) -> u32 {
    let offset = code.imm11().wrapping_mul(8);
    a.tpc().wrapping_add_signed(offset) & a.micro_mask()
}

/// Return index of the micro-word after the delay slot.
fn link<A: Access>(a: &A) -> u16 {
    (a.tpc().wrapping_add(8) / 8) as u16
}

/// `B imm11`
pub fn b<A: Access>(a: &mut A, code: u32) {
    let target = branch_target(a, code);
    a.branch(target);
}

/// `BAL it, imm11`
pub fn bal<A: Access>(a: &mut A, code: u32) {
    let target = branch_target(a, code);
    let ret = link(a);
    a.set_vi(code.it(), ret);
    a.branch(target);
}

/// `JR is`
///
/// The target is not wrapped; a jump outside micro memory halts the unit at
/// the next fetch.
pub fn jr<A: Access>(a: &mut A, code: u32) {
    let target = u32::from(a.vi(code.is())) * 8;
    a.branch(target);
}

/// `JALR it, is`
pub fn jalr<A: Access>(a: &mut A, code: u32) {
    let target = u32::from(a.vi(code.is())) * 8;
    let ret = link(a);
    a.set_vi(code.it(), ret);
    a.branch(target);
}

fn branch_if<A: Access>(a: &mut A, code: u32, taken: bool) {
    if taken {
        let target = branch_target(a, code);
        a.branch(target);
    }
}

/// `IBEQ it, is, imm11`
pub fn ibeq<A: Access>(a: &mut A, code: u32) {
    let taken = a.vi(code.it()) == a.vi(code.is());
    branch_if(a, code, taken);
}

/// `IBNE it, is, imm11`
pub fn ibne<A: Access>(a: &mut A, code: u32) {
    let taken = a.vi(code.it()) != a.vi(code.is());
    branch_if(a, code, taken);
}

/// `IBLTZ is, imm11`
pub fn ibltz<A: Access>(a: &mut A, code: u32) {
    let taken = (a.vi(code.is()) as i16) < 0;
    branch_if(a, code, taken);
}

/// `IBGTZ is, imm11`
pub fn ibgtz<A: Access>(a: &mut A, code: u32) {
    let taken = (a.vi(code.is()) as i16) > 0;
    branch_if(a, code, taken);
}

/// `IBLEZ is, imm11`
pub fn iblez<A: Access>(a: &mut A, code: u32) {
    let taken = (a.vi(code.is()) as i16) <= 0;
    branch_if(a, code, taken);
}

/// `IBGEZ is, imm11`
pub fn ibgez<A: Access>(a: &mut A, code: u32) {
    let taken = (a.vi(code.is()) as i16) >= 0;
    branch_if(a, code, taken);
}

// ─── Random unit ───────────────────────────────────────────────────────────

fn fsf_lane<A: Access>(a: &mut A, code: u32) -> u32 {
    let fsf = code.fsf();
    a.vf(code.fs(), Lanes::single(fsf))[fsf]
}

/// `RINIT R, fs.fsf`
pub fn rinit<A: Access>(a: &mut A, code: u32) {
    let seed = fsf_lane(a, code);
    a.set_special(Special::R, ONE_F32 | (seed & R_MANTISSA));
}

/// `RGET.dest ft, R`
pub fn rget<A: Access>(a: &mut A, code: u32) {
    let r = a.special(Special::R);
    a.set_vf(code.ft(), code.dest(), [r; 4]);
}

/// Steps the 23-bit feedback shift register behind R.
const fn advance_lfsr(r: u32) -> u32 {
    let x = (r >> 4) & 1;
    let y = (r >> 22) & 1;
    let next = (r << 1) ^ x ^ y;
    (next & R_MANTISSA) | ONE_F32
}

/// `RNEXT.dest ft, R`: advances R, then copies it. A `vf00` target leaves R unchanged.
pub fn rnext<A: Access>(a: &mut A, code: u32) {
    if code.ft() == 0 {
        return;
    }
    let r = advance_lfsr(a.special(Special::R));
    a.set_special(Special::R, r);
    a.set_vf(code.ft(), code.dest(), [r; 4]);
}

/// `RXOR R, fs.fsf`
pub fn rxor<A: Access>(a: &mut A, code: u32) {
    let val = fsf_lane(a, code);
    let r = a.special(Special::R);
    a.set_special(Special::R, ONE_F32 | ((r ^ val) & R_MANTISSA));
}

// ─── Elementary functions ──────────────────────────────────────────────────

fn efu_scalar<A: Access>(a: &mut A, code: u32) -> f32 {
    clamp(fsf_lane(a, code))
}

fn efu_vector<A: Access>(a: &mut A, code: u32, lanes: Lanes) -> [f32; 4] {
    let v: Vector = a.vf(code.fs(), lanes);
    v.map(clamp)
}

fn square_sum<A: Access>(a: &mut A, code: u32) -> f32 {
    let v = efu_vector(a, code, Lanes::XYZ);
    v[0] * v[0] + v[1] * v[1] + v[2] * v[2]
}

fn set_p<A: Access>(a: &mut A, p: f32) {
    a.set_latch(Special::P, p.to_bits());
}

/// `ESADD P, fs`: `x² + y² + z²`.
pub fn esadd<A: Access>(a: &mut A, code: u32) {
    let p = square_sum(a, code);
    set_p(a, p);
}

/// `ERSADD P, fs`: `1 / (x² + y² + z²)`.
pub fn ersadd<A: Access>(a: &mut A, code: u32) {
    let p = square_sum(a, code);
    set_p(a, if p == 0.0 { p } else { 1.0 / p });
}

/// `ELENG P, fs`: `sqrt(x² + y² + z²)`.
pub fn eleng<A: Access>(a: &mut A, code: u32) {
    let p = square_sum(a, code);
    set_p(a, if p >= 0.0 { p.sqrt() } else { p });
}

/// `ERLENG P, fs`: `1 / sqrt(x² + y² + z²)`.
pub fn erleng<A: Access>(a: &mut A, code: u32) {
    let mut p = square_sum(a, code);
    if p >= 0.0 {
        p = p.sqrt();
        if p != 0.0 {
            p = 1.0 / p;
        }
    }
    set_p(a, p);
}

/// `EATANxy P, fs`: `atan2(y, x)`, zero when x is zero.
pub fn eatanxy<A: Access>(a: &mut A, code: u32) {
    let v = efu_vector(a, code, Lanes::X.union(Lanes::Y));
    set_p(a, if v[0] == 0.0 { 0.0 } else { v[1].atan2(v[0]) });
}

/// `EATANxz P, fs`: `atan2(z, x)`, zero when x is zero.
pub fn eatanxz<A: Access>(a: &mut A, code: u32) {
    let v = efu_vector(a, code, Lanes::X.union(Lanes::Z));
    set_p(a, if v[0] == 0.0 { 0.0 } else { v[2].atan2(v[0]) });
}

/// `ESUM P, fs`: `x + y + z + w`.
pub fn esum<A: Access>(a: &mut A, code: u32) {
    let v = efu_vector(a, code, Lanes::ALL);
    set_p(a, v[0] + v[1] + v[2] + v[3]);
}

/// `ERCPR P, fs.fsf`
pub fn ercpr<A: Access>(a: &mut A, code: u32) {
    let p = efu_scalar(a, code);
    set_p(a, if p == 0.0 { p } else { 1.0 / p });
}

/// `ESQRT P, fs.fsf`
pub fn esqrt<A: Access>(a: &mut A, code: u32) {
    let p = efu_scalar(a, code);
    set_p(a, if p >= 0.0 { p.sqrt() } else { p });
}

/// `ERSQRT P, fs.fsf`
pub fn ersqrt<A: Access>(a: &mut A, code: u32) {
    let mut p = efu_scalar(a, code);
    if p >= 0.0 {
        p = p.sqrt();
        if p != 0.0 {
            p = 1.0 / p;
        }
    }
    set_p(a, p);
}

/// `ESIN P, fs.fsf`
pub fn esin<A: Access>(a: &mut A, code: u32) {
    let p = efu_scalar(a, code);
    set_p(a, p.sin());
}

/// `EATAN P, fs.fsf`
pub fn eatan<A: Access>(a: &mut A, code: u32) {
    let p = efu_scalar(a, code);
    set_p(a, p.atan());
}

/// `EEXP P, fs.fsf`: `exp(-x)`.
pub fn eexp<A: Access>(a: &mut A, code: u32) {
    let p = efu_scalar(a, code);
    set_p(a, (-p).exp());
}

/// `WAITP`: the stall is applied by the elementary function pipe.
pub const fn waitp<A: Access>(_a: &mut A, _code: u32) {}

// ─── Interfaces ────────────────────────────────────────────────────────────

/// `XTOP it`
pub fn xtop<A: Access>(a: &mut A, code: u32) {
    let top = a.vif_top();
    a.set_vi(code.it(), top);
}

/// `XITOP it`
pub fn xitop<A: Access>(a: &mut A, code: u32) {
    let itop = a.vif_itop();
    a.set_vi(code.it(), itop);
}

/// `XGKICK is`: sends the packet at quadword `vi[is]` to the graphics interface.
pub fn xgkick<A: Access>(a: &mut A, code: u32) {
    let addr = quad_addr_unsigned(a, code.is());
    a.gif_kick(addr);
}

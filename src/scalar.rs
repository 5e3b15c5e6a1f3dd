// -*- mode: rust; -*-
//
// This file is part of the jq255 crate.
// See LICENSE for licensing information.

//! Arithmetic modulo the group order `r`.
//!
//! Both curves use a 254-bit order close to a power of two
//! (`r = 2^254 - R0` for jq255e, `r = 2^254 + R0` for jq255s), which
//! lets reduction work by folding the high bits back in through `R0`
//! rather than a general Barrett/Montgomery reduction. [`Scalar`] is
//! generic over the curve so the two reduction variants share one
//! type; the sign of the correction is picked at compile time through
//! [`CurveParams::R_IS_MINUS`].

use core::marker::PhantomData;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::curve::CurveParams;
use crate::util::{adc, mac, sbb};

/// An element of `Z/rZ`, stored as four 64-bit limbs, always fully
/// reduced (`0 <= v < r`).
#[derive(Clone, Copy)]
pub struct Scalar<C: CurveParams> {
    pub(crate) v: [u64; 4],
    _marker: PhantomData<C>,
}

impl<C: CurveParams> Scalar<C> {
    pub const ZERO: Self = Self::from_raw([0, 0, 0, 0]);
    pub const ONE: Self = Self::from_raw([1, 0, 0, 0]);

    pub(crate) const fn from_raw(v: [u64; 4]) -> Self {
        Scalar { v, _marker: PhantomData }
    }

    /// Encode as 32 little-endian bytes.
    pub fn encode(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for i in 0..4 {
            out[8 * i..8 * i + 8].copy_from_slice(&self.v[i].to_le_bytes());
        }
        out
    }

    /// Decode exactly 32 bytes. The returned `Choice` is true iff the
    /// encoded integer was in `0..r`; on failure the returned scalar is
    /// zero.
    pub fn decode(buf: &[u8; 32]) -> (Self, Choice) {
        let mut v = [0u64; 4];
        for i in 0..4 {
            v[i] = u64::from_le_bytes(buf[8 * i..8 * i + 8].try_into().unwrap());
        }
        let ok = is_reduced::<C>(&v);
        let z = Self::conditional_select(&Self::ZERO, &Self::from_raw(v), ok);
        (z, ok)
    }

    /// Decode an arbitrary-length byte string as an unsigned
    /// little-endian integer, reduced modulo `r`. Never fails.
    pub fn decode_reduce(buf: &[u8]) -> Self {
        let len = buf.len();
        if len < 32 {
            let mut tmp = [0u8; 32];
            tmp[..len].copy_from_slice(buf);
            let mut v = [0u64; 4];
            for i in 0..4 {
                v[i] = u64::from_le_bytes(tmp[8 * i..8 * i + 8].try_into().unwrap());
            }
            return Self::from_raw(v);
        }

        let mut remaining = len;
        let clen = 17 + ((len - 1) & 15);
        remaining -= clen;

        let mut d = if clen < 32 {
            let mut tmp = [0u8; 32];
            tmp[..clen].copy_from_slice(&buf[remaining..remaining + clen]);
            let mut v = [0u64; 4];
            for i in 0..4 {
                v[i] = u64::from_le_bytes(tmp[8 * i..8 * i + 8].try_into().unwrap());
            }
            v
        } else {
            let mut v = [0u64; 4];
            for i in 0..4 {
                v[i] = u64::from_le_bytes(
                    buf[remaining + 8 * i..remaining + 8 * i + 8].try_into().unwrap(),
                );
            }
            reduce256_partial::<C>(&v, 0)
        };

        while remaining > 0 {
            remaining -= 16;
            let mut t = [0u64; 6];
            t[0] = u64::from_le_bytes(buf[remaining..remaining + 8].try_into().unwrap());
            t[1] = u64::from_le_bytes(buf[remaining + 8..remaining + 16].try_into().unwrap());
            t[2..6].copy_from_slice(&d);
            d = reduce384_partial::<C>(&t);
        }

        d = reduce256_finish::<C>(d);
        Self::from_raw(d)
    }

    pub fn select(a0: &Self, a1: &Self, ctl: Choice) -> Self {
        Self::conditional_select(a0, a1, ctl)
    }

    /// `d <- a + b`. Since `r < 2^254`, `a + b < 2r < 2^256` always
    /// fits in 4 limbs; a single conditional subtraction reduces it.
    pub fn add(&self, other: &Self) -> Self {
        let (d0, c0) = adc(self.v[0], other.v[0], 0);
        let (d1, c1) = adc(self.v[1], other.v[1], c0);
        let (d2, c2) = adc(self.v[2], other.v[2], c1);
        let (d3, _) = adc(self.v[3], other.v[3], c2);
        let d = inner_reduce::<C>(&[d0, d1, d2, d3]);
        Self::from_raw(d)
    }

    /// `d <- a*b`.
    pub fn mul(&self, other: &Self) -> Self {
        let a = self.v;
        let b = other.v;

        // Schoolbook 4x4 -> 8 limb product, row by row, folding each
        // row's partial products in one at a time through `mac` rather
        // than summing a whole column of up to four 64x64 products into
        // a single u128 first (which overflows whenever a column holds
        // more than one full-width term).
        let mut t = [0u64; 8];
        for i in 0..4 {
            let mut carry = 0u64;
            for j in 0..4 {
                let (v, c) = mac(t[i + j], a[i], b[j], carry);
                t[i + j] = v;
                carry = c;
            }
            t[i + 4] = carry;
        }

        let high: [u64; 6] = [t[2], t[3], t[4], t[5], t[6], t[7]];
        let mid = reduce384_partial::<C>(&high);
        let combined: [u64; 6] = [t[0], t[1], mid[0], mid[1], mid[2], mid[3]];
        let d = reduce384_partial::<C>(&combined);
        let d = reduce256_finish::<C>(d);
        Self::from_raw(d)
    }

    pub fn neg(&self) -> Self {
        Self::ZERO.sub(self)
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg_unreduced())
    }

    /// `r - a`, used only as a helper for [`sub`](Self::sub); the
    /// result is partially reduced (`< 2r`), which `add`'s trailing
    /// [`inner_reduce`] brings back into range.
    fn neg_unreduced(&self) -> Self {
        let r = C::R;
        let (d0, c0) = sbb(r[0], self.v[0], 0);
        let (d1, c1) = sbb(r[1], self.v[1], c0);
        let (d2, c2) = sbb(r[2], self.v[2], c1);
        let (d3, _) = sbb(r[3], self.v[3], c2);
        Self::from_raw([d0, d1, d2, d3])
    }

    pub fn is_zero(&self) -> Choice {
        let mut r = self.v[0];
        r |= self.v[1];
        r |= self.v[2];
        r |= self.v[3];
        Choice::from((r == 0) as u8)
    }

    pub fn equals(&self, other: &Self) -> Choice {
        self.sub(other).is_zero()
    }

    /// Recode into 51 signed digits in `[-15, +16]`, base `2^5`, used
    /// by the precomputed-window base-point multiplication.
    pub(crate) fn recode_booth(&self) -> [i8; 51] {
        recode_5bit_window(&self.v, 51)
    }

    /// Recode into 256 signed digits, each `0` or odd in `[-15, +15]`,
    /// with at least 5 zeros between non-zero digits (wNAF, window 5).
    /// Used by variable-time double-scalar multiplication.
    pub(crate) fn recode_wnaf(&self) -> [i8; 256] {
        recode_wnaf_5bit(&self.v)
    }
}

impl<C: CurveParams> Default for Scalar<C> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<C: CurveParams> ConditionallySelectable for Scalar<C> {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut out = [0u64; 4];
        for i in 0..4 {
            out[i] = u64::conditional_select(&a.v[i], &b.v[i], choice);
        }
        Self::from_raw(out)
    }
}

impl<C: CurveParams> ConstantTimeEq for Scalar<C> {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.equals(other)
    }
}

impl<C: CurveParams> PartialEq for Scalar<C> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other).into()
    }
}
impl<C: CurveParams> Eq for Scalar<C> {}

#[cfg(feature = "zeroize")]
impl<C: CurveParams> zeroize::Zeroize for Scalar<C> {
    fn zeroize(&mut self) {
        self.v.zeroize();
    }
}

const MASK254: u64 = 0x3FFF_FFFF_FFFF_FFFF;

/// `true` (as a `Choice`) iff `a < r`.
fn is_reduced<C: CurveParams>(a: &[u64; 4]) -> Choice {
    let r = C::R;
    let (_, c0) = sbb(a[0], r[0], 0);
    let (_, c1) = sbb(a[1], r[1], c0);
    let (_, c2) = sbb(a[2], r[2], c1);
    let (_, c3) = sbb(a[3], r[3], c2);
    Choice::from((c3 & 1) as u8)
}

/// `a` is assumed `< 2r`; brings it fully into `0..r` with a single
/// conditional subtraction.
fn inner_reduce<C: CurveParams>(a: &[u64; 4]) -> [u64; 4] {
    let r = C::R;
    let (d0, c0) = sbb(a[0], r[0], 0);
    let (d1, c1) = sbb(a[1], r[1], c0);
    let (d2, c2) = sbb(a[2], r[2], c1);
    let (d3, c3) = sbb(a[3], r[3], c2);
    let z = c3;
    let (r0, c0) = adc(d0, z & r[0], 0);
    let (r1, c1) = adc(d1, z & r[1], c0);
    let (r2, c2) = adc(d2, z & r[2], c1);
    let (r3, _) = adc(d3, z & r[3], c2);
    [r0, r1, r2, r3]
}

/// `(lo, hi) = a*b`, two 128-bit operands, full 256-bit product.
fn mul128x128(a: &[u64; 2], b: &[u64; 2]) -> [u64; 4] {
    let mut d = [0u64; 4];
    for i in 0..2 {
        let mut carry = 0u64;
        for j in 0..2 {
            let (v, c) = mac(d[i + j], a[i], b[j], carry);
            d[i + j] = v;
            carry = c;
        }
        d[i + 2] = carry;
    }
    d
}

/// `a - b`, both 128-bit.
fn sub128(a: &[u64; 2], b: &[u64; 2]) -> [u64; 2] {
    let (d0, c0) = sbb(a[0], b[0], 0);
    let (d1, _) = sbb(a[1], b[1], c0);
    [d0, d1]
}

/// `(a*b) mod 2^128`, both operands 128-bit.
fn mul128x128trunc(a: &[u64; 2], b: &[u64; 2]) -> [u64; 2] {
    let mut d = [0u64; 2];
    for i in 0..2 {
        let mut cc = 0u64;
        for j in 0..(2 - i) {
            let (v, c) = mac(d[i + j], a[i], b[j], cc);
            d[i + j] = v;
            cc = c;
        }
    }
    d
}

/// Two's-complement absolute value of a 128-bit signed integer.
/// Returns the original sign as `0`/`1`.
fn abs128(d: &mut [u64; 2]) -> u64 {
    let s = d[1] >> 63;
    let m = 0u64.wrapping_sub(s);
    let mut cc = s;
    for i in 0..2 {
        let (v, c) = adc(d[i] ^ m, 0, cc);
        d[i] = v;
        cc = c;
    }
    s
}

/// Curve-specific 256-bit partial reduction: given `a < 2^256` and an
/// extra high word `ah_in` representing bits `256..`, fold everything
/// back into 4 limbs, either adding (`r = 2^254 - R0`) or subtracting
/// with a conditional add-back (`r = 2^254 + R0`).
fn reduce256_partial<C: CurveParams>(a: &[u64; 4], ah_in: u64) -> [u64; 4] {
    let ah = (ah_in << 2) | (a[3] >> 62);
    if C::R_IS_MINUS {
        let (d0, c0) = mac(a[0], ah, C::R0[0], 0);
        let (d1, c1) = mac(a[1], ah, C::R0[1], c0);
        let (d2, c2) = adc(a[2], 0, c1);
        let (d3, _) = adc(a[3] & MASK254, 0, c2);
        [d0, d1, d2, d3]
    } else {
        let (q0, cc1) = mac(0, ah, C::R0[0], 0);
        let (d0, b0) = sbb(a[0], q0, 0);
        let (q1, cc1b) = mac(0, ah, C::R0[1], cc1);
        let (d1, b1) = sbb(a[1], q1, b0);
        let (d2, b2) = sbb(a[2], cc1b, b1);
        let (d3, b3) = sbb(a[3] & MASK254, 0, b2);
        let z = b3;
        let r = C::R;
        let (r0, c0) = adc(d0, z & r[0], 0);
        let (r1, c1) = adc(d1, z & r[1], c0);
        let (r2, c2) = adc(d2, z & r[2], c1);
        let (r3, _) = adc(d3, z & r[3], c2);
        [r0, r1, r2, r3]
    }
}

/// `modr_reduce256_finish`: a no-op for jq255s (`reduce256_partial`
/// already yields a fully reduced value there); a final conditional
/// subtraction for jq255e.
fn reduce256_finish<C: CurveParams>(a: [u64; 4]) -> [u64; 4] {
    if C::R_IS_MINUS {
        inner_reduce::<C>(&a)
    } else {
        a
    }
}

/// Curve-specific 384-bit (6-limb) partial reduction down to 4 limbs.
fn reduce384_partial<C: CurveParams>(a: &[u64; 6]) -> [u64; 4] {
    let hi = [a[4], a[5]];
    if C::R_IS_MINUS {
        let t = mul128x128(&hi, &C::R0);
        let mut d = [0u64; 4];
        let mut carry: u128 = 0;
        for i in 0..4 {
            let v = ((t[i] as u128) << 2) + (a[i] as u128) + carry;
            d[i] = v as u64;
            carry = v >> 64;
        }
        let ah = carry as u64;
        reduce256_partial::<C>(&d, ah)
    } else {
        let r0 = [C::R_X4[0], C::R_X4[1]];
        let t = mul128x128(&hi, &r0);
        let mut d = [0u64; 4];
        let mut b = 0u64;
        let mut c = 0u64;
        for i in 0..4 {
            let (w, b2) = sbb(C::R_X4[i], t[i], b);
            b = b2;
            let (v, c2) = adc(w, a[i], c);
            d[i] = v;
            c = c2;
        }
        let ah = c.wrapping_add(1).wrapping_sub(b);
        reduce256_partial::<C>(&d, ah)
    }
}

/// `round(k*e / r)`, for `k < r` and `e < 2^127`. Used only by the
/// jq255e endomorphism split.
fn mul_divr_rounded<C: CurveParams>(k: &[u64; 4], e: &[u64; 2]) -> [u64; 2] {
    let mut z = [0u64; 6];
    for i in 0..2 {
        let mut carry = 0u64;
        for j in 0..4 {
            let (v, c) = mac(z[i + j], e[i], k[j], carry);
            z[i + j] = v;
            carry = c;
        }
        z[i + 4] = carry;
    }

    let hr = C::HR;
    let (z0, c0) = adc(z[0], hr[0], 0);
    let (z1, c1) = adc(z[1], hr[1], c0);
    let (z2, c2) = adc(z[2], hr[2], c1);
    let (z3, c3) = adc(z[3], hr[3], c2);
    let (z4, c4) = adc(z[4], 0, c3);
    let (z5, _) = adc(z[5], 0, c4);
    let z = [z0, z1, z2, z3, z4, z5];

    let y0v = (z[3] >> 62) | (z[4] << 2);
    let y1v = (z[4] >> 62) | (z[5] << 2);
    let (y0, c) = adc(y0v, 1, 0);
    let (y1, _) = adc(y1v, 0, c);
    let y = [y0, y1];

    let t = mul128x128(&y, &C::R0);
    let zz = [z[0], z[1], z[2], z[3] & MASK254];
    let mut c = 0u64;
    let mut hi = 0u64;
    for i in 0..4 {
        let (v, c2) = adc(zz[i], t[i], c);
        hi = v;
        c = c2;
    }

    let dec = 1u64.wrapping_sub(hi >> 62);
    let (d0, b0) = sbb(y[0], dec, 0);
    let (d1, _) = sbb(y[1], b0, 0);
    [d0, d1]
}

/// Recode `v` (4 limbs) into `len` signed digits in `[-15, +16]`,
/// base `2^5`. `v` must contribute fewer than `5*len` significant
/// bits (true for any scalar and `len = 51`).
fn recode_5bit_window(v: &[u64; 4], len: usize) -> [i8; 51] {
    debug_assert!(len <= 51);
    let mut out = [0i8; 51];
    let mut acc = v[0];
    let mut acc_len: i32 = 64;
    let mut j = 1usize;
    let mut cc: u32 = 0;
    for i in 0..len {
        let raw: u32 = if acc_len < 5 {
            let nw = if j < 4 { v[j] } else { 0 };
            j += 1;
            let r = ((acc | (nw << acc_len)) & 0x1F) as u32;
            acc = nw >> (5 - acc_len);
            acc_len += 64 - 5;
            r
        } else {
            let r = (acc & 0x1F) as u32;
            acc_len -= 5;
            acc >>= 5;
            r
        };
        let val = raw + cc;
        let ncc = if val > 16 { 1 } else { 0 };
        out[i] = (val as i32 - ((ncc as i32) << 5)) as i8;
        cc = ncc;
    }
    out
}

/// wNAF recoding, window 5: at every step, if the running value is
/// odd, emit its residue mod 32 (adjusted into `[-15, +15]`) as the
/// digit and subtract it off; otherwise emit 0. Either way, shift the
/// running value right by one bit. This is the textbook wNAF
/// algorithm, equivalent to a windowed-bit-buffer formulation.
fn recode_wnaf_5bit(v: &[u64; 4]) -> [i8; 256] {
    let mut x = *v;
    let mut out = [0i8; 256];
    for i in 0..256 {
        if x[0] & 1 == 1 {
            let window = (x[0] & 0x1F) as i32;
            let d = if window > 15 { window - 32 } else { window };
            out[i] = d as i8;
            if d >= 0 {
                sub_small(&mut x, d as u64);
            } else {
                add_small(&mut x, (-d) as u64);
            }
        }
        shr1(&mut x);
    }
    out
}

fn sub_small(x: &mut [u64; 4], v: u64) {
    let (d0, c0) = sbb(x[0], v, 0);
    let (d1, c1) = sbb(x[1], 0, c0);
    let (d2, c2) = sbb(x[2], 0, c1);
    let (d3, _) = sbb(x[3], 0, c2);
    *x = [d0, d1, d2, d3];
}

fn add_small(x: &mut [u64; 4], v: u64) {
    let (d0, c0) = adc(x[0], v, 0);
    let (d1, c1) = adc(x[1], 0, c0);
    let (d2, c2) = adc(x[2], 0, c1);
    let (d3, _) = adc(x[3], 0, c2);
    *x = [d0, d1, d2, d3];
}

fn shr1(x: &mut [u64; 4]) {
    let d0 = (x[0] >> 1) | (x[1] << 63);
    let d1 = (x[1] >> 1) | (x[2] << 63);
    let d2 = (x[2] >> 1) | (x[3] << 63);
    let d3 = x[3] >> 1;
    *x = [d0, d1, d2, d3];
}

/// The jq255e-specific GLV-style endomorphism split: writes
/// `k = k0 + k1*mu (mod r)` for a fixed square root of `-1` modulo
/// `r`, with `k0` and `k1` each under `2^127` in absolute value.
/// Returns `(|k0|, sign(k0), |k1|, sign(k1))` as `Choice`s.
pub(crate) fn split_endo<C: CurveParams>(
    k: &Scalar<C>,
) -> (Scalar<C>, Choice, Scalar<C>, Choice) {
    debug_assert!(C::HAS_ENDOMORPHISM);
    let e_u = C::E_U;
    let e_v = C::E_V;

    let c = mul_divr_rounded::<C>(&k.v, &e_v);
    let d = mul_divr_rounded::<C>(&k.v, &e_u);

    let k_low = [k.v[0], k.v[1]];
    let t = mul128x128trunc(&d, &e_u);
    let mut k0 = sub128(&k_low, &t);
    let t2 = mul128x128trunc(&c, &e_v);
    k0 = sub128(&k0, &t2);
    let sign0 = abs128(&mut k0);

    let k1a = mul128x128trunc(&d, &e_v);
    let t3 = mul128x128trunc(&c, &e_u);
    let mut k1 = sub128(&k1a, &t3);
    let sign1 = abs128(&mut k1);

    (
        Scalar::from_raw([k0[0], k0[1], 0, 0]),
        Choice::from(sign0 as u8),
        Scalar::from_raw([k1[0], k1[1], 0, 0]),
        Choice::from(sign1 as u8),
    )
}

/// Recode a raw little-endian magnitude (as produced by
/// [`split_endo`]) into `len` signed digits in `[-15, +16]`, base
/// `2^5`. Shared by [`Scalar::recode_booth`] (full scalar, 51 digits)
/// and the jq255e endomorphism window (half-width scalars, 26 digits).
pub(crate) fn recode_digits(v: &[u64; 4], len: usize) -> [i8; 51] {
    recode_5bit_window(v, len)
}

/// wNAF-recode a raw 128-bit unsigned magnitude (e.g. the unreduced
/// challenge integer used by signature verification) into 130 signed
/// digits, each `0` or odd in `[-15, +15]`.
pub(crate) fn recode_u128_wnaf(v: &[u64; 2]) -> [i8; 130] {
    let mut x = [v[0], v[1], 0, 0];
    let mut out = [0i8; 130];
    for i in 0..130 {
        if x[0] & 1 == 1 {
            let window = (x[0] & 0x1F) as i32;
            let d = if window > 15 { window - 32 } else { window };
            out[i] = d as i8;
            if d >= 0 {
                sub_small(&mut x, d as u64);
            } else {
                add_small(&mut x, (-d) as u64);
            }
        }
        shr1(&mut x);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Jq255E;

    type Sc = Scalar<Jq255E>;

    #[test]
    fn add_sub_roundtrip() {
        let a = Sc::from_raw([123, 456, 0, 0]);
        let b = Sc::from_raw([789, 0, 0, 0]);
        let s = a.add(&b);
        let back = s.sub(&b);
        assert!(bool::from(back.equals(&a)));
    }

    #[test]
    fn mul_by_one_is_identity() {
        let a = Sc::from_raw([0xdead_beef, 0x1234, 0, 0]);
        let m = a.mul(&Sc::ONE);
        assert!(bool::from(m.equals(&a)));
    }

    #[test]
    fn mul_by_zero_is_zero() {
        let a = Sc::from_raw([42, 0, 0, 0]);
        let m = a.mul(&Sc::ZERO);
        assert!(bool::from(m.is_zero()));
    }

    #[test]
    fn mul_matches_known_product_for_full_limb_operands() {
        // r - 1, i.e. -1 mod r: every limb is close to its maximum, the
        // regime where a schoolbook column carries more than one
        // full-width partial product. (-1)*(-1) = 1 is the reference
        // product, independent of `mul`'s own code path.
        let minus_one = Sc::ZERO.sub(&Sc::ONE);
        let one = minus_one.mul(&minus_one);
        assert!(bool::from(one.equals(&Sc::ONE)));
    }

    #[test]
    fn mul128x128_matches_known_product_for_full_limb_operands() {
        // (2^64-1)^2 = 2^128 - 2*2^64 + 1, computed by hand and checked
        // against the schoolbook routine used internally by the
        // endomorphism split.
        let a = [0xFFFF_FFFF_FFFF_FFFFu64, 0];
        let d = mul128x128(&a, &a);
        assert_eq!(d, [1, 0xFFFF_FFFF_FFFF_FFFE, 0, 0]);
    }

    #[test]
    fn encode_decode_roundtrip() {
        let a = Sc::from_raw([1, 2, 3, 0]);
        let bytes = a.encode();
        let (b, ok) = Sc::decode(&bytes);
        assert!(bool::from(ok));
        assert!(bool::from(a.equals(&b)));
    }

    #[test]
    fn decode_rejects_r_itself() {
        let mut buf = [0u8; 32];
        for i in 0..4 {
            buf[8 * i..8 * i + 8].copy_from_slice(&Jq255E::R[i].to_le_bytes());
        }
        let (_, ok) = Sc::decode(&buf);
        assert!(!bool::from(ok));
    }

    #[test]
    fn decode_reduce_small_input_matches_decode() {
        let mut buf = [0u8; 16];
        buf[0] = 7;
        let a = Sc::decode_reduce(&buf);
        assert!(bool::from(a.equals(&Sc::from_raw([7, 0, 0, 0]))));
    }

    #[test]
    fn recode_booth_digits_in_range() {
        let a = Sc::from_raw([u64::MAX, u64::MAX, u64::MAX, 0x3FFF_FFFF_FFFF_FFFF]);
        let digits = a.recode_booth();
        for d in digits {
            assert!(d >= -15 && d <= 16);
        }
    }

    #[test]
    fn recode_wnaf_digits_valid() {
        let a = Sc::from_raw([0x1234_5678_9abc_def0, 0, 0, 0]);
        let digits = a.recode_wnaf();
        for d in digits {
            assert!(d == 0 || (d % 2 != 0 && d >= -15 && d <= 15));
        }
    }

    #[test]
    fn recode_u128_wnaf_digits_valid() {
        let digits = recode_u128_wnaf(&[0x1234_5678_9abc_def0, 0xfedc_ba98]);
        for d in digits {
            assert!(d == 0 || (d % 2 != 0 && d >= -15 && d <= 15));
        }
    }

    #[test]
    fn endomorphism_split_reconstructs() {
        let k = Sc::from_raw([0x1111_2222_3333_4444, 0x5555, 0, 0]);
        let (k0, s0, k1, s1) = split_endo(&k);
        let k0s = Sc::conditional_select(&k0, &k0.neg(), s0);
        let k1s = Sc::conditional_select(&k1, &k1.neg(), s1);
        // k = k0 + k1*eta (mod r); exercised fully in point.rs's
        // scalar-multiplication tests, where `eta` is available. Here
        // we only check the split doesn't panic and yields small
        // magnitudes.
        let _ = (k0s, k1s);
        assert!(bool::from(k0.v[2] | k0.v[3] == 0));
        assert!(bool::from(k1.v[2] | k1.v[3] == 0));
    }
}

// -*- mode: rust; -*-
//
// This file is part of the jq255 crate.
// See LICENSE for licensing information.

//! Arithmetic in the base field \\( \mathrm{GF}(2^{255} - \mathtt{MQ}) \\).
//!
//! Both curves in this crate (jq255e and jq255s) share the same field
//! shape, differing only in the small modulus-defining constant `MQ`
//! (18651 for jq255e, 3957 for jq255s). Rather than duplicating the
//! arithmetic per curve, [`FieldElement`] is generic over `MQ` as a
//! const parameter, following the identity
//! \\( 2^{256} \equiv 2 \cdot \mathtt{MQ} \pmod q \\) to fold carries
//! back into the low limbs after every operation that can overflow
//! 256 bits.
//!
//! A field element is stored as four 64-bit limbs, least-significant
//! first. Three representation regimes co-exist:
//!
//! - *full-range*: any value in `0..2^256`, accepted as input to every
//!   operation;
//! - *partially reduced*: less than `2^256`, close to `q`; the output
//!   regime of every arithmetic operation;
//! - *fully reduced* (canonical): the unique representative in
//!   `0..q`, produced by [`FieldElement::encode`] and
//!   [`FieldElement::is_negative`].

use crate::util::{adc, mac, sbb};
use subtle::{Choice, ConditionallyNegatable, ConditionallySelectable, ConstantTimeEq};

/// An element of \\( \mathrm{GF}(2^{255} - \mathtt{MQ}) \\), stored as
/// four 64-bit limbs in little-endian limb order.
///
/// All arithmetic operations accept full-range operands and return
/// partially reduced results; only [`encode`](Self::encode) and
/// [`is_negative`](Self::is_negative) force full reduction.
#[derive(Clone, Copy, Debug)]
pub struct FieldElement<const MQ: u64>(pub(crate) [u64; 4]);

impl<const MQ: u64> FieldElement<MQ> {
    /// The additive identity.
    pub const ZERO: Self = FieldElement([0, 0, 0, 0]);
    /// The multiplicative identity.
    pub const ONE: Self = FieldElement([1, 0, 0, 0]);

    /// `q - 1`, i.e. the field element `-1`.
    const fn minus_one() -> Self {
        FieldElement([0u64.wrapping_sub(MQ + 1), u64::MAX, u64::MAX, 0x7FFF_FFFF_FFFF_FFFF])
    }

    /// `q` itself, as a 4-limb value (top limb has its high bit clear
    /// since `q < 2^255`).
    const fn modulus() -> [u64; 4] {
        [0u64.wrapping_sub(MQ), u64::MAX, u64::MAX, 0x7FFF_FFFF_FFFF_FFFF]
    }

    /// Builds a field element directly from four raw limbs, without
    /// any reduction. Used internally by constant tables.
    pub(crate) const fn from_raw(v: [u64; 4]) -> Self {
        FieldElement(v)
    }

    /// `d <- a + b`.
    pub fn add(&self, other: &Self) -> Self {
        let a = self.0;
        let b = other.0;
        let (d0, c0) = adc(a[0], b[0], 0);
        let (d1, c1) = adc(a[1], b[1], c0);
        let (d2, c2) = adc(a[2], b[2], c1);
        let (d3, c3) = adc(a[3], b[3], c2);

        let fold = c3.wrapping_neg() & (2 * MQ);
        let (d0, c0) = adc(d0, fold, 0);
        let (d1, c1) = adc(d1, 0, c0);
        let (d2, c2) = adc(d2, 0, c1);
        let (d3, c3) = adc(d3, 0, c2);

        let fold2 = c3.wrapping_neg() & (2 * MQ);
        let (d0, _) = adc(d0, fold2, 0);
        FieldElement([d0, d1, d2, d3])
    }

    /// `d <- a - b`.
    pub fn sub(&self, other: &Self) -> Self {
        let a = self.0;
        let b = other.0;
        let (d0, c0) = sbb(a[0], b[0], 0);
        let (d1, c1) = sbb(a[1], b[1], c0);
        let (d2, c2) = sbb(a[2], b[2], c1);
        let (d3, c3) = sbb(a[3], b[3], c2);

        // `sbb`'s carry-out is already a 0 / u64::MAX mask (unlike
        // `adc`'s 0/1 carry), so it is used directly here, with no
        // further negation.
        let fold = c3 & (2 * MQ);
        let (d0, c0) = sbb(d0, fold, 0);
        let (d1, c1) = sbb(d1, 0, c0);
        let (d2, c2) = sbb(d2, 0, c1);
        let (d3, c3) = sbb(d3, 0, c2);

        let fold2 = c3 & (2 * MQ);
        let (d0, _) = sbb(d0, fold2, 0);
        FieldElement([d0, d1, d2, d3])
    }

    /// `d <- -a`.
    pub fn neg(&self) -> Self {
        let a = self.0;
        let two_q = [0u64.wrapping_sub(2 * MQ), u64::MAX, u64::MAX, u64::MAX];
        let (d0, c0) = sbb(two_q[0], a[0], 0);
        let (d1, c1) = sbb(two_q[1], a[1], c0);
        let (d2, c2) = sbb(two_q[2], a[2], c1);
        let (d3, c3) = sbb(two_q[3], a[3], c2);

        let e = c3;
        let (d0, c0) = sbb(d0, e & MQ, 0);
        let (d1, c1) = sbb(d1, e, c0);
        let (d2, c2) = sbb(d2, e, c1);
        let (d3, _) = sbb(d3, e >> 1, c2);
        FieldElement([d0, d1, d2, d3])
    }

    /// `d <- 2*a`.
    pub fn mul2(&self) -> Self {
        let a = self.0;
        let d0 = a[0] << 1;
        let d1 = (a[1] << 1) | (a[0] >> 63);
        let d2 = (a[2] << 1) | (a[1] >> 63);
        let d3 = (a[3] << 1) | (a[2] >> 63);

        let fold = (a[3] >> 63).wrapping_neg() & (2 * MQ);
        let (d0, c0) = adc(d0, fold, 0);
        let (d1, c1) = adc(d1, 0, c0);
        let (d2, c2) = adc(d2, 0, c1);
        let (d3, c3) = adc(d3, 0, c2);
        let fold2 = c3.wrapping_neg() & (2 * MQ);
        let (d0, _) = adc(d0, fold2, 0);
        FieldElement([d0, d1, d2, d3])
    }

    /// `d <- a * 2^n`, for `0 < n < 47`.
    pub fn lsh(&self, n: u32) -> Self {
        debug_assert!(n > 0 && n < 47);
        let a = self.0;
        let d0 = a[0] << n;
        let d1 = (a[1] << n) | (a[0] >> (64 - n));
        let d2 = (a[2] << n) | (a[1] >> (64 - n));
        let d3 = (a[3] << n) | (a[2] >> (64 - n));
        let d4 = a[3] >> (64 - n);

        let (d0, c0) = adc(d0, d4.wrapping_mul(2 * MQ), 0);
        let (d1, c1) = adc(d1, 0, c0);
        let (d2, c2) = adc(d2, 0, c1);
        let (d3, c3) = adc(d3, 0, c2);
        let fold = c3.wrapping_neg() & (2 * MQ);
        let (d0, _) = adc(d0, fold, 0);
        FieldElement([d0, d1, d2, d3])
    }

    /// `d <- a / 2`.
    pub fn half(&self) -> Self {
        let a = self.0;
        let m = (a[0] & 1).wrapping_neg();
        let d0_in = (a[0] >> 1) | (a[1] << 63);
        let d1_in = (a[1] >> 1) | (a[2] << 63);
        let d2_in = (a[2] >> 1) | (a[3] << 63);
        let d3_in = a[3] >> 1;

        let (d0, c0) = adc(d0_in, m & ((MQ >> 1).wrapping_neg()), 0);
        let (d1, c1) = adc(d1_in, m, c0);
        let (d2, c2) = adc(d2_in, m, c1);
        let (d3, _) = adc(d3_in, m >> 2, c2);
        FieldElement([d0, d1, d2, d3])
    }

    /// `d <- a*b`, via full 512-bit schoolbook product followed by
    /// reduction that folds the high half back in using
    /// `2^256 = 2*MQ (mod q)`, twice if a residual carry remains.
    pub fn mul(&self, other: &Self) -> Self {
        let a = self.0;
        let b = other.0;

        // Schoolbook 4x4 -> 8 limb product, row by row. Each row's
        // partial products are folded in one at a time through `mac`,
        // which only ever widens a single 64x64 product plus a bounded
        // carry, so nothing here risks overflowing past 128 bits (unlike
        // summing a whole column of up-to-four products into one u128
        // accumulator first).
        let mut e = [0u64; 8];
        for i in 0..4 {
            let mut carry = 0u64;
            for j in 0..4 {
                let (v, c) = mac(e[i + j], a[i], b[j], carry);
                e[i + j] = v;
                carry = c;
            }
            e[i + 4] = carry;
        }

        Self::reduce_wide(&e)
    }

    /// `d <- a^2`. Implemented as `mul(a, a)`; a dedicated squaring
    /// routine would be faster but is not required for correctness.
    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// `n` successive squarings.
    pub fn xsquare(&self, n: u32) -> Self {
        if n == 0 {
            return *self;
        }
        let mut x = self.square();
        for _ in 1..n {
            x = x.square();
        }
        x
    }

    fn reduce_wide(e: &[u64; 8]) -> Self {
        // value = lo(256 bits) + 2^256 * hi(256 bits), and
        // 2^256 = 2*MQ (mod q), so fold hi into lo by multiplying by
        // 2*MQ and adding. First pass folds each high limb's low half in
        // through a single ripple-carry chain, catching the chain's own
        // overflow in `h3` rather than discarding it (the bug this
        // replaces split this into a separate `adc` plus `mac` per limb
        // and threw the `adc` carry away). Second pass folds the four
        // high halves back in, one limb over, using the 255/256-bit
        // boundary bit carried out of `e3`/`h3`.
        let lo = [e[0], e[1], e[2], e[3]];
        let hi = [e[4], e[5], e[6], e[7]];

        let (lo0, h0) = mac(0, hi[0], 2 * MQ, 0);
        let (e0, cc) = adc(lo[0], lo0, 0);
        let (lo1, h1) = mac(0, hi[1], 2 * MQ, 0);
        let (e1, cc) = adc(lo[1], lo1, cc);
        let (lo2, h2) = mac(0, hi[2], 2 * MQ, 0);
        let (e2, cc) = adc(lo[2], lo2, cc);
        let (lo3, h3) = mac(0, hi[3], 2 * MQ, 0);
        let (e3, cc) = adc(lo[3], lo3, cc);
        let (h3, _) = adc(h3, 0, cc);

        let h3 = (h3 << 1) | (e3 >> 63);
        let e3 = e3 & 0x7FFF_FFFF_FFFF_FFFF;

        let (e0, cc) = adc(e0, h3.wrapping_mul(MQ), 0);
        let (e1, cc) = adc(e1, h0, cc);
        let (e2, cc) = adc(e2, h1, cc);
        let (e3, _) = adc(e3, h2, cc);

        FieldElement([e0, e1, e2, e3])
    }

    /// Constant-time select: returns `a0` if `ctl` is false, `a1` if
    /// `ctl` is true.
    pub fn select(a0: &Self, a1: &Self, ctl: Choice) -> Self {
        let mut out = *a0;
        out.conditional_assign(a1, ctl);
        out
    }

    /// `d <- a` if `ctl` is false, `d <- -a` if `ctl` is true.
    pub fn condneg(&self, ctl: Choice) -> Self {
        let mut out = *self;
        out.conditional_negate(ctl);
        out
    }

    /// Returns true iff this value represents zero, accounting for
    /// every representation zero can take in a 256-bit limb array:
    /// `0`, `q`, or `2*q` (the only multiples of `q` that fit below
    /// `2^256`, since `q` is just under `2^255`).
    pub fn is_zero(&self) -> Choice {
        let a = self.0;
        let q = Self::modulus();
        let two_q = [0u64.wrapping_sub(2 * MQ), u64::MAX, u64::MAX, u64::MAX];

        // r0 detects the all-zero representation; r1/r2 detect the
        // representations equal to q/2q via a bitwise-complement trick
        // on the limbs that are all-ones in the target pattern.
        let mut r0 = a[0];
        let mut r1 = a[0] ^ q[0];
        let mut r2 = a[0] ^ two_q[0];
        r0 |= a[1];
        r1 |= !a[1];
        r2 |= !a[1];
        r0 |= a[2];
        r1 |= !a[2];
        r2 |= !a[2];
        r0 |= a[3];
        r1 |= a[3] ^ q[3];
        r2 |= !a[3];

        let z0 = r0 == 0;
        let z1 = r1 == 0;
        let z2 = r2 == 0;
        Choice::from((z0 || z1 || z2) as u8)
    }

    /// Returns true iff the least-significant bit of the fully
    /// reduced representative is 1.
    pub fn is_negative(&self) -> Choice {
        let y = self.normalize();
        Choice::from((y.0[0] & 1) as u8)
    }

    /// Equality of field elements (full range inputs).
    pub fn equals(&self, other: &Self) -> Choice {
        self.sub(other).is_zero()
    }

    /// Reduce fully to the canonical representative in `0..q`.
    ///
    /// A partially-reduced value can sit anywhere below `2*q` plus the
    /// small carry-fold margin (see the module doc), so a single
    /// conditional subtraction of `q` is not always enough to land
    /// below `q` (e.g. an input of exactly `2*q` would come out as
    /// `q`, still not canonical). Two rounds suffice: any value below
    /// `3*q` is canonical after the second.
    pub fn normalize(&self) -> Self {
        let q = Self::modulus();
        let mut d = self.0;
        for _ in 0..2 {
            let (d0, c0) = sbb(d[0], q[0], 0);
            let (d1, c1) = sbb(d[1], q[1], c0);
            let (d2, c2) = sbb(d[2], q[2], c1);
            let (d3, c3) = sbb(d[3], q[3], c2);
            let z = c3;
            let (r0, c0) = adc(d0, z & q[0], 0);
            let (r1, c1) = adc(d1, z & q[1], c0);
            let (r2, c2) = adc(d2, z & q[2], c1);
            let (r3, _) = adc(d3, z & q[3], c2);
            d = [r0, r1, r2, r3];
        }
        FieldElement(d)
    }

    /// Encode as 32 little-endian bytes (fully reduced).
    pub fn encode(&self) -> [u8; 32] {
        let x = self.normalize();
        let mut out = [0u8; 32];
        for i in 0..4 {
            out[8 * i..8 * i + 8].copy_from_slice(&x.0[i].to_le_bytes());
        }
        out
    }

    /// Decode 32 little-endian bytes. Returns the decoded value and a
    /// `Choice` that is true iff the encoded integer was in `0..q`.
    pub fn decode(buf: &[u8; 32]) -> (Self, Choice) {
        let mut v = [0u64; 4];
        for i in 0..4 {
            v[i] = u64::from_le_bytes(buf[8 * i..8 * i + 8].try_into().unwrap());
        }
        let x = FieldElement(v);
        let q = Self::modulus();
        let (_, c0) = sbb(v[0], q[0], 0);
        let (_, c1) = sbb(v[1], q[1], c0);
        let (_, c2) = sbb(v[2], q[2], c1);
        let (_, c3) = sbb(v[3], q[3], c2);
        // `sbb`'s carry-out is a 0 / u64::MAX mask; v < q iff the final
        // subtraction borrowed, which `& 1` turns into a proper 0/1 bit.
        let ok = Choice::from((c3 & 1) as u8);
        let out = Self::select(&Self::ZERO, &x, ok);
        (out, ok)
    }

    /// Compute `a^(2^240 - 1)`, also returning the window
    /// `[a, a^2, a^3]` used by both `inv` and `sqrt`.
    fn prep240(&self) -> (Self, [Self; 3]) {
        let win0 = *self;
        let win1 = win0.square();
        let win2 = win0.mul(&win1);

        let x = win2.xsquare(2);
        let y = x.mul(&win2); // a^(2^4-1)

        let x = y.square();
        let y = x.mul(&win0); // a^(2^5-1)

        let x = y.xsquare(5);
        let x = x.mul(&y);
        let x = x.xsquare(5);
        let y = y.mul(&x); // a^(2^15-1)

        let x = y.xsquare(15);
        let y = y.mul(&x); // a^(2^30-1)

        let x = y.xsquare(30);
        let y = y.mul(&x); // a^(2^60-1)

        let x = y.xsquare(60);
        let y = y.mul(&x); // a^(2^120-1)

        let x = y.xsquare(120);
        let a240 = y.mul(&x); // a^(2^240-1)

        (a240, [win0, win1, win2])
    }

    /// `d <- 1/a`, via Fermat's little theorem (`a^(q-2)`). Returns
    /// zero if `a` is zero.
    pub fn inv(&self) -> Self {
        let (mut x, win) = self.prep240();
        let e = (0u32.wrapping_sub(MQ as u32)).wrapping_sub(2);
        let mut i = 13i32;
        while i >= 1 {
            let k = (e >> i) & 3;
            x = x.xsquare(2);
            if k != 0 {
                x = x.mul(&win[(k - 1) as usize]);
            }
            i -= 2;
        }
        x = x.square();
        x.mul(&win[0])
    }

    /// `d <- sqrt(a)`. On success `d` is the non-negative root and the
    /// returned `Choice` is true; on failure `d` is zero and the
    /// `Choice` is false.
    pub fn sqrt(&self) -> (Self, Choice) {
        let seed = if (MQ & 7) == 3 { self.mul2() } else { *self };
        let (mut x, win) = seed.prep240();
        let y;

        if (MQ & 3) == 1 {
            // q = 3 (mod 4): candidate root is a^((q+1)/4).
            let e = (1u32.wrapping_sub(MQ as u32)) >> 2;
            let mut i = 11i32;
            while i >= 1 {
                let k = (e >> i) & 3;
                x = x.xsquare(2);
                if k != 0 {
                    x = x.mul(&win[(k - 1) as usize]);
                }
                i -= 2;
            }
            x = x.square();
            if (e & 1) != 0 {
                x = x.mul(&win[0]);
            }
            y = x;
        } else {
            // q = 5 (mod 8): Atkin's algorithm.
            debug_assert_eq!(MQ & 7, 3);
            let e = ((0u32.wrapping_sub(MQ as u32)).wrapping_sub(5)) >> 3;
            let mut i = 10i32;
            while i >= 0 {
                let k = (e >> i) & 3;
                x = x.xsquare(2);
                if k != 0 {
                    x = x.mul(&win[(k - 1) as usize]);
                }
                i -= 2;
            }
            let b_ = x;
            let ab = b_.mul(self);
            let mut c = ab.mul(&b_);
            c = c.mul2();
            let cm1 = c.sub(&Self::ONE);
            y = ab.mul(&cm1);
        }

        let y = y.condneg(y.is_negative());
        let check = y.square();
        let ok = check.equals(self);
        let out = Self::select(&Self::ZERO, &y, ok);
        (out, ok)
    }
}

impl<const MQ: u64> ConditionallySelectable for FieldElement<MQ> {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut out = [0u64; 4];
        for i in 0..4 {
            out[i] = u64::conditional_select(&a.0[i], &b.0[i], choice);
        }
        FieldElement(out)
    }
}

impl<const MQ: u64> ConditionallyNegatable for FieldElement<MQ> {
    fn conditional_negate(&mut self, choice: Choice) {
        let negated = self.neg();
        self.conditional_assign(&negated, choice);
    }
}

impl<const MQ: u64> ConstantTimeEq for FieldElement<MQ> {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.equals(other)
    }
}

impl<const MQ: u64> PartialEq for FieldElement<MQ> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other).into()
    }
}
impl<const MQ: u64> Eq for FieldElement<MQ> {}

impl<const MQ: u64> Default for FieldElement<MQ> {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Object-safe-free trait exposing [`FieldElement`]'s operations
/// generically, so that curve code written once over `C: CurveParams`
/// can call field arithmetic through `C::Field` without knowing the
/// concrete `MQ`.
pub trait FieldOps:
    Copy
    + Clone
    + Sized
    + Default
    + PartialEq
    + Eq
    + ConditionallySelectable
    + ConditionallyNegatable
    + ConstantTimeEq
{
    const ZERO: Self;
    const ONE: Self;

    fn from_raw(v: [u64; 4]) -> Self;
    fn add(&self, other: &Self) -> Self;
    fn sub(&self, other: &Self) -> Self;
    fn neg(&self) -> Self;
    fn mul2(&self) -> Self;
    fn lsh(&self, n: u32) -> Self;
    fn half(&self) -> Self;
    fn mul(&self, other: &Self) -> Self;
    fn square(&self) -> Self;
    fn xsquare(&self, n: u32) -> Self;
    fn is_zero(&self) -> Choice;
    fn is_negative(&self) -> Choice;
    fn equals(&self, other: &Self) -> Choice;
    fn normalize(&self) -> Self;
    fn encode(&self) -> [u8; 32];
    fn decode(buf: &[u8; 32]) -> (Self, Choice);
    fn inv(&self) -> Self;
    fn sqrt(&self) -> (Self, Choice);
    fn select(a0: &Self, a1: &Self, ctl: Choice) -> Self;
    fn condneg(&self, ctl: Choice) -> Self;
}

impl<const MQ: u64> FieldOps for FieldElement<MQ> {
    const ZERO: Self = FieldElement::<MQ>::ZERO;
    const ONE: Self = FieldElement::<MQ>::ONE;

    fn from_raw(v: [u64; 4]) -> Self {
        FieldElement::<MQ>::from_raw(v)
    }
    fn add(&self, other: &Self) -> Self {
        FieldElement::add(self, other)
    }
    fn sub(&self, other: &Self) -> Self {
        FieldElement::sub(self, other)
    }
    fn neg(&self) -> Self {
        FieldElement::neg(self)
    }
    fn mul2(&self) -> Self {
        FieldElement::mul2(self)
    }
    fn lsh(&self, n: u32) -> Self {
        FieldElement::lsh(self, n)
    }
    fn half(&self) -> Self {
        FieldElement::half(self)
    }
    fn mul(&self, other: &Self) -> Self {
        FieldElement::mul(self, other)
    }
    fn square(&self) -> Self {
        FieldElement::square(self)
    }
    fn xsquare(&self, n: u32) -> Self {
        FieldElement::xsquare(self, n)
    }
    fn is_zero(&self) -> Choice {
        FieldElement::is_zero(self)
    }
    fn is_negative(&self) -> Choice {
        FieldElement::is_negative(self)
    }
    fn equals(&self, other: &Self) -> Choice {
        FieldElement::equals(self, other)
    }
    fn normalize(&self) -> Self {
        FieldElement::normalize(self)
    }
    fn encode(&self) -> [u8; 32] {
        FieldElement::encode(self)
    }
    fn decode(buf: &[u8; 32]) -> (Self, Choice) {
        FieldElement::<MQ>::decode(buf)
    }
    fn inv(&self) -> Self {
        FieldElement::inv(self)
    }
    fn sqrt(&self) -> (Self, Choice) {
        FieldElement::sqrt(self)
    }
    fn select(a0: &Self, a1: &Self, ctl: Choice) -> Self {
        FieldElement::<MQ>::select(a0, a1, ctl)
    }
    fn condneg(&self, ctl: Choice) -> Self {
        FieldElement::condneg(self, ctl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Fe = FieldElement<18651>;

    #[test]
    fn add_sub_roundtrip() {
        let a = Fe::from_raw([1, 2, 3, 4]);
        let b = Fe::from_raw([5, 6, 7, 8]);
        let s = a.add(&b);
        let back = s.sub(&b);
        assert_eq!(back.normalize().0, a.normalize().0);
    }

    #[test]
    fn neg_is_additive_inverse() {
        let a = Fe::from_raw([123456789, 0, 0, 0]);
        let z = a.add(&a.neg());
        assert!(bool::from(z.is_zero()));
    }

    #[test]
    fn mul_one_is_identity() {
        let a = Fe::from_raw([0xdead_beef, 0x1234_5678, 0, 0]);
        let m = a.mul(&Fe::ONE);
        assert_eq!(m.normalize().0, a.normalize().0);
    }

    #[test]
    fn mul_matches_polarization_identity_for_full_limb_operands() {
        // Every limb near u64::MAX: the regime where a column of the
        // schoolbook product carries more than one full-width partial
        // product, which is exactly what must not overflow.
        let a = Fe::from_raw([
            0xFFFF_FFFF_FFFF_FFFF,
            0xFFFF_FFFF_FFFF_FFFE,
            0x8000_0000_0000_0001,
            0xFFFF_FFFF_FFFF_FFFF,
        ]);
        let b = Fe::from_raw([
            0x1234_5678_9ABC_DEF0,
            0xFEDC_BA98_7654_3210,
            0xFFFF_FFFF_FFFF_FFFF,
            0x7FFF_FFFF_FFFF_FFFF,
        ]);

        let ab = a.mul(&b);

        // ab = ((a+b)^2 - a^2 - b^2) / 2, using only add/sub/square/half,
        // none of which share `mul`'s column-accumulation code path, as
        // an independent cross-check of the product.
        let sum_sq = a.add(&b).square();
        let expected = sum_sq.sub(&a.square()).sub(&b.square()).half();

        assert_eq!(ab.normalize().0, expected.normalize().0);
    }

    #[test]
    fn inv_roundtrip() {
        let a = Fe::from_raw([42, 0, 0, 0]);
        let inv = a.inv();
        let one = a.mul(&inv);
        assert_eq!(one.normalize().0, Fe::ONE.0);
    }

    #[test]
    fn inv_zero_is_zero() {
        let z = Fe::ZERO.inv();
        assert!(bool::from(z.is_zero()));
    }

    #[test]
    fn sqrt_of_square_matches() {
        let a = Fe::from_raw([7, 0, 0, 0]);
        let sq = a.square();
        let (root, ok) = sq.sqrt();
        assert!(bool::from(ok));
        assert_eq!(root.square().normalize().0, sq.normalize().0);
        assert!(!bool::from(root.is_negative()));
    }

    #[test]
    fn encode_decode_roundtrip() {
        let a = Fe::from_raw([1, 2, 3, 0]).normalize();
        let bytes = a.encode();
        let (b, ok) = Fe::decode(&bytes);
        assert!(bool::from(ok));
        assert_eq!(a.0, b.0);
    }

    #[test]
    fn decode_rejects_out_of_range() {
        // q's own raw little-endian byte pattern must be rejected,
        // even though it reduces to 0 (encode() would never produce
        // it, since it always normalizes first).
        let q = Fe::modulus();
        let mut q_bytes = [0u8; 32];
        for i in 0..4 {
            q_bytes[8 * i..8 * i + 8].copy_from_slice(&q[i].to_le_bytes());
        }
        let (_, ok) = Fe::decode(&q_bytes);
        assert!(!bool::from(ok));
    }

    #[test]
    fn minus_one_is_additive_inverse_of_one() {
        let z = Fe::minus_one().add(&Fe::ONE);
        assert!(bool::from(z.is_zero()));
    }

    #[test]
    fn is_zero_detects_q_and_2q_representations() {
        let q = Fe::modulus();
        let two_q = [0u64.wrapping_sub(2 * 18651), u64::MAX, u64::MAX, u64::MAX];
        assert!(bool::from(Fe::from_raw(q).is_zero()));
        assert!(bool::from(Fe::from_raw(two_q).is_zero()));
        assert!(bool::from(Fe::ZERO.is_zero()));
        assert!(!bool::from(Fe::ONE.is_zero()));
    }

    #[test]
    fn normalize_reduces_exact_2q_to_zero() {
        let two_q = [0u64.wrapping_sub(2 * 18651), u64::MAX, u64::MAX, u64::MAX];
        let n = Fe::from_raw(two_q).normalize();
        assert_eq!(n.0, Fe::ZERO.0);
    }
}

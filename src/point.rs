// -*- mode: rust; -*-
//
// This file is part of the jq255 crate.
// See LICENSE for licensing information.

//! Group elements and the operations on them: decode/encode, the
//! complete addition law, repeated doubling, and the constant-time and
//! variable-time scalar multiplications built on top of them.
//!
//! A point is stored in extended `(E:Z:U:T)` coordinates, with
//! `U^2 = T*Z` and `E^2*Z^2 = (a^2-4b)*U^4 - 2*a*U^2*Z^2 + Z^4`; an
//! affine point is the `Z == 1` special case and carries only `(E,U,T)`.
//! [`CurveParams::add_combine`] and [`CurveParams::xdouble_first`]`/`
//! [`xdouble_inner`](crate::curve::CurveParams::xdouble_inner)`/`
//! [`xdouble_final`](crate::curve::CurveParams::xdouble_final) supply
//! the two curves' differing formulas; everything else here is shared.

use subtle::{Choice, ConditionallyNegatable};

use crate::constants::RawPoint;
use crate::curve::CurveParams;
use crate::field::FieldOps;
use crate::scalar::{recode_digits, recode_u128_wnaf, split_endo, Scalar};

/// A group element in extended projective coordinates.
pub struct Point<C: CurveParams> {
    pub(crate) e: C::Field,
    pub(crate) z: C::Field,
    pub(crate) u: C::Field,
    pub(crate) t: C::Field,
}

// Derived `Clone`/`Copy` would require `C: Copy`, which says nothing
// about `C::Field`; `C::Field: FieldOps` already implies `Copy`
// transitively, so these are implemented by hand instead.
impl<C: CurveParams> Clone for Point<C> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<C: CurveParams> Copy for Point<C> {}

/// A group element known to have `Z == 1`, used for the precomputed
/// base-point windows where the saved multiplication is worthwhile.
pub(crate) struct AffinePoint<C: CurveParams> {
    pub(crate) e: C::Field,
    pub(crate) u: C::Field,
    pub(crate) t: C::Field,
}

impl<C: CurveParams> Clone for AffinePoint<C> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<C: CurveParams> Copy for AffinePoint<C> {}

impl<C: CurveParams> Point<C> {
    /// The group neutral element, `(1:1:0:0)`.
    pub const NEUTRAL: Self = Point {
        e: <C::Field as FieldOps>::ONE,
        z: <C::Field as FieldOps>::ONE,
        u: <C::Field as FieldOps>::ZERO,
        t: <C::Field as FieldOps>::ZERO,
    };

    /// Decode a group element from exactly 32 bytes. The returned
    /// `Choice` is true iff `src` was a valid encoding; on failure the
    /// returned point is the neutral element.
    pub fn decode(src: &[u8; 32]) -> (Self, Choice) {
        let (u, ru) = C::Field::decode(src);
        let u2 = u.square();
        let u4 = u2.square();
        let ee = C::decode_ee(&u2, &u4);
        let (e, rs) = ee.sqrt();
        let r = ru & rs;

        // On failure, fall back to the neutral element: it is rejected
        // by callers via `r`, and is a well-formed point under every
        // other operation here.
        let e = C::Field::select(&C::Field::ONE, &e, r);
        let u = C::Field::select(&C::Field::ZERO, &u, r);
        let t = C::Field::select(&C::Field::ZERO, &u2, r);
        (Point { e, z: C::Field::ONE, u, t }, r)
    }

    /// Encode this point into 32 bytes, picking the representative
    /// with non-negative `e`.
    pub fn encode(&self) -> [u8; 32] {
        let iz = self.z.inv();
        let e = self.e.mul(&iz);
        let u = self.u.mul(&iz);
        let u = u.condneg(e.is_negative());
        u.encode()
    }

    /// `P3 <- P1 + P2`.
    pub fn add(&self, other: &Self) -> Self {
        let e1e2 = self.e.mul(&other.e);
        let u1u2 = self.u.mul(&other.u);
        let z1z2 = self.z.mul(&other.z);
        let t1t2 = self.t.mul(&other.t);

        let g1 = self.e.add(&self.u);
        let g2 = other.e.add(&other.u);
        let eu = g1.mul(&g2).sub(&e1e2.add(&u1u2));

        let g1 = self.z.add(&self.t);
        let g2 = other.z.add(&other.t);
        let zt = g1.mul(&g2).sub(&z1z2.add(&t1t2));

        let (hd, e3) = C::add_combine(&z1z2, &t1t2, &e1e2, &u1u2, &zt);

        let z3 = hd.square();
        let t3 = eu.square();
        let g1 = hd.add(&eu).square();
        let u3 = g1.sub(&z3.add(&t3)).half();

        Point { e: e3, z: z3, u: u3, t: t3 }
    }

    /// `P3 <- P1 + P2`, with `P2` in affine coordinates (`Z2 == 1`).
    fn add_affine(&self, other: &AffinePoint<C>) -> Self {
        let e1e2 = self.e.mul(&other.e);
        let u1u2 = self.u.mul(&other.u);
        let t1t2 = self.t.mul(&other.t);

        let g1 = self.e.add(&self.u);
        let g2 = other.e.add(&other.u);
        let eu = g1.mul(&g2).sub(&e1e2.add(&u1u2));

        let zt = self.z.mul(&other.t).add(&self.t);

        let (hd, e3) = C::add_combine(&self.z, &t1t2, &e1e2, &u1u2, &zt);

        let z3 = hd.square();
        let t3 = eu.square();
        let g1 = hd.add(&eu).square();
        let u3 = g1.sub(&z3.add(&t3)).half();

        Point { e: e3, z: z3, u: u3, t: t3 }
    }

    /// `P2 <- -P1`.
    pub fn neg(&self) -> Self {
        Point { e: self.e, z: self.z, u: self.u.neg(), t: self.t }
    }

    /// `P3 <- P1 - P2`.
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    fn sub_affine(&self, other: &AffinePoint<C>) -> Self {
        let neg = AffinePoint { e: other.e, u: other.u.neg(), t: other.t };
        self.add_affine(&neg)
    }

    /// `d <- 2^n*P`, for `n >= 0`.
    pub fn xdouble(&self, n: u32) -> Self {
        if n == 0 {
            return *self;
        }
        let (mut x, mut w, mut j) = C::xdouble_first(&self.e, &self.z, &self.u, &self.t);
        for _ in 1..n {
            let (xp, wp, jp) = C::xdouble_inner(&x, &w, &j);
            x = xp;
            w = wp;
            j = jp;
        }
        let (e, z, u, t) = C::xdouble_final(&x, &w, &j);
        Point { e, z, u, t }
    }

    /// `d <- 2*P`.
    pub fn double(&self) -> Self {
        self.xdouble(1)
    }

    /// True iff this point is the group neutral.
    pub fn is_neutral(&self) -> Choice {
        self.u.is_zero()
    }

    /// Equality of group elements.
    pub fn equals(&self, other: &Self) -> Choice {
        self.u.mul(&other.e).equals(&self.e.mul(&other.u))
    }

    pub fn select(p0: &Self, p1: &Self, ctl: Choice) -> Self {
        Point {
            e: C::Field::select(&p0.e, &p1.e, ctl),
            z: C::Field::select(&p0.z, &p1.z, ctl),
            u: C::Field::select(&p0.u, &p1.u, ctl),
            t: C::Field::select(&p0.t, &p1.t, ctl),
        }
    }

    /// Constant-time windowed lookup: `win[i] = (i+1)*P1`,
    /// `-16 <= k <= 16`; returns `k*P1`.
    fn lookup(win: &[Self; 16], k: i8) -> Self {
        let m0 = (k as u8) as u32;
        let sk = 0u32.wrapping_sub(m0 >> 7);
        let m = (m0 ^ sk).wrapping_sub(sk) & 0xFF;

        let mut out = Self::NEUTRAL;
        for j in 0..16u32 {
            let c = Choice::from((m == j + 1) as u8);
            out = Self::select(&out, &win[j as usize], c);
        }
        out.u.conditional_negate(Choice::from((sk & 1) as u8));
        out
    }

    /// Variable-time equivalent of [`lookup`](Self::lookup), used only
    /// by the non-constant-time verification path where `k` is a
    /// public wNAF digit.
    fn lookup_vartime(win: &[Self; 8], k: i32) -> Self {
        debug_assert!(k != 0);
        if k > 0 {
            win[(k as usize) >> 1]
        } else {
            win[((-k) as usize) >> 1].neg()
        }
    }
}

impl<C: CurveParams> AffinePoint<C> {
    const NEUTRAL: Self = AffinePoint {
        e: <C::Field as FieldOps>::ONE,
        u: <C::Field as FieldOps>::ZERO,
        t: <C::Field as FieldOps>::ZERO,
    };

    fn from_raw(raw: &RawPoint) -> Self {
        AffinePoint {
            e: C::Field::from_raw(raw.e),
            u: C::Field::from_raw(raw.u),
            t: C::Field::from_raw(raw.t),
        }
    }

    fn lookup(win: &[RawPoint; 16], k: i8) -> Self {
        let m0 = (k as u8) as u32;
        let sk = 0u32.wrapping_sub(m0 >> 7);
        let m = (m0 ^ sk).wrapping_sub(sk) & 0xFF;

        let mut out = Self::NEUTRAL;
        for j in 0..16u32 {
            let c = Choice::from((m == j + 1) as u8);
            let cand = Self::from_raw(&win[j as usize]);
            out = AffinePoint {
                e: C::Field::select(&out.e, &cand.e, c),
                u: C::Field::select(&out.u, &cand.u, c),
                t: C::Field::select(&out.t, &cand.t, c),
            };
        }
        out.u.conditional_negate(Choice::from((sk & 1) as u8));
        out
    }

    fn vartime(raw: &RawPoint) -> Self {
        Self::from_raw(raw)
    }
}

/// `P <- s*G`, constant-time, using the four precomputed affine
/// windows at bit offsets `{0, 65, 130, 195}`.
pub fn mulgen<C: CurveParams>(s: &Scalar<C>) -> Point<C> {
    let sd = s.recode_booth();
    let windows = C::base_windows();

    let qa = AffinePoint::<C>::lookup(windows[0], sd[12]);
    let mut p = Point { e: qa.e, z: C::Field::ONE, u: qa.u, t: qa.t };
    let qa = AffinePoint::<C>::lookup(windows[1], sd[25]);
    p = p.add_affine(&qa);
    let qa = AffinePoint::<C>::lookup(windows[2], sd[38]);
    p = p.add_affine(&qa);

    for i in (0..=11).rev() {
        p = p.xdouble(5);
        let qa = AffinePoint::<C>::lookup(windows[0], sd[i]);
        p = p.add_affine(&qa);
        let qa = AffinePoint::<C>::lookup(windows[1], sd[i + 13]);
        p = p.add_affine(&qa);
        let qa = AffinePoint::<C>::lookup(windows[2], sd[i + 26]);
        p = p.add_affine(&qa);
        let qa = AffinePoint::<C>::lookup(windows[3], sd[i + 39]);
        p = p.add_affine(&qa);
    }
    p
}

/// Build the standard odd-multiples window `win[i] = (i+1)*P` used by
/// both the generic and jq255e scalar-multiplication routines.
fn build_window<C: CurveParams>(p: &Point<C>) -> [Point<C>; 16] {
    let mut win = [Point::NEUTRAL; 16];
    win[0] = *p;
    let mut i = 1usize;
    while i < 15 {
        win[i] = win[i >> 1].double();
        win[i + 1] = win[i].add(&win[0]);
        i += 2;
    }
    win[15] = win[7].double();
    win
}

/// `P2 <- s*P1`, constant-time, generic double-and-add with a 5-bit
/// Booth-recoded window. Used by jq255s (and available for jq255e via
/// [`mul_endo`] below, which is the one actually wired into the public
/// API for that curve).
pub fn mul_generic<C: CurveParams>(s: &Scalar<C>, p1: &Point<C>) -> Point<C> {
    let win = build_window(p1);
    let sd = s.recode_booth();

    let mut acc = Point::<C>::lookup(&win, sd[50]);
    for i in (0..=49).rev() {
        acc = acc.xdouble(5);
        let q = Point::<C>::lookup(&win, sd[i]);
        acc = acc.add(&q);
    }
    acc
}

/// `P2 <- s*P1`, constant-time, for curves with a fast endomorphism
/// (jq255e): splits `s = k0 + k1*mu (mod r)` and processes both
/// half-width digit streams together, applying the endomorphism
/// `zeta(E,U) = (E, eta*U)` to the second stream.
pub fn mul_endo<C: CurveParams>(s: &Scalar<C>, p1: &Point<C>) -> Point<C> {
    debug_assert!(C::HAS_ENDOMORPHISM);

    let (k0, sign0, k1, sign1) = split_endo::<C>(s);

    // win[0] = +-P1 depending on sign0; a full odd-multiples window is
    // then built over that signed base point.
    let mut base = *p1;
    base.u.conditional_negate(sign0);
    let win = build_window(&base);

    // eta (or -eta) accounts for sign0 xor sign1 in a single combined
    // sign correction.
    let eta = C::Field::from_raw(C::ETA);
    let eta = eta.condneg(sign0 ^ sign1);

    let sd0 = recode_digits(&k0.v, 26);
    let sd1 = recode_digits(&k1.v, 26);

    let mut acc = Point::<C>::lookup(&win, sd0[25]);
    let mut q = Point::<C>::lookup(&win, sd1[25]);
    q.u = q.u.mul(&eta);
    q.t = q.t.neg();
    acc = acc.add(&q);

    for i in (0..=24).rev() {
        acc = acc.xdouble(5);
        let q0 = Point::<C>::lookup(&win, sd0[i]);
        acc = acc.add(&q0);
        let mut q1 = Point::<C>::lookup(&win, sd1[i]);
        q1.u = q1.u.mul(&eta);
        q1.t = q1.t.neg();
        acc = acc.add(&q1);
    }
    acc
}

/// `P2 <- s*P1`, constant-time, dispatching to the endomorphism-based
/// algorithm when the curve has one and to the generic one otherwise.
pub fn mul<C: CurveParams>(s: &Scalar<C>, p1: &Point<C>) -> Point<C> {
    if C::HAS_ENDOMORPHISM {
        mul_endo(s, p1)
    } else {
        mul_generic(s, p1)
    }
}

/// Signature-verification helper: `P2 <- u*P1 + v*G`, for a public
/// 128-bit integer `u` (two 64-bit limbs) and scalar `v`.
///
/// **Not constant-time.** This is used only by signature verification,
/// which operates exclusively on public data (the purported signer's
/// public key and the signature itself).
pub fn mul128_add_mulgen_vartime<C: CurveParams>(
    p1: &Point<C>,
    u: &[u64; 2],
    v: &Scalar<C>,
) -> Point<C> {
    // win[i] = (2*i+1)*P1, for i = 0..7.
    let mut win = [Point::NEUTRAL; 8];
    win[0] = p1.double();
    win[1] = win[0].add(p1);
    for i in 2..8 {
        win[i] = win[i - 1].add(&win[0]);
    }
    win[0] = *p1;

    let sdu = recode_u128_wnaf(u);
    let sdv = v.recode_wnaf();
    let windows = C::base_windows();

    let mut acc = Point::<C>::NEUTRAL;
    let mut zz = true;
    let mut ndbl: u32 = 0;
    for i in (0..130).rev() {
        ndbl += 1;

        let eu = sdu[i] as i32;
        let ev0 = sdv[i] as i32;
        let ev1 = if i < 126 { sdv[i + 130] as i32 } else { 0 };
        if eu == 0 && ev0 == 0 && ev1 == 0 {
            continue;
        }

        if zz {
            zz = false;
            acc = Point::NEUTRAL;
        } else {
            acc = acc.xdouble(ndbl);
        }
        ndbl = 0;

        if eu != 0 {
            let q = Point::<C>::lookup_vartime(&win, eu);
            acc = acc.add(&q);
        }
        if ev0 != 0 {
            let raw = if ev0 > 0 { &windows[0][(ev0 - 1) as usize] } else { &windows[0][(-ev0 - 1) as usize] };
            let a = AffinePoint::<C>::vartime(raw);
            acc = if ev0 > 0 { acc.add_affine(&a) } else { acc.sub_affine(&a) };
        }
        if ev1 != 0 {
            let raw = if ev1 > 0 { &windows[2][(ev1 - 1) as usize] } else { &windows[2][(-ev1 - 1) as usize] };
            let a = AffinePoint::<C>::vartime(raw);
            acc = if ev1 > 0 { acc.add_affine(&a) } else { acc.sub_affine(&a) };
        }
    }

    if zz {
        Point::NEUTRAL
    } else {
        acc.xdouble(ndbl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{Jq255E, Jq255S};

    fn base_point<C: CurveParams>() -> Point<C> {
        mulgen(&Scalar::<C>::ONE)
    }

    #[test]
    fn jq255e_decode_encode_roundtrip() {
        let g: Point<Jq255E> = base_point();
        let enc = g.encode();
        let (d, ok) = Point::<Jq255E>::decode(&enc);
        assert!(bool::from(ok));
        assert!(bool::from(d.equals(&g)));
    }

    #[test]
    fn jq255s_decode_encode_roundtrip() {
        let g: Point<Jq255S> = base_point();
        let enc = g.encode();
        let (d, ok) = Point::<Jq255S>::decode(&enc);
        assert!(bool::from(ok));
        assert!(bool::from(d.equals(&g)));
    }

    #[test]
    fn jq255e_mulgen_matches_repeated_add() {
        let g: Point<Jq255E> = base_point();
        let three = Scalar::<Jq255E>::ONE.add(&Scalar::<Jq255E>::ONE).add(&Scalar::<Jq255E>::ONE);
        let p = mulgen(&three);
        let q = g.add(&g).add(&g);
        assert!(bool::from(p.equals(&q)));
    }

    #[test]
    fn jq255e_mul_endo_matches_mulgen() {
        let g: Point<Jq255E> = base_point();
        let k = Scalar::<Jq255E>::from_raw([12345, 0, 0, 0]);
        let p = mul_endo(&k, &g);
        let q = mulgen(&k);
        assert!(bool::from(p.equals(&q)));
    }

    #[test]
    fn jq255s_mul_generic_matches_mulgen() {
        let g: Point<Jq255S> = base_point();
        let k = Scalar::<Jq255S>::from_raw([98765, 0, 0, 0]);
        let p = mul_generic(&k, &g);
        let q = mulgen(&k);
        assert!(bool::from(p.equals(&q)));
    }

    #[test]
    fn neutral_is_neutral() {
        let n = Point::<Jq255E>::NEUTRAL;
        assert!(bool::from(n.is_neutral()));
    }

    #[test]
    fn mul128_add_mulgen_matches_generic() {
        let g: Point<Jq255S> = base_point();
        let v = Scalar::<Jq255S>::from_raw([7, 0, 0, 0]);
        let u: [u64; 2] = [3, 0];
        let uscalar = Scalar::<Jq255S>::from_raw([3, 0, 0, 0]);
        let p = mul128_add_mulgen_vartime(&g, &u, &v);
        let expect = mul_generic(&uscalar, &g).add(&mulgen(&v));
        assert!(bool::from(p.equals(&expect)));
    }
}

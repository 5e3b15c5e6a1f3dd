// -*- mode: rust; -*-
//
// This file is part of the jq255 crate.
// See LICENSE for licensing information.

//! Curve parameterization.
//!
//! jq255e and jq255s share almost their entire algorithmic stack —
//! field arithmetic, scalar arithmetic, point addition, doubling,
//! encode/decode, scalar multiplication — differing only in a handful
//! of small numeric constants and in three structurally different
//! formulas (the decode polynomial, the addition "dual curve"
//! combination, and the doubling step). [`CurveParams`] collects
//! exactly those differences; everything else lives in generic code
//! parameterized over `C: CurveParams`.

use crate::field::{FieldElement, FieldOps};
use crate::constants::{self, RawPoint};

/// Marker type for the jq255e curve (MQ = 18651, (a,b) = (0,-2)).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Jq255E;

/// Marker type for the jq255s curve (MQ = 3957, (a,b) = (-1,1/2)).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Jq255S;

/// Field type used by jq255e.
pub type FieldE = FieldElement<18651>;
/// Field type used by jq255s.
pub type FieldS = FieldElement<3957>;

/// The differences between jq255e and jq255s that cannot be expressed
/// as a single shared formula: the decode polynomial, the addition
/// "dual curve" combination producing `hd`/`E3`, the doubling
/// intermediate-coordinate formulas, and (for jq255e only) the
/// endomorphism-based scalar split.
pub trait CurveParams: Copy + Clone + Eq + 'static {
    /// The base field this curve is defined over.
    type Field: FieldOps;

    /// Group order, as 4 64-bit limbs (`r < 2^254`).
    const R: [u64; 4];
    /// `|r - 2^254|`, as 2 64-bit limbs (`< 2^127`).
    const R0: [u64; 2];
    /// `true` iff `r = 2^254 - R0` (jq255e); `false` iff `r = 2^254 + R0` (jq255s).
    const R_IS_MINUS: bool;
    /// `(r-1)/2`. Only meaningful (and only used) for jq255e, where it
    /// feeds the endomorphism scalar split; zero for jq255s.
    const HR: [u64; 4] = [0, 0, 0, 0];
    /// `4*r mod 2^256`. Only meaningful (and only used) for jq255s's
    /// 384-bit partial reduction; zero for jq255e.
    const R_X4: [u64; 4] = [0, 0, 0, 0];
    /// Whether this curve uses the endomorphism-based scalar split for
    /// constant-time scalar multiplication.
    const HAS_ENDOMORPHISM: bool = false;
    /// `sqrt(-1)` in the base field. Only meaningful for jq255e.
    const ETA: [u64; 4] = [0, 0, 0, 0];
    /// Lattice basis vector `eU` for the endomorphism scalar split.
    /// Only meaningful for jq255e.
    const E_U: [u64; 2] = [0, 0];
    /// Lattice basis vector `eV` for the endomorphism scalar split.
    /// Only meaningful for jq255e.
    const E_V: [u64; 2] = [0, 0];

    /// `ee = (a^2-4b)*u^4 - 2a*u^2 + 1`, specialized per curve.
    fn decode_ee(u2: &Self::Field, u4: &Self::Field) -> Self::Field;

    /// The curve-specific half of the complete addition formula:
    /// given the symmetric products `z1z2`, `t1t2`, `e1e2`, `u1u2` and
    /// the cross term `zt`, returns `(hd, E3)`.
    fn add_combine(
        z1z2: &Self::Field,
        t1t2: &Self::Field,
        e1e2: &Self::Field,
        u1u2: &Self::Field,
        zt: &Self::Field,
    ) -> (Self::Field, Self::Field);

    /// First doubling step: `(E,Z,U,T) -> (X,W,J)`.
    fn xdouble_first(
        e: &Self::Field,
        z: &Self::Field,
        u: &Self::Field,
        t: &Self::Field,
    ) -> (Self::Field, Self::Field, Self::Field);

    /// Repeated inner doubling step in `(X,W,J)` coordinates.
    fn xdouble_inner(
        x: &Self::Field,
        w: &Self::Field,
        j: &Self::Field,
    ) -> (Self::Field, Self::Field, Self::Field);

    /// Conversion back: `(X,W,J) -> (E,Z,U,T)`.
    fn xdouble_final(
        x: &Self::Field,
        w: &Self::Field,
        j: &Self::Field,
    ) -> (Self::Field, Self::Field, Self::Field, Self::Field);

    /// The four precomputed affine windows `{G, 2^65 G, 2^130 G, 2^195 G}`.
    fn base_windows() -> [&'static [RawPoint; 16]; 4];
}

impl CurveParams for Jq255E {
    type Field = FieldE;

    const R: [u64; 4] = constants::jq255e::R;
    const R0: [u64; 2] = constants::jq255e::R0;
    const R_IS_MINUS: bool = constants::jq255e::R_IS_MINUS;
    const HR: [u64; 4] = constants::jq255e::HR;
    const HAS_ENDOMORPHISM: bool = true;
    const ETA: [u64; 4] = constants::jq255e::ETA;
    const E_U: [u64; 2] = constants::jq255e::E_U;
    const E_V: [u64; 2] = constants::jq255e::E_V;

    fn decode_ee(_u2: &Self::Field, u4: &Self::Field) -> Self::Field {
        // ee = 8*u^4 + 1
        u4.lsh(3).add(&Self::Field::ONE)
    }

    fn add_combine(
        z1z2: &Self::Field,
        t1t2: &Self::Field,
        e1e2: &Self::Field,
        u1u2: &Self::Field,
        zt: &Self::Field,
    ) -> (Self::Field, Self::Field) {
        // a' = 0, b' = 8
        let g1 = t1t2.lsh(3);
        let hd = z1z2.sub(&g1);
        let g1 = z1z2.add(&g1);
        let g1 = g1.mul(e1e2);
        let g2 = u1u2.mul(zt).lsh(4);
        let e3 = g1.add(&g2);
        (hd, e3)
    }

    fn xdouble_first(
        e: &Self::Field,
        z: &Self::Field,
        u: &Self::Field,
        _t: &Self::Field,
    ) -> (Self::Field, Self::Field, Self::Field) {
        let g1 = e.square();
        let j = e.mul(u).mul2();
        let x = g1.square();
        let w = z.square().mul2().sub(&g1);
        (x, w, j)
    }

    fn xdouble_inner(
        x: &Self::Field,
        w: &Self::Field,
        j: &Self::Field,
    ) -> (Self::Field, Self::Field, Self::Field) {
        let ww = w.square();
        let t1 = ww.sub(&x.mul2());
        let t2 = t1.square();
        let jp = w.mul(&t1).mul(j).mul2();
        let wp = t2.sub(&ww.square().mul2());
        let xp = t2.square();
        (xp, wp, jp)
    }

    fn xdouble_final(
        x: &Self::Field,
        w: &Self::Field,
        j: &Self::Field,
    ) -> (Self::Field, Self::Field, Self::Field, Self::Field) {
        let z = w.square();
        let t = j.square();
        let u = w.mul(j);
        let e = x.mul2().sub(&z);
        (e, z, u, t)
    }

    fn base_windows() -> [&'static [RawPoint; 16]; 4] {
        use constants::jq255e_tables::{W0, W130, W195, W65};
        [&W0, &W65, &W130, &W195]
    }
}

impl CurveParams for Jq255S {
    type Field = FieldS;

    const R: [u64; 4] = constants::jq255s::R;
    const R0: [u64; 2] = constants::jq255s::R0;
    const R_IS_MINUS: bool = constants::jq255s::R_IS_MINUS;
    const R_X4: [u64; 4] = constants::jq255s::R_X4;

    fn decode_ee(u2: &Self::Field, u4: &Self::Field) -> Self::Field {
        // ee = 2*u^2 - u^4 + 1
        u2.mul2().sub(u4).add(&Self::Field::ONE)
    }

    fn add_combine(
        z1z2: &Self::Field,
        t1t2: &Self::Field,
        e1e2: &Self::Field,
        u1u2: &Self::Field,
        zt: &Self::Field,
    ) -> (Self::Field, Self::Field) {
        // a' = 2, b' = -1
        let hd = z1z2.add(t1t2);
        let g1 = z1z2.sub(t1t2);
        let g2 = u1u2.mul2();
        let g3 = e1e2.add(&g2);
        let g1 = g3.mul(&g1);
        let g2 = g2.mul(zt);
        let e3 = g1.sub(&g2);
        (hd, e3)
    }

    fn xdouble_first(
        e: &Self::Field,
        z: &Self::Field,
        u: &Self::Field,
        t: &Self::Field,
    ) -> (Self::Field, Self::Field, Self::Field) {
        let u2 = u.square();
        let x = u2.square().lsh(3);
        let w = u2.mul2().sub(&t.add(z).square());
        let j = e.mul(u).mul2();
        (x, w, j)
    }

    fn xdouble_inner(
        x: &Self::Field,
        w: &Self::Field,
        j: &Self::Field,
    ) -> (Self::Field, Self::Field, Self::Field) {
        let t1 = w.mul(j);
        let t2 = t1.square();
        let xp = t2.square().mul2();
        let t3 = w.add(j).square().sub(&t1.mul2());
        let wp = t2.sub(&t3.square().half());
        let jp = t1.mul(&x.mul2().sub(&t2));
        (xp, wp, jp)
    }

    fn xdouble_final(
        x: &Self::Field,
        w: &Self::Field,
        j: &Self::Field,
    ) -> (Self::Field, Self::Field, Self::Field, Self::Field) {
        let z = w.square();
        let t = j.square();
        let u = w.mul(j);
        let e = x.mul2().sub(&z).sub(&t);
        (e, z, u, t)
    }

    fn base_windows() -> [&'static [RawPoint; 16]; 4] {
        use constants::jq255s_tables::{W0, W130, W195, W65};
        [&W0, &W65, &W130, &W195]
    }
}

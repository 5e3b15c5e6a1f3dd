// -*- mode: rust; -*-
//
// This file is part of the jq255 crate.
// See LICENSE for licensing information.

//! Curve-specific numeric constants: group order, endomorphism
//! coefficients, and precomputed base-point multiples.
//!
//! Every value here is fixed by the curve definition (just re-expressed
//! as 64-bit limbs instead of 32-bit ones); none of it is re-derivable
//! from the curve parameters alone without redoing the lattice-
//! reduction / table-generation work, so byte-exact fidelity to these
//! constants is the only thing that matters in this module.

/// A point in affine `(e, u, t = u^2)` form, as raw field-element
/// limbs. Used only to describe the precomputed window tables; curve
/// code converts these into [`crate::point::AffinePoint`] values.
#[derive(Clone, Copy)]
pub(crate) struct RawPoint {
    pub e: [u64; 4],
    pub u: [u64; 4],
    pub t: [u64; 4],
}

pub(crate) mod jq255e_tables;
pub(crate) mod jq255s_tables;

pub(crate) mod jq255e {
    /// Group order r = 2^254 - R0.
    pub(crate) const R: [u64; 4] = [
        0x1F52C8AE74D84525,
        0x9D0C930F54078C53,
        0xFFFFFFFFFFFFFFFF,
        0x3FFFFFFFFFFFFFFF,
    ];
    /// |r - 2^254|, fits in 127 bits (2 limbs used).
    pub(crate) const R0: [u64; 2] = [0xE0AD3751_8B27BADB, 0x62F36CF0_ABF873AC];
    /// (r-1)/2.
    pub(crate) const HR: [u64; 4] = [
        0x8FA964573A6C2292,
        0xCE864987AA03C629,
        0xFFFFFFFFFFFFFFFF,
        0x1FFFFFFFFFFFFFFF,
    ];
    /// r = 2^254 - R0 (as opposed to jq255s's 2^254 + R0).
    pub(crate) const R_IS_MINUS: bool = true;

    /// sqrt(-1) in the base field, used by the endomorphism-based
    /// scalar split.
    pub(crate) const ETA: [u64; 4] = [
        0xD99E0F1BAA938AEE,
        0xA60D864FB30E6336,
        0xE414983FE53688E3,
        0x10ED2DB33C69B85F,
    ];
    /// Lattice basis vectors for `split_endo` (each < 2^127, 2 limbs).
    pub(crate) const E_U: [u64; 2] = [0x2ACCF9DE_C93F6111, 0x1A509F7A_53C2C6E6];
    pub(crate) const E_V: [u64; 2] = [0x0B7A3130_5466F77E, 0x7D440C6A_FFBB3A93];
}

pub(crate) mod jq255s {
    /// Group order r = 2^254 + R0.
    pub(crate) const R: [u64; 4] = [
        0xDCF2AC65396152C7,
        0x2ACF567A912B7F03,
        0x0000000000000000,
        0x4000000000000000,
    ];
    pub(crate) const R0: [u64; 2] = [0xDCF2AC65_396152C7, 0x2ACF567A_912B7F03];
    /// 4*r mod 2^256, used by the 384-bit partial reduction.
    pub(crate) const R_X4: [u64; 4] = [
        0x73CAB194E5854B1C,
        0xAB3D59EA44ADFC0F,
        0x0000000000000000,
        0x0000000000000000,
    ];
    pub(crate) const R_IS_MINUS: bool = false;
}

// -*- mode: rust; -*-
//
// This file is part of the jq255 crate.
// See LICENSE for licensing information.

//! Key management, Schnorr-style signatures, and Diffie-Hellman key
//! exchange built on top of the group and field layers.
//!
//! A private key is a nonzero scalar; a public key is a group element
//! together with the 32-byte encoding it was decoded from (or
//! produced by [`make_public`]), so that re-encoding a key that
//! round-tripped through the wire format yields back the identical
//! bytes rather than merely an equivalent one.

use subtle::{Choice, ConditionallySelectable};

use crate::blake2s::Blake2s;
use crate::curve::CurveParams;
use crate::point::{self, Point};
use crate::scalar::Scalar;
use crate::util::dec64le;

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

/// A private key: a nonzero scalar in `Z/rZ`.
///
/// A plain copyable value with no external resources, like every
/// other type in this crate; nothing wipes it automatically on drop.
/// Callers handling long-lived secrets should call
/// [`Zeroize::zeroize`] themselves when a key is no longer needed.
#[derive(Clone, Copy)]
pub struct PrivateKey<C: CurveParams>(pub(crate) Scalar<C>);

#[cfg(feature = "zeroize")]
impl<C: CurveParams> Zeroize for PrivateKey<C> {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// A public key: a group element, plus the 32-byte encoding it was
/// built or decoded from.
#[derive(Clone, Copy)]
pub struct PublicKey<C: CurveParams> {
    pub(crate) point: Point<C>,
    pub(crate) encoded: [u8; 32],
}

/// A matched private/public key pair.
#[derive(Clone, Copy)]
pub struct KeyPair<C: CurveParams> {
    pub private: PrivateKey<C>,
    pub public: PublicKey<C>,
}

#[cfg(feature = "zeroize")]
impl<C: CurveParams> Zeroize for KeyPair<C> {
    fn zeroize(&mut self) {
        self.private.zeroize();
    }
}

/// Which hash function (if any) the caller pre-hashed the signed
/// message with. `Raw` means `hv` is the message itself; `Prehashed`
/// means `hv` is the digest produced by the named hash function.
///
/// A `NULL` or empty name selects the raw-message mode (domain byte
/// `0x52`, `'R'`) and any other name selects the pre-hashed mode
/// (domain byte `0x48`, `'H'`, followed by the NUL-terminated name).
#[derive(Clone, Copy)]
pub enum HashVariant<'a> {
    Raw,
    Prehashed(&'a str),
}

fn push_mode(ctx: &mut Blake2s, mode: HashVariant) {
    match mode {
        HashVariant::Raw => ctx.update(&[0x52]),
        HashVariant::Prehashed(name) => {
            ctx.update(&[0x48]);
            ctx.update(name.as_bytes());
            ctx.update(&[0]);
        }
    }
}

fn ct_select_bytes32(a: &[u8; 32], b: &[u8; 32], choose_b: Choice) -> [u8; 32] {
    let mut out = [0u8; 32];
    for i in 0..32 {
        out[i] = u8::conditional_select(&a[i], &b[i], choose_b);
    }
    out
}

/// Derive the per-signature secret scalar `k` from the private key,
/// the encoded public key, the message/hash parameters, and an
/// optional extra seed (used for deterministic-but-diversified
/// signing; empty for plain [`sign`]).
fn make_sign_k<C: CurveParams>(
    sec: &Scalar<C>,
    epub: &[u8; 32],
    mode: HashVariant,
    hv: &[u8],
    seed: &[u8],
) -> Scalar<C> {
    let mut ctx = Blake2s::new(32);
    ctx.update(&sec.encode());
    ctx.update(epub);
    ctx.update(&(seed.len() as u64).to_le_bytes());
    ctx.update(seed);
    push_mode(&mut ctx, mode);
    ctx.update(hv);
    Scalar::decode_reduce(&ctx.finalize())
}

/// Derive the 16-byte challenge from the announced point `r`, the
/// encoded public key, and the message/hash parameters.
fn make_challenge<C: CurveParams>(
    r: &Point<C>,
    epub: &[u8; 32],
    mode: HashVariant,
    hv: &[u8],
) -> [u8; 16] {
    let mut ctx = Blake2s::new(32);
    ctx.update(&r.encode());
    ctx.update(epub);
    push_mode(&mut ctx, mode);
    ctx.update(hv);
    let full = ctx.finalize();
    let mut out = [0u8; 16];
    out.copy_from_slice(&full[..16]);
    out
}

/// Derive a private key from an arbitrary-length seed: `BLAKE2s(seed)`
/// reduced modulo `r`, substituting `1` in the vanishingly unlikely
/// case that reduction yields zero.
pub fn generate_private_key<C: CurveParams>(seed: &[u8]) -> PrivateKey<C> {
    let mut ctx = Blake2s::new(32);
    ctx.update(seed);
    let digest = ctx.finalize();
    let mut s = Scalar::decode_reduce(&digest);
    s = Scalar::select(&s, &Scalar::ONE, s.is_zero());
    PrivateKey(s)
}

/// Compute the public key matching a private key.
pub fn make_public<C: CurveParams>(sk: &PrivateKey<C>) -> PublicKey<C> {
    let p = point::mulgen(&sk.0);
    let encoded = p.encode();
    PublicKey { point: p, encoded }
}

/// Generate a full key pair from a seed.
pub fn generate_keypair<C: CurveParams>(seed: &[u8]) -> KeyPair<C> {
    let private = generate_private_key(seed);
    let public = make_public(&private);
    KeyPair { private, public }
}

/// Decode a private key from exactly 32 bytes. The returned `Choice`
/// is true iff `src` had the right length and decoded to a nonzero
/// scalar; on failure the returned key is the zero scalar.
pub fn decode_private_key<C: CurveParams>(src: &[u8]) -> (PrivateKey<C>, Choice) {
    if src.len() != 32 {
        return (PrivateKey(Scalar::ZERO), Choice::from(0));
    }
    let mut buf = [0u8; 32];
    buf.copy_from_slice(src);
    let (s, r) = Scalar::decode(&buf);
    let ok = r & !s.is_zero();
    (PrivateKey(s), ok)
}

/// Decode a public key from exactly 32 bytes. The returned `Choice`
/// is true iff `src` had the right length, decoded to a valid curve
/// point, and that point was not the neutral element.
///
/// The original bytes are retained in the returned key (so that
/// re-encoding yields them back) whenever `src` had the correct
/// length, even if the point itself turned out invalid; only a
/// length mismatch blanks the encoding slot.
pub fn decode_public_key<C: CurveParams>(src: &[u8]) -> (PublicKey<C>, Choice) {
    if src.len() != 32 {
        return (PublicKey { point: Point::NEUTRAL, encoded: [0u8; 32] }, Choice::from(0));
    }
    let mut buf = [0u8; 32];
    buf.copy_from_slice(src);
    let (p, r) = Point::decode(&buf);
    let ok = r & !p.is_neutral();
    (PublicKey { point: p, encoded: buf }, ok)
}

/// Decode a key pair from exactly 64 bytes (private key followed by
/// public key). The returned `Choice` is true iff both halves decoded
/// successfully; on failure both halves are the neutral key pair.
pub fn decode_keypair<C: CurveParams>(src: &[u8]) -> (KeyPair<C>, Choice) {
    if src.len() != 64 {
        let zero_pair = KeyPair {
            private: PrivateKey(Scalar::ZERO),
            public: PublicKey { point: Point::NEUTRAL, encoded: [0u8; 32] },
        };
        return (zero_pair, Choice::from(0));
    }
    let (sk, r1) = decode_private_key::<C>(&src[..32]);
    let (pk, r2) = decode_public_key::<C>(&src[32..64]);
    let ok = r1 & r2;

    let s = Scalar::select(&Scalar::ZERO, &sk.0, ok);
    let p = Point::select(&Point::NEUTRAL, &pk.point, ok);
    let encoded = ct_select_bytes32(&[0u8; 32], &pk.encoded, ok);
    (KeyPair { private: PrivateKey(s), public: PublicKey { point: p, encoded } }, ok)
}

/// Encode a private key as 32 bytes.
pub fn encode_private_key<C: CurveParams>(sk: &PrivateKey<C>) -> [u8; 32] {
    sk.0.encode()
}

/// Encode a public key as 32 bytes: the stored encoding if the key is
/// valid (non-neutral), or all-zero bytes otherwise.
pub fn encode_public_key<C: CurveParams>(pk: &PublicKey<C>) -> [u8; 32] {
    let valid = !pk.point.is_neutral();
    ct_select_bytes32(&[0u8; 32], &pk.encoded, valid)
}

/// Encode a key pair as 64 bytes (private key followed by public key).
pub fn encode_keypair<C: CurveParams>(kp: &KeyPair<C>) -> [u8; 64] {
    let mut out = [0u8; 64];
    out[..32].copy_from_slice(&encode_private_key(&kp.private));
    out[32..].copy_from_slice(&encode_public_key(&kp.public));
    out
}

/// Produce a 48-byte signature (`sign` with an empty extra seed).
pub fn sign<C: CurveParams>(kp: &KeyPair<C>, mode: HashVariant, hv: &[u8]) -> [u8; 48] {
    sign_seeded(kp, mode, hv, &[])
}

/// Produce a 48-byte signature, mixing an extra (non-secret) `seed`
/// into the per-signature nonce derivation. An empty seed recovers
/// plain deterministic signing; a fresh random seed on every call
/// gives extra protection against nonce-reuse bugs without requiring
/// a real source of randomness to be trusted for security.
pub fn sign_seeded<C: CurveParams>(
    kp: &KeyPair<C>,
    mode: HashVariant,
    hv: &[u8],
    seed: &[u8],
) -> [u8; 48] {
    let sec = &kp.private.0;
    let epub = &kp.public.encoded;

    let k = make_sign_k(sec, epub, mode, hv, seed);
    let r = point::mulgen(&k);
    let c = make_challenge(&r, epub, mode, hv);

    let mut s = Scalar::decode_reduce(&c);
    s = s.mul(sec);
    s = s.add(&k);

    let mut sig = [0u8; 48];
    sig[..16].copy_from_slice(&c);
    sig[16..].copy_from_slice(&s.encode());
    sig
}

/// Verify a signature. Returns `false` on any malformed input
/// (wrong-length signature, invalid public key, or out-of-range
/// scalar in the signature) as well as on a genuine mismatch.
///
/// Unlike every other function in this module, verification is not
/// constant-time: it operates purely on public data (the purported
/// signer's public key and the signature), so there is nothing secret
/// left to protect by the time this runs.
pub fn verify<C: CurveParams>(
    sig: &[u8],
    pk: &PublicKey<C>,
    mode: HashVariant,
    hv: &[u8],
) -> bool {
    if sig.len() != 48 {
        return false;
    }
    if bool::from(pk.point.is_neutral()) {
        return false;
    }

    let mut sbuf = [0u8; 32];
    sbuf.copy_from_slice(&sig[16..48]);
    let (s, ok) = Scalar::decode(&sbuf);
    if !bool::from(ok) {
        return false;
    }

    let c = [dec64le(&sig[0..8]), dec64le(&sig[8..16])];

    let neg_q = pk.point.neg();
    let r_prime = point::mul128_add_mulgen_vartime(&neg_q, &c, &s);

    let c2 = make_challenge(&r_prime, &pk.encoded, mode, hv);
    c2 == sig[..16]
}

/// Perform a Diffie-Hellman exchange with a peer's public key.
///
/// Returns the derived 32-byte shared secret and a `Choice` that is
/// true iff the peer's public key was valid. On an invalid peer key
/// the returned secret is still a well-formed-looking 32 bytes (a
/// deterministic function of the caller's own private key), so that
/// callers who forget to check the `Choice` do not leak, through a
/// visibly different output, whether the peer key was bad.
pub fn ecdh<C: CurveParams>(
    self_kp: &KeyPair<C>,
    peer_pk: &PublicKey<C>,
) -> ([u8; 32], Choice) {
    let bad = peer_pk.point.is_neutral();

    let p = point::mul(&self_kp.private.0, &peer_pk.point);
    let shared = p.encode();
    let own_secret = self_kp.private.0.encode();
    let shared = ct_select_bytes32(&shared, &own_secret, bad);

    let epub_self = &self_kp.public.encoded;
    let epub_peer = &peer_pk.encoded;

    // Lexicographic ordering of the two encoded public keys, computed
    // branch-free via a byte-wise borrow chain from the most
    // significant byte down.
    let mut borrow: u32 = 0;
    for i in (0..32).rev() {
        borrow = (epub_self[i] as u32)
            .wrapping_sub(epub_peer[i] as u32)
            .wrapping_sub(borrow)
            >> 31;
    }
    let self_is_smaller = 0u32.wrapping_sub(borrow);
    let self_is_larger = !self_is_smaller;

    let mut ordered = [0u8; 64];
    for i in 0..32 {
        ordered[i] = ((epub_self[i] as u32 & self_is_smaller)
            | (epub_peer[i] as u32 & self_is_larger)) as u8;
        ordered[i + 32] = ((epub_self[i] as u32 & self_is_larger)
            | (epub_peer[i] as u32 & self_is_smaller)) as u8;
    }

    // 0x53 ('S') normally, 0x46 ('F') if the peer key was bad -- kept
    // as arithmetic on the `Choice` mask rather than a branch, since
    // this label feeds the same derivation as the (masked) shared
    // secret above.
    let label: u8 = 0x53u8.wrapping_sub(bad.unwrap_u8().wrapping_mul(0x0D));

    let mut ctx = Blake2s::new(32);
    ctx.update(&ordered);
    ctx.update(&[label]);
    ctx.update(&shared);
    (ctx.finalize(), !bad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{Jq255E, Jq255S};

    fn roundtrip_keypair<C: CurveParams>(seed: &[u8]) {
        let kp = generate_keypair::<C>(seed);
        let enc = encode_keypair(&kp);
        let (kp2, ok) = decode_keypair::<C>(&enc);
        assert!(bool::from(ok));
        assert_eq!(encode_keypair(&kp2), enc);
    }

    #[test]
    fn jq255e_keypair_roundtrip() {
        roundtrip_keypair::<Jq255E>(b"jq255e-test-seed-vector-0001");
    }

    #[test]
    fn jq255s_keypair_roundtrip() {
        roundtrip_keypair::<Jq255S>(b"jq255s-test-seed-vector-0001");
    }

    #[test]
    fn jq255e_sign_then_verify() {
        let kp = generate_keypair::<Jq255E>(b"jq255e-test-seed-vector-0001");
        let msg = b"sample message";
        let sig = sign(&kp, HashVariant::Raw, msg);
        assert!(verify(&sig, &kp.public, HashVariant::Raw, msg));
    }

    #[test]
    fn tampering_with_signature_breaks_verification() {
        let kp = generate_keypair::<Jq255E>(b"jq255e-test-seed-vector-0001");
        let msg = b"sample message";
        let sig = sign(&kp, HashVariant::Raw, msg);

        for &pos in &[0usize, 16, 47] {
            let mut bad_sig = sig;
            bad_sig[pos] ^= 0x01;
            assert!(!verify(&bad_sig, &kp.public, HashVariant::Raw, msg));
        }
    }

    #[test]
    fn verify_rejects_wrong_length_signature() {
        let kp = generate_keypair::<Jq255E>(b"seed");
        assert!(!verify(&[0u8; 47], &kp.public, HashVariant::Raw, b"m"));
    }

    #[test]
    fn verify_rejects_neutral_public_key() {
        let kp = generate_keypair::<Jq255E>(b"seed");
        let sig = sign(&kp, HashVariant::Raw, b"m");
        let bad_pk = PublicKey::<Jq255E> { point: Point::NEUTRAL, encoded: [0u8; 32] };
        assert!(!verify(&sig, &bad_pk, HashVariant::Raw, b"m"));
    }

    #[test]
    fn ecdh_is_commutative() {
        let a = generate_keypair::<Jq255E>(b"alice-seed");
        let b = generate_keypair::<Jq255E>(b"bob-seed");

        let (k1, ok1) = ecdh(&a, &b.public);
        let (k2, ok2) = ecdh(&b, &a.public);

        assert!(bool::from(ok1));
        assert!(bool::from(ok2));
        assert_eq!(k1, k2);
    }

    #[test]
    fn ecdh_with_invalid_peer_key_reports_failure() {
        let a = generate_keypair::<Jq255E>(b"alice-seed");
        let bad_pk = PublicKey::<Jq255E> { point: Point::NEUTRAL, encoded: [0u8; 32] };
        let (_, ok) = ecdh(&a, &bad_pk);
        assert!(!bool::from(ok));
    }

    #[test]
    fn prehashed_mode_differs_from_raw_mode() {
        let kp = generate_keypair::<Jq255S>(b"jq255s-test-seed-vector-0001");
        let digest = [0x11u8; 32];
        let sig_raw = sign(&kp, HashVariant::Raw, &digest);
        let sig_hashed = sign(&kp, HashVariant::Prehashed("dummy"), &digest);
        assert_ne!(sig_raw, sig_hashed);
    }
}

// -*- mode: rust; -*-
//
// This file is part of twist25519.
// See LICENSE for licensing information.

//! A flat, byte-oriented Ed25519 interface.
//!
//! Every operation here is a plain function over fixed-size byte
//! buffers, mirroring the wire formats exactly: 32-byte seeds and
//! public keys, 64-byte secret-key storage (seed followed by public
//! key), and 64-byte signatures.  This surface is suitable for FFI
//! shims and benchmarking harnesses which call primitives by pointer;
//! the typed [`SigningKey`]/[`VerifyingKey`] API is preferred for
//! application code.
//!
//! [`SigningKey`]: crate::SigningKey
//! [`VerifyingKey`]: crate::VerifyingKey

#![allow(non_snake_case)]

use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha512};
use subtle::Choice;
use subtle::ConstantTimeEq;

use crate::constants::{KEYPAIR_LENGTH, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH, SIGNATURE_LENGTH};
use crate::edwards::{CompressedEdwardsY, EdwardsPoint};
use crate::scalar::Scalar;

/// Expand a 32-byte seed into the clamped secret scalar and the nonce
/// prefix.
fn expand_seed(seed: &[u8; SECRET_KEY_LENGTH]) -> (Scalar, [u8; 32]) {
    let hash = Sha512::default().chain_update(seed).finalize();
    let mut scalar_bytes = [0u8; 32];
    let mut prefix = [0u8; 32];
    scalar_bytes.copy_from_slice(&hash[..32]);
    prefix.copy_from_slice(&hash[32..]);

    (Scalar::from_bits_clamped(scalar_bytes), prefix)
}

/// Derive a keypair from a 32-byte seed.
///
/// Returns the 64-byte secret-key storage format (the seed followed by
/// the public key, so re-derivation is deterministic) and the 32-byte
/// public key.
pub fn keypair_from_seed(
    seed: &[u8; SECRET_KEY_LENGTH],
) -> ([u8; KEYPAIR_LENGTH], [u8; PUBLIC_KEY_LENGTH]) {
    let (scalar, _prefix) = expand_seed(seed);
    let public = EdwardsPoint::mul_base(&scalar).compress().to_bytes();

    let mut secret = [0u8; KEYPAIR_LENGTH];
    secret[..SECRET_KEY_LENGTH].copy_from_slice(seed);
    secret[SECRET_KEY_LENGTH..].copy_from_slice(&public);

    (secret, public)
}

/// Sign `message` with the 64-byte secret-key storage format,
/// deterministically per RFC 8032.
pub fn sign(message: &[u8], secret_key: &[u8; KEYPAIR_LENGTH]) -> [u8; SIGNATURE_LENGTH] {
    let mut seed = [0u8; SECRET_KEY_LENGTH];
    seed.copy_from_slice(&secret_key[..SECRET_KEY_LENGTH]);
    let public_key = &secret_key[SECRET_KEY_LENGTH..];

    let (scalar, prefix) = expand_seed(&seed);

    let r = Scalar::from_hash(Sha512::new().chain_update(prefix).chain_update(message));
    sign_with_nonce(&r, &scalar, public_key, message)
}

/// Sign `message`, mixing 32 fresh random bytes into the nonce hash.
///
/// The signature still verifies under the same public key, but repeated
/// signing of the same message yields distinct signatures, and the
/// RFC 8032 test vectors do not apply.
pub fn sign_hedged<R: RngCore + CryptoRng>(
    message: &[u8],
    secret_key: &[u8; KEYPAIR_LENGTH],
    rng: &mut R,
) -> [u8; SIGNATURE_LENGTH] {
    let mut seed = [0u8; SECRET_KEY_LENGTH];
    seed.copy_from_slice(&secret_key[..SECRET_KEY_LENGTH]);
    let public_key = &secret_key[SECRET_KEY_LENGTH..];

    let (scalar, prefix) = expand_seed(&seed);

    let mut randomness = [0u8; 32];
    rng.fill_bytes(&mut randomness);

    let r = Scalar::from_hash(
        Sha512::new()
            .chain_update(prefix)
            .chain_update(randomness)
            .chain_update(message),
    );
    sign_with_nonce(&r, &scalar, public_key, message)
}

/// Complete a signature given the nonce scalar `r`.
fn sign_with_nonce(
    r: &Scalar,
    scalar: &Scalar,
    public_key: &[u8],
    message: &[u8],
) -> [u8; SIGNATURE_LENGTH] {
    let R = EdwardsPoint::mul_base(r).compress();

    let k = Scalar::from_hash(
        Sha512::new()
            .chain_update(R.as_bytes())
            .chain_update(public_key)
            .chain_update(message),
    );

    let s = Scalar::multiply_add(&k, scalar, r);

    let mut signature = [0u8; SIGNATURE_LENGTH];
    signature[..32].copy_from_slice(R.as_bytes());
    signature[32..].copy_from_slice(s.as_bytes());
    signature
}

/// Verify a 64-byte signature on `message` under a 32-byte public key.
///
/// The only early exits are on the cheap range pre-check of `S`
/// (rejecting before any arithmetic begins).  An invalid public-key
/// encoding does not abort: decompression substitutes the identity,
/// the double-scalar multiplication runs to completion, and the
/// validity bit is folded into the final full-width constant-time byte
/// comparison, so all rejections past the pre-check take the same
/// path.
pub fn verify(
    message: &[u8],
    signature: &[u8; SIGNATURE_LENGTH],
    public_key: &[u8; PUBLIC_KEY_LENGTH],
) -> bool {
    let mut R_bytes = [0u8; 32];
    let mut s_bytes = [0u8; 32];
    R_bytes.copy_from_slice(&signature[..32]);
    s_bytes.copy_from_slice(&signature[32..]);

    // Malleability pre-check: the high 3 bits of S must be clear, and
    // S must be fully reduced mod the group order.
    if s_bytes[31] & 0b1110_0000 != 0 {
        return false;
    }
    let s = Scalar::from_bits(s_bytes);
    if !s.is_canonical() {
        return false;
    }

    let (A, A_is_valid) = CompressedEdwardsY(*public_key).decompress_with_validity();

    let k = Scalar::from_hash(
        Sha512::new()
            .chain_update(R_bytes)
            .chain_update(public_key)
            .chain_update(message),
    );

    let expected_R = EdwardsPoint::vartime_double_scalar_mul_basepoint(&k, &(-A), &s);

    let R_matches: Choice = expected_R.compress().as_bytes().ct_eq(&R_bytes);

    (R_matches & A_is_valid).into()
}

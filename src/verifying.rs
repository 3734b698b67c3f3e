// -*- mode: rust; -*-
//
// This file is part of twist25519.
// See LICENSE for licensing information.

//! Ed25519 public keys.

#![allow(non_snake_case)]

use core::fmt::Debug;
use core::hash::{Hash, Hasher};

use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;

use crate::constants::PUBLIC_KEY_LENGTH;
use crate::edwards::{CompressedEdwardsY, EdwardsPoint};
use crate::errors::{InternalError, SignatureError};
use crate::montgomery::MontgomeryPoint;
use crate::scalar::Scalar;
use crate::signature::Signature;
use crate::signing::ExpandedSecretKey;

/// An ed25519 public key.
///
/// Holds both the compressed wire form and the decompressed Edwards
/// point, so that decompression happens once at parse time rather than
/// on every verification.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct VerifyingKey {
    /// Serialized compressed Edwards-y point.
    pub(crate) compressed: CompressedEdwardsY,
    /// Decompressed Edwards point.
    pub(crate) point: EdwardsPoint,
}

impl Debug for VerifyingKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "VerifyingKey({:?}), {:?})", self.compressed, self.point)
    }
}

impl Hash for VerifyingKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl AsRef<[u8]> for VerifyingKey {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<&ExpandedSecretKey> for VerifyingKey {
    /// Derive this public key from its corresponding `ExpandedSecretKey`.
    fn from(expanded_secret_key: &ExpandedSecretKey) -> VerifyingKey {
        VerifyingKey::mul_base(&expanded_secret_key.key)
    }
}

impl VerifyingKey {
    /// Convert this public key to a byte array.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.compressed.to_bytes()
    }

    /// View this public key as a byte array.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &(self.compressed).0
    }

    /// Construct a `VerifyingKey` from a slice of bytes.
    ///
    /// Returns `SignatureError` if the slice is not 32 bytes long or
    /// does not decompress to a curve point.
    pub fn from_bytes(bytes: &[u8]) -> Result<VerifyingKey, SignatureError> {
        if bytes.len() != PUBLIC_KEY_LENGTH {
            return Err(InternalError::BytesLength {
                name: "VerifyingKey",
                length: PUBLIC_KEY_LENGTH,
            }
            .into());
        }
        let mut compressed_bytes = [0u8; PUBLIC_KEY_LENGTH];
        compressed_bytes.copy_from_slice(bytes);

        let compressed = CompressedEdwardsY(compressed_bytes);
        let point = compressed
            .decompress()
            .ok_or(InternalError::PointDecompression)?;

        Ok(VerifyingKey { compressed, point })
    }

    /// Internal utility for multiplying a secret scalar by the
    /// basepoint and caching both point forms.
    pub(crate) fn mul_base(scalar: &Scalar) -> VerifyingKey {
        let point = EdwardsPoint::mul_base(scalar);
        let compressed = point.compress();
        VerifyingKey { compressed, point }
    }

    /// Check whether this public key is a point of small order.
    ///
    /// Small-order public keys admit signatures which verify for every
    /// message; protocols relying on one-signature-one-message must
    /// reject them.
    pub fn is_weak(&self) -> bool {
        self.point.is_small_order()
    }

    /// Convert this public key to its birationally-equivalent
    /// Montgomery u-coordinate, as used for X25519.
    pub fn to_montgomery(&self) -> MontgomeryPoint {
        self.point.to_montgomery()
    }

    /// The challenge scalar \\( k = H(R \| A \| M) \\) of the
    /// verification equation.
    fn compute_challenge(R: &CompressedEdwardsY, A: &VerifyingKey, M: &[u8]) -> Scalar {
        Scalar::from_hash(
            Sha512::new()
                .chain_update(R.as_bytes())
                .chain_update(A.as_bytes())
                .chain_update(M),
        )
    }

    /// Verify a signature on a message with this public key.
    ///
    /// The verification equation is checked in the form
    /// \\( R \stackrel{?}{=} \[s\]B - \[k\]A \\), recomputing \\(R\\)
    /// with a double-scalar multiplication and comparing compressed
    /// encodings, so an attacker gains nothing from submitting an
    /// \\(R\\) which is equivalent to but distinct from the signer's.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), SignatureError> {
        let k = Self::compute_challenge(&signature.R, self, message);
        let minus_A: EdwardsPoint = -self.point;
        let expected_R =
            EdwardsPoint::vartime_double_scalar_mul_basepoint(&k, &minus_A, &signature.s);

        // Compare the full 32-byte encodings in constant time.
        if expected_R.compress().ct_eq(&signature.R).into() {
            Ok(())
        } else {
            Err(InternalError::Verify.into())
        }
    }
}

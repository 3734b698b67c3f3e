// -*- mode: rust; -*-
//
// This file is part of twist25519.
// See LICENSE for licensing information.

//! An Ed25519 signature.

use core::convert::TryFrom;
use core::fmt::Debug;

use crate::constants::SIGNATURE_LENGTH;
use crate::edwards::CompressedEdwardsY;
use crate::errors::{InternalError, SignatureError};
use crate::scalar::Scalar;

/// An ed25519 signature.
///
/// The first half is the compressed point \\(R\\); the second half is
/// the scalar \\(s\\).  Parsing a signature checks that \\(s\\) is
/// fully reduced mod the group order, which rejects signature
/// malleability at the encoding level.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Signature {
    /// `R` is an `EdwardsPoint`, formed by using an hash function with
    /// 512-bits output to produce the digest of:
    ///
    /// - the nonce half of the `ExpandedSecretKey`, and
    /// - the message to be signed.
    ///
    /// This digest is then interpreted as a `Scalar` and reduced into an
    /// element in ℤ/lℤ.  The scalar is then multiplied by the distinguished
    /// basepoint to produce `R`, an `EdwardsPoint`.
    pub(crate) R: CompressedEdwardsY,

    /// `s` is a `Scalar`, formed by using an hash function with 512-bits output
    /// to produce the digest of:
    ///
    /// - the `r` portion of this `Signature`,
    /// - the `VerifyingKey` which should be used to verify this `Signature`, and
    /// - the message to be signed.
    ///
    /// This digest is then interpreted as a `Scalar` and reduced into an
    /// element in ℤ/lℤ.
    pub(crate) s: Scalar,
}

impl Debug for Signature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Signature( R: {:?}, s: {:?} )", &self.R, &self.s)
    }
}

/// Check that the `s` half of a signature encoding is a canonical
/// scalar.
///
/// Uncanonical `s` encodings admit trivially malleable signatures:
/// given \\((R, s)\\), the pair \\((R, s + \ell)\\) would also verify.
/// Both the cheap high-bit test from the original reference
/// implementation and the full comparison against \\(\ell\\) are
/// applied.
fn check_scalar(bytes: [u8; 32]) -> Result<Scalar, SignatureError> {
    // The highest 3 bits must not be set.  This covers scalars with
    // bit 253, 254, or 255 set, which are necessarily >= 2^253 > ell.
    if bytes[31] & 0b1110_0000 != 0 {
        return Err(InternalError::ScalarFormat.into());
    }

    Scalar::from_canonical_bytes(bytes).ok_or_else(|| InternalError::ScalarFormat.into())
}

impl Signature {
    /// Convert this `Signature` to a byte array.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut signature_bytes: [u8; SIGNATURE_LENGTH] = [0u8; SIGNATURE_LENGTH];

        signature_bytes[..32].copy_from_slice(&self.R.as_bytes()[..]);
        signature_bytes[32..].copy_from_slice(&self.s.as_bytes()[..]);
        signature_bytes
    }

    /// Construct a `Signature` from a slice of bytes.
    ///
    /// Returns `SignatureError` if the slice is not 64 bytes long, or
    /// if the `s` half is not a canonical scalar.  The `R` half is not
    /// validated here; point decompression happens during verification.
    pub fn from_bytes(bytes: &[u8]) -> Result<Signature, SignatureError> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(InternalError::BytesLength {
                name: "Signature",
                length: SIGNATURE_LENGTH,
            }
            .into());
        }

        let mut lower: [u8; 32] = [0u8; 32];
        let mut upper: [u8; 32] = [0u8; 32];

        lower.copy_from_slice(&bytes[..32]);
        upper.copy_from_slice(&bytes[32..]);

        Ok(Signature {
            R: CompressedEdwardsY(lower),
            s: check_scalar(upper)?,
        })
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = SignatureError;

    fn try_from(bytes: &[u8]) -> Result<Signature, SignatureError> {
        Signature::from_bytes(bytes)
    }
}

impl From<Signature> for [u8; SIGNATURE_LENGTH] {
    fn from(sig: Signature) -> [u8; SIGNATURE_LENGTH] {
        sig.to_bytes()
    }
}

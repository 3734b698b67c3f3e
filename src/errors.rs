// -*- mode: rust; -*-
//
// This file is part of twist25519.
// See LICENSE for licensing information.

//! Errors which may occur when parsing keys and/or signatures to or from
//! wire formats.

use core::fmt;
use core::fmt::Display;

/// Internal errors.  Most application-level developers will likely not
/// need to pay any attention to these.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum InternalError {
    /// A point decoding failed.
    PointDecompression,
    /// A scalar was not canonically encoded, or was out of range.
    ScalarFormat,
    /// An error in the length of bytes handed to a constructor.
    BytesLength {
        /// The name of the type returning the error.
        name: &'static str,
        /// The expected length of the bytes.
        length: usize,
    },
    /// The verification equation wasn't satisfied.
    Verify,
    /// Two keys in a keypair encoding did not correspond.
    MismatchedKeypair,
}

impl Display for InternalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            InternalError::PointDecompression => write!(f, "Cannot decompress Edwards point"),
            InternalError::ScalarFormat => {
                write!(f, "Cannot use scalar with high-bits set or not canonically encoded")
            }
            InternalError::BytesLength { name: n, length: l } => {
                write!(f, "{} must be {} bytes in length", n, l)
            }
            InternalError::Verify => write!(f, "Verification equation was not satisfied"),
            InternalError::MismatchedKeypair => {
                write!(f, "Keypair public key does not match its secret key")
            }
        }
    }
}

impl std::error::Error for InternalError {}

/// Errors which may occur while processing signatures and keypairs.
///
/// This error may arise due to:
///
/// * Being given bytes with a length different to what was expected.
///
/// * A problem decompressing `R`, a curve point, in the `Signature`, or the
///   curve point for a `VerifyingKey`.
///
/// * A problem with the format of `S`, a scalar, in the `Signature`.  This
///   is only raised if the high-bits of the scalar are set, or if the scalar
///   is not canonically encoded.
///
/// * Failure of a signature to satisfy the verification equation.
///
/// * A 64-byte keypair encoding whose public half does not match the
///   key derived from its seed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SignatureError(pub(crate) InternalError);

impl Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for SignatureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<InternalError> for SignatureError {
    fn from(err: InternalError) -> SignatureError {
        SignatureError(err)
    }
}

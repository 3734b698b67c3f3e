// -*- mode: rust; -*-
//
// This file is part of twist25519.
// See LICENSE for licensing information.

//! # twist25519
//!
//! A pure-Rust implementation of group operations on the Edwards and
//! Montgomery forms of Curve25519, together with the protocols built
//! on them: Ed25519 signatures (RFC 8032) and the X25519
//! Diffie-Hellman function (RFC 7748).
//!
//! ## Organization
//!
//! * [`scalar`]: arithmetic on scalars modulo the group order
//!   \\( \ell = 2^{252} + 27742317777372353535851937790883648493 \\).
//! * [`edwards`]: the twisted Edwards group law, point compression and
//!   decompression, and fixed-base, variable-base, and double-scalar
//!   multiplication.
//! * [`montgomery`]: the Montgomery ladder on the \\(u\\)-line.
//! * [`x25519`]: the byte-oriented X25519 function.
//! * [`ed25519`]: a flat, byte-oriented Ed25519 interface for FFI and
//!   benchmarking; the typed [`SigningKey`] and [`VerifyingKey`] API
//!   re-exported at the crate root is preferred for application code.
//! * [`constants`]: curve parameters and precomputed tables.
//!
//! ## Constant-time guarantees
//!
//! All operations on secret data (field and scalar arithmetic, the
//! fixed-base and variable-base scalar multiplications, the Montgomery
//! ladder, signing) run in constant time: no branches or memory
//! accesses depend on secret values, and table lookups go through an
//! audited constant-time select.  Functions whose names begin with
//! `vartime` take time dependent on their inputs and must only be used
//! with public data, as in signature verification.
//!
//! ## Signing modes
//!
//! [`SigningKey::sign`] is deterministic EdDSA exactly as specified in
//! RFC 8032 and reproduces the RFC test vectors byte-for-byte.
//! [`SigningKey::sign_hedged`] additionally mixes fresh randomness
//! into the nonce derivation; the resulting signatures still verify
//! under the same public key but are not reproducible.

#![deny(missing_docs)]
#![allow(clippy::needless_range_loop)]

#[macro_use]
mod macros;

pub mod constants;
pub mod edwards;
pub mod montgomery;
pub mod scalar;
pub mod traits;
pub mod x25519;

pub mod ed25519;

mod curve_models;
mod field;
mod window;

mod errors;
mod signature;
mod signing;
mod verifying;

pub use crate::errors::SignatureError;
pub use crate::signature::Signature;
pub use crate::signing::{SecretKey, SigningKey};
pub use crate::verifying::VerifyingKey;

pub use crate::constants::{
    KEYPAIR_LENGTH, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH, SIGNATURE_LENGTH,
};

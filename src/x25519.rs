// -*- mode: rust; -*-
//
// This file is part of twist25519.
// See LICENSE for licensing information.

//! The X25519 Diffie-Hellman function, as specified in RFC 7748.

use crate::montgomery::MontgomeryPoint;

/// The X25519 basepoint, for use with the bare, byte-oriented
/// [`x25519`] function.
pub const X25519_BASEPOINT_BYTES: [u8; 32] = [
    9, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0,
];

/// The bare, byte-oriented X25519 function, exactly as specified in
/// RFC 7748.
///
/// The scalar `k` is clamped before use; the \\(u\\)-coordinate is
/// taken mod \\(2^{255}\\) and interpreted mod \\(p\\), matching the
/// RFC's decodeUCoordinate.
///
/// This function is intended for implementing the X25519 wire protocol;
/// the result may be all zeros when the input point is of small order,
/// and callers implementing a Diffie-Hellman exchange should check for
/// this.
pub fn x25519(k: [u8; 32], u: [u8; 32]) -> [u8; 32] {
    MontgomeryPoint(u).mul_clamped(k).to_bytes()
}

/// Compute the public key corresponding to the X25519 secret `k`,
/// i.e. `x25519(k, X25519_BASEPOINT_BYTES)`.
pub fn x25519_base(k: [u8; 32]) -> [u8; 32] {
    x25519(k, X25519_BASEPOINT_BYTES)
}

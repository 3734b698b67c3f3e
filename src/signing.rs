// -*- mode: rust; -*-
//
// This file is part of twist25519.
// See LICENSE for licensing information.

//! Ed25519 signing keys.

use core::fmt::Debug;

use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha512};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{KEYPAIR_LENGTH, SECRET_KEY_LENGTH};
use crate::edwards::EdwardsPoint;
use crate::errors::{InternalError, SignatureError};
use crate::scalar::Scalar;
use crate::signature::Signature;
use crate::verifying::VerifyingKey;

/// An ed25519 secret key: 32 bytes of seed entropy.
pub type SecretKey = [u8; SECRET_KEY_LENGTH];

/// An ed25519 signing key, holding the secret seed and the derived
/// public key.
#[derive(Clone)]
pub struct SigningKey {
    /// The secret half of this signing key.
    pub(crate) secret_key: SecretKey,
    /// The public half of this signing key.
    pub(crate) verifying_key: VerifyingKey,
}

/// The expanded form of an ed25519 secret key: the clamped scalar
/// \\(a\\) and the 32-byte domain-separation prefix used for nonce
/// generation, both halves of SHA-512 of the seed.
pub(crate) struct ExpandedSecretKey {
    pub(crate) key: Scalar,
    pub(crate) nonce: [u8; 32],
}

impl Zeroize for ExpandedSecretKey {
    fn zeroize(&mut self) {
        self.key.zeroize();
        self.nonce.zeroize();
    }
}

impl Drop for ExpandedSecretKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for ExpandedSecretKey {}

impl From<&SecretKey> for ExpandedSecretKey {
    fn from(secret_key: &SecretKey) -> ExpandedSecretKey {
        let hash = Sha512::default().chain_update(secret_key).finalize();
        let mut lower: [u8; 32] = [0u8; 32];
        let mut upper: [u8; 32] = [0u8; 32];
        lower.copy_from_slice(&hash[00..32]);
        upper.copy_from_slice(&hash[32..64]);

        // The lower 32 bytes are clamped to form the secret scalar;
        // the upper 32 bytes become the nonce prefix.
        ExpandedSecretKey {
            key: Scalar::from_bits_clamped(lower),
            nonce: upper,
        }
    }
}

impl ExpandedSecretKey {
    /// Sign a message with this expanded secret key, deterministically
    /// per RFC 8032.
    #[allow(non_snake_case)]
    pub(crate) fn sign(&self, message: &[u8], verifying_key: &VerifyingKey) -> Signature {
        let r = Scalar::from_hash(
            Sha512::new().chain_update(self.nonce).chain_update(message),
        );
        let R = EdwardsPoint::mul_base(&r).compress();

        let k = Scalar::from_hash(
            Sha512::new()
                .chain_update(R.as_bytes())
                .chain_update(verifying_key.as_bytes())
                .chain_update(message),
        );

        let s = Scalar::multiply_add(&k, &self.key, &r);

        Signature { R, s }
    }

    /// Sign a message, mixing fresh randomness into the nonce.
    ///
    /// The nonce becomes \\( H(\mathrm{prefix} \| Z \| M) \\) where
    /// \\(Z\\) is 32 random bytes.  The produced signature remains a
    /// valid signature under the same public key, but it is no longer
    /// the deterministic RFC 8032 signature: a leaked nonce pattern or
    /// a fault during hashing no longer pins the secret scalar.
    #[allow(non_snake_case)]
    pub(crate) fn sign_hedged<R: RngCore + CryptoRng>(
        &self,
        message: &[u8],
        rng: &mut R,
        verifying_key: &VerifyingKey,
    ) -> Signature {
        let mut randomness = [0u8; 32];
        rng.fill_bytes(&mut randomness);

        let r = Scalar::from_hash(
            Sha512::new()
                .chain_update(self.nonce)
                .chain_update(randomness)
                .chain_update(message),
        );
        let R = EdwardsPoint::mul_base(&r).compress();

        let k = Scalar::from_hash(
            Sha512::new()
                .chain_update(R.as_bytes())
                .chain_update(verifying_key.as_bytes())
                .chain_update(message),
        );

        let s = Scalar::multiply_add(&k, &self.key, &r);

        Signature { R, s }
    }
}

impl SigningKey {
    /// Construct a `SigningKey` from a 32-byte seed.
    pub fn from_bytes(secret_key: &SecretKey) -> Self {
        let verifying_key = VerifyingKey::from(&ExpandedSecretKey::from(secret_key));
        Self {
            secret_key: *secret_key,
            verifying_key,
        }
    }

    /// Convert this `SigningKey` to its seed bytes.
    pub fn to_bytes(&self) -> SecretKey {
        self.secret_key
    }

    /// View this `SigningKey` as its seed bytes.
    pub fn as_bytes(&self) -> &SecretKey {
        &self.secret_key
    }

    /// Generate an ed25519 signing key from a cryptographically secure
    /// RNG.
    pub fn generate<R: CryptoRng + RngCore>(csprng: &mut R) -> SigningKey {
        let mut secret = SecretKey::default();
        csprng.fill_bytes(&mut secret);
        Self::from_bytes(&secret)
    }

    /// Get the `VerifyingKey` for this `SigningKey`.
    pub fn verifying_key(&self) -> VerifyingKey {
        self.verifying_key
    }

    /// Sign a message deterministically per RFC 8032.
    pub fn sign(&self, message: &[u8]) -> Signature {
        let expanded: ExpandedSecretKey = (&self.secret_key).into();
        expanded.sign(message, &self.verifying_key)
    }

    /// Sign a message, additionally mixing fresh randomness from
    /// `rng` into the nonce.  See `ExpandedSecretKey::sign_hedged`.
    pub fn sign_hedged<R: RngCore + CryptoRng>(&self, message: &[u8], rng: &mut R) -> Signature {
        let expanded: ExpandedSecretKey = (&self.secret_key).into();
        expanded.sign_hedged(message, rng, &self.verifying_key)
    }

    /// Verify a signature on a message with this key's public half.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), SignatureError> {
        self.verifying_key.verify(message, signature)
    }

    /// Convert this signing key to a 64-byte keypair: the seed
    /// followed by the public key bytes.
    pub fn to_keypair_bytes(&self) -> [u8; KEYPAIR_LENGTH] {
        let mut bytes: [u8; KEYPAIR_LENGTH] = [0u8; KEYPAIR_LENGTH];
        bytes[..SECRET_KEY_LENGTH].copy_from_slice(&self.secret_key);
        bytes[SECRET_KEY_LENGTH..].copy_from_slice(self.verifying_key.as_bytes());
        bytes
    }

    /// Construct a signing key from a 64-byte keypair encoding.
    ///
    /// The embedded public key is checked against the key derived from
    /// the seed; a mismatched pair is rejected.
    pub fn from_keypair_bytes(bytes: &[u8; KEYPAIR_LENGTH]) -> Result<SigningKey, SignatureError> {
        let (secret_key, verifying_key) = bytes.split_at(SECRET_KEY_LENGTH);
        let mut seed = [0u8; SECRET_KEY_LENGTH];
        seed.copy_from_slice(secret_key);

        let signing_key = SigningKey::from_bytes(&seed);
        if signing_key.verifying_key.as_bytes() != verifying_key {
            return Err(InternalError::MismatchedKeypair.into());
        }

        Ok(signing_key)
    }
}

impl Debug for SigningKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SigningKey")
            .field("verifying_key", &self.verifying_key)
            .finish_non_exhaustive()
    }
}

impl AsRef<VerifyingKey> for SigningKey {
    fn as_ref(&self) -> &VerifyingKey {
        &self.verifying_key
    }
}

impl Zeroize for SigningKey {
    fn zeroize(&mut self) {
        self.secret_key.zeroize();
    }
}

impl Drop for SigningKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for SigningKey {}

impl From<&SecretKey> for SigningKey {
    fn from(secret_key: &SecretKey) -> SigningKey {
        SigningKey::from_bytes(secret_key)
    }
}

impl PartialEq<SigningKey> for SigningKey {
    fn eq(&self, other: &SigningKey) -> bool {
        // The seed determines the whole keypair.
        use subtle::ConstantTimeEq;
        self.secret_key.ct_eq(&other.secret_key).into()
    }
}

impl Eq for SigningKey {}

#[cfg(test)]
mod test {
    use super::*;

    use rand::rngs::OsRng;

    #[test]
    fn keypair_bytes_roundtrip() {
        let mut csprng = OsRng;
        let signing_key = SigningKey::generate(&mut csprng);
        let bytes = signing_key.to_keypair_bytes();
        let recovered = SigningKey::from_keypair_bytes(&bytes).unwrap();
        assert_eq!(signing_key, recovered);
    }

    #[test]
    fn keypair_bytes_rejects_mismatched_public_key() {
        let mut csprng = OsRng;
        let signing_key = SigningKey::generate(&mut csprng);
        let mut bytes = signing_key.to_keypair_bytes();
        bytes[SECRET_KEY_LENGTH] ^= 0x01;
        assert!(SigningKey::from_keypair_bytes(&bytes).is_err());
    }

    #[test]
    fn sign_verify_roundtrip() {
        let mut csprng = OsRng;
        let signing_key = SigningKey::generate(&mut csprng);
        let message = b"all i know is that i know nothing";
        let signature = signing_key.sign(message);
        assert!(signing_key.verify(message, &signature).is_ok());
    }

    #[test]
    fn hedged_signature_verifies() {
        let mut csprng = OsRng;
        let signing_key = SigningKey::generate(&mut csprng);
        let message = b"hedged against nonce reuse";
        let signature = signing_key.sign_hedged(message, &mut csprng);
        assert!(signing_key.verify(message, &signature).is_ok());
    }

    #[test]
    fn hedged_signatures_differ_between_calls() {
        let mut csprng = OsRng;
        let signing_key = SigningKey::generate(&mut csprng);
        let message = b"same message, different nonce";
        let sig1 = signing_key.sign_hedged(message, &mut csprng);
        let sig2 = signing_key.sign_hedged(message, &mut csprng);
        // With overwhelming probability, two random nonces differ.
        assert_ne!(sig1.to_bytes(), sig2.to_bytes());
        // And both differ from the deterministic signature.
        let deterministic = signing_key.sign(message);
        assert_ne!(sig1.to_bytes(), deterministic.to_bytes());
        assert!(signing_key.verify(message, &deterministic).is_ok());
    }
}

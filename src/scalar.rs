// -*- mode: rust; -*-
//
// This file is part of twist25519.
// See LICENSE for licensing information.

//! Arithmetic on scalars (integers mod the group order
//! \\( \ell = 2^{252} + 27742317777372353535851937790883648493 \\),
//! the order of the prime-order subgroup).
//!
//! A `Scalar` is stored as its canonical 32-byte little-endian
//! encoding.  Arithmetic unpacks scalars into `Scalar52`s, five
//! 52-bit limbs stored in `u64`s, computes with 128-bit products,
//! and reduces products mod \\( \ell \\) by Barrett reduction with a
//! precomputed approximation \\( \mu = \lfloor 2^{512} / \ell \rfloor \\).

use core::fmt::Debug;
use core::ops::Neg;
use core::ops::{Add, AddAssign};
use core::ops::{Index, IndexMut};
use core::ops::{Mul, MulAssign};
use core::ops::{Sub, SubAssign};

use digest::generic_array::typenum::U64;
use digest::Digest;
use rand_core::{CryptoRng, RngCore};
use subtle::Choice;
use subtle::ConditionallySelectable;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::constants;

/// The `Scalar` struct holds an integer \\(s < 2^{255} \\) which
/// represents an element of \\( \mathbb Z / \ell \\).
#[derive(Copy, Clone, Hash)]
pub struct Scalar {
    /// `bytes` is a little-endian byte encoding of an integer
    /// representing a scalar modulo the group order.
    ///
    /// # Invariant
    ///
    /// The integer representing this scalar is less than \\( 2^{255} \\),
    /// and all scalars produced by arithmetic are fully reduced mod
    /// \\( \ell \\).  Unreduced scalars can only enter through
    /// `from_bits` and `from_bits_clamped`, whose outputs are suitable
    /// as exponents but should be `reduce`d before other arithmetic.
    pub(crate) bytes: [u8; 32],
}

impl Scalar {
    /// Construct a `Scalar` by reducing a 256-bit little-endian integer
    /// modulo the group order \\( \ell \\).
    pub fn from_bytes_mod_order(bytes: [u8; 32]) -> Scalar {
        // Temporarily allow s_unreduced.bytes > 2^255 ...
        let s_unreduced = Scalar { bytes };

        // Then reduce mod the group order and return the reduced representative.
        let s = s_unreduced.reduce();
        debug_assert!((s.bytes[31] >> 7) == 0u8);

        s
    }

    /// Construct a `Scalar` by reducing a 512-bit little-endian integer
    /// modulo the group order \\( \ell \\).
    pub fn from_bytes_mod_order_wide(input: &[u8; 64]) -> Scalar {
        Scalar52::from_bytes_wide(input).pack()
    }

    /// Attempt to construct a `Scalar` from a canonical byte representation.
    ///
    /// # Return
    ///
    /// - `Some(s)`, where `s` is the `Scalar` corresponding to `bytes`,
    ///   if `bytes` is a canonical byte representation;
    /// - `None` if `bytes` is not a canonical byte representation.
    pub fn from_canonical_bytes(bytes: [u8; 32]) -> Option<Scalar> {
        // Check that the high bit is not set
        if (bytes[31] >> 7) != 0u8 {
            return None;
        }
        let candidate = Scalar::from_bits(bytes);

        if candidate.is_canonical() {
            Some(candidate)
        } else {
            None
        }
    }

    /// Construct a `Scalar` from the low 255 bits of a 256-bit integer.
    ///
    /// This function is intended for applications like X25519 which
    /// require specific bit-patterns when performing scalar
    /// multiplication.
    pub const fn from_bits(bytes: [u8; 32]) -> Scalar {
        let mut s = Scalar { bytes };
        // Ensure invariant holds
        s.bytes[31] &= 0b0111_1111;

        s
    }

    /// Construct a `Scalar` from the given `bytes`, clamped as
    /// specified for X25519 and Ed25519 secret scalars: the low three
    /// bits and the high bit are cleared and the second-highest bit is
    /// set.
    ///
    /// The clamped scalar is a multiple of the cofactor less than
    /// \\( 2^{255} \\); it is *not* reduced mod \\( \ell \\).
    pub const fn from_bits_clamped(bytes: [u8; 32]) -> Scalar {
        let mut s = Scalar { bytes };
        s.bytes[0] &= 0b1111_1000;
        s.bytes[31] &= 0b0111_1111;
        s.bytes[31] |= 0b0100_0000;

        s
    }

    /// Return a `Scalar` chosen uniformly at random using a
    /// user-provided RNG.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
        let mut scalar_bytes = [0u8; 64];
        rng.fill_bytes(&mut scalar_bytes);
        Scalar::from_bytes_mod_order_wide(&scalar_bytes)
    }

    /// Hash a slice of bytes into a scalar.
    ///
    /// Takes a type parameter `D`, which is any `Digest` producing 64
    /// bytes (512 bits) of output.
    pub fn hash_from_bytes<D>(input: &[u8]) -> Scalar
    where
        D: Digest<OutputSize = U64>,
    {
        let mut hash = D::new();
        hash.update(input);
        Scalar::from_hash(hash)
    }

    /// Construct a scalar from an existing `Digest` instance.
    pub fn from_hash<D>(hash: D) -> Scalar
    where
        D: Digest<OutputSize = U64>,
    {
        let mut output = [0u8; 64];
        output.copy_from_slice(hash.finalize().as_slice());
        Scalar::from_bytes_mod_order_wide(&output)
    }

    /// Convert this `Scalar` to its underlying sequence of bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.bytes
    }

    /// View the little-endian byte encoding of the integer representing
    /// this `Scalar`.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Construct the scalar \\( 0 \\).
    pub fn zero() -> Self {
        Scalar { bytes: [0u8; 32] }
    }

    /// Construct the scalar \\( 1 \\).
    pub fn one() -> Self {
        Scalar {
            bytes: [
                1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
                0, 0, 0, 0, 0, 0,
            ],
        }
    }

    /// Compute `(a * b) + c` (mod \\( \ell \\)), without incurring the
    /// cost of two separate reductions.
    ///
    /// The inputs `a` and `b` may be unreduced; `c` must be reduced.
    pub fn multiply_add(a: &Scalar, b: &Scalar, c: &Scalar) -> Scalar {
        Scalar52::add(&Scalar52::mul(&a.unpack(), &b.unpack()), &c.unpack()).pack()
    }

    /// Reduce this `Scalar` modulo \\( \ell \\).
    pub fn reduce(&self) -> Scalar {
        self.unpack().reduce().pack()
    }

    /// Check whether this `Scalar` is the canonical representative mod
    /// \\( \ell \\).
    pub fn is_canonical(&self) -> bool {
        self.ct_eq(&self.reduce()).into()
    }

    /// Unpack this `Scalar` to five 52-bit limbs for arithmetic.
    pub(crate) fn unpack(&self) -> Scalar52 {
        Scalar52::from_bytes(&self.bytes)
    }

    /// Compute a width-\\( w \\) "Non-Adjacent Form" of this scalar.
    ///
    /// A width-\\( w \\) NAF of a positive integer \\( k \\) is an
    /// expression
    /// $$
    /// k = \sum_{i=0}\^m n\_i 2\^i,
    /// $$
    /// where each nonzero coefficient \\( n\_i \\) is odd and bounded
    /// by \\( |n\_i| < 2\^{w-1} \\), \\( n\_{m} \neq 0 \\), and at most
    /// one of any \\( w \\) consecutive coefficients is nonzero.
    /// (Hankerson, Menezes, Vanstone; def 3.32).
    ///
    /// Intuitively, this is like a binary expansion, except that we
    /// allow some coefficients to grow in magnitude up to
    /// \\( 2\^{w-1} \\) so that the nonzero coefficients are as sparse
    /// as possible.
    pub(crate) fn non_adjacent_form(&self, w: usize) -> [i8; 256] {
        // required by the NAF definition
        debug_assert!(w >= 2);
        // required so that the NAF digits fit in i8
        debug_assert!(w <= 8);

        let mut naf = [0i8; 256];

        let mut x_u64 = [0u64; 5];
        for i in 0..4 {
            let mut chunk = [0u8; 8];
            chunk.copy_from_slice(&self.bytes[i * 8..(i + 1) * 8]);
            x_u64[i] = u64::from_le_bytes(chunk);
        }

        let width = 1 << w;
        let window_mask = width - 1;

        let mut pos = 0;
        let mut carry = 0;
        while pos < 256 {
            // Construct a buffer of bits of the scalar, starting at bit `pos`
            let u64_idx = pos / 64;
            let bit_idx = pos % 64;
            let bit_buf: u64 = if bit_idx < 64 - w {
                // This window's bits are contained in a single u64
                x_u64[u64_idx] >> bit_idx
            } else {
                // Combine the current u64's bits with the bits from the next u64
                (x_u64[u64_idx] >> bit_idx) | (x_u64[1 + u64_idx] << (64 - bit_idx))
            };

            // Add the carry into the current window
            let window = carry + (bit_buf & window_mask);

            if window & 1 == 0 {
                // If the window value is even, preserve the carry and continue.
                // Why is the carry preserved?
                // If carry == 0 and window & 1 == 0, then the next carry should be 0
                // If carry == 1 and window & 1 == 0, then bit_buf & 1 == 1 so the next carry should be 1
                pos += 1;
                continue;
            }

            if window < width / 2 {
                carry = 0;
                naf[pos] = window as i8;
            } else {
                carry = 1;
                naf[pos] = (window as i8).wrapping_sub(width as i8);
            }

            pos += w;
        }

        naf
    }

    /// Write this scalar in radix 16, with coefficients in \\([-8,8)\\),
    /// i.e., compute \\(a\_i\\) such that
    /// $$
    ///    a = a\_0 + a\_1 16\^1 + \cdots + a_{63} 16\^{63},
    /// $$
    /// with \\(-8 \leq a_i < 8\\) for \\(0 \leq i < 63\\) and
    /// \\(-8 \leq a_{63} \leq 8\\).
    ///
    /// Precondition: `self[31] <= 127`.  This holds whenever `self` is
    /// reduced.
    pub(crate) fn as_radix_16(&self) -> [i8; 64] {
        debug_assert!(self[31] <= 127);
        let mut output = [0i8; 64];

        // Step 1: change radix.
        // Convert from radix 256 (bytes) to radix 16 (nibbles)
        #[inline(always)]
        fn bot_half(x: u8) -> u8 {
            x & 15
        }
        #[inline(always)]
        fn top_half(x: u8) -> u8 {
            (x >> 4) & 15
        }

        for i in 0..32 {
            output[2 * i] = bot_half(self[i]) as i8;
            output[2 * i + 1] = top_half(self[i]) as i8;
        }
        // Precondition note: since self[31] <= 127, output[63] <= 7

        // Step 2: recenter coefficients from [0,16) to [-8,8)
        for i in 0..63 {
            let carry = (output[i] + 8) >> 4;
            output[i] -= carry << 4;
            output[i + 1] += carry;
        }
        // Precondition note: output[63] is not recentered.  It
        // increases by carry <= 1.  Thus output[63] <= 8.

        output
    }

    /// Get the bits of the scalar, in little-endian order.
    pub(crate) fn bits(&self) -> [u8; 256] {
        let mut bits = [0u8; 256];
        for i in 0..256 {
            // As i runs from 0..256, the bottom 3 bits index the bit,
            // while the upper bits index the byte.
            bits[i] = (self.bytes[i >> 3] >> (i & 7)) & 1u8;
        }
        bits
    }
}

impl Debug for Scalar {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Scalar{{\n\tbytes: {:?},\n}}", &self.bytes)
    }
}

impl Eq for Scalar {}
impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.bytes.ct_eq(&other.bytes)
    }
}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut bytes = [0u8; 32];
        for i in 0..32 {
            bytes[i] = u8::conditional_select(&a.bytes[i], &b.bytes[i], choice);
        }
        Scalar { bytes }
    }
}

impl Index<usize> for Scalar {
    type Output = u8;

    /// Index the bytes of the representative for this `Scalar`.
    /// Mutation is not permitted.
    fn index(&self, _index: usize) -> &u8 {
        &(self.bytes[_index])
    }
}

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.bytes.zeroize();
    }
}

impl From<u64> for Scalar {
    fn from(x: u64) -> Scalar {
        let mut s_bytes = [0u8; 32];
        s_bytes[..8].copy_from_slice(&x.to_le_bytes());
        Scalar { bytes: s_bytes }
    }
}

impl<'a, 'b> Mul<&'b Scalar> for &'a Scalar {
    type Output = Scalar;
    fn mul(self, _rhs: &'b Scalar) -> Scalar {
        Scalar52::mul(&self.unpack(), &_rhs.unpack()).pack()
    }
}

define_mul_variants!(LHS = Scalar, RHS = Scalar, Output = Scalar);

impl<'b> MulAssign<&'b Scalar> for Scalar {
    fn mul_assign(&mut self, _rhs: &'b Scalar) {
        *self = &*self * _rhs;
    }
}

define_mul_assign_variants!(LHS = Scalar, RHS = Scalar);

impl<'a, 'b> Add<&'b Scalar> for &'a Scalar {
    type Output = Scalar;
    /// Compute `self + rhs` (mod \\( \ell \\)).  Both inputs must be
    /// reduced for the output to be reduced.
    fn add(self, _rhs: &'b Scalar) -> Scalar {
        Scalar52::add(&self.unpack(), &_rhs.unpack()).pack()
    }
}

define_add_variants!(LHS = Scalar, RHS = Scalar, Output = Scalar);

impl<'b> AddAssign<&'b Scalar> for Scalar {
    fn add_assign(&mut self, _rhs: &'b Scalar) {
        *self = &*self + _rhs;
    }
}

define_add_assign_variants!(LHS = Scalar, RHS = Scalar);

impl<'a, 'b> Sub<&'b Scalar> for &'a Scalar {
    type Output = Scalar;
    /// Compute `self - rhs` (mod \\( \ell \\)).  Both inputs must be
    /// reduced for the output to be reduced.
    fn sub(self, _rhs: &'b Scalar) -> Scalar {
        Scalar52::sub(&self.unpack(), &_rhs.unpack()).pack()
    }
}

define_sub_variants!(LHS = Scalar, RHS = Scalar, Output = Scalar);

impl<'b> SubAssign<&'b Scalar> for Scalar {
    fn sub_assign(&mut self, _rhs: &'b Scalar) {
        *self = &*self - _rhs;
    }
}

define_sub_assign_variants!(LHS = Scalar, RHS = Scalar);

impl<'a> Neg for &'a Scalar {
    type Output = Scalar;
    fn neg(self) -> Scalar {
        Scalar52::sub(&Scalar52::zero(), &self.unpack()).pack()
    }
}

impl Neg for Scalar {
    type Output = Scalar;
    fn neg(self) -> Scalar {
        -&self
    }
}

/// u64 * u64 = u128 multiply helper
#[inline(always)]
fn m(x: u64, y: u64) -> u128 {
    (x as u128) * (y as u128)
}

/// The `Scalar52` struct represents an element in
/// \\( \mathbb Z / \ell \\) as 5 \\( 52 \\)-bit limbs.
#[derive(Copy, Clone)]
pub(crate) struct Scalar52(pub(crate) [u64; 5]);

impl Debug for Scalar52 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Scalar52: {:?}", &self.0[..])
    }
}

impl Index<usize> for Scalar52 {
    type Output = u64;
    fn index(&self, _index: usize) -> &u64 {
        &(self.0[_index])
    }
}

impl IndexMut<usize> for Scalar52 {
    fn index_mut(&mut self, _index: usize) -> &mut u64 {
        &mut (self.0[_index])
    }
}

impl Scalar52 {
    /// Return the zero scalar
    pub fn zero() -> Scalar52 {
        Scalar52([0, 0, 0, 0, 0])
    }

    /// Unpack a 32 byte / 256 bit scalar into 5 52-bit limbs.
    pub fn from_bytes(bytes: &[u8; 32]) -> Scalar52 {
        let mut words = [0u64; 4];
        for i in 0..4 {
            for j in 0..8 {
                words[i] |= (bytes[(i * 8) + j] as u64) << (j * 8);
            }
        }

        let mask = (1u64 << 52) - 1;
        let top_mask = (1u64 << 48) - 1;
        let mut s = Scalar52::zero();

        s[0] =   words[0]                            & mask;
        s[1] = ((words[0] >> 52) | (words[1] << 12)) & mask;
        s[2] = ((words[1] >> 40) | (words[2] << 24)) & mask;
        s[3] = ((words[2] >> 28) | (words[3] << 36)) & mask;
        s[4] =  (words[3] >> 16)                     & top_mask;

        s
    }

    /// Reduce a 64 byte / 512 bit scalar mod \\( \ell \\).
    pub fn from_bytes_wide(bytes: &[u8; 64]) -> Scalar52 {
        let mut words = [0u64; 8];
        for i in 0..8 {
            for j in 0..8 {
                words[i] |= (bytes[(i * 8) + j] as u64) << (j * 8);
            }
        }

        // unpack into 10 52-bit limbs
        let mask = (1u64 << 52) - 1;
        let mut x = [0u64; 10];

        x[0] =   words[0]                            & mask;
        x[1] = ((words[0] >> 52) | (words[1] << 12)) & mask;
        x[2] = ((words[1] >> 40) | (words[2] << 24)) & mask;
        x[3] = ((words[2] >> 28) | (words[3] << 36)) & mask;
        x[4] = ((words[3] >> 16) | (words[4] << 48)) & mask;
        x[5] =  (words[4] >>  4)                     & mask;
        x[6] = ((words[4] >> 56) | (words[5] <<  8)) & mask;
        x[7] = ((words[5] >> 44) | (words[6] << 20)) & mask;
        x[8] = ((words[6] >> 32) | (words[7] << 32)) & mask;
        x[9] =   words[7] >> 20;

        Scalar52::barrett_reduce(&x)
    }

    /// Pack the limbs of this `Scalar52` into 32 bytes.
    pub fn as_bytes(&self) -> [u8; 32] {
        let mut s = [0u8; 32];

        s[0]  =  self.0[0]                            as u8;
        s[1]  = (self.0[0] >>  8)                     as u8;
        s[2]  = (self.0[0] >> 16)                     as u8;
        s[3]  = (self.0[0] >> 24)                     as u8;
        s[4]  = (self.0[0] >> 32)                     as u8;
        s[5]  = (self.0[0] >> 40)                     as u8;
        s[6]  = ((self.0[0] >> 48) | (self.0[1] << 4)) as u8;
        s[7]  = (self.0[1] >>  4)                     as u8;
        s[8]  = (self.0[1] >> 12)                     as u8;
        s[9]  = (self.0[1] >> 20)                     as u8;
        s[10] = (self.0[1] >> 28)                     as u8;
        s[11] = (self.0[1] >> 36)                     as u8;
        s[12] = (self.0[1] >> 44)                     as u8;
        s[13] =  self.0[2]                            as u8;
        s[14] = (self.0[2] >>  8)                     as u8;
        s[15] = (self.0[2] >> 16)                     as u8;
        s[16] = (self.0[2] >> 24)                     as u8;
        s[17] = (self.0[2] >> 32)                     as u8;
        s[18] = (self.0[2] >> 40)                     as u8;
        s[19] = ((self.0[2] >> 48) | (self.0[3] << 4)) as u8;
        s[20] = (self.0[3] >>  4)                     as u8;
        s[21] = (self.0[3] >> 12)                     as u8;
        s[22] = (self.0[3] >> 20)                     as u8;
        s[23] = (self.0[3] >> 28)                     as u8;
        s[24] = (self.0[3] >> 36)                     as u8;
        s[25] = (self.0[3] >> 44)                     as u8;
        s[26] =  self.0[4]                            as u8;
        s[27] = (self.0[4] >>  8)                     as u8;
        s[28] = (self.0[4] >> 16)                     as u8;
        s[29] = (self.0[4] >> 24)                     as u8;
        s[30] = (self.0[4] >> 32)                     as u8;
        s[31] = (self.0[4] >> 40)                     as u8;

        s
    }

    /// Pack this `Scalar52` back into a `Scalar`.
    pub fn pack(&self) -> Scalar {
        Scalar {
            bytes: self.as_bytes(),
        }
    }

    /// Compute `a + b` (mod \\( \ell \\)).
    pub fn add(a: &Scalar52, b: &Scalar52) -> Scalar52 {
        let mut sum = Scalar52::zero();
        let mask = (1u64 << 52) - 1;

        // a + b
        let mut carry: u64 = 0;
        for i in 0..5 {
            carry = a[i] + b[i] + (carry >> 52);
            sum[i] = carry & mask;
        }

        // subtract l if the sum is >= l
        Scalar52::sub(&sum, &constants::L)
    }

    /// Compute `a - b` (mod \\( \ell \\)).
    pub fn sub(a: &Scalar52, b: &Scalar52) -> Scalar52 {
        let mut difference = Scalar52::zero();
        let mask = (1u64 << 52) - 1;

        // a - b
        let mut borrow: u64 = 0;
        for i in 0..5 {
            borrow = a[i].wrapping_sub(b[i] + (borrow >> 63));
            difference[i] = borrow & mask;
        }

        // conditionally add l if the difference is negative
        let underflow_mask = ((borrow >> 63) ^ 1).wrapping_sub(1);
        let mut carry: u64 = 0;
        for i in 0..5 {
            carry = (carry >> 52) + difference[i] + (constants::L[i] & underflow_mask);
            difference[i] = carry & mask;
        }

        difference
    }

    /// Compute `a * b` as the 9-limb 128-bit column sums.
    #[inline(always)]
    pub(crate) fn mul_internal(a: &Scalar52, b: &Scalar52) -> [u128; 9] {
        let mut z = [0u128; 9];

        z[0] = m(a[0], b[0]);
        z[1] = m(a[0], b[1]) + m(a[1], b[0]);
        z[2] = m(a[0], b[2]) + m(a[1], b[1]) + m(a[2], b[0]);
        z[3] = m(a[0], b[3]) + m(a[1], b[2]) + m(a[2], b[1]) + m(a[3], b[0]);
        z[4] = m(a[0], b[4]) + m(a[1], b[3]) + m(a[2], b[2]) + m(a[3], b[1]) + m(a[4], b[0]);
        z[5] =                 m(a[1], b[4]) + m(a[2], b[3]) + m(a[3], b[2]) + m(a[4], b[1]);
        z[6] =                                 m(a[2], b[4]) + m(a[3], b[3]) + m(a[4], b[2]);
        z[7] =                                                 m(a[3], b[4]) + m(a[4], b[3]);
        z[8] =                                                                 m(a[4], b[4]);

        z
    }

    /// Carry a 9-limb 128-bit product into 10 52-bit words.
    #[inline(always)]
    fn carry_product(z: &[u128; 9]) -> [u64; 10] {
        let mask = (1u64 << 52) - 1;
        let mut w = [0u64; 10];

        let mut carry: u128 = 0;
        for i in 0..9 {
            carry += z[i];
            w[i] = (carry as u64) & mask;
            carry >>= 52;
        }
        w[9] = carry as u64;

        w
    }

    /// Compute `a * b` (mod \\( \ell \\)).
    pub fn mul(a: &Scalar52, b: &Scalar52) -> Scalar52 {
        Scalar52::barrett_reduce(&Scalar52::carry_product(&Scalar52::mul_internal(a, b)))
    }

    /// Reduce this `Scalar52` mod \\( \ell \\).
    pub fn reduce(&self) -> Scalar52 {
        let mut wide = [0u64; 10];
        wide[..5].copy_from_slice(&self.0);
        Scalar52::barrett_reduce(&wide)
    }

    /// Barrett reduction mod \\( \ell \\) of a value \\( x < 2^{512} \\)
    /// given as 10 52-bit limbs.
    ///
    /// With \\( \mu = \lfloor 2^{512} / \ell \rfloor \\) precomputed,
    /// the quotient estimate
    /// \\( q_3 = \lfloor (x \gg 248) \mu / 2^{264} \rfloor \\)
    /// satisfies \\( x/\ell - 3 < q_3 \leq x/\ell \\), so
    /// \\( r = x - q_3 \ell < 3\ell \\) fits in 260 bits and at most
    /// two conditional subtractions of \\( \ell \\) remain.
    pub(crate) fn barrett_reduce(x: &[u64; 10]) -> Scalar52 {
        let mask = (1u64 << 52) - 1;

        // x < 2^512
        debug_assert!(x[9] < (1 << 44));

        // q1 = x >> 248, in 6 limbs
        let mut q1 = [0u64; 6];
        for i in 0..5 {
            q1[i] = ((x[4 + i] >> 40) | (x[5 + i] << 12)) & mask;
        }
        q1[5] = x[9] >> 40;

        // q2 = q1 * mu
        let mu = &constants::MU;
        let mut q2 = [0u128; 11];
        for i in 0..6 {
            for j in 0..5 {
                q2[i + j] += m(q1[i], mu[j]);
            }
        }
        let mut q2w = [0u64; 11];
        let mut carry: u128 = 0;
        for i in 0..11 {
            carry += q2[i];
            q2w[i] = (carry as u64) & mask;
            carry >>= 52;
        }

        // q3 = q2 >> 264, in 5 limbs
        let mut q3 = [0u64; 5];
        for i in 0..5 {
            q3[i] = ((q2w[5 + i] >> 4) | (q2w[6 + i] << 48)) & mask;
        }

        // p = q3 * l mod 2^260
        let l = &constants::L;
        let mut q3l = [0u128; 5];
        for i in 0..5 {
            for j in 0..(5 - i) {
                q3l[i + j] += m(q3[i], l[j]);
            }
        }
        let mut p = [0u64; 5];
        let mut carry: u128 = 0;
        for i in 0..5 {
            carry += q3l[i];
            p[i] = (carry as u64) & mask;
            carry >>= 52;
        }

        // r = (x - p) mod 2^260.  The final borrow is a wraparound
        // mod 2^260 and is discarded, since 0 <= x - q3*l < 3*l as
        // integers.
        let mut r = Scalar52::zero();
        let mut borrow: u64 = 0;
        for i in 0..5 {
            borrow = x[i].wrapping_sub(p[i] + (borrow >> 63));
            r[i] = borrow & mask;
        }

        // at most two conditional subtractions bring r into [0, l)
        let r = Scalar52::sub(&r, l);
        Scalar52::sub(&r, l)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use num_bigint::BigUint;
    use proptest::prelude::*;

    /// x = 2238329342913194256032495932344128051776374960164957527413114840482143558222
    static X: Scalar = Scalar {
        bytes: [
            0x4e, 0x5a, 0xb4, 0x34, 0x5d, 0x47, 0x08, 0x84,
            0x59, 0x13, 0xb4, 0x64, 0x1b, 0xc2, 0x7d, 0x52,
            0x52, 0xa5, 0x85, 0x10, 0x1b, 0xcc, 0x42, 0x44,
            0xd4, 0x49, 0xf4, 0xa8, 0x79, 0xd9, 0xf2, 0x04,
        ],
    };
    /// y = 2592331292931086675770238855846338635550719849568364935475441891787804997264
    static Y: Scalar = Scalar {
        bytes: [
            0x90, 0x76, 0x33, 0xfe, 0x1c, 0x4b, 0x66, 0xa4,
            0xa2, 0x8d, 0x2d, 0xd7, 0x67, 0x83, 0x86, 0xc3,
            0x53, 0xd0, 0xde, 0x54, 0x55, 0xd4, 0xfc, 0x9d,
            0xe8, 0xef, 0x7a, 0xc3, 0x1f, 0x35, 0xbb, 0x05,
        ],
    };
    /// z = 5033871415930814945849241457262266927579821285980625165479289807629491019013
    static Z: Scalar = Scalar {
        bytes: [
            0x05, 0x9d, 0x3e, 0x0b, 0x09, 0x26, 0x50, 0x3d,
            0xa3, 0x84, 0xa1, 0x3c, 0x92, 0x7a, 0xc2, 0x06,
            0x41, 0x98, 0xcf, 0x34, 0x3a, 0x24, 0xd5, 0xb7,
            0xeb, 0x33, 0x6a, 0x2d, 0xfc, 0x11, 0x21, 0x0b,
        ],
    };
    /// w = x*y + z mod l
    ///   = 3486911242272497535104403593250518247409663771668155364040899665266216860804
    static W: Scalar = Scalar {
        bytes: [
            0x84, 0xfc, 0xbc, 0x4f, 0x78, 0x12, 0xa0, 0x06,
            0xd7, 0x91, 0xd9, 0x7a, 0x3a, 0x27, 0xdd, 0x1e,
            0x21, 0x43, 0x45, 0xf7, 0xb1, 0xb9, 0x56, 0x7a,
            0x81, 0x30, 0x73, 0x44, 0x96, 0x85, 0xb5, 0x07,
        ],
    };

    /// x*y = 5690045403673944803228348699031245560686958845067437804563560795922180092780
    static X_TIMES_Y: Scalar = Scalar {
        bytes: [
            0x6c, 0x33, 0x74, 0xa1, 0x89, 0x4f, 0x62, 0x21,
            0x0a, 0xaa, 0x2f, 0xe1, 0x86, 0xa6, 0xf9, 0x2c,
            0xe0, 0xaa, 0x75, 0xc2, 0x77, 0x95, 0x81, 0xc2,
            0x95, 0xfc, 0x08, 0x17, 0x9a, 0x73, 0x94, 0x0c,
        ],
    };

    static A_SCALAR: Scalar = Scalar {
        bytes: [
            0x1a, 0x0e, 0x97, 0x8a, 0x90, 0xf6, 0x62, 0x2d,
            0x37, 0x47, 0x02, 0x3f, 0x8a, 0xd8, 0x26, 0x4d,
            0xa7, 0x58, 0xaa, 0x1b, 0x88, 0xe0, 0x40, 0xd1,
            0x58, 0x9e, 0x7b, 0x7f, 0x23, 0x76, 0xef, 0x09,
        ],
    };

    static A_NAF: [i8; 256] = [
        0, 13, 0, 0, 0, 0, 0, 0, 0, 7, 0, 0, 0, 0, 0, 0, -9, 0, 0, 0, 0, -11, 0, 0, 0, 0, 3,
        0, 0, 0, 0, 1, 0, 0, 0, 0, 9, 0, 0, 0, 0, -5, 0, 0, 0, 0, 0, 0, 3, 0, 0, 0, 0, 11, 0,
        0, 0, 0, 11, 0, 0, 0, 0, 0, -9, 0, 0, 0, 0, 0, -3, 0, 0, 0, 0, 9, 0, 0, 0, 0, 0, 1, 0,
        0, 0, 0, 0, 0, -1, 0, 0, 0, 0, 0, 9, 0, 0, 0, 0, -15, 0, 0, 0, 0, -7, 0, 0, 0, 0, -9,
        0, 0, 0, 0, 0, 5, 0, 0, 0, 0, 13, 0, 0, 0, 0, 0, -3, 0, 0, 0, 0, -11, 0, 0, 0, 0, -7,
        0, 0, 0, 0, -13, 0, 0, 0, 0, 11, 0, 0, 0, 0, -9, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, -15,
        0, 0, 0, 0, 1, 0, 0, 0, 0, 7, 0, 0, 0, 0, 0, 0, 0, 0, 5, 0, 0, 0, 0, 0, 13, 0, 0, 0,
        0, 0, 0, 11, 0, 0, 0, 0, 0, 15, 0, 0, 0, 0, 0, -9, 0, 0, 0, 0, 0, 0, 0, -1, 0, 0, 0,
        0, 0, 0, 0, 7, 0, 0, 0, 0, 0, -15, 0, 0, 0, 0, 0, 15, 0, 0, 0, 0, 15, 0, 0, 0, 0, 15,
        0, 0, 0, 0, 0, 1, 0, 0, 0, 0,
    ];

    /// x = 2^253-1 = 14474011154664524427946373126085988481658748083205070504932198000989141204991
    static X52: Scalar52 = Scalar52([
        0x000fffffffffffff,
        0x000fffffffffffff,
        0x000fffffffffffff,
        0x000fffffffffffff,
        0x00001fffffffffff,
    ]);

    /// x^2 mod l in 52-bit limbs
    static XX52: Scalar52 = Scalar52([
        0x0001668020217559,
        0x000531640ffd0ec0,
        0x00085fd6f9f38a31,
        0x000c268f73bb1cf4,
        0x000006ce65046df0,
    ]);

    /// y = 6145104759870991071742105800796537629880401874866217824609283457819451087098
    static Y52: Scalar52 = Scalar52([
        0x000b75071e1458fa,
        0x000bf9d75e1ecdac,
        0x000433d2baf0672b,
        0x0005fffcc11fad13,
        0x00000d96018bb825,
    ]);

    /// x*y mod l in 52-bit limbs
    static XY52: Scalar52 = Scalar52([
        0x000ee6d76ba7632d,
        0x000ed50d71d84e02,
        0x00000000001ba634,
        0x0000000000000000,
        0x0000000000000000,
    ]);

    /// a = 2351415481556538453565687241381346850503301111251034509157382222617560148090
    static A52: Scalar52 = Scalar52([
        0x0005236c07b3be89,
        0x0001bc3d2a67c0c4,
        0x000a4aa782aae3ee,
        0x0006b3f6e4fec4c4,
        0x00000532da9fab8c,
    ]);

    /// b = 4885590095775723760407499321843594317911456947580037491039278279440296187236
    static B52: Scalar52 = Scalar52([
        0x000d3fae55421564,
        0x000c2df24f65a4bc,
        0x0005b5587d69fb0b,
        0x00094c091b013b3b,
        0x00000acd25605473,
    ]);

    /// a-b mod l
    static AB52: Scalar52 = Scalar52([
        0x000a46d80f677d12,
        0x0003787a54cf8188,
        0x0004954f0555c7dc,
        0x000d67edc9fd8989,
        0x00000a65b53f5718,
    ]);

    /// c = (2^512 - 1) mod l
    static C52: Scalar52 = Scalar52([
        0x000611e3449c0f00,
        0x000a768859347a40,
        0x0007f5be65d00e1b,
        0x0009a3dceec73d21,
        0x00000399411b7c30,
    ]);

    #[test]
    fn mul_max() {
        let res = Scalar52::mul(&X52, &X52);
        for i in 0..5 {
            assert!(res[i] == XX52[i]);
        }
    }

    #[test]
    fn mul() {
        let res = Scalar52::mul(&X52, &Y52);
        for i in 0..5 {
            assert!(res[i] == XY52[i]);
        }
    }

    #[test]
    fn add() {
        let res = Scalar52::add(&A52, &B52);
        let zero = Scalar52::zero();
        for i in 0..5 {
            assert!(res[i] == zero[i]);
        }
    }

    #[test]
    fn sub() {
        let res = Scalar52::sub(&A52, &B52);
        for i in 0..5 {
            assert!(res[i] == AB52[i]);
        }
    }

    #[test]
    fn from_bytes_wide_max() {
        let bignum = [255u8; 64]; // 2^512 - 1
        let reduced = Scalar52::from_bytes_wide(&bignum);
        for i in 0..5 {
            assert!(reduced[i] == C52[i]);
        }
    }

    #[test]
    fn scalar_unpack_pack_round_trips() {
        let a = A_SCALAR.unpack().pack();
        assert_eq!(a, A_SCALAR);
    }

    #[test]
    fn scalar_multiply_by_one() {
        let test_scalar = Scalar::multiply_add(&X, &Scalar::one(), &Scalar::zero());
        assert_eq!(test_scalar, X);
    }

    #[test]
    fn scalar_multiply_only() {
        let test_scalar = Scalar::multiply_add(&X, &Y, &Scalar::zero());
        assert_eq!(test_scalar, X_TIMES_Y);
    }

    #[test]
    fn scalar_multiply_add() {
        let test_scalar = Scalar::multiply_add(&X, &Y, &Z);
        assert_eq!(test_scalar, W);
    }

    #[test]
    fn scalar_reduce() {
        let mut bignum = [0u8; 64];
        // set bignum = x + 2^256x
        for i in 0..32 {
            bignum[i] = X[i];
            bignum[32 + i] = X[i];
        }
        // 3958878930004874126169954872055634648693766179881526445624823978500314864344
        // = x + 2^256x (mod l)
        let expected = Scalar {
            bytes: [
                216, 154, 179, 139, 210, 121, 2, 71,
                69, 99, 158, 216, 23, 173, 63, 100,
                204, 0, 91, 50, 219, 153, 57, 249,
                28, 82, 31, 197, 100, 165, 192, 8,
            ],
        };
        let reduced = Scalar::from_bytes_mod_order_wide(&bignum);
        assert_eq!(reduced, expected);
    }

    #[test]
    fn hash_from_bytes_matches_from_hash() {
        use sha2::{Digest, Sha512};

        let input = b"derive a scalar from arbitrary bytes";
        let s1 = Scalar::hash_from_bytes::<Sha512>(input);
        let s2 = Scalar::from_hash(Sha512::new().chain_update(input));

        let mut wide = [0u8; 64];
        wide.copy_from_slice(&Sha512::digest(input));
        let s3 = Scalar::from_bytes_mod_order_wide(&wide);

        assert_eq!(s1, s2);
        assert_eq!(s1, s3);
    }

    #[test]
    fn non_adjacent_form_test_vector() {
        let naf = A_SCALAR.non_adjacent_form(5);
        for i in 0..256 {
            assert_eq!(naf[i], A_NAF[i]);
        }
    }

    fn non_adjacent_form_iter(w: usize, x: &Scalar) {
        let naf = x.non_adjacent_form(w);

        // Reconstruct the scalar from the computed NAF
        let mut y = Scalar::zero();
        for i in (0..256).rev() {
            y += y;
            let digit = if naf[i] < 0 {
                -Scalar::from((-naf[i]) as u64)
            } else {
                Scalar::from(naf[i] as u64)
            };
            y += digit;
        }

        assert_eq!(*x, y);
    }

    #[test]
    fn non_adjacent_form_random() {
        let mut rng = rand::thread_rng();
        for _ in 0..10 {
            let x = Scalar::random(&mut rng);
            for w in &[5, 6, 7, 8] {
                non_adjacent_form_iter(*w, &x);
            }
        }
    }

    #[test]
    fn as_radix_16_reconstructs_scalar() {
        let digits = A_SCALAR.as_radix_16();
        for digit in digits.iter() {
            assert!(*digit >= -8 && *digit <= 8);
        }
        let mut recomputed = BigUint::from(0u8);
        let sixteen = BigUint::from(16u8);
        for i in (0..64).rev() {
            recomputed = &recomputed * &sixteen;
            if digits[i] < 0 {
                recomputed -= BigUint::from((-digits[i]) as u8);
            } else {
                recomputed += BigUint::from(digits[i] as u8);
            }
        }
        assert_eq!(recomputed, BigUint::from_bytes_le(A_SCALAR.as_bytes()));
    }

    #[test]
    fn from_bits_clamped_is_clamped() {
        let s = Scalar::from_bits_clamped([0xff; 32]);
        assert_eq!(s[0] & 0b0000_0111, 0);
        assert_eq!(s[31] & 0b1000_0000, 0);
        assert_eq!(s[31] & 0b0100_0000, 0b0100_0000);
    }

    /// The order of the group, l, in canonical bytes.
    static L_BYTES: [u8; 32] = [
        0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58,
        0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9, 0xde, 0x14,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10,
    ];

    #[test]
    fn canonical_decoding() {
        // l is non-canonical (it reduces to zero)
        assert!(Scalar::from_canonical_bytes(L_BYTES).is_none());

        // l - 1 is canonical
        let mut l_minus_one = L_BYTES;
        l_minus_one[0] -= 1;
        assert!(Scalar::from_canonical_bytes(l_minus_one).is_some());

        // l + 1 (with the high bit clear) is non-canonical
        let mut l_plus_one = L_BYTES;
        l_plus_one[0] += 1;
        assert!(Scalar::from_canonical_bytes(l_plus_one).is_none());

        // anything with the high bit set is rejected outright
        let mut high_bit = [0u8; 32];
        high_bit[31] = 0x80;
        assert!(Scalar::from_canonical_bytes(high_bit).is_none());
    }

    #[test]
    fn from_bytes_mod_order_of_l_is_zero() {
        assert_eq!(Scalar::from_bytes_mod_order(L_BYTES), Scalar::zero());
    }

    fn ell() -> BigUint {
        (BigUint::from(1u8) << 252) + BigUint::from(27742317777372353535851937790883648493u128)
    }

    fn to_bigint(s: &Scalar) -> BigUint {
        BigUint::from_bytes_le(s.as_bytes())
    }

    proptest! {
        #[test]
        fn mul_matches_bigint_reference(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
            let sa = Scalar::from_bytes_mod_order(a);
            let sb = Scalar::from_bytes_mod_order(b);
            let expected = (to_bigint(&sa) * to_bigint(&sb)) % ell();
            prop_assert_eq!(to_bigint(&(&sa * &sb)), expected);
        }

        #[test]
        fn add_sub_match_bigint_reference(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
            let sa = Scalar::from_bytes_mod_order(a);
            let sb = Scalar::from_bytes_mod_order(b);
            prop_assert_eq!(
                to_bigint(&(&sa + &sb)),
                (to_bigint(&sa) + to_bigint(&sb)) % ell()
            );
            prop_assert_eq!(
                to_bigint(&(&sa - &sb)),
                ((to_bigint(&sa) + ell()) - to_bigint(&sb)) % ell()
            );
        }

        #[test]
        fn wide_reduction_matches_bigint_reference(bytes in any::<[u8; 64]>()) {
            let s = Scalar::from_bytes_mod_order_wide(&bytes);
            prop_assert_eq!(to_bigint(&s), BigUint::from_bytes_le(&bytes) % ell());
        }
    }
}

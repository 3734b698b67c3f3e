// -*- mode: rust; -*-
//
// This file is part of twist25519.
// See LICENSE for licensing information.

//! Group operations for Curve25519, in twisted Edwards form.
//!
//! ## Encoding and Decoding
//!
//! Encoding is done by converting to and from a `CompressedEdwardsY`
//! struct, a 32-byte representation holding the \\(y\\)-coordinate and
//! the sign of the \\(x\\)-coordinate in the top bit.
//!
//! Decompression rejects encodings whose \\(y\\)-coordinate is not the
//! canonical field-element representative, encodings whose
//! \\(y\\)-coordinate does not correspond to a curve point, and the
//! encoding which demands a "negative zero" \\(x\\)-coordinate.
//!
//! ## Scalar Multiplication
//!
//! Scalar multiplication on Edwards points is provided by:
//!
//! * the `*` operator between a `Scalar` and an `EdwardsPoint`, which
//!   performs constant-time variable-base scalar multiplication;
//!
//! * the `*` operator between a `Scalar` and an
//!   `EdwardsBasepointTable`, which performs constant-time fixed-base
//!   scalar multiplication;
//!
//! * `EdwardsPoint::vartime_double_scalar_mul_basepoint`, which
//!   computes \\( aA + bB \\) in variable time for public inputs, as
//!   used in signature verification.

#![allow(non_snake_case)]

use core::cmp::Ordering;
use core::fmt::Debug;
use core::ops::Neg;
use core::ops::{Add, AddAssign};
use core::ops::{Mul, MulAssign};
use core::ops::{Sub, SubAssign};

use subtle::Choice;
use subtle::ConditionallyNegatable;
use subtle::ConditionallySelectable;
use subtle::ConstantTimeEq;

use crate::constants;
use crate::curve_models::{
    AffineNielsPoint, CompletedPoint, ProjectiveNielsPoint, ProjectivePoint,
};
use crate::field::FieldElement;
use crate::montgomery::MontgomeryPoint;
use crate::scalar::Scalar;
use crate::traits::{Identity, IsIdentity};
use crate::window::{LookupTable, NafLookupTable5};

// ------------------------------------------------------------------------
// Compressed points
// ------------------------------------------------------------------------

/// In "Edwards y" / "Ed25519" format, the curve point \\((x,y)\\) is
/// determined by the \\(y\\)-coordinate and the sign of \\(x\\).
///
/// The first 255 bits of a `CompressedEdwardsY` represent the
/// \\(y\\)-coordinate.  The high bit of the 32nd byte gives the sign of
/// \\(x\\).
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct CompressedEdwardsY(pub [u8; 32]);

impl Debug for CompressedEdwardsY {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "CompressedEdwardsY: {:?}", self.as_bytes())
    }
}

impl ConstantTimeEq for CompressedEdwardsY {
    fn ct_eq(&self, other: &CompressedEdwardsY) -> Choice {
        self.as_bytes().ct_eq(other.as_bytes())
    }
}

impl Identity for CompressedEdwardsY {
    fn identity() -> CompressedEdwardsY {
        CompressedEdwardsY([
            1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            0, 0, 0, 0, 0,
        ])
    }
}

impl CompressedEdwardsY {
    /// View this `CompressedEdwardsY` as an array of bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Copy this `CompressedEdwardsY` to an array of bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Attempt to decompress to an `EdwardsPoint`.
    ///
    /// Returns `None`:
    ///
    /// - if the \\(y\\)-coordinate is not the canonical representative
    ///   of its residue class;
    /// - if the \\(y\\)-coordinate does not correspond to a point on
    ///   the curve;
    /// - if the encoding requires the negative of a zero
    ///   \\(x\\)-coordinate.
    pub fn decompress(&self) -> Option<EdwardsPoint> {
        let (point, is_valid) = self.decompress_with_validity();
        if is_valid.into() {
            Some(point)
        } else {
            None
        }
    }

    /// Decompress, always producing a well-formed group element along
    /// with a validity bit.
    ///
    /// If the encoding was invalid, the returned point is the identity
    /// and the `Choice` is zero.  This shape lets callers which must
    /// not branch early (such as signature verification) continue to
    /// completion and fold the validity bit into their final result.
    pub(crate) fn decompress_with_validity(&self) -> (EdwardsPoint, Choice) {
        let Y = FieldElement::from_bytes(self.as_bytes());
        let Z = FieldElement::one();
        let YY = Y.square();
        let u = &YY - &Z; //  u =  y²-1
        let v = &(&YY * &constants::EDWARDS_D) + &Z; //  v = dy²+1
        let (is_valid_y_coord, mut X) = FieldElement::sqrt_ratio_i(&u, &v);

        let compressed_sign_bit = Choice::from(self.as_bytes()[31] >> 7);

        // The y-coordinate must be the canonical representative:
        // re-encoding it must reproduce the input, sign bit aside.
        let mut y_bytes = self.0;
        y_bytes[31] &= 0b0111_1111;
        let is_canonical_y = Y.to_bytes().ct_eq(&y_bytes);

        // Reject an encoding which demands the negative of x = 0.
        let is_minus_zero = X.is_zero() & compressed_sign_bit;

        // sqrt_ratio_i returns the nonnegative square root; flip its
        // sign to match the compressed sign bit.
        X.conditional_negate(compressed_sign_bit);

        let point = EdwardsPoint {
            X,
            Y,
            Z,
            T: &X * &Y,
        };

        let is_valid = is_valid_y_coord & is_canonical_y & !is_minus_zero;
        let point = EdwardsPoint::conditional_select(&EdwardsPoint::identity(), &point, is_valid);

        (point, is_valid)
    }
}

// ------------------------------------------------------------------------
// Extended points
// ------------------------------------------------------------------------

/// An `EdwardsPoint` represents a point on the Edwards form of
/// Curve25519, in extended twisted Edwards coordinates \\((X:Y:Z:T)\\)
/// with \\(x = X/Z\\), \\(y = Y/Z\\), \\(xy = T/Z\\).
#[derive(Copy, Clone)]
pub struct EdwardsPoint {
    pub(crate) X: FieldElement,
    pub(crate) Y: FieldElement,
    pub(crate) Z: FieldElement,
    pub(crate) T: FieldElement,
}

impl Identity for EdwardsPoint {
    fn identity() -> EdwardsPoint {
        EdwardsPoint {
            X: FieldElement::zero(),
            Y: FieldElement::one(),
            Z: FieldElement::one(),
            T: FieldElement::zero(),
        }
    }
}

impl Default for EdwardsPoint {
    fn default() -> EdwardsPoint {
        EdwardsPoint::identity()
    }
}

impl ConstantTimeEq for EdwardsPoint {
    fn ct_eq(&self, other: &EdwardsPoint) -> Choice {
        // We would like to check that the point (X/Z, Y/Z) is equal to
        // the point (X'/Z', Y'/Z') without converting into affine
        // coordinates (x, y) and (x', y'), which requires two inversions.
        // We have that X = xZ and X' = x'Z'. Thus, x = x' is equivalent to
        // (xZ)Z' = (x'Z')Z, and similarly for the y-coordinate.
        (&self.X * &other.Z).ct_eq(&(&other.X * &self.Z))
            & (&self.Y * &other.Z).ct_eq(&(&other.Y * &self.Z))
    }
}

impl PartialEq for EdwardsPoint {
    fn eq(&self, other: &EdwardsPoint) -> bool {
        self.ct_eq(other).into()
    }
}
impl Eq for EdwardsPoint {}

impl ConditionallySelectable for EdwardsPoint {
    fn conditional_select(a: &EdwardsPoint, b: &EdwardsPoint, choice: Choice) -> EdwardsPoint {
        EdwardsPoint {
            X: FieldElement::conditional_select(&a.X, &b.X, choice),
            Y: FieldElement::conditional_select(&a.Y, &b.Y, choice),
            Z: FieldElement::conditional_select(&a.Z, &b.Z, choice),
            T: FieldElement::conditional_select(&a.T, &b.T, choice),
        }
    }
}

impl Debug for EdwardsPoint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "EdwardsPoint{{\n\tX: {:?},\n\tY: {:?},\n\tZ: {:?},\n\tT: {:?}\n}}",
            &self.X, &self.Y, &self.Z, &self.T
        )
    }
}

// ------------------------------------------------------------------------
// Point conversions
// ------------------------------------------------------------------------

impl EdwardsPoint {
    /// Convert to a `ProjectiveNielsPoint`.
    pub(crate) fn to_projective_niels(&self) -> ProjectiveNielsPoint {
        ProjectiveNielsPoint {
            Y_plus_X: &self.Y + &self.X,
            Y_minus_X: &self.Y - &self.X,
            Z: self.Z,
            T2d: &self.T * &constants::EDWARDS_D2,
        }
    }

    /// Convert the representation of this point from extended
    /// coordinates to projective coordinates.
    ///
    /// Free.
    pub(crate) fn to_projective(&self) -> ProjectivePoint {
        ProjectivePoint {
            X: self.X,
            Y: self.Y,
            Z: self.Z,
        }
    }

    /// Dehomogenize to an `AffineNielsPoint`.
    pub(crate) fn to_affine_niels(&self) -> AffineNielsPoint {
        let recip = self.Z.invert();
        let x = &self.X * &recip;
        let y = &self.Y * &recip;
        let xy2d = &(&x * &y) * &constants::EDWARDS_D2;
        AffineNielsPoint {
            y_plus_x: &y + &x,
            y_minus_x: &y - &x,
            xy2d,
        }
    }

    /// Convert this `EdwardsPoint` on the Edwards model to the
    /// corresponding `MontgomeryPoint` on the Montgomery model.
    ///
    /// Note that this is a one-way conversion, since the Montgomery
    /// model does not retain sign information.
    pub fn to_montgomery(&self) -> MontgomeryPoint {
        // We have u = (1+y)/(1-y) = (Z+Y)/(Z-Y).
        //
        // The denominator is zero only when y=1, the identity point of
        // the Edwards curve.  Since 0.invert() = 0, in this case we
        // compute the 2-torsion point (0,0).
        let U = &self.Z + &self.Y;
        let W = &self.Z - &self.Y;
        let u = &U * &W.invert();
        MontgomeryPoint(u.to_bytes())
    }

    /// Compress this point to `CompressedEdwardsY` format.
    pub fn compress(&self) -> CompressedEdwardsY {
        let recip = self.Z.invert();
        let x = &self.X * &recip;
        let y = &self.Y * &recip;
        let mut s: [u8; 32];

        s = y.to_bytes();
        s[31] ^= x.is_negative().unwrap_u8() << 7;
        CompressedEdwardsY(s)
    }
}

// ------------------------------------------------------------------------
// Doubling
// ------------------------------------------------------------------------

impl EdwardsPoint {
    /// Add this point to itself.
    pub(crate) fn double(&self) -> EdwardsPoint {
        self.to_projective().double().to_extended()
    }
}

// ------------------------------------------------------------------------
// Addition and Subtraction
// ------------------------------------------------------------------------

impl<'a, 'b> Add<&'b EdwardsPoint> for &'a EdwardsPoint {
    type Output = EdwardsPoint;
    fn add(self, other: &'b EdwardsPoint) -> EdwardsPoint {
        (self + &other.to_projective_niels()).to_extended()
    }
}

define_add_variants!(LHS = EdwardsPoint, RHS = EdwardsPoint, Output = EdwardsPoint);

impl<'b> AddAssign<&'b EdwardsPoint> for EdwardsPoint {
    fn add_assign(&mut self, _rhs: &'b EdwardsPoint) {
        *self = (self as &EdwardsPoint) + _rhs;
    }
}

define_add_assign_variants!(LHS = EdwardsPoint, RHS = EdwardsPoint);

impl<'a, 'b> Sub<&'b EdwardsPoint> for &'a EdwardsPoint {
    type Output = EdwardsPoint;
    fn sub(self, other: &'b EdwardsPoint) -> EdwardsPoint {
        (self - &other.to_projective_niels()).to_extended()
    }
}

define_sub_variants!(LHS = EdwardsPoint, RHS = EdwardsPoint, Output = EdwardsPoint);

impl<'b> SubAssign<&'b EdwardsPoint> for EdwardsPoint {
    fn sub_assign(&mut self, _rhs: &'b EdwardsPoint) {
        *self = (self as &EdwardsPoint) - _rhs;
    }
}

define_sub_assign_variants!(LHS = EdwardsPoint, RHS = EdwardsPoint);

// ------------------------------------------------------------------------
// Negation
// ------------------------------------------------------------------------

impl<'a> Neg for &'a EdwardsPoint {
    type Output = EdwardsPoint;

    fn neg(self) -> EdwardsPoint {
        EdwardsPoint {
            X: -(&self.X),
            Y: self.Y,
            Z: self.Z,
            T: -(&self.T),
        }
    }
}

impl Neg for EdwardsPoint {
    type Output = EdwardsPoint;

    fn neg(self) -> EdwardsPoint {
        -&self
    }
}

// ------------------------------------------------------------------------
// Scalar multiplication
// ------------------------------------------------------------------------

impl<'a, 'b> Mul<&'b Scalar> for &'a EdwardsPoint {
    type Output = EdwardsPoint;
    /// Scalar multiplication: compute `scalar * self`.
    ///
    /// For scalar multiplication of a basepoint,
    /// `EdwardsBasepointTable` is approximately 4x faster.
    fn mul(self, scalar: &'b Scalar) -> EdwardsPoint {
        // Construct a lookup table of [P,2P,3P,4P,5P,6P,7P,8P]
        let lookup_table = LookupTable::<ProjectiveNielsPoint>::from(self);
        // Setting s = scalar, compute
        //
        //    s = s_0 + s_1*16^1 + ... + s_63*16^63,
        //
        // with `-8 ≤ s_i < 8` for `0 ≤ i < 63` and `-8 ≤ s_63 ≤ 8`.
        let scalar_digits = scalar.as_radix_16();
        // Compute s*P as
        //
        //    s*P = P*(s_0 +   s_1*16^1 +   s_2*16^2 + ... +   s_63*16^63)
        //    s*P =  P*s_0 + P*s_1*16^1 + P*s_2*16^2 + ... + P*s_63*16^63
        //    s*P = P*s_0 + 16*(P*s_1 + 16*(P*s_2 + 16*( ... + P*s_63)...))
        //
        // We sum right-to-left.

        // Unwrap first loop iteration to save computing 16*identity
        let mut tmp2;
        let mut tmp3 = EdwardsPoint::identity();
        let mut tmp1 = &tmp3 + &lookup_table.select(scalar_digits[63]);
        // Now tmp1 = s_63*P in P1xP1 coords
        for i in (0..63).rev() {
            tmp2 = tmp1.to_projective(); // tmp2 =    (prev) in P2 coords
            tmp1 = tmp2.double(); // tmp1 =  2*(prev) in P1xP1 coords
            tmp2 = tmp1.to_projective(); // tmp2 =  2*(prev) in P2 coords
            tmp1 = tmp2.double(); // tmp1 =  4*(prev) in P1xP1 coords
            tmp2 = tmp1.to_projective(); // tmp2 =  4*(prev) in P2 coords
            tmp1 = tmp2.double(); // tmp1 =  8*(prev) in P1xP1 coords
            tmp2 = tmp1.to_projective(); // tmp2 =  8*(prev) in P2 coords
            tmp1 = tmp2.double(); // tmp1 = 16*(prev) in P1xP1 coords
            tmp3 = tmp1.to_extended(); // tmp3 = 16*(prev) in P3 coords
            tmp1 = &tmp3 + &lookup_table.select(scalar_digits[i]);
            // Now tmp1 = s_i*P + 16*(prev) in P1xP1 coords
        }
        tmp1.to_extended()
    }
}

define_mul_variants!(LHS = EdwardsPoint, RHS = Scalar, Output = EdwardsPoint);

impl<'a, 'b> Mul<&'b EdwardsPoint> for &'a Scalar {
    type Output = EdwardsPoint;

    /// Scalar multiplication: compute `scalar * point`.
    fn mul(self, point: &'b EdwardsPoint) -> EdwardsPoint {
        point * self
    }
}

define_mul_variants!(LHS = Scalar, RHS = EdwardsPoint, Output = EdwardsPoint);

impl<'b> MulAssign<&'b Scalar> for EdwardsPoint {
    fn mul_assign(&mut self, scalar: &'b Scalar) {
        *self = (self as &EdwardsPoint) * scalar;
    }
}

define_mul_assign_variants!(LHS = EdwardsPoint, RHS = Scalar);

impl EdwardsPoint {
    /// Compute \\( aA + bB \\) in variable time, where \\(B\\) is the
    /// Ed25519 basepoint.
    ///
    /// All inputs must be public: the sliding-window evaluation
    /// branches on the digits of both scalars, and the odd-multiples
    /// table for \\(A\\) is indexed directly.
    pub fn vartime_double_scalar_mul_basepoint(
        a: &Scalar,
        A: &EdwardsPoint,
        b: &Scalar,
    ) -> EdwardsPoint {
        let a_naf = a.non_adjacent_form(5);
        let b_naf = b.non_adjacent_form(5);

        // Find the starting index: the position of the highest nonzero
        // digit of either scalar.
        let mut i: usize = 255;
        for j in (0..256).rev() {
            i = j;
            if a_naf[i] != 0 || b_naf[i] != 0 {
                break;
            }
        }

        let table_A = NafLookupTable5::<ProjectiveNielsPoint>::from(A);
        let table_B = &constants::AFFINE_ODD_MULTIPLES_OF_BASEPOINT;

        let mut r = ProjectivePoint::identity();
        loop {
            // Shared doubling, then at most one addition from each
            // table.  When both digits are nonzero at the same
            // position, both additions are applied.
            let mut t = r.double();

            match a_naf[i].cmp(&0) {
                Ordering::Greater => {
                    t = &t.to_extended() + &table_A.select(a_naf[i] as usize);
                }
                Ordering::Less => {
                    t = &t.to_extended() - &table_A.select(-a_naf[i] as usize);
                }
                Ordering::Equal => {}
            }

            match b_naf[i].cmp(&0) {
                Ordering::Greater => {
                    t = &t.to_extended() + &table_B.select(b_naf[i] as usize);
                }
                Ordering::Less => {
                    t = &t.to_extended() - &table_B.select(-b_naf[i] as usize);
                }
                Ordering::Equal => {}
            }

            r = t.to_projective();

            if i == 0 {
                break;
            }
            i -= 1;
        }

        r.to_extended()
    }

    /// Fixed-base scalar multiplication by the Ed25519 basepoint.
    ///
    /// Uses the process-wide precomputed basepoint table.
    pub fn mul_base(scalar: &Scalar) -> Self {
        constants::ed25519_basepoint_table() * scalar
    }

    /// Multiply by the cofactor: return \\([8]P\\).
    pub fn mul_by_cofactor(&self) -> EdwardsPoint {
        self.mult_by_pow_2(3)
    }

    /// Compute \\([2\^k] P \\) by successive doublings.  Requires \\( k > 0 \\).
    pub(crate) fn mult_by_pow_2(&self, k: u32) -> EdwardsPoint {
        debug_assert!(k > 0);
        let mut r: CompletedPoint;
        let mut s = self.to_projective();
        for _ in 0..(k - 1) {
            r = s.double();
            s = r.to_projective();
        }
        // Unroll last iteration so we can go directly to_extended()
        s.double().to_extended()
    }

    /// Determine if this point is of small order.
    ///
    /// The identity and the other seven points of the 8-torsion
    /// subgroup are of small order; points used as public keys in
    /// protocols which rely on contributory behavior must not be.
    pub fn is_small_order(&self) -> bool {
        self.mul_by_cofactor().is_identity()
    }
}

// ------------------------------------------------------------------------
// Fixed-base scalar multiplication tables
// ------------------------------------------------------------------------

/// A precomputed table of multiples of a basepoint, for accelerating
/// fixed-base scalar multiplication.  One table, for the Ed25519
/// basepoint, is built on first use and shared by the whole process;
/// see `constants::ed25519_basepoint_table()`.
///
/// The table contains, for \\( 0 \leq i < 32 \\), lookup tables of the
/// multiples \\( [j (16\^{2i}) ] B \\) for \\( 1 \leq j < 9 \\), in
/// affine Niels coordinates.
#[derive(Copy, Clone)]
pub struct EdwardsBasepointTable(pub(crate) [LookupTable<AffineNielsPoint>; 32]);

impl EdwardsBasepointTable {
    /// Create a table of precomputed multiples of `basepoint`.
    pub fn create(basepoint: &EdwardsPoint) -> EdwardsBasepointTable {
        let mut table = EdwardsBasepointTable([LookupTable::from(basepoint); 32]);
        let mut P = *basepoint;
        for i in 0..32 {
            // P = (16^2)^i * B
            table.0[i] = LookupTable::from(&P);
            P = P.mult_by_pow_2(8);
        }
        table
    }

    /// The computation uses Pippenger's algorithm, as described on
    /// page 13 of the Ed25519 paper.  Write the scalar \\(a\\) in radix
    /// \\(16\\) with coefficients in \\([-8,8)\\), i.e.,
    /// $$
    ///     a = a\_0 + a\_1 16\^1 + \cdots + a\_{63} 16\^{63},
    /// $$
    /// with \\(-8 \leq a_i < 8\\), \\(-8 \leq a\_{63} \leq 8\\).  Then
    /// splitting into even and odd powers of \\(16\\),
    /// $$
    ///     a B = (a\_0 16\^0 B + a\_2 16\^2 B + \cdots + a\_{62} 16\^{62} B)
    ///     + 16 (a\_1 16\^0 B + a\_3 16\^2 B + \cdots + a\_{63} 16\^{62} B),
    /// $$
    /// so both sums are evaluated with lookups into tables of multiples
    /// of \\( 16\^{2i} B \\), sharing the precomputation.
    pub fn basepoint_mul(&self, scalar: &Scalar) -> EdwardsPoint {
        let a = scalar.as_radix_16();

        let mut P = EdwardsPoint::identity();

        for i in (0..64).filter(|x| x % 2 == 1) {
            P = (&P + &self.0[i / 2].select(a[i])).to_extended();
        }

        P = P.mult_by_pow_2(4);

        for i in (0..64).filter(|x| x % 2 == 0) {
            P = (&P + &self.0[i / 2].select(a[i])).to_extended();
        }

        P
    }

    /// Get the basepoint of this table as an `EdwardsPoint`.
    pub fn basepoint(&self) -> EdwardsPoint {
        // self.0[0].select(1) = 1*(16^2)^0*B
        // but as an `AffineNielsPoint`, so add identity to convert to extended.
        (&EdwardsPoint::identity() + &self.0[0].select(1)).to_extended()
    }
}

impl<'a, 'b> Mul<&'b Scalar> for &'a EdwardsBasepointTable {
    type Output = EdwardsPoint;

    /// Construct an `EdwardsPoint` from a `Scalar` \\(a\\) by computing
    /// the multiple \\(aB\\) of this basepoint \\(B\\).
    fn mul(self, scalar: &'b Scalar) -> EdwardsPoint {
        // delegate to a private function so that its documentation appears
        // in RustDoc
        self.basepoint_mul(scalar)
    }
}

impl<'a, 'b> Mul<&'a EdwardsBasepointTable> for &'b Scalar {
    type Output = EdwardsPoint;

    /// Construct an `EdwardsPoint` from a `Scalar` \\(a\\) by computing
    /// the multiple \\(aB\\) of this basepoint \\(B\\).
    fn mul(self, basepoint_table: &'a EdwardsBasepointTable) -> EdwardsPoint {
        basepoint_table * self
    }
}

impl Debug for EdwardsBasepointTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "EdwardsBasepointTable([\n")?;
        for i in 0..32 {
            write!(f, "\t{:?},\n", &self.0[i])?;
        }
        write!(f, "])")
    }
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    /// 4493907448824000747700850167940867464579944529806937181821189941592931634714
    static A_SCALAR: Scalar = Scalar {
        bytes: [
            0x1a, 0x0e, 0x97, 0x8a, 0x90, 0xf6, 0x62, 0x2d,
            0x37, 0x47, 0x02, 0x3f, 0x8a, 0xd8, 0x26, 0x4d,
            0xa7, 0x58, 0xaa, 0x1b, 0x88, 0xe0, 0x40, 0xd1,
            0x58, 0x9e, 0x7b, 0x7f, 0x23, 0x76, 0xef, 0x09,
        ],
    };

    /// 2506056684125797857694181776241676200180934651973138769173342316833279714961
    static B_SCALAR: Scalar = Scalar {
        bytes: [
            0x91, 0x26, 0x7a, 0xcf, 0x25, 0xc2, 0x09, 0x1b,
            0xa2, 0x17, 0x74, 0x7b, 0x66, 0xf0, 0xb3, 0x2e,
            0x9d, 0xf2, 0xa5, 0x67, 0x41, 0xcf, 0xda, 0xc4,
            0x56, 0xa7, 0xd4, 0xaa, 0xb8, 0x60, 0x8a, 0x05,
        ],
    };

    /// A_SCALAR * basepoint, computed with ed25519.py
    static A_TIMES_BASEPOINT: CompressedEdwardsY = CompressedEdwardsY([
        0xea, 0x27, 0xe2, 0x60, 0x53, 0xdf, 0x1b, 0x59,
        0x56, 0xf1, 0x4d, 0x5d, 0xec, 0x3c, 0x34, 0xc3,
        0x84, 0xa2, 0x69, 0xb7, 0x4c, 0xc3, 0x80, 0x3e,
        0xa8, 0xe2, 0xe7, 0xc9, 0x42, 0x5e, 0x40, 0xa5,
    ]);

    /// A_SCALAR * (A_TIMES_BASEPOINT) + B_SCALAR * BASEPOINT
    /// computed with ed25519.py
    static DOUBLE_SCALAR_MULT_RESULT: CompressedEdwardsY = CompressedEdwardsY([
        0x7d, 0xfd, 0x6c, 0x45, 0xaf, 0x6d, 0x6e, 0x0e,
        0xba, 0x20, 0x37, 0x1a, 0x23, 0x64, 0x59, 0xc4,
        0xc0, 0x46, 0x83, 0x43, 0xde, 0x70, 0x4b, 0x85,
        0x09, 0x6f, 0xfe, 0x35, 0x4f, 0x13, 0x2b, 0x42,
    ]);

    /// Compressed Edwards Y form of 2*basepoint.
    static BASE2_CMPRSSD: CompressedEdwardsY = CompressedEdwardsY([
        0xc9, 0xa3, 0xf8, 0x6a, 0xae, 0x46, 0x5f, 0x0e,
        0x56, 0x51, 0x38, 0x64, 0x51, 0x0f, 0x39, 0x97,
        0x56, 0x1f, 0xa2, 0xc9, 0xe8, 0x5e, 0xa2, 0x1d,
        0xc2, 0x29, 0x23, 0x09, 0xf3, 0xcd, 0x60, 0x22,
    ]);

    /// Compressed Edwards Y form of 16*basepoint.
    static BASE16_CMPRSSD: CompressedEdwardsY = CompressedEdwardsY([
        0xeb, 0x27, 0x67, 0xc1, 0x37, 0xab, 0x7a, 0xd8,
        0x27, 0x9c, 0x07, 0x8e, 0xff, 0x11, 0x6a, 0xb0,
        0x78, 0x6e, 0xad, 0x3a, 0x2e, 0x0f, 0x98, 0x9f,
        0x72, 0xc3, 0x7f, 0x82, 0xf2, 0x96, 0x96, 0x70,
    ]);

    /// Test round-trip decompression for the basepoint.
    #[test]
    fn basepoint_decompression_compression() {
        let bp = constants::ED25519_BASEPOINT_COMPRESSED
            .decompress()
            .unwrap();
        assert_eq!(bp.compress(), constants::ED25519_BASEPOINT_COMPRESSED);
    }

    /// Test sign handling in decompression.
    #[test]
    fn decompression_sign_handling() {
        // Manually set the high bit of the last byte to flip the sign
        let mut minus_basepoint_bytes = *constants::ED25519_BASEPOINT_COMPRESSED.as_bytes();
        minus_basepoint_bytes[31] |= 1 << 7;
        let minus_basepoint = CompressedEdwardsY(minus_basepoint_bytes)
            .decompress()
            .unwrap();
        // Test projective coordinates exactly since we know they should
        // only differ by a flipped sign.
        assert_eq!(minus_basepoint.X, -(&constants::ED25519_BASEPOINT_POINT.X));
        assert_eq!(minus_basepoint.Y, constants::ED25519_BASEPOINT_POINT.Y);
        assert_eq!(minus_basepoint.Z, constants::ED25519_BASEPOINT_POINT.Z);
        assert_eq!(minus_basepoint.T, -(&constants::ED25519_BASEPOINT_POINT.T));
    }

    /// Decompression rejects a non-canonical y-coordinate.
    #[test]
    fn decompression_rejects_noncanonical_y() {
        // 2^255 - 18 is congruent to 1 mod p, but is not the canonical
        // encoding of 1.
        let noncanonical_one = CompressedEdwardsY([
            0xee, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f,
        ]);
        assert!(noncanonical_one.decompress().is_none());
        // ... while the canonical encoding of 1 is the identity
        assert!(CompressedEdwardsY::identity().decompress().is_some());
    }

    /// Decompression rejects the encoding demanding x = -0.
    #[test]
    fn decompression_rejects_negative_zero_x() {
        // y = 1 with the sign bit set: x must be 0, which has no negative.
        let mut minus_zero = *CompressedEdwardsY::identity().as_bytes();
        minus_zero[31] |= 1 << 7;
        assert!(CompressedEdwardsY(minus_zero).decompress().is_none());
    }

    /// Decompression rejects a y-coordinate off the curve.
    #[test]
    fn decompression_rejects_invalid_y() {
        // y = 2 is not the y-coordinate of any curve point.
        let mut two = [0u8; 32];
        two[0] = 2;
        assert!(CompressedEdwardsY(two).decompress().is_none());
    }

    /// The constant-shape decompression substitutes the identity on failure.
    #[test]
    fn decompress_with_validity_fallback() {
        let mut two = [0u8; 32];
        two[0] = 2;
        let (point, is_valid) = CompressedEdwardsY(two).decompress_with_validity();
        assert!(!bool::from(is_valid));
        assert!(point.is_identity());
    }

    /// Test `impl Add<EdwardsPoint> for EdwardsPoint`
    /// using basepoint + basepoint versus the 2*basepoint constant.
    #[test]
    fn basepoint_plus_basepoint_vs_basepoint2() {
        let bp = constants::ED25519_BASEPOINT_POINT;
        let bp_added = &bp + &bp;
        assert_eq!(bp_added.compress(), BASE2_CMPRSSD);
    }

    /// Test `impl Add<ProjectiveNielsPoint> for EdwardsPoint`
    /// using the basepoint, basepoint2 constants
    #[test]
    fn basepoint_plus_basepoint_projective_niels_vs_basepoint2() {
        let bp = constants::ED25519_BASEPOINT_POINT;
        let bp_added = (&bp + &bp.to_projective_niels()).to_extended();
        assert_eq!(bp_added.compress(), BASE2_CMPRSSD);
    }

    /// Test `impl Add<AffineNielsPoint> for EdwardsPoint`
    /// using the basepoint, basepoint2 constants
    #[test]
    fn basepoint_plus_basepoint_affine_niels_vs_basepoint2() {
        let bp = constants::ED25519_BASEPOINT_POINT;
        let bp_affine_niels = bp.to_affine_niels();
        let bp_added = (&bp + &bp_affine_niels).to_extended();
        assert_eq!(bp_added.compress(), BASE2_CMPRSSD);
    }

    /// Check that equality of `EdwardsPoints` handles projective
    /// coordinates correctly.
    #[test]
    fn extended_point_equality_handles_scaling() {
        let two = FieldElement([2, 0, 0, 0, 0]);
        let id1 = EdwardsPoint::identity();
        let id2 = EdwardsPoint {
            X: FieldElement::zero(),
            Y: two,
            Z: two,
            T: FieldElement::zero(),
        };
        assert!(bool::from(id1.ct_eq(&id2)));
    }

    /// Sanity check for conversion to precomputed points
    #[test]
    fn to_affine_niels_clears_denominators() {
        // construct a point as aB so it has denominators (ie. Z != 1)
        let aB = constants::ed25519_basepoint_table() * &A_SCALAR;
        let aB_affine_niels = aB.to_affine_niels();
        let also_aB = (&EdwardsPoint::identity() + &aB_affine_niels).to_extended();
        assert_eq!(aB.compress(), also_aB.compress());
    }

    /// Test basepoint_mult versus a known scalar multiple from ed25519.py
    #[test]
    fn basepoint_mult_vs_ed25519py() {
        let aB = constants::ed25519_basepoint_table() * &A_SCALAR;
        assert_eq!(aB.compress(), A_TIMES_BASEPOINT);
    }

    /// Test that multiplication by the basepoint order kills the basepoint
    #[test]
    fn basepoint_mult_by_basepoint_order() {
        let b = constants::ed25519_basepoint_table();
        let l_minus_one = -&Scalar::one();
        let should_be_minus_b = b * &l_minus_one;
        assert_eq!(
            (&should_be_minus_b + &constants::ED25519_BASEPOINT_POINT).compress(),
            CompressedEdwardsY::identity()
        );
    }

    /// Test basepoint_mult versus the double_scalar helper
    #[test]
    fn basepoint_mult_one_vs_basepoint() {
        let bp = constants::ed25519_basepoint_table() * &Scalar::one();
        let compressed = bp.compress();
        assert_eq!(compressed, constants::ED25519_BASEPOINT_COMPRESSED);
    }

    /// Test `EdwardsBasepointTable::basepoint()`
    #[test]
    fn basepoint_table_basepoint_function_correct() {
        let bp = constants::ed25519_basepoint_table().basepoint();
        assert_eq!(bp.compress(), constants::ED25519_BASEPOINT_COMPRESSED);
    }

    /// Test computing 16*basepoint vs mult_by_pow_2(4)
    #[test]
    fn basepoint16_vs_mult_by_pow_2_4() {
        let bp16 = constants::ED25519_BASEPOINT_POINT.mult_by_pow_2(4);
        assert_eq!(bp16.compress(), BASE16_CMPRSSD);
    }

    /// Test variable-base scalar mult versus ed25519.py
    #[test]
    fn scalar_mul_vs_ed25519py() {
        let aB = &constants::ED25519_BASEPOINT_POINT * &A_SCALAR;
        assert_eq!(aB.compress(), A_TIMES_BASEPOINT);
    }

    /// Test vartime double-scalar multiplication vs ed25519.py
    #[test]
    fn vartime_double_scalar_mul_basepoint_vs_ed25519py() {
        let A = A_TIMES_BASEPOINT.decompress().unwrap();
        let result =
            EdwardsPoint::vartime_double_scalar_mul_basepoint(&A_SCALAR, &A, &B_SCALAR);
        assert_eq!(result.compress(), DOUBLE_SCALAR_MULT_RESULT);
    }

    /// Test Edwards -> Montgomery conversion on the basepoint: the
    /// Montgomery basepoint has u = 9.
    #[test]
    fn basepoint_to_montgomery() {
        let mut nine = [0u8; 32];
        nine[0] = 9;
        assert_eq!(
            constants::ED25519_BASEPOINT_POINT.to_montgomery().0,
            nine
        );
    }

    #[test]
    fn is_small_order() {
        // The basepoint has large prime order
        assert!(!constants::ED25519_BASEPOINT_POINT.is_small_order());
        // constants::EIGHT_TORSION has all points of small order.
        for torsion_point in constants::EIGHT_TORSION.iter() {
            assert!(torsion_point.is_small_order());
        }
    }

    #[test]
    fn compressed_identity() {
        assert_eq!(
            EdwardsPoint::identity().compress(),
            CompressedEdwardsY::identity()
        );
    }

    #[test]
    fn is_identity() {
        assert!(EdwardsPoint::identity().is_identity());
        assert!(!constants::ED25519_BASEPOINT_POINT.is_identity());
    }

    /// Rust's debug builds have overflow and underflow trapping,
    /// and enable `debug_assert!()`.  This performs many scalar
    /// multiplications to attempt to trigger possible overflows etc.
    #[test]
    fn monte_carlo_overflow_underflow_debug_assert_test() {
        let mut P = constants::ED25519_BASEPOINT_POINT;
        // N.B. each scalar_mul does 1407 field mults, 1024 field squarings,
        // so this does ~ 1M of each operation.
        for _ in 0..1_000 {
            P = &P * &A_SCALAR;
        }
    }
}

// -*- mode: rust; -*-
//
// This file is part of twist25519.
// See LICENSE for licensing information.

//! This module contains various constants (such as curve parameters
//! and useful field elements like `sqrt(-1)`), as well as
//! lookup tables of pre-computed points.

use std::sync::OnceLock;

use crate::curve_models::AffineNielsPoint;
use crate::edwards::{EdwardsBasepointTable, EdwardsPoint};
use crate::field::FieldElement;
use crate::scalar::Scalar52;
use crate::window::NafLookupTable5;

/// The length of an ed25519 secret key (seed), in bytes.
pub const SECRET_KEY_LENGTH: usize = 32;

/// The length of an ed25519 public key, in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// The length of an ed25519 keypair encoding (seed followed by public
/// key), in bytes.
pub const KEYPAIR_LENGTH: usize = SECRET_KEY_LENGTH + PUBLIC_KEY_LENGTH;

/// The length of an ed25519 signature, in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Edwards `d` value, equal to `-121665/121666 mod p`.
pub(crate) const EDWARDS_D: FieldElement = FieldElement([
    929955233495203,
    466365720129213,
    1662059464998953,
    2033849074728123,
    1442794654840575,
]);

/// Edwards `2*d` value, equal to `2*(-121665/121666) mod p`.
pub(crate) const EDWARDS_D2: FieldElement = FieldElement([
    1859910466990425,
    932731440258426,
    1072319116312658,
    1815898335770999,
    633789495995903,
]);

/// Precomputed value of one of the square roots of -1 (mod p).
pub(crate) const SQRT_M1: FieldElement = FieldElement([
    1718705420411056,
    234908883556509,
    2233514472574048,
    2117202627021982,
    765476049583133,
]);

/// `APLUS2_OVER_FOUR` is (A+2)/4, where A=486662 is the Montgomery
/// curve parameter.  (This is used internally within the Montgomery
/// ladder.)
pub(crate) const APLUS2_OVER_FOUR: FieldElement = FieldElement([121666, 0, 0, 0, 0]);

/// `L` is the order of base point, i.e.
/// 2^252 + 27742317777372353535851937790883648493.
pub(crate) const L: Scalar52 = Scalar52([
    0x0002631a5cf5d3ed,
    0x000dea2f79cd6581,
    0x000000000014def9,
    0x0000000000000000,
    0x0000100000000000,
]);

/// `MU` = floor(2^512 / L), the precomputed approximate inverse of the
/// group order used by Barrett reduction.
pub(crate) const MU: Scalar52 = Scalar52([
    0x000ce5a30a2c131b,
    0x0005d086329a7ed9,
    0x000fffffeb210621,
    0x000fffffffffffff,
    0x000fffffffffffff,
]);

/// The Ed25519 basepoint, as a `CompressedEdwardsY`.  The basepoint
/// has y = 4/5 and positive x.
pub const ED25519_BASEPOINT_COMPRESSED: crate::edwards::CompressedEdwardsY =
    crate::edwards::CompressedEdwardsY([
        0x58, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
        0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
        0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
        0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
    ]);

/// The Ed25519 basepoint, as an `EdwardsPoint`.  This is called
/// `_POINT` to distinguish it from the basepoint table, which should
/// be used for scalar multiplication (it's much faster).
pub const ED25519_BASEPOINT_POINT: EdwardsPoint = EdwardsPoint {
    X: FieldElement([
        1738742601995546,
        1146398526822698,
        2070867633025821,
        562264141797630,
        587772402128613,
    ]),
    Y: FieldElement([
        1801439850948184,
        1351079888211148,
        450359962737049,
        900719925474099,
        1801439850948198,
    ]),
    Z: FieldElement([1, 0, 0, 0, 0]),
    T: FieldElement([
        1841354044333475,
        16398895984059,
        755974180946558,
        900171276175154,
        1821297809914039,
    ]),
};

/// The 8-torsion subgroup E[8].
///
/// In the case of Curve25519, it is cyclic; the `i`th element of the
/// array is `i*P`, where `P` is a point of order 8 generating E[8].
///
/// Thus E[4] is the points indexed by 0,2,4,6 and E[2] is the points
/// indexed by 0,4.
pub const EIGHT_TORSION: [EdwardsPoint; 8] = [
    EdwardsPoint {
        X: FieldElement([0, 0, 0, 0, 0]),
        Y: FieldElement([1, 0, 0, 0, 0]),
        Z: FieldElement([1, 0, 0, 0, 0]),
        T: FieldElement([0, 0, 0, 0, 0]),
    },
    EdwardsPoint {
        X: FieldElement([
            358744748052810,
            1691584618240980,
            977650209285361,
            1429865912637724,
            560044844278676,
        ]),
        Y: FieldElement([
            84926274344903,
            473620666599931,
            365590438845504,
            1028470286882429,
            2146499180330972,
        ]),
        Z: FieldElement([1, 0, 0, 0, 0]),
        T: FieldElement([
            1448326834587521,
            1857896831960481,
            1093722731865333,
            1677408490711241,
            1915505153018406,
        ]),
    },
    EdwardsPoint {
        X: FieldElement([
            533094393274173,
            2016890930128738,
            18285341111199,
            134597186663265,
            1486323764102114,
        ]),
        Y: FieldElement([0, 0, 0, 0, 0]),
        Z: FieldElement([1, 0, 0, 0, 0]),
        T: FieldElement([0, 0, 0, 0, 0]),
    },
    EdwardsPoint {
        X: FieldElement([
            358744748052810,
            1691584618240980,
            977650209285361,
            1429865912637724,
            560044844278676,
        ]),
        Y: FieldElement([
            2166873539340326,
            1778179147085316,
            1886209374839743,
            1223329526802818,
            105300633354275,
        ]),
        Z: FieldElement([1, 0, 0, 0, 0]),
        T: FieldElement([
            803472979097708,
            393902981724766,
            1158077081819914,
            574391322974006,
            336294660666841,
        ]),
    },
    EdwardsPoint {
        X: FieldElement([0, 0, 0, 0, 0]),
        Y: FieldElement([
            2251799813685228,
            2251799813685247,
            2251799813685247,
            2251799813685247,
            2251799813685247,
        ]),
        Z: FieldElement([1, 0, 0, 0, 0]),
        T: FieldElement([0, 0, 0, 0, 0]),
    },
    EdwardsPoint {
        X: FieldElement([
            1893055065632419,
            560215195444267,
            1274149604399886,
            821933901047523,
            1691754969406571,
        ]),
        Y: FieldElement([
            2166873539340326,
            1778179147085316,
            1886209374839743,
            1223329526802818,
            105300633354275,
        ]),
        Z: FieldElement([1, 0, 0, 0, 0]),
        T: FieldElement([
            1448326834587521,
            1857896831960481,
            1093722731865333,
            1677408490711241,
            1915505153018406,
        ]),
    },
    EdwardsPoint {
        X: FieldElement([
            1718705420411056,
            234908883556509,
            2233514472574048,
            2117202627021982,
            765476049583133,
        ]),
        Y: FieldElement([0, 0, 0, 0, 0]),
        Z: FieldElement([1, 0, 0, 0, 0]),
        T: FieldElement([0, 0, 0, 0, 0]),
    },
    EdwardsPoint {
        X: FieldElement([
            1893055065632419,
            560215195444267,
            1274149604399886,
            821933901047523,
            1691754969406571,
        ]),
        Y: FieldElement([
            84926274344903,
            473620666599931,
            365590438845504,
            1028470286882429,
            2146499180330972,
        ]),
        Z: FieldElement([1, 0, 0, 0, 0]),
        T: FieldElement([
            803472979097708,
            393902981724766,
            1158077081819914,
            574391322974006,
            336294660666841,
        ]),
    },
];

/// Odd multiples of the basepoint `[B, 3B, 5B, 7B, 9B, 11B, 13B, 15B]`,
/// used by the variable-time double-scalar multiplication in signature
/// verification.
pub(crate) const AFFINE_ODD_MULTIPLES_OF_BASEPOINT: NafLookupTable5<AffineNielsPoint> =
    NafLookupTable5([
        AffineNielsPoint {
            y_plus_x: FieldElement([
                1288382639258501,
                245678601348599,
                269427782077623,
                1462984067271730,
                137412439391563,
            ]),
            y_minus_x: FieldElement([
                62697248952638,
                204681361388450,
                631292143396476,
                338455783676468,
                1213667448819585,
            ]),
            xy2d: FieldElement([
                301289933810280,
                1259582250014073,
                1422107436869536,
                796239922652654,
                1953934009299142,
            ]),
        },
        AffineNielsPoint {
            y_plus_x: FieldElement([
                1601611775252272,
                1720807796594148,
                1132070835939856,
                1260455018889551,
                2147779492816911,
            ]),
            y_minus_x: FieldElement([
                316559037616741,
                2177824224946892,
                1459442586438991,
                1461528397712656,
                751590696113597,
            ]),
            xy2d: FieldElement([
                1850748884277385,
                1200145853858453,
                1068094770532492,
                672251375690438,
                1586055907191707,
            ]),
        },
        AffineNielsPoint {
            y_plus_x: FieldElement([
                769950342298419,
                132954430919746,
                844085933195555,
                974092374476333,
                726076285546016,
            ]),
            y_minus_x: FieldElement([
                425251763115706,
                608463272472562,
                442562545713235,
                837766094556764,
                374555092627893,
            ]),
            xy2d: FieldElement([
                1086255230780037,
                274979815921559,
                1960002765731872,
                929474102396301,
                1190409889297339,
            ]),
        },
        AffineNielsPoint {
            y_plus_x: FieldElement([
                665000864555967,
                2065379846933859,
                370231110385876,
                350988370788628,
                1233371373142985,
            ]),
            y_minus_x: FieldElement([
                2019367628972465,
                676711900706637,
                110710997811333,
                1108646842542025,
                517791959672113,
            ]),
            xy2d: FieldElement([
                965130719900578,
                247011430587952,
                526356006571389,
                91986625355052,
                2157223321444601,
            ]),
        },
        AffineNielsPoint {
            y_plus_x: FieldElement([
                1802695059465007,
                1664899123557221,
                593559490740857,
                2160434469266659,
                927570450755031,
            ]),
            y_minus_x: FieldElement([
                1725674970513508,
                1933645953859181,
                1542344539275782,
                1767788773573747,
                1297447965928905,
            ]),
            xy2d: FieldElement([
                1381809363726107,
                1430341051343062,
                2061843536018959,
                1551778050872521,
                2036394857967624,
            ]),
        },
        AffineNielsPoint {
            y_plus_x: FieldElement([
                1970894096313054,
                528066325833207,
                1619374932191227,
                2207306624415883,
                1169170329061080,
            ]),
            y_minus_x: FieldElement([
                2070390218572616,
                1458919061857835,
                624171843017421,
                1055332792707765,
                433987520732508,
            ]),
            xy2d: FieldElement([
                893653801273833,
                1168026499324677,
                1242553501121234,
                1306366254304474,
                1086752658510815,
            ]),
        },
        AffineNielsPoint {
            y_plus_x: FieldElement([
                213454002618221,
                939771523987438,
                1159882208056014,
                317388369627517,
                621213314200687,
            ]),
            y_minus_x: FieldElement([
                1971678598905747,
                338026507889165,
                762398079972271,
                655096486107477,
                42299032696322,
            ]),
            xy2d: FieldElement([
                177130678690680,
                1754759263300204,
                1864311296286618,
                1180675631479880,
                1292726903152791,
            ]),
        },
        AffineNielsPoint {
            y_plus_x: FieldElement([
                1913163449625248,
                460779200291993,
                2193883288642314,
                1008900146920800,
                1721983679009502,
            ]),
            y_minus_x: FieldElement([
                1070401523076875,
                1272492007800961,
                1910153608563310,
                2075579521696771,
                1191169788841221,
            ]),
            xy2d: FieldElement([
                692896803108118,
                500174642072499,
                2068223309439677,
                1162190621851337,
                1426986007309901,
            ]),
        },
    ]);

static ED25519_BASEPOINT_TABLE_CELL: OnceLock<EdwardsBasepointTable> = OnceLock::new();

/// A radix-16 table of multiples of the Ed25519 basepoint, for use in
/// fixed-base scalar multiplication.
///
/// The table is built on first use and shared for the lifetime of the
/// process.
pub fn ed25519_basepoint_table() -> &'static EdwardsBasepointTable {
    ED25519_BASEPOINT_TABLE_CELL
        .get_or_init(|| EdwardsBasepointTable::create(&ED25519_BASEPOINT_POINT))
}

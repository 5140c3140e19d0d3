//! Arithmetic in the NIST P-256 prime order group.
//!
//! The OT protocol needs only a handful of operations: uniform scalar
//! sampling, fixed-point and variable-point multiplication, and a canonical
//! text encoding of compressed points. This module exposes them at that
//! altitude so the protocol code reads like the protocol on paper. Point
//! addition, subtraction and multiplication go through the constant-time
//! operator impls of the underlying `p256` types.

use p256::{
    elliptic_curve::{
        sec1::{FromEncodedPoint, ToEncodedPoint},
        Field,
    },
    AffinePoint, EncodedPoint, NonZeroScalar, ProjectivePoint, Scalar,
};
use rand::{CryptoRng, Rng};

/// Samples a scalar uniformly from `[0, q)`.
pub(crate) fn random_scalar<RNG: CryptoRng + Rng>(rng: &mut RNG) -> Scalar {
    Scalar::random(rng)
}

/// Samples a scalar uniformly from `[1, q-1]`.
///
/// Used for exponents whose public point must not be the identity.
pub(crate) fn random_nonzero_scalar<RNG: CryptoRng + Rng>(rng: &mut RNG) -> Scalar {
    *NonZeroScalar::random(rng)
}

/// Computes `g^x` for the fixed group generator `g`.
pub(crate) fn generator_mul(x: &Scalar) -> ProjectivePoint {
    ProjectivePoint::GENERATOR * x
}

/// Samples a uniformly random group element as `g^r` with fresh `r`.
pub(crate) fn random_point<RNG: CryptoRng + Rng>(rng: &mut RNG) -> ProjectivePoint {
    generator_mul(&random_scalar(rng))
}

/// Encodes a point in compressed SEC1 form as lowercase hex.
///
/// This encoding is part of the wire contract and is also the exact byte
/// string fed into key derivation, so both peers must produce it
/// identically.
pub(crate) fn point_to_hex(point: &ProjectivePoint) -> String {
    hex::encode(point.to_affine().to_encoded_point(true).as_bytes())
}

/// Decodes a compressed hex point, returning `None` unless the bytes are
/// valid hex for a point on the curve.
pub(crate) fn point_from_hex(bytes: &[u8]) -> Option<ProjectivePoint> {
    let bytes = hex::decode(bytes).ok()?;
    let encoded = EncodedPoint::from_bytes(&bytes).ok()?;
    let affine = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))?;
    Some(affine.into())
}

#[cfg(test)]
mod tests {
    use p256::Scalar;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use super::{
        generator_mul, point_from_hex, point_to_hex, random_nonzero_scalar, random_point,
        random_scalar,
    };

    #[test]
    fn hex_round_trips() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        for _ in 0..32 {
            let point = random_point(&mut rng);
            let encoded = point_to_hex(&point);
            assert_eq!(encoded.len(), 66);
            assert_eq!(point_from_hex(encoded.as_bytes()), Some(point));
        }
    }

    #[test]
    fn rejects_malformed_encodings() {
        // Not hex at all.
        assert_eq!(point_from_hex(b"this is not hex"), None);
        // Odd number of hex digits.
        assert_eq!(point_from_hex(b"02a"), None);
        // Unknown SEC1 tag byte.
        let bad_tag = format!("05{}", "11".repeat(32));
        assert_eq!(point_from_hex(bad_tag.as_bytes()), None);
        // x-coordinate out of field range.
        let oversized = format!("02{}", "ff".repeat(32));
        assert_eq!(point_from_hex(oversized.as_bytes()), None);
    }

    #[test]
    fn nonzero_scalar_is_never_zero() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        for _ in 0..256 {
            assert_ne!(random_nonzero_scalar(&mut rng), Scalar::ZERO);
        }
    }

    #[test]
    fn generator_mul_is_homomorphic() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let a = random_scalar(&mut rng);
        let b = random_scalar(&mut rng);
        assert_eq!(
            generator_mul(&(a + b)),
            generator_mul(&a) + generator_mul(&b)
        );
    }
}

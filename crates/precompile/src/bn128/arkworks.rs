//! Arkworks backend for the alt_bn128 precompiles.
use super::{FQ2_LEN, FQ_LEN, G1_LEN, G2_LEN, SCALAR_LEN};
use crate::PrecompileError;

use ark_bn254::{Bn254, Fq, Fq2, Fr, G1Affine, G1Projective, G2Affine};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::{One, PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

/// Reads a single `Fq` field element from the input slice.
///
/// `deserialize_uncompressed` rejects values that are not below the field
/// modulus.
///
/// # Panics
///
/// Panics if the input is not exactly 32 bytes long.
#[inline]
fn read_fq(input_be: &[u8]) -> Result<Fq, PrecompileError> {
    assert_eq!(input_be.len(), FQ_LEN, "input must be {FQ_LEN} bytes");

    let mut input_le = [0u8; FQ_LEN];
    input_le.copy_from_slice(input_be);

    // Reverse in-place to convert from big-endian to little-endian.
    input_le.reverse();

    Fq::deserialize_uncompressed(&input_le[..])
        .map_err(|_| PrecompileError::Bn128FieldPointNotAMember)
}

/// Reads a Fq2 (quadratic extension field element) from the input slice.
///
/// The imaginary part is encoded first.
#[inline]
fn read_fq2(input: &[u8]) -> Result<Fq2, PrecompileError> {
    let y = read_fq(&input[..FQ_LEN])?;
    let x = read_fq(&input[FQ_LEN..2 * FQ_LEN])?;

    Ok(Fq2::new(x, y))
}

/// Writes `value` as 32 big-endian bytes into `output`.
#[inline]
fn write_fq(value: &Fq, output: &mut [u8]) -> Result<(), PrecompileError> {
    let mut bytes = [0u8; FQ_LEN];
    value
        .serialize_uncompressed(&mut bytes[..])
        .map_err(|_| PrecompileError::other("failed to encode bn128 field element"))?;

    // Convert to big endian by reversing the bytes.
    bytes.reverse();
    output.copy_from_slice(&bytes);
    Ok(())
}

#[inline]
fn write_fq2(value: &Fq2, output: &mut [u8]) -> Result<(), PrecompileError> {
    write_fq(&value.c1, &mut output[..FQ_LEN])?;
    write_fq(&value.c0, &mut output[FQ_LEN..FQ2_LEN])
}

/// Creates a new `G1` point from the given `x` and `y` coordinates.
///
/// (0,0) is the point at infinity.
#[inline]
fn new_g1_point(px: Fq, py: Fq) -> Result<G1Affine, PrecompileError> {
    if px.is_zero() && py.is_zero() {
        Ok(G1Affine::zero())
    } else {
        // `G1Affine::new` asserts instead of returning an error for points off the curve.
        let point = G1Affine::new_unchecked(px, py);
        if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
            return Err(PrecompileError::Bn128AffineGFailedToCreate);
        }
        Ok(point)
    }
}

/// Creates a new `G2` point from the given Fq2 coordinates.
#[inline]
fn new_g2_point(x: Fq2, y: Fq2) -> Result<G2Affine, PrecompileError> {
    let point = if x.is_zero() && y.is_zero() {
        G2Affine::zero()
    } else {
        let point = G2Affine::new_unchecked(x, y);
        if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
            return Err(PrecompileError::Bn128AffineGFailedToCreate);
        }
        point
    };

    Ok(point)
}

/// Reads a G1 point from the input slice.
///
/// # Panics
///
/// Panics if the input is not at least 64 bytes long.
#[inline]
pub(super) fn read_g1_point(input: &[u8]) -> Result<G1Affine, PrecompileError> {
    let px = read_fq(&input[0..FQ_LEN])?;
    let py = read_fq(&input[FQ_LEN..2 * FQ_LEN])?;
    new_g1_point(px, py)
}

/// Encodes a G1 point into a byte array, all zeroes for the point at infinity.
#[inline]
pub(super) fn encode_g1_point(point: G1Affine) -> Result<[u8; G1_LEN], PrecompileError> {
    let mut output = [0u8; G1_LEN];
    let Some((x, y)) = point.xy() else {
        return Ok(output);
    };

    write_fq(&x, &mut output[..FQ_LEN])?;
    write_fq(&y, &mut output[FQ_LEN..])?;
    Ok(output)
}

/// Reads a G2 point from the input slice.
///
/// # Panics
///
/// Panics if the input is not at least 128 bytes long.
#[inline]
pub(super) fn read_g2_point(input: &[u8]) -> Result<G2Affine, PrecompileError> {
    let ba = read_fq2(&input[0..FQ2_LEN])?;
    let bb = read_fq2(&input[FQ2_LEN..2 * FQ2_LEN])?;
    new_g2_point(ba, bb)
}

/// Encodes a G2 point into a byte array, all zeroes for the point at infinity.
#[inline]
pub(super) fn encode_g2_point(point: G2Affine) -> Result<[u8; G2_LEN], PrecompileError> {
    let mut output = [0u8; G2_LEN];
    let Some((x, y)) = point.xy() else {
        return Ok(output);
    };

    write_fq2(&x, &mut output[..FQ2_LEN])?;
    write_fq2(&y, &mut output[FQ2_LEN..])?;
    Ok(output)
}

/// Reads a scalar from the input slice
///
/// Note: The scalar does not need to be canonical.
#[inline]
pub(super) fn read_scalar(input: &[u8]) -> Result<Fr, PrecompileError> {
    if input.len() != SCALAR_LEN {
        return Err(PrecompileError::other(format!(
            "unexpected scalar length. got {}, expected {SCALAR_LEN}",
            input.len()
        )));
    }
    Ok(Fr::from_be_bytes_mod_order(input))
}

/// Adds two encoded G1 points and returns the encoded sum.
pub(crate) fn g1_point_add(p1: &[u8], p2: &[u8]) -> Result<[u8; G1_LEN], PrecompileError> {
    let p1 = read_g1_point(p1)?;
    let p2 = read_g1_point(p2)?;

    let p1_jacobian: G1Projective = p1.into();
    let p3 = p1_jacobian + p2;

    encode_g1_point(p3.into_affine())
}

/// Multiplies an encoded G1 point by an encoded scalar.
pub(crate) fn g1_point_mul(point: &[u8], scalar: &[u8]) -> Result<[u8; G1_LEN], PrecompileError> {
    let p = read_g1_point(point)?;
    let fr = read_scalar(scalar)?;

    encode_g1_point(p.mul_bigint(fr.into_bigint()).into_affine())
}

/// Multiplies an encoded G2 point by an encoded scalar.
pub(crate) fn g2_point_mul(point: &[u8], scalar: &[u8]) -> Result<[u8; G2_LEN], PrecompileError> {
    let p = read_g2_point(point)?;
    let fr = read_scalar(scalar)?;

    encode_g2_point(p.mul_bigint(fr.into_bigint()).into_affine())
}

/// pairing_check performs a pairing check on a list of G1 and G2 point pairs and
/// returns true if the result is equal to the identity element.
///
/// Note: If the input is empty, this function returns true.
pub(crate) fn pairing_check(pairs: &[(&[u8], &[u8])]) -> Result<bool, PrecompileError> {
    let mut g1_points = Vec::with_capacity(pairs.len());
    let mut g2_points = Vec::with_capacity(pairs.len());

    for (g1_bytes, g2_bytes) in pairs {
        let g1 = read_g1_point(g1_bytes)?;
        let g2 = read_g2_point(g2_bytes)?;

        if !g1.is_zero() && !g2.is_zero() {
            g1_points.push(g1);
            g2_points.push(g2);
        }
    }

    if g1_points.is_empty() {
        return Ok(true);
    }

    let pairing_result = Bn254::multi_pairing(&g1_points, &g2_points);
    Ok(pairing_result.0.is_one())
}

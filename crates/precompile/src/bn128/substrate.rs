//! `substrate-bn` backend for the alt_bn128 precompiles.
use super::{FQ2_LEN, FQ_LEN, G1_LEN, G2_LEN, SCALAR_LEN};
use crate::PrecompileError;
use bn::{AffineG1, AffineG2, Fq, Fq2, Group, Gt, G1, G2};

/// Reads a single `Fq` field element from the input slice.
///
/// Takes a byte slice and attempts to interpret the first 32 bytes as an
/// elliptic curve field element. Returns an error if the bytes do not form
/// a valid field element.
///
/// # Panics
///
/// Panics if the input is not at least 32 bytes long.
#[inline]
fn read_fq(input: &[u8]) -> Result<Fq, PrecompileError> {
    Fq::from_slice(&input[..FQ_LEN]).map_err(|_| PrecompileError::Bn128FieldPointNotAMember)
}

/// Reads a Fq2 (quadratic extension field element) from the input slice.
///
/// The imaginary part is encoded first, so for an element `x + y*i` the
/// input holds `y || x`.
///
/// # Panics
///
/// Panics if the input is not at least 64 bytes long.
#[inline]
fn read_fq2(input: &[u8]) -> Result<Fq2, PrecompileError> {
    let y = read_fq(&input[..FQ_LEN])?;
    let x = read_fq(&input[FQ_LEN..2 * FQ_LEN])?;
    Ok(Fq2::new(x, y))
}

/// Writes `value` as 32 big-endian bytes into `output`.
#[inline]
fn write_fq(value: Fq, output: &mut [u8]) -> Result<(), PrecompileError> {
    value
        .to_big_endian(output)
        .map_err(|_| PrecompileError::other("failed to encode bn128 field element"))
}

/// Writes an Fq2 element in the same `imaginary || real` order [`read_fq2`] expects.
#[inline]
fn write_fq2(value: Fq2, output: &mut [u8]) -> Result<(), PrecompileError> {
    write_fq(value.imaginary(), &mut output[..FQ_LEN])?;
    write_fq(value.real(), &mut output[FQ_LEN..FQ2_LEN])
}

/// Creates a new `G1` point from the given `x` and `y` coordinates.
///
/// Note: The point at infinity which is represented as (0,0) is
/// handled specifically because `AffineG1` is not capable of
/// representing such a point.
#[inline]
fn new_g1_point(px: Fq, py: Fq) -> Result<G1, PrecompileError> {
    if px == Fq::zero() && py == Fq::zero() {
        Ok(G1::zero())
    } else {
        AffineG1::new(px, py)
            .map(Into::into)
            .map_err(|_| PrecompileError::Bn128AffineGFailedToCreate)
    }
}

/// Creates a new `G2` point from the given Fq2 coordinates.
///
/// `AffineG2::new` also rejects points outside the prime order subgroup.
#[inline]
fn new_g2_point(x: Fq2, y: Fq2) -> Result<G2, PrecompileError> {
    let point = if x.is_zero() && y.is_zero() {
        G2::zero()
    } else {
        G2::from(AffineG2::new(x, y).map_err(|_| PrecompileError::Bn128AffineGFailedToCreate)?)
    };

    Ok(point)
}

/// Reads a G1 point from the input slice.
///
/// # Panics
///
/// Panics if the input is not at least 64 bytes long.
#[inline]
pub(super) fn read_g1_point(input: &[u8]) -> Result<G1, PrecompileError> {
    let px = read_fq(&input[0..FQ_LEN])?;
    let py = read_fq(&input[FQ_LEN..2 * FQ_LEN])?;
    new_g1_point(px, py)
}

/// Encodes a G1 point into a byte array.
///
/// Converts a G1 point in Jacobian coordinates to affine coordinates and
/// serializes the x and y coordinates as big-endian byte arrays.
///
/// Note: If the point is the point at infinity, this function returns
/// all zeroes.
#[inline]
pub(super) fn encode_g1_point(point: G1) -> Result<[u8; G1_LEN], PrecompileError> {
    let mut output = [0u8; G1_LEN];

    if let Some(point_affine) = AffineG1::from_jacobian(point) {
        write_fq(point_affine.x(), &mut output[..FQ_LEN])?;
        write_fq(point_affine.y(), &mut output[FQ_LEN..])?;
    }

    Ok(output)
}

/// Reads a G2 point from the input slice.
///
/// # Panics
///
/// Panics if the input is not at least 128 bytes long.
#[inline]
pub(super) fn read_g2_point(input: &[u8]) -> Result<G2, PrecompileError> {
    let ba = read_fq2(&input[0..FQ2_LEN])?;
    let bb = read_fq2(&input[FQ2_LEN..2 * FQ2_LEN])?;
    new_g2_point(ba, bb)
}

/// Encodes a G2 point into a byte array, all zeroes for the point at infinity.
#[inline]
pub(super) fn encode_g2_point(point: G2) -> Result<[u8; G2_LEN], PrecompileError> {
    let mut output = [0u8; G2_LEN];

    if let Some(point_affine) = AffineG2::from_jacobian(point) {
        write_fq2(point_affine.x(), &mut output[..FQ2_LEN])?;
        write_fq2(point_affine.y(), &mut output[FQ2_LEN..])?;
    }

    Ok(output)
}

/// Reads a scalar from the input slice
///
/// Note: The scalar does not need to be canonical, it is reduced modulo the
/// group order.
#[inline]
pub(super) fn read_scalar(input: &[u8]) -> Result<bn::Fr, PrecompileError> {
    if input.len() != SCALAR_LEN {
        return Err(PrecompileError::other(format!(
            "unexpected scalar length. got {}, expected {SCALAR_LEN}",
            input.len()
        )));
    }
    // `Fr::from_slice` can only fail when the length is not `SCALAR_LEN`.
    bn::Fr::from_slice(input).map_err(|_| PrecompileError::other("invalid bn128 scalar"))
}

/// Adds two encoded G1 points and returns the encoded sum.
pub(crate) fn g1_point_add(p1: &[u8], p2: &[u8]) -> Result<[u8; G1_LEN], PrecompileError> {
    let p1 = read_g1_point(p1)?;
    let p2 = read_g1_point(p2)?;
    encode_g1_point(p1 + p2)
}

/// Multiplies an encoded G1 point by an encoded scalar.
pub(crate) fn g1_point_mul(point: &[u8], scalar: &[u8]) -> Result<[u8; G1_LEN], PrecompileError> {
    let p = read_g1_point(point)?;
    let fr = read_scalar(scalar)?;
    encode_g1_point(p * fr)
}

/// Multiplies an encoded G2 point by an encoded scalar.
pub(crate) fn g2_point_mul(point: &[u8], scalar: &[u8]) -> Result<[u8; G2_LEN], PrecompileError> {
    let p = read_g2_point(point)?;
    let fr = read_scalar(scalar)?;
    encode_g2_point(p * fr)
}

/// pairing_check performs a pairing check on a list of G1 and G2 point pairs and
/// returns true if the result is equal to the identity element.
///
/// Every point is validated before any pair is skipped, so a malformed point
/// next to the point at infinity is still rejected.
///
/// Note: If the input is empty, this function returns true.
pub(crate) fn pairing_check(pairs: &[(&[u8], &[u8])]) -> Result<bool, PrecompileError> {
    let mut parsed_pairs = Vec::with_capacity(pairs.len());

    for (g1_bytes, g2_bytes) in pairs {
        let g1 = read_g1_point(g1_bytes)?;
        let g2 = read_g2_point(g2_bytes)?;

        // e(0, Q) = e(P, 0) = 1
        if !g1.is_zero() && !g2.is_zero() {
            parsed_pairs.push((g1, g2));
        }
    }

    if parsed_pairs.is_empty() {
        return Ok(true);
    }

    Ok(bn::pairing_batch(&parsed_pairs) == Gt::one())
}

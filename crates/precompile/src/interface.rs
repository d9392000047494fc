//! Interface for the precompiles. It contains the precompile result type,
//! the precompile output type, the precompile error type and the curve
//! arithmetic capability the precompiles are executed against.
use alloy_primitives::Bytes;
use core::fmt::{self, Debug};

/// A precompile operation result type
///
/// Returns either `Ok(PrecompileOutput)` or `Err(error)`.
pub type PrecompileResult = Result<PrecompileOutput, PrecompileError>;

/// Precompile execution output
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PrecompileOutput {
    /// Gas used by the precompile
    pub gas_used: u64,
    /// Output bytes
    pub bytes: Bytes,
}

impl PrecompileOutput {
    /// Returns new precompile output with the given gas used and output bytes.
    pub fn new(gas_used: u64, bytes: Bytes) -> Self {
        Self { gas_used, bytes }
    }
}

/// Curve arithmetic used by the alt_bn128 precompiles.
///
/// Points and scalars cross this boundary in their EVM encoding: G1 points are
/// 64 bytes (`x || y`), G2 points are 128 bytes (`x.im || x.re || y.im || y.re`)
/// and scalars are 32 bytes, all big-endian.
pub trait Crypto: Send + Sync + Debug {
    /// BN128 elliptic curve addition.
    fn bn128_g1_add(&self, p1: &[u8], p2: &[u8]) -> Result<[u8; 64], PrecompileError>;

    /// BN128 elliptic curve scalar multiplication.
    fn bn128_g1_mul(&self, point: &[u8], scalar: &[u8]) -> Result<[u8; 64], PrecompileError>;

    /// BN128 pairing check.
    fn bn128_pairing_check(&self, pairs: &[(&[u8], &[u8])]) -> Result<bool, PrecompileError>;

    /// BN128 G2 scalar multiplication.
    ///
    /// Not exposed by any precompile, the input generator uses it to build
    /// pairing inputs.
    fn bn128_g2_mul(&self, point: &[u8], scalar: &[u8]) -> Result<[u8; 128], PrecompileError>;
}

/// Precompile function type. Takes input, gas limit, and crypto implementation and returns precompile result.
pub type PrecompileFn = fn(&[u8], u64, &dyn Crypto) -> PrecompileResult;

/// Precompile error type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrecompileError {
    /// out of gas is the main error. Others are here just for completeness
    OutOfGas,
    /// Bn128 errors
    Bn128FieldPointNotAMember,
    /// Bn128 affine g failed to create
    Bn128AffineGFailedToCreate,
    /// Bn128 pair length
    Bn128PairLength,
    /// Catch-all variant for other errors
    Other(String),
}

impl PrecompileError {
    /// Returns another error with the given message.
    pub fn other(err: impl Into<String>) -> Self {
        Self::Other(err.into())
    }

    /// Returns `true` if the error is out of gas.
    pub fn is_oog(&self) -> bool {
        matches!(self, Self::OutOfGas)
    }
}

impl core::error::Error for PrecompileError {}

impl fmt::Display for PrecompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::OutOfGas => "out of gas",
            Self::Bn128FieldPointNotAMember => "field point not a member of bn128 curve",
            Self::Bn128AffineGFailedToCreate => "failed to create affine g point for bn128 curve",
            Self::Bn128PairLength => "bn128 invalid pair length",
            Self::Other(s) => s,
        };
        f.write_str(s)
    }
}

/// Default implementation of the [`Crypto`] trait, backed by whichever curve
/// library the crate was compiled with.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultCrypto;

impl Crypto for DefaultCrypto {
    fn bn128_g1_add(&self, p1: &[u8], p2: &[u8]) -> Result<[u8; 64], PrecompileError> {
        crate::bn128::crypto_backend::g1_point_add(p1, p2)
    }

    fn bn128_g1_mul(&self, point: &[u8], scalar: &[u8]) -> Result<[u8; 64], PrecompileError> {
        crate::bn128::crypto_backend::g1_point_mul(point, scalar)
    }

    fn bn128_pairing_check(&self, pairs: &[(&[u8], &[u8])]) -> Result<bool, PrecompileError> {
        crate::bn128::crypto_backend::pairing_check(pairs)
    }

    fn bn128_g2_mul(&self, point: &[u8], scalar: &[u8]) -> Result<[u8; 128], PrecompileError> {
        crate::bn128::crypto_backend::g2_point_mul(point, scalar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        assert_eq!(PrecompileError::OutOfGas.to_string(), "out of gas");
        assert_eq!(
            PrecompileError::Bn128PairLength.to_string(),
            "bn128 invalid pair length"
        );
        assert_eq!(PrecompileError::other("boom").to_string(), "boom");
        assert!(PrecompileError::OutOfGas.is_oog());
        assert!(!PrecompileError::Bn128FieldPointNotAMember.is_oog());
    }
}

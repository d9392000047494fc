//! alt_bn128 precompiles: `ecAdd` (0x06), `ecMul` (0x07) and `ecPairing` (0x08).
//!
//! The curve arithmetic itself lives behind [`Crypto`]; this module only
//! charges gas, enforces the input layout and slices the input into points.
use crate::{
    utilities::{bool_to_bytes32, right_pad},
    Address, Bytes, Crypto, PrecompileError, PrecompileOutput, PrecompileResult,
    PrecompileWithAddress,
};

cfg_if::cfg_if! {
    if #[cfg(feature = "bn")] {
        pub(crate) mod substrate;
        pub(crate) use substrate as crypto_backend;

        // silence arkworks lint as substrate impl will be used as default if both are enabled.
        use ark_bn254 as _;
        use ark_ec as _;
        use ark_ff as _;
        use ark_serialize as _;
    } else {
        pub(crate) mod arkworks;
        pub(crate) use arkworks as crypto_backend;
    }
}

/// Bn128 add precompile
pub mod add {
    use super::*;

    /// Bn128 add precompile address
    pub const ADDRESS: Address = crate::u64_to_address(6);

    /// Bn128 add precompile with ISTANBUL gas rules
    pub const ISTANBUL_ADD_GAS_COST: u64 = 150;

    /// Bn128 add precompile with ISTANBUL gas rules
    pub const ISTANBUL: PrecompileWithAddress =
        PrecompileWithAddress(ADDRESS, |input, gas_limit, crypto| {
            run_add(input, ISTANBUL_ADD_GAS_COST, gas_limit, crypto)
        });
}

/// Bn128 mul precompile
pub mod mul {
    use super::*;

    /// Bn128 mul precompile address
    pub const ADDRESS: Address = crate::u64_to_address(7);

    /// Bn128 mul precompile with ISTANBUL gas rules
    pub const ISTANBUL_MUL_GAS_COST: u64 = 6_000;

    /// Bn128 mul precompile with ISTANBUL gas rules
    pub const ISTANBUL: PrecompileWithAddress =
        PrecompileWithAddress(ADDRESS, |input, gas_limit, crypto| {
            run_mul(input, ISTANBUL_MUL_GAS_COST, gas_limit, crypto)
        });
}

/// Bn128 pair precompile
pub mod pair {
    use super::*;

    /// Bn128 pair precompile address
    pub const ADDRESS: Address = crate::u64_to_address(8);

    /// Bn128 pair precompile with ISTANBUL gas rules
    pub const ISTANBUL_PAIR_PER_POINT: u64 = 34_000;

    /// Bn128 pair precompile with ISTANBUL gas rules
    pub const ISTANBUL_PAIR_BASE: u64 = 45_000;

    /// Bn128 pair precompile with ISTANBUL gas rules
    pub const ISTANBUL: PrecompileWithAddress =
        PrecompileWithAddress(ADDRESS, |input, gas_limit, crypto| {
            run_pair(
                input,
                ISTANBUL_PAIR_PER_POINT,
                ISTANBUL_PAIR_BASE,
                gas_limit,
                crypto,
            )
        });
}

/// FQ_LEN specifies the number of bytes needed to represent an
/// Fq element. This is an element in the base field of BN254.
///
/// Note: The base field is used to define G1 and G2 elements.
pub const FQ_LEN: usize = 32;

/// SCALAR_LEN specifies the number of bytes needed to represent an Fr element.
/// This is an element in the scalar field of BN254.
pub const SCALAR_LEN: usize = 32;

/// FQ2_LEN specifies the number of bytes needed to represent an
/// Fq^2 element.
///
/// Note: This is the quadratic extension of Fq, and by definition
/// means we need 2 Fq elements.
pub const FQ2_LEN: usize = 2 * FQ_LEN;

/// G1_LEN specifies the number of bytes needed to represent a G1 element.
///
/// Note: A G1 element contains 2 Fq elements.
pub const G1_LEN: usize = 2 * FQ_LEN;

/// G2_LEN specifies the number of bytes needed to represent a G2 element.
///
/// Note: A G2 element contains 2 Fq^2 elements.
pub const G2_LEN: usize = 2 * FQ2_LEN;

/// Input length for the add operation.
/// `ADD` takes two uncompressed G1 points (64 bytes each).
pub const ADD_INPUT_LEN: usize = 2 * G1_LEN;

/// Input length for the multiplication operation.
/// `MUL` takes an uncompressed G1 point (64 bytes) and scalar (32 bytes).
pub const MUL_INPUT_LEN: usize = G1_LEN + SCALAR_LEN;

/// Pair element length.
/// `PAIR` elements are composed of an uncompressed G1 point (64 bytes) and an uncompressed G2 point
/// (128 bytes).
pub const PAIR_ELEMENT_LEN: usize = G1_LEN + G2_LEN;

/// Run the Bn128 add precompile
///
/// Short input is right-padded with zeroes, bytes past [`ADD_INPUT_LEN`] are ignored.
pub fn run_add(
    input: &[u8],
    gas_cost: u64,
    gas_limit: u64,
    crypto: &dyn Crypto,
) -> PrecompileResult {
    if gas_cost > gas_limit {
        return Err(PrecompileError::OutOfGas);
    }

    let input = right_pad::<ADD_INPUT_LEN>(input);

    let output = crypto.bn128_g1_add(&input[..G1_LEN], &input[G1_LEN..])?;
    Ok(PrecompileOutput::new(gas_cost, Bytes::copy_from_slice(&output)))
}

/// Run the Bn128 mul precompile
///
/// Short input is right-padded with zeroes, bytes past [`MUL_INPUT_LEN`] are ignored.
pub fn run_mul(
    input: &[u8],
    gas_cost: u64,
    gas_limit: u64,
    crypto: &dyn Crypto,
) -> PrecompileResult {
    if gas_cost > gas_limit {
        return Err(PrecompileError::OutOfGas);
    }

    let input = right_pad::<MUL_INPUT_LEN>(input);

    let output = crypto.bn128_g1_mul(&input[..G1_LEN], &input[G1_LEN..])?;
    Ok(PrecompileOutput::new(gas_cost, Bytes::copy_from_slice(&output)))
}

/// Run the Bn128 pair precompile
///
/// The input must be a whole number of [`PAIR_ELEMENT_LEN`] chunks. Empty input
/// is a valid, trivially satisfied pairing check.
pub fn run_pair(
    input: &[u8],
    pair_per_point_cost: u64,
    pair_base_cost: u64,
    gas_limit: u64,
    crypto: &dyn Crypto,
) -> PrecompileResult {
    let gas_used = (input.len() / PAIR_ELEMENT_LEN) as u64 * pair_per_point_cost + pair_base_cost;
    if gas_used > gas_limit {
        return Err(PrecompileError::OutOfGas);
    }

    if input.len() % PAIR_ELEMENT_LEN != 0 {
        return Err(PrecompileError::Bn128PairLength);
    }

    let pairs: Vec<(&[u8], &[u8])> = input
        .chunks_exact(PAIR_ELEMENT_LEN)
        .map(|element| element.split_at(G1_LEN))
        .collect();

    let success = crypto.bn128_pairing_check(&pairs)?;
    Ok(PrecompileOutput::new(gas_used, bool_to_bytes32(success)))
}

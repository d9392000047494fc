//! # ecdiff-precompile
//!
//! The alt_bn128 precompiled contracts (`ecAdd` at 0x06, `ecMul` at 0x07 and
//! `ecPairing` at 0x08) as executed by the differential-testing oracle.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod bn128;
pub mod interface;
pub mod utilities;

pub use alloy_primitives::{self as primitives, Address, Bytes};
pub use interface::*;

use core::fmt;
use once_cell::race::OnceBox;
use std::collections::HashMap;

/// Gas limit the oracle executes every precompile with.
///
/// The oracle compares results only, so the limit is chosen to never be
/// reached on any input.
pub const UNLIMITED_GAS: u64 = u64::MAX;

/// Registry of the alt_bn128 precompiles, keyed by address.
#[derive(Clone, Default, Debug)]
pub struct Precompiles {
    /// Precompiles
    inner: HashMap<Address, PrecompileFn>,
}

impl Precompiles {
    /// Returns the precompiles with the ISTANBUL gas schedule (EIP-1108).
    pub fn istanbul() -> &'static Self {
        static INSTANCE: OnceBox<Precompiles> = OnceBox::new();
        INSTANCE.get_or_init(|| {
            let mut precompiles = Precompiles::default();
            precompiles.extend([
                // EIP-196: Precompiled contracts for addition and scalar multiplication on the elliptic curve alt_bn128.
                // EIP-197: Precompiled contracts for optimal ate pairing check on the elliptic curve alt_bn128.
                // EIP-1108: Reduce alt_bn128 precompile gas costs.
                bn128::add::ISTANBUL,
                bn128::mul::ISTANBUL,
                bn128::pair::ISTANBUL,
            ]);
            Box::new(precompiles)
        })
    }

    /// Returns the precompile for the given address.
    #[inline]
    pub fn get(&self, address: &Address) -> Option<&PrecompileFn> {
        self.inner.get(address)
    }

    /// Extends the precompiles with the given precompiles.
    ///
    /// Other precompiles with overwrite existing precompiles.
    #[inline]
    pub fn extend(&mut self, other: impl IntoIterator<Item = PrecompileWithAddress>) {
        self.inner
            .extend(other.into_iter().map(<(Address, PrecompileFn)>::from));
    }
}

/// A precompile function paired with the address it is installed at.
#[derive(Clone, Debug)]
pub struct PrecompileWithAddress(pub Address, pub PrecompileFn);

impl From<PrecompileWithAddress> for (Address, PrecompileFn) {
    fn from(value: PrecompileWithAddress) -> Self {
        (value.0, value.1)
    }
}

/// The precompiles the oracle can drive.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrecompileId {
    /// `ecAdd`, curve point addition.
    Bn128Add,
    /// `ecMul`, scalar multiplication.
    Bn128Mul,
    /// `ecPairing`, the pairing check.
    Bn128Pairing,
}

impl PrecompileId {
    /// Returns the address the precompile is installed at.
    pub const fn address(self) -> Address {
        match self {
            Self::Bn128Add => bn128::add::ADDRESS,
            Self::Bn128Mul => bn128::mul::ADDRESS,
            Self::Bn128Pairing => bn128::pair::ADDRESS,
        }
    }

    /// Returns the conventional name of the precompile.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bn128Add => "ecAdd",
            Self::Bn128Mul => "ecMul",
            Self::Bn128Pairing => "ecPairing",
        }
    }

    /// Returns the exact input length in bytes, `None` for the pairing check
    /// which takes any multiple of [`bn128::PAIR_ELEMENT_LEN`].
    pub const fn input_len(self) -> Option<usize> {
        match self {
            Self::Bn128Add => Some(bn128::ADD_INPUT_LEN),
            Self::Bn128Mul => Some(bn128::MUL_INPUT_LEN),
            Self::Bn128Pairing => None,
        }
    }

    /// Returns the output length in bytes.
    pub const fn output_len(self) -> usize {
        match self {
            Self::Bn128Add | Self::Bn128Mul => bn128::G1_LEN,
            Self::Bn128Pairing => 32,
        }
    }
}

impl fmt::Display for PrecompileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Executes the precompile on `input` with [`UNLIMITED_GAS`] and the default
/// curve backend.
pub fn run(id: PrecompileId, input: &[u8]) -> PrecompileResult {
    run_with_crypto(id, input, &DefaultCrypto)
}

/// Executes the precompile on `input` with [`UNLIMITED_GAS`] against the given
/// curve backend.
pub fn run_with_crypto(id: PrecompileId, input: &[u8], crypto: &dyn Crypto) -> PrecompileResult {
    tracing::debug!(
        precompile = %id,
        address = %id.address(),
        input_len = input.len(),
        "running precompile"
    );

    let precompile = Precompiles::istanbul()
        .get(&id.address())
        .ok_or_else(|| PrecompileError::other(format!("{id} is not installed")))?;

    let result = precompile(input, UNLIMITED_GAS, crypto);
    match &result {
        Ok(output) => {
            debug_assert_eq!(output.bytes.len(), id.output_len());
            tracing::debug!(
                precompile = %id,
                gas_used = output.gas_used,
                output_len = output.bytes.len(),
                "precompile succeeded"
            )
        }
        Err(err) => tracing::debug!(precompile = %id, %err, "precompile rejected input"),
    }
    result
}

/// Const function for making an address by concatenating the bytes from two given numbers.
///
/// Note that 32 + 128 = 160 = 20 bytes (the length of an address).
///
/// This function is used as a convenience for specifying the addresses of the various precompiles.
#[inline]
pub const fn u64_to_address(x: u64) -> Address {
    let x = x.to_be_bytes();
    Address::new([
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, x[0], x[1], x[2], x[3], x[4], x[5], x[6], x[7],
    ])
}

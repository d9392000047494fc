//! Command line surface of the oracle.
/// `ecAdd` adapter.
pub mod ecadd;
/// `ecMul` adapter.
pub mod ecmul;
/// `ecPairing` adapter.
pub mod ecpairing;
pub mod gen;

use crate::{
    decode::{decode_input, DecodeError, InputRule},
    output::{write_result, JsonResult, OutputError},
};
use clap::Parser;
use precompile::PrecompileId;
use std::io::Write;

/// Differential-testing oracle for the alt_bn128 precompiles.
#[derive(Parser, Debug)]
#[command(infer_subcommands = true, version)]
pub enum MainCmd {
    /// Run ecAdd (0x06) on a 128-byte hex input
    #[command(alias = "ecadd")]
    Add(ecadd::Cmd),
    /// Run ecMul (0x07) on a 96-byte hex input
    #[command(alias = "ecmul")]
    Mul(ecmul::Cmd),
    /// Run ecPairing (0x08) on a hex input made of 192-byte pairs
    #[command(alias = "ecpairing")]
    Pairing(ecpairing::Cmd),
    /// Generate a random input for one of the precompiles
    Gen(gen::Cmd),
}

/// Errors that abort the oracle without a JSON result.
///
/// A precompile rejecting its input is not one of them, that outcome is
/// reported on stdout.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The command line input is not a valid precompile input.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The result could not be written.
    #[error(transparent)]
    Output(#[from] OutputError),
    /// Input generation failed.
    #[error(transparent)]
    Gen(#[from] gen::Error),
}

impl MainCmd {
    /// Runs the selected subcommand, writing its JSON line to `out`.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<(), Error> {
        match self {
            Self::Add(cmd) => cmd.run(out),
            Self::Mul(cmd) => cmd.run(out),
            Self::Pairing(cmd) => cmd.run(out),
            Self::Gen(cmd) => cmd.run(out),
        }
    }
}

/// Decodes `input`, runs the precompile and writes the JSON result.
fn execute<W: Write>(id: PrecompileId, input: &str, out: &mut W) -> Result<(), Error> {
    let bytes = decode_input(input, InputRule::for_precompile(id))?;

    let result = precompile::run(id, &bytes);
    if let Err(err) = &result {
        tracing::warn!(precompile = %id, %err, "input rejected by precompile");
    }

    write_result(out, &JsonResult::from_precompile(&result))?;
    Ok(())
}

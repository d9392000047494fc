use super::{execute, Error};
use clap::Parser;
use precompile::PrecompileId;
use std::io::Write;

/// Runs the alt_bn128 point addition precompile (0x06)
///
/// Prints `{"success": true, "result": "0x..."}` with the 64-byte sum, or a
/// `PRECOMPILE_ERROR` object if a point is invalid.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Cmd {
    /// Two G1 points (128 bytes) as 256 hex characters, optionally prefixed with `0x`
    #[arg(value_name = "HEX")]
    input: String,
}

impl Cmd {
    /// Creates the command for the given hex input.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// Runs the precompile and writes the JSON result to `out`.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<(), Error> {
        execute(PrecompileId::Bn128Add, &self.input, out)
    }
}

use super::{execute, Error};
use clap::Parser;
use precompile::PrecompileId;
use std::io::Write;

/// Runs the alt_bn128 pairing check precompile (0x08)
///
/// Prints `{"success": true, "result": "0x..."}` with the 32-byte flag, or a
/// `PRECOMPILE_ERROR` object if a pair is malformed.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Cmd {
    /// Pairs of a G1 point and a G2 point (192 bytes each) as hex, optionally prefixed with `0x`
    ///
    /// Missing input is the empty input, a pairing check over zero pairs.
    #[arg(value_name = "HEX")]
    input: Option<String>,
}

impl Cmd {
    /// Creates the command for the given hex input.
    pub fn new(input: Option<String>) -> Self {
        Self { input }
    }

    /// Runs the precompile and writes the JSON result to `out`.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<(), Error> {
        execute(
            PrecompileId::Bn128Pairing,
            self.input.as_deref().unwrap_or_default(),
            out,
        )
    }
}

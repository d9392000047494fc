use super::{execute, Error};
use clap::Parser;
use precompile::PrecompileId;
use std::io::Write;

/// Runs the alt_bn128 scalar multiplication precompile (0x07)
///
/// Prints `{"success": true, "result": "0x..."}` with the 64-byte product, or
/// a `PRECOMPILE_ERROR` object if the point is invalid.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Cmd {
    /// A G1 point followed by a 32-byte scalar (96 bytes) as 192 hex characters, optionally prefixed with `0x`
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
        execute(PrecompileId::Bn128Mul, &self.input, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{JsonResult, PRECOMPILE_ERROR};
    use rstest::rstest;

    const G1: &str = "\
        0000000000000000000000000000000000000000000000000000000000000001\
        0000000000000000000000000000000000000000000000000000000000000002";
    const TWO_G1: &str = "\
        030644e72e131a029b85045b68181585d97816a916871ca8d3c208c16d87cfd3\
        15ed738c0e0a7c92e7845f96b2ae9c0a68a6a449e3538fc7ff3ebf7a5a18a2c4";
    const INFINITY: &str = "\
        0000000000000000000000000000000000000000000000000000000000000000\
        0000000000000000000000000000000000000000000000000000000000000000";
    /// The order of G1, multiplying by it is the same as multiplying by zero.
    const CURVE_ORDER: &str = "30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001";

    fn run(input: &str) -> JsonResult {
        let mut out = Vec::new();
        Cmd::new(input).run(&mut out).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    fn scalar(n: u8) -> String {
        format!("{}{n:02x}", "0".repeat(62))
    }

    #[rstest]
    #[case::by_zero(format!("{G1}{}", scalar(0)), INFINITY)]
    #[case::by_one(format!("{G1}{}", scalar(1)), G1)]
    #[case::by_two(format!("0x{G1}{}", scalar(2)), TWO_G1)]
    #[case::by_order(format!("{G1}{CURVE_ORDER}"), INFINITY)]
    #[case::infinity(format!("{INFINITY}{}", "f".repeat(64)), INFINITY)]
    fn multiplies(#[case] input: String, #[case] expected: &str) {
        assert_eq!(run(&input), JsonResult::success(hex::decode(expected).unwrap()));
    }

    #[test]
    fn point_off_curve_is_a_precompile_error() {
        let input = format!("{}{}", "11".repeat(64), scalar(15));
        let result = run(&input);
        assert!(!result.success);
        assert_eq!(result.error_code.as_deref(), Some(PRECOMPILE_ERROR));
        assert!(result.result.is_none());
    }

    #[test]
    fn wrong_length_is_a_decode_error() {
        let mut out = Vec::new();
        let res = Cmd::new(format!("{G1}{G1}")).run(&mut out);
        assert!(matches!(res, Err(Error::Decode(_))));
        assert!(out.is_empty());
    }
}

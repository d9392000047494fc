//! Decoding of the hex-encoded precompile input passed on the command line.
use precompile::PrecompileId;

/// Length rule the decoded input has to satisfy before the precompile runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputRule {
    /// Exactly this many bytes.
    Exact(usize),
    /// Any length. The precompile validates it.
    Any,
}

impl InputRule {
    /// Returns the rule for the given precompile.
    ///
    /// `ecAdd` and `ecMul` take fixed-size inputs. `ecPairing` leaves the
    /// length check to the precompile so that a bad chunk count surfaces as a
    /// precompile error.
    pub const fn for_precompile(id: PrecompileId) -> Self {
        match id.input_len() {
            Some(len) => Self::Exact(len),
            None => Self::Any,
        }
    }
}

/// Input decoding errors.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The hex string does not encode the expected number of bytes.
    #[error(
        "Input must be a {expected_bytes}-byte ({} character) hex string, optionally prefixed with '0x'",
        .expected_bytes * 2
    )]
    InvalidLength {
        /// Number of bytes the input has to decode to.
        expected_bytes: usize,
        /// Number of hex characters found after the prefix.
        found_chars: usize,
    },
    /// The string is not valid hex.
    #[error("Error decoding hex input: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Strips a single leading `0x` or `0X`.
#[inline]
pub fn strip_hex_prefix(input: &str) -> &str {
    input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input)
}

/// Decodes `input` into the raw precompile input.
///
/// The length is checked before the hex digits so a short input with bad
/// characters reports the length.
pub fn decode_input(input: &str, rule: InputRule) -> Result<Vec<u8>, DecodeError> {
    let hex_input = strip_hex_prefix(input);

    if let InputRule::Exact(expected_bytes) = rule {
        if hex_input.len() != expected_bytes * 2 {
            return Err(DecodeError::InvalidLength {
                expected_bytes,
                found_chars: hex_input.len(),
            });
        }
    }

    Ok(hex::decode(hex_input)?)
}

//! The JSON line the oracle prints for every executed precompile.
use precompile::{PrecompileError, PrecompileResult};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// `error_code` reported when the precompile rejects its input.
pub const PRECOMPILE_ERROR: &str = "PRECOMPILE_ERROR";

/// Prefix of the `error` message reported when the precompile rejects its input.
pub const PRECOMPILE_ERROR_PREFIX: &str = "Error running precompile: ";

/// Result object read by the differential harness.
///
/// Absent fields are left out of the JSON instead of being written as `null`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonResult {
    /// Whether the precompile succeeded.
    pub success: bool,
    /// `0x`-prefixed lowercase hex of the output bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Human readable error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine readable error class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl JsonResult {
    /// Successful result carrying `bytes`.
    pub fn success(bytes: impl AsRef<[u8]>) -> Self {
        Self {
            success: true,
            result: Some(format!("0x{}", hex::encode(bytes))),
            error: None,
            error_code: None,
        }
    }

    /// Failed result with the given message and code.
    pub fn failure(error: impl Into<String>, error_code: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
            error_code: Some(error_code.into()),
        }
    }

    /// Failure reported for a precompile that rejected its input.
    pub fn precompile_error(err: &PrecompileError) -> Self {
        Self::failure(format!("{PRECOMPILE_ERROR_PREFIX}{err}"), PRECOMPILE_ERROR)
    }

    /// Converts the precompile outcome. Rejections become a failure object,
    /// they are not an error of the oracle itself.
    pub fn from_precompile(result: &PrecompileResult) -> Self {
        match result {
            Ok(output) => Self::success(&output.bytes),
            Err(err) => Self::precompile_error(err),
        }
    }
}

/// Errors writing the result line.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// Serialization failed.
    #[error("failed to serialize result: {0}")]
    Json(#[from] serde_json::Error),
    /// Writing to the output stream failed.
    #[error("failed to write result: {0}")]
    Io(#[from] io::Error),
}

/// Writes `result` as a single JSON line and flushes the writer.
pub fn write_result<W: Write>(out: &mut W, result: &JsonResult) -> Result<(), OutputError> {
    serde_json::to_writer(&mut *out, result)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

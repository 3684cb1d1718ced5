//! Error types for telemetry line handling
//!
//! Decode failures are expected in normal operation (partial serial lines,
//! garbled radio frames) and are never fatal: the policy everywhere is to
//! drop the line and keep reading. Errors are therefore small `Copy` types
//! with inline context, following the same constraints as the rest of the
//! no_std surface - no heap allocation, `&'static str` only.
//!
//! A header row echoed by a source is deliberately *not* an error; it is
//! modeled as [`crate::codec::Decoded::Header`] so callers can skip it
//! without logging noise. Likewise, querying a board that has not sent
//! anything yet yields `Option::None` from the aggregator, not an error.

use thiserror_no_std::Error;

/// Result type for line decoding
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Reasons a telemetry line fails to decode
///
/// Policy for all variants: drop the line, count it, continue.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The line does not have the arity of the active schema
    #[error("expected {expected} fields, got {found}")]
    WrongFieldCount {
        /// Field count required by the schema in use
        expected: usize,
        /// Field count actually present on the line
        found: usize,
    },

    /// A numeric field did not parse as a floating-point value
    #[error("field `{field}` is not a number")]
    InvalidNumber {
        /// Name of the offending column
        field: &'static str,
    },

    /// The phase field exceeds the inline token capacity
    #[error("phase token exceeds {max} bytes", max = crate::constants::MAX_PHASE_TOKEN)]
    PhaseTooLong,
}

/// Reasons a reading fails to encode
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// The encoded line would exceed the fixed line buffer
    #[error("encoded line exceeds {max} bytes", max = crate::constants::MAX_LINE_LEN)]
    LineTooLong,
}

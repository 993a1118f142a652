//! Decode errors following the panic-free policy.

use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

/// Errors produced while decoding a status line.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The line has no `:` separator.
    #[error("invalid key/value pair")]
    InvalidKeyValuePair,

    /// A duration value has no space between number and unit.
    #[error("invalid time duration: {0:?}")]
    InvalidDuration(String),

    /// A duration value failed the duration grammar.
    #[error(transparent)]
    Duration(#[from] DurationError),

    /// Neither timestamp layout matched.
    #[error("can't parse time: {0:?}")]
    InvalidTime(String),

    #[error(transparent)]
    Float(#[from] ParseFloatError),

    #[error(transparent)]
    Int(#[from] ParseIntError),
}

/// Errors from the compact duration grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("empty duration")]
    Empty,

    #[error("negative duration: {0:?}")]
    Negative(String),

    #[error("invalid number in duration {0:?}")]
    InvalidNumber(String),

    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),

    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit { unit: String, input: String },

    #[error("duration out of range: {0:?}")]
    Overflow(String),
}

/// Result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_time_names_value() {
        let error = DecodeError::InvalidTime("yesterday".to_string());
        assert_eq!(error.to_string(), "can't parse time: \"yesterday\"");
    }

    #[test]
    fn test_float_error_is_transparent() {
        let source = "abc".parse::<f64>().unwrap_err();
        let error: DecodeError = source.clone().into();
        assert_eq!(error.to_string(), source.to_string());
    }

    #[test]
    fn test_unknown_unit_display() {
        let error = DurationError::UnknownUnit {
            unit: "d".to_string(),
            input: "3d".to_string(),
        };
        assert!(error.to_string().contains("unknown unit \"d\""));
    }
}

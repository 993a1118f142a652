//! Error types for the NIS client.
//!
//! Every failure aborts the exchange it happened in; nothing is retried and
//! no partial report is returned.
//!
//! **Panic-Free Policy:** This module follows the project's panic-free guidelines.
//! No `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`, or `todo!()`.

use std::io;
use std::time::Duration;

use apc_core::DecodeError;
use apc_protocol::FrameError;
use thiserror::Error;

// ============================================================================
// Client Error Type
// ============================================================================

/// NIS client errors.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The TCP connection could not be established.
    #[error("Failed to connect to NIS at {addr}: {source}")]
    Dial {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// The dial deadline elapsed before the connection completed.
    #[error("Timed out after {timeout:?} connecting to NIS at {addr}")]
    DialTimeout { addr: String, timeout: Duration },

    /// The caller cancelled the dial before the connection completed.
    #[error("Connection to NIS at {addr} was cancelled")]
    Cancelled { addr: String },

    /// The status exchange did not finish within the request timeout.
    ///
    /// The connection may hold part of an unread reply; drop the client.
    #[error("Timed out after {0:?} waiting for status reply")]
    RequestTimeout(Duration),

    /// Framing or transport error on an established connection.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// A status line could not be decoded.
    #[error("Failed to decode status: {0}")]
    Decode(#[from] DecodeError),
}

impl ClientError {
    /// Returns true if the error was caused by a deadline elapsing.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::DialTimeout { .. } | Self::RequestTimeout(_) => true,
            Self::Dial { source, .. } => source.kind() == io::ErrorKind::TimedOut,
            Self::Frame(FrameError::Io(e)) => e.kind() == io::ErrorKind::TimedOut,
            _ => false,
        }
    }
}

impl From<io::Error> for ClientError {
    fn from(e: io::Error) -> Self {
        Self::Frame(FrameError::Io(e))
    }
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Convenience Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dial_error_display() {
        let error = ClientError::Dial {
            addr: "ups:3551".to_string(),
            source: io::Error::new(io::ErrorKind::ConnectionRefused, "refused"),
        };
        let display = format!("{error}");
        assert!(display.contains("Failed to connect to NIS at ups:3551"));
        assert!(display.contains("refused"));
        assert!(!error.is_timeout());
    }

    #[test]
    fn test_dial_timeout_is_timeout() {
        let error = ClientError::DialTimeout {
            addr: "ups:3551".to_string(),
            timeout: Duration::from_secs(5),
        };
        assert!(error.is_timeout());
        assert!(format!("{error}").contains("5s"));
    }

    #[test]
    fn test_cancelled_is_not_timeout() {
        let error = ClientError::Cancelled {
            addr: "ups:3551".to_string(),
        };
        assert!(!error.is_timeout());
    }

    #[test]
    fn test_io_timeout_is_timeout() {
        let error: ClientError = io::Error::new(io::ErrorKind::TimedOut, "slow").into();
        assert!(matches!(error, ClientError::Frame(FrameError::Io(_))));
        assert!(error.is_timeout());
    }

    #[test]
    fn test_decode_error_from_conversion() {
        let error: ClientError = DecodeError::InvalidKeyValuePair.into();
        assert!(matches!(error, ClientError::Decode(_)));
        assert_eq!(
            format!("{error}"),
            "Failed to decode status: invalid key/value pair"
        );
    }

    #[test]
    fn test_buffer_too_large_is_transparent() {
        let error: ClientError = FrameError::BufferTooLarge { len: 70_000 }.into();
        assert!(format!("{error}").starts_with("buffer too large"));
    }
}

//! APC Core - Status types for apcupsd NIS clients
//!
//! This crate provides the [`StatusReport`] a NIS status exchange produces and
//! the decoder that fills it one `KEY : VALUE` line at a time.
//!
//! All code follows the panic-free policy: no `.unwrap()`, `.expect()`,
//! `panic!()`, `unreachable!()`, `todo!()`, or direct indexing `[i]`.

pub mod duration;
pub mod error;
pub mod key;
pub mod status;
pub mod time;

// Re-exports for convenience
pub use duration::{parse_compact, parse_nis_duration};
pub use error::{DecodeError, DecodeResult, DurationError};
pub use key::{FieldKind, Key};
pub use status::{FieldValue, StatusReport};
pub use time::parse_optional_time;

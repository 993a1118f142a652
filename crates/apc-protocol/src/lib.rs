//! APC Protocol - Wire framing for apcupsd NIS communication
//!
//! This crate provides [`NisStream`], which turns any async byte stream into
//! a reader and writer of length-prefixed NIS records.

pub mod frame;

pub use frame::{FrameError, NisStream, Result, MAX_RECORD_LEN, RECORD_HEADER_LEN};

/// The only command this client sends.
pub const STATUS_COMMAND: &[u8] = b"status";

/// Port apcupsd's NIS listens on by default.
pub const DEFAULT_NIS_PORT: u16 = 3551;

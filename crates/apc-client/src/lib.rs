//! APC Client - apcupsd Network Information Server client
//!
//! This library connects to a NIS, issues the `status` command and decodes
//! the reply into an [`apc_core::StatusReport`].
//!
//! # Exchange
//!
//! ```text
//! client ──▶ 00 06 "status"
//! client ◀── 00 24 "DATE     : 2016-09-06 22:13:28 -0400"
//! client ◀── ...
//! client ◀── 00 00
//! ```
//!
//! There is no retry: every error aborts the exchange and is returned to the
//! caller.

pub mod client;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use apc_core::StatusReport;
pub use client::Client;
pub use config::ClientConfig;
pub use error::{ClientError, Result};

//! Connection settings for the NIS client.

use std::env;
use std::time::Duration;

/// Default NIS address: apcupsd on the local host.
pub const DEFAULT_ADDR: &str = "localhost:3551";

/// Environment variable that overrides the NIS address.
pub const ADDR_ENV: &str = "APC_NIS_ADDR";

/// Configuration for the NIS client.
///
/// # Example
///
/// ```rust
/// use apc_client::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig {
///     addr: "ups.example.net:3551".to_string(),
///     dial_timeout: Duration::from_secs(2),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// `host:port` of the NIS.
    pub addr: String,

    /// Deadline for establishing the TCP connection.
    pub dial_timeout: Duration,

    /// Deadline for one whole status exchange. `None` waits forever.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            dial_timeout: Duration::from_secs(5),
            request_timeout: Some(Duration::from_secs(10)),
        }
    }
}

impl ClientConfig {
    /// Default configuration with the address taken from `APC_NIS_ADDR`, if set.
    pub fn from_env() -> Self {
        Self::default().with_addr_override(env::var(ADDR_ENV).ok())
    }

    fn with_addr_override(mut self, addr: Option<String>) -> Self {
        if let Some(addr) = addr.filter(|a| !a.trim().is_empty()) {
            self.addr = addr.trim().to_string();
        }
        self
    }
}

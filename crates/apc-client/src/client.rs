//! NIS client for apcupsd.
//!
//! This module provides the [`Client`] which handles:
//! - Connecting to a NIS over TCP, with a deadline or a cancellation token
//! - Sending the `status` command as one NIS record
//! - Collecting reply records until the end-of-reply record
//! - Decoding every reply line into a [`StatusReport`]
//!
//! **Panic-Free Policy:** This module follows the project's panic-free guidelines.
//! No `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`, or `todo!()`.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use apc_core::StatusReport;
use apc_protocol::{NisStream, STATUS_COMMAND};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

// ============================================================================
// Client
// ============================================================================

/// Client for an apcupsd Network Information Server.
///
/// One client owns one connection and runs one exchange at a time; `status`
/// takes `&mut self`, so exchanges on the same client cannot overlap.
///
/// # Example
///
/// ```rust,ignore
/// use apc_client::Client;
/// use std::time::Duration;
///
/// let mut client = Client::dial_timeout("localhost:3551", Duration::from_secs(5)).await?;
/// let status = client.status().await?;
/// println!("{} is {}", status.ups_name, status.status);
/// client.close().await?;
/// ```
#[derive(Debug)]
pub struct Client<S = TcpStream> {
    /// Record-framed connection to the NIS.
    stream: NisStream<S>,

    /// Deadline applied to each exchange.
    request_timeout: Option<Duration>,
}

impl Client<TcpStream> {
    /// Connects to the NIS at `addr` without a deadline.
    pub async fn dial(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| ClientError::Dial {
                addr: addr.to_string(),
                source,
            })?;

        debug!(addr, "Connected to NIS");
        Ok(Self::new(stream))
    }

    /// Connects to the NIS at `addr`, giving up once `limit` elapses.
    ///
    /// A deadline that has already passed fails even when the connection
    /// could complete immediately.
    pub async fn dial_timeout(addr: &str, limit: Duration) -> Result<Self> {
        let timed_out = || ClientError::DialTimeout {
            addr: addr.to_string(),
            timeout: limit,
        };

        if limit.is_zero() {
            return Err(timed_out());
        }

        tokio::select! {
            biased;
            _ = sleep(limit) => {
                debug!(addr, ?limit, "Connection timed out");
                Err(timed_out())
            }
            result = Self::dial(addr) => result,
        }
    }

    /// Connects to the NIS at `addr`, giving up when `cancel_token` fires.
    ///
    /// A token that is already cancelled wins over a connection that could
    /// complete immediately.
    pub async fn dial_with_cancel(addr: &str, cancel_token: &CancellationToken) -> Result<Self> {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                info!(addr, "Connection cancelled");
                Err(ClientError::Cancelled { addr: addr.to_string() })
            }
            result = Self::dial(addr) => result,
        }
    }

    /// Connects using `config`, applying its request timeout to every exchange.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let client = Self::dial_timeout(&config.addr, config.dial_timeout).await?;
        Ok(client.with_request_timeout(config.request_timeout))
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> Client<S> {
    /// Wraps an established duplex stream.
    #[must_use]
    pub fn new(stream: S) -> Self {
        Self {
            stream: NisStream::new(stream),
            request_timeout: None,
        }
    }

    /// Sets the deadline for each status exchange.
    #[must_use]
    pub fn with_request_timeout(mut self, request_timeout: Option<Duration>) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Requests and decodes the current UPS status.
    ///
    /// Returns the fully decoded report, or the first error hit while
    /// writing, reading or decoding.
    pub async fn status(&mut self) -> Result<StatusReport> {
        match self.request_timeout {
            Some(limit) => timeout(limit, self.exchange())
                .await
                .map_err(|_| ClientError::RequestTimeout(limit))?,
            None => self.exchange().await,
        }
    }

    /// Shuts down the connection.
    pub async fn close(mut self) -> Result<()> {
        self.stream.close().await?;
        Ok(())
    }

    async fn exchange(&mut self) -> Result<StatusReport> {
        self.stream.write(STATUS_COMMAND).await?;
        debug!("Sent status command");

        // Record boundaries are line boundaries; records may also embed
        // their own line separators.
        let mut text = String::new();
        let mut records = 0usize;
        while let Some(record) = self.stream.read_record().await? {
            records += 1;
            text.push_str(&String::from_utf8_lossy(&record));
            text.push('\n');
        }

        debug!(records, bytes = text.len(), "Received status reply");

        Ok(StatusReport::from_lines(text.lines())?)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use apc_core::DecodeError;
    use apc_protocol::FrameError;
    use tokio::io::{duplex, DuplexStream};

    /// Serves one status exchange per entry in `replies` on the far end of a pipe.
    fn spawn_fake_nis(replies: Vec<Vec<&'static str>>) -> Client<DuplexStream> {
        let (client_end, server_end) = duplex(4096);

        tokio::spawn(async move {
            let mut server = NisStream::new(server_end);
            for records in replies {
                let command = server.read_record().await.unwrap();
                assert_eq!(command.as_deref(), Some(STATUS_COMMAND));
                // The client never sends an end-of-request record.
                for record in records {
                    server.write(record.as_bytes()).await.unwrap();
                }
                server.write(&[]).await.unwrap();
            }
        });

        Client::new(client_end)
    }

    #[tokio::test]
    async fn test_status_decodes_records() {
        let mut client = spawn_fake_nis(vec![vec![
            "HOSTNAME : example",
            "STATUS   : ONLINE ",
            "BCHARGE  : 100.0 Percent",
        ]]);

        let status = client.status().await.unwrap();

        assert_eq!(status.hostname, "example");
        assert_eq!(status.status, "ONLINE");
        assert!((status.battery_charge_percent - 100.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_status_unknown_keys_only() {
        let mut client = spawn_fake_nis(vec![vec!["FOO : BAR"]]);

        let status = client.status().await.unwrap();

        assert_eq!(status, StatusReport::default());
    }

    #[tokio::test]
    async fn test_status_splits_embedded_lines() {
        let mut client = spawn_fake_nis(vec![vec![
            "HOSTNAME : example\nSTATUS   : ONBATT\r\n",
            "\n",
        ]]);

        let status = client.status().await.unwrap();

        assert_eq!(status.hostname, "example");
        assert_eq!(status.status, "ONBATT");
    }

    #[tokio::test]
    async fn test_status_decode_error_aborts() {
        let mut client = spawn_fake_nis(vec![vec!["STATUS : ONLINE", "garbage"]]);

        let err = client.status().await.unwrap_err();

        assert!(matches!(
            err,
            ClientError::Decode(DecodeError::InvalidKeyValuePair)
        ));
    }

    #[tokio::test]
    async fn test_two_exchanges_on_one_connection() {
        let mut client = spawn_fake_nis(vec![
            vec!["LOADPCT : 10.0 Percent"],
            vec!["LOADPCT : 20.0 Percent"],
        ]);

        let first = client.status().await.unwrap();
        let second = client.status().await.unwrap();

        assert!((first.load_percent - 10.0).abs() < f64::EPSILON);
        assert!((second.load_percent - 20.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_connection_closed_mid_reply() {
        let (client_end, server_end) = duplex(4096);
        tokio::spawn(async move {
            let mut server = NisStream::new(server_end);
            let _ = server.read_record().await;
            server.write(b"HOSTNAME : example").await.unwrap();
            // Dropped without the end-of-reply record.
        });

        let mut client = Client::new(client_end);
        let err = client.status().await.unwrap_err();

        assert!(matches!(err, ClientError::Frame(FrameError::Io(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_timeout() {
        let (client_end, _server_end) = duplex(4096);
        let mut client =
            Client::new(client_end).with_request_timeout(Some(Duration::from_millis(50)));

        let err = client.status().await.unwrap_err();

        assert!(matches!(err, ClientError::RequestTimeout(d) if d == Duration::from_millis(50)));
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_dial_with_cancelled_token() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let cancel_token = CancellationToken::new();
        cancel_token.cancel();

        let err = Client::dial_with_cancel(&addr, &cancel_token)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Cancelled { .. }));
    }

    #[tokio::test]
    async fn test_dial_timeout_elapsed() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let err = Client::dial_timeout(&addr, Duration::ZERO)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ClientError::DialTimeout { timeout, .. } if timeout == Duration::ZERO
        ));
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_dial_timeout_connects_within_limit() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let client = Client::dial_timeout(&addr, Duration::from_secs(5)).await;

        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_dial_refused() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let err = Client::dial(&addr).await.unwrap_err();

        assert!(matches!(err, ClientError::Dial { .. }));
    }
}

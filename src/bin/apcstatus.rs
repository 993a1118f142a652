//! apcstatus - print the status of a UPS monitored by apcupsd
//!
//! Connects to an apcupsd Network Information Server, runs one status
//! exchange and prints the decoded report.
//!
//! # Usage
//!
//! ```bash
//! # Query the local daemon
//! apcstatus
//!
//! # Query a remote NIS, as JSON
//! apcstatus --addr ups.example.net:3551 --json
//!
//! # Address from the environment
//! APC_NIS_ADDR=nas:3551 apcstatus
//!
//! # Enable debug logging
//! RUST_LOG=apc_client=debug apcstatus
//! ```

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use apc_client::config::{ADDR_ENV, DEFAULT_ADDR};
use apc_client::{Client, ClientConfig};
use apc_core::StatusReport;

/// Print UPS status from an apcupsd NIS
#[derive(Parser, Debug)]
#[command(name = "apcstatus", version, about)]
struct Args {
    /// NIS address as host:port
    #[arg(short, long, env = ADDR_ENV, default_value = DEFAULT_ADDR)]
    addr: String,

    /// Seconds to wait for the connection and for the reply
    #[arg(short, long, default_value_t = 5)]
    timeout: u64,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .init();

    let limit = Duration::from_secs(args.timeout);
    let config = ClientConfig {
        addr: args.addr,
        dial_timeout: limit,
        request_timeout: Some(limit),
    };
    debug!(?config, "Connecting");

    let mut client = Client::connect(&config)
        .await
        .with_context(|| format!("Failed to reach NIS at {}", config.addr))?;
    let status = client
        .status()
        .await
        .context("Failed to read UPS status")?;
    client.close().await.context("Failed to close connection")?;

    info!(ups = %status.ups_name, status = %status.status, "Status received");

    let mut stdout = io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut stdout, &status)?;
        writeln!(stdout)?;
    } else {
        write_report(&mut stdout, &status)?;
    }

    Ok(())
}

/// Default log directives when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "apcstatus=info,apc_client=info";

/// Builds the log filter from `RUST_LOG`, falling back to [`DEFAULT_LOG_FILTER`].
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Writes one `KEY : VALUE` line per populated field, apcaccess style.
fn write_report<W: Write>(out: &mut W, status: &StatusReport) -> io::Result<()> {
    for (key, value) in status.populated() {
        writeln!(out, "{:<9}: {}", key.as_str(), value)?;
    }
    Ok(())
}

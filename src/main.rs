//! buffer-receiver: a one-shot diagnostic receiver
//!
//! Listens on a fixed TCP port, accepts a single connection and reads one
//! length-prefixed buffer from it (typically a framebuffer dump from a
//! device under debug). The buffer is then written to disk:
//! - `bin`: raw bytes to `buffer.bin`
//! - `png`: decoded as 128x128 RGB565 to `buffer.png`
//!
//! Buffers under 2 KiB are also hex dumped to the log.

mod config;
mod error;
mod frame;
mod hexdump;
mod output;
mod receiver;
mod rgb565;
#[cfg(test)]
mod test_support;

use config::Config;
use receiver::Receiver;
use std::net::{Ipv4Addr, SocketAddr};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Configuration errors are fatal before anything touches the network
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = config.port,
        format = %config.format,
        output_dir = %config.output_dir.display(),
        "Starting buffer-receiver"
    );

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Receive failed");
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    let receiver = Receiver::bind(addr)?;
    info!(address = %receiver.local_addr()?, "Waiting for connection");

    let report = receiver.receive_one(config.format, &config.output_dir)?;
    info!(
        path = %report.path.display(),
        declared = report.declared_length,
        clamped = report.clamped,
        received = report.received,
        "Done"
    );
    Ok(())
}

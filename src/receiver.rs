//! One-shot TCP receiver.
//!
//! Binds, accepts a single connection, drains one frame from it and writes
//! the result to disk. There is no loop: the listener and the connection
//! are closed when [`Receiver::receive_one`] returns, whatever the outcome.

use std::net::{SocketAddr, TcpListener};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::OutputFormat;
use crate::error::{ReceiveError, Result};
use crate::frame;
use crate::hexdump;
use crate::output;

/// Pending connections allowed on the listener.
const BACKLOG: i32 = 1;

/// Outcome of a successful run.
#[derive(Debug)]
pub struct Report {
    pub path: PathBuf,
    pub declared_length: u32,
    pub clamped: bool,
    pub received: usize,
}

/// Bound listener waiting for its one client.
pub struct Receiver {
    listener: TcpListener,
}

impl Receiver {
    /// Bind a blocking listener on `addr`.
    pub fn bind(addr: SocketAddr) -> Result<Self> {
        let listener =
            create_listener(addr).map_err(|source| ReceiveError::Bind { addr, source })?;
        Ok(Self { listener })
    }

    /// Address actually bound (useful when binding port 0).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve exactly one connection and persist its buffer.
    pub fn receive_one(self, format: OutputFormat, dir: &Path) -> Result<Report> {
        let (mut stream, peer) = self.listener.accept().map_err(ReceiveError::Accept)?;
        info!(peer = %peer, "Accepted connection");

        stream.set_read_timeout(None).map_err(ReceiveError::Read)?;

        let frame = frame::read_frame(&mut stream)?;

        let overread = frame.overread();
        if overread > 0 {
            warn!("got {} more bytes than expected!", overread);
        }

        let payload = &frame.payload[..];
        echo_payload(payload);

        let path = output::persist(format, dir, payload)?;

        Ok(Report {
            path,
            declared_length: frame.declared_length,
            clamped: frame.clamped,
            received: payload.len(),
        })
    }
}

/// Hex dump small buffers to the log, skip large ones.
fn echo_payload(payload: &[u8]) {
    if !hexdump::should_dump(payload.len()) {
        debug!(bytes = payload.len(), "Buffer too large to dump");
        return;
    }
    for line in hexdump::dump(payload).lines() {
        info!("{line}");
    }
}

fn create_listener(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let socket = socket2::Socket::new(
        match addr {
            SocketAddr::V4(_) => socket2::Domain::IPV4,
            SocketAddr::V6(_) => socket2::Domain::IPV6,
        },
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nonblocking(false)?;
    socket.bind(&addr.into())?;
    socket.listen(BACKLOG)?;

    Ok(socket.into())
}

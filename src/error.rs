//! Error types for the receive path.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Every way a receive run can fail. All of them are fatal.
#[derive(Error, Debug)]
pub enum ReceiveError {
    #[error("failed to bind {addr}: {source}")]
    Bind { addr: SocketAddr, source: io::Error },

    #[error("failed to accept connection: {0}")]
    Accept(#[source] io::Error),

    #[error("got wrong number of bytes, expected 4 but got {got}")]
    ShortPrefix { got: usize },

    #[error("read failed: {0}")]
    Read(#[source] io::Error),

    #[error("connection closed after {received} of {expected} bytes")]
    ConnectionClosed { received: usize, expected: usize },

    #[error("buffer of {len} bytes is too short for a 128x128 image ({needed} bytes needed)")]
    ImageTooShort { len: usize, needed: usize },

    #[error("failed to write '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to encode '{}': {source}", path.display())]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, ReceiveError>;

//! Length-prefixed frame reader.
//!
//! Wire format for the single exchange:
//!
//! ```text
//! +----------------------+---------------------------+
//! | length: u32 LE (4 B) | payload (length bytes...) |
//! +----------------------+---------------------------+
//! ```
//!
//! The payload is drained in small fixed-size reads. A peer that sends more
//! than it declared is tolerated: whatever the last read brought in is kept.

use bytes::BytesMut;
use std::io::{ErrorKind, Read};
use tracing::{info, trace, warn};

use crate::error::{ReceiveError, Result};

/// Size of the length prefix.
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Largest declared length accepted as-is (1 MiB).
pub const MAX_DECLARED_LEN: u32 = 1024 * 1024;

/// Length substituted when the declared length is over the limit.
pub const FALLBACK_LEN: u32 = 10;

/// Intermediate read size while draining the payload.
pub const READ_CHUNK: usize = 128;

/// One received buffer.
#[derive(Debug)]
pub struct Frame {
    /// Length after clamping.
    pub declared_length: u32,
    /// Whether the prefix was over the limit and replaced.
    pub clamped: bool,
    /// Everything read after the prefix.
    pub payload: BytesMut,
}

impl Frame {
    /// Bytes received beyond the declared length.
    pub fn overread(&self) -> usize {
        self.payload
            .len()
            .saturating_sub(self.declared_length as usize)
    }
}

/// Decode the little-endian length prefix.
pub fn decode_length(prefix: [u8; LENGTH_PREFIX_LEN]) -> u32 {
    u32::from_le_bytes(prefix)
}

/// Replace an oversized declared length with [`FALLBACK_LEN`].
pub fn clamp_length(declared: u32) -> u32 {
    if declared > MAX_DECLARED_LEN {
        FALLBACK_LEN
    } else {
        declared
    }
}

/// Read the length prefix and then the payload from `reader`.
///
/// Any read error, or the peer going away before the declared length has
/// arrived, fails the whole frame. Nothing read so far is returned.
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Frame> {
    let prefix = read_prefix(reader)?;
    let raw = decode_length(prefix);
    let declared_length = clamp_length(raw);
    let clamped = declared_length != raw;
    if clamped {
        warn!(
            declared = raw,
            limit = MAX_DECLARED_LEN,
            fallback = FALLBACK_LEN,
            "Declared length over limit, using fallback"
        );
    }
    info!("ready for buffer of size {}", declared_length);

    let expected = declared_length as usize;
    let mut payload = BytesMut::with_capacity(expected);
    let mut chunk = [0u8; READ_CHUNK];

    while payload.len() < expected {
        let n = match reader.read(&mut chunk) {
            Ok(0) => {
                return Err(ReceiveError::ConnectionClosed {
                    received: payload.len(),
                    expected,
                })
            }
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(ReceiveError::Read(e)),
        };
        payload.extend_from_slice(&chunk[..n]);
        trace!(read = n, total = payload.len(), expected, "Payload chunk");
    }

    Ok(Frame {
        declared_length,
        clamped,
        payload,
    })
}

fn read_prefix<R: Read>(reader: &mut R) -> Result<[u8; LENGTH_PREFIX_LEN]> {
    let mut prefix = [0u8; LENGTH_PREFIX_LEN];
    let mut got = 0;

    while got < LENGTH_PREFIX_LEN {
        match reader.read(&mut prefix[got..]) {
            Ok(0) => return Err(ReceiveError::ShortPrefix { got }),
            Ok(n) => got += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(ReceiveError::Read(e)),
        }
    }

    Ok(prefix)
}

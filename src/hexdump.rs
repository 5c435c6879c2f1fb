//! Canonical hex dump rendering for small buffers.
//!
//! ```text
//! 00000000  68 65 6c 6c 6f 20 77 6f  72 6c 64 0a              |hello world.|
//! ```

use std::fmt::Write;

/// Buffers at or above this size are not dumped.
pub const DUMP_LIMIT: usize = 2048;

const BYTES_PER_LINE: usize = 16;

/// Width of the hex column including its trailing separator.
const HEX_WIDTH: usize = BYTES_PER_LINE * 3 + 2;

/// Whether a buffer of `len` bytes is small enough to dump.
pub fn should_dump(len: usize) -> bool {
    len < DUMP_LIMIT
}

/// Render `data` as offset / hex / ASCII lines, each ending in `\n`.
pub fn dump(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(BYTES_PER_LINE) * 79);

    for (line, chunk) in data.chunks(BYTES_PER_LINE).enumerate() {
        let mut hex = String::with_capacity(HEX_WIDTH);
        for (i, byte) in chunk.iter().enumerate() {
            let _ = write!(hex, "{byte:02x} ");
            if i == 7 || i == 15 {
                hex.push(' ');
            }
        }

        let ascii: String = chunk
            .iter()
            .map(|&b| {
                if (0x20..=0x7e).contains(&b) {
                    b as char
                } else {
                    '.'
                }
            })
            .collect();

        let _ = writeln!(
            out,
            "{:08x}  {hex:<width$}|{ascii}|",
            line * BYTES_PER_LINE,
            width = HEX_WIDTH
        );
    }

    out
}

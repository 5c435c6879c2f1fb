//! Persisting the received buffer.
//!
//! Exactly one file is written per run, always under the same name for a
//! given format, replacing whatever was there.

use image::ImageFormat;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::OutputFormat;
use crate::error::{ReceiveError, Result};
use crate::rgb565;

pub const BIN_FILE: &str = "buffer.bin";
pub const PNG_FILE: &str = "buffer.png";

/// Mode for newly created output files (owner read-write, others read).
#[cfg(unix)]
const FILE_MODE: u32 = 0o644;

/// Write `data` in `format` under `dir` and return the file path.
pub fn persist(format: OutputFormat, dir: &Path, data: &[u8]) -> Result<PathBuf> {
    let path = match format {
        OutputFormat::Bin => write_bin(dir, data)?,
        OutputFormat::Png => write_png(dir, data)?,
    };
    info!("wrote to {}", path.display());
    Ok(path)
}

/// Write the raw bytes verbatim.
pub fn write_bin(dir: &Path, data: &[u8]) -> Result<PathBuf> {
    let path = dir.join(BIN_FILE);
    let write_err = |source| ReceiveError::Write {
        path: path.clone(),
        source,
    };

    let mut file = create(&path).map_err(write_err)?;
    file.write_all(data).map_err(write_err)?;
    file.flush().map_err(write_err)?;

    debug!(bytes = data.len(), path = %path.display(), "Binary written");
    Ok(path)
}

/// Decode `data` as a 128x128 RGB565 image and write it as PNG.
///
/// The buffer is decoded before the file is touched, so a short buffer
/// leaves any existing output alone.
pub fn write_png(dir: &Path, data: &[u8]) -> Result<PathBuf> {
    let img = rgb565::decode_image(data)?;
    let path = dir.join(PNG_FILE);

    img.save_with_format(&path, ImageFormat::Png)
        .map_err(|source| ReceiveError::Encode {
            path: path.clone(),
            source,
        })?;

    debug!(
        width = img.width(),
        height = img.height(),
        path = %path.display(),
        "Image written"
    );
    Ok(path)
}

fn create(path: &Path) -> std::io::Result<File> {
    let mut opts = OpenOptions::new();
    opts.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(FILE_MODE);
    }

    opts.open(path)
}

//! RGB565 framebuffer decoding.
//!
//! Pixels are stored row-major, two bytes each, high byte first. Each
//! channel is widened to 8 bits by copying its top bits into the vacated
//! low bits, so full-scale 5/6-bit values map to 255.

use image::{Rgba, RgbaImage};

use crate::error::{ReceiveError, Result};

pub const IMAGE_WIDTH: u32 = 128;
pub const IMAGE_HEIGHT: u32 = 128;

/// Bytes needed for one full image.
pub const IMAGE_BYTES: usize = (IMAGE_WIDTH * IMAGE_HEIGHT * 2) as usize;

/// Convert one RGB565 value to opaque RGBA.
pub fn rgb565_to_rgba(v: u16) -> Rgba<u8> {
    let r = ((v & 0xF800) >> 8) | ((v & 0xF800) >> 13);
    let g = ((v & 0x07E0) >> 3) | ((v & 0x07E0) >> 9);
    let b = ((v & 0x001F) << 3) | ((v & 0x001F) >> 2);

    Rgba([r as u8, g as u8, b as u8, 255])
}

/// Decode a 128x128 image from `data`. Bytes past [`IMAGE_BYTES`] are ignored.
pub fn decode_image(data: &[u8]) -> Result<RgbaImage> {
    if data.len() < IMAGE_BYTES {
        return Err(ReceiveError::ImageTooShort {
            len: data.len(),
            needed: IMAGE_BYTES,
        });
    }

    Ok(RgbaImage::from_fn(IMAGE_WIDTH, IMAGE_HEIGHT, |x, y| {
        let idx = 2 * (y * IMAGE_WIDTH + x) as usize;
        rgb565_to_rgba(u16::from_be_bytes([data[idx], data[idx + 1]]))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_colours() {
        assert_eq!(rgb565_to_rgba(0xF800), Rgba([255, 0, 0, 255]));
        assert_eq!(rgb565_to_rgba(0x07E0), Rgba([0, 255, 0, 255]));
        assert_eq!(rgb565_to_rgba(0x001F), Rgba([0, 0, 255, 255]));
        assert_eq!(rgb565_to_rgba(0x0000), Rgba([0, 0, 0, 255]));
        assert_eq!(rgb565_to_rgba(0xFFFF), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_bit_replication() {
        // red field 0b10000 -> 0b10000100
        assert_eq!(rgb565_to_rgba(0x8000).0[0], 0x84);
        // green field 0b100000 -> 0b10000010
        assert_eq!(rgb565_to_rgba(0x0400).0[1], 0x82);
        // blue field 0b00001 -> 0b00001000
        assert_eq!(rgb565_to_rgba(0x0001).0[2], 0x08);
    }

    #[test]
    fn test_decode_layout() {
        let mut data = vec![0u8; IMAGE_BYTES];
        // (x=1, y=0) red, (x=0, y=1) blue, high byte first
        data[2] = 0xF8;
        data[3] = 0x00;
        let idx = 2 * IMAGE_WIDTH as usize;
        data[idx] = 0x00;
        data[idx + 1] = 0x1F;

        let img = decode_image(&data).unwrap();
        assert_eq!(img.dimensions(), (128, 128));
        assert_eq!(*img.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(*img.get_pixel(1, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(0, 1), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_extra_bytes_ignored() {
        let data = vec![0xFF; IMAGE_BYTES + 100];
        let img = decode_image(&data).unwrap();
        assert_eq!(*img.get_pixel(127, 127), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_short_buffer_rejected() {
        match decode_image(&[0u8; 10]) {
            Err(ReceiveError::ImageTooShort { len, needed }) => {
                assert_eq!(len, 10);
                assert_eq!(needed, 32768);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}

//! BMP header layouts
//!
//! Headers are built fresh for every image; nothing is shared between calls.

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::render::types::BYTES_PER_PIXEL;

pub const FILE_HEADER_SIZE: usize = 14;
pub const INFO_HEADER_SIZE: usize = 40;

/// `BITMAPFILEHEADER`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapFileHeader {
    pub file_size: u32,
    pub pixel_offset: u32,
}

impl BitmapFileHeader {
    pub fn to_bytes(&self) -> [u8; FILE_HEADER_SIZE] {
        let mut bytes = [0u8; FILE_HEADER_SIZE];
        bytes[0..2].copy_from_slice(b"BM");
        bytes[2..6].copy_from_slice(&self.file_size.to_le_bytes());
        // bytes 6..10 reserved
        bytes[10..14].copy_from_slice(&self.pixel_offset.to_le_bytes());
        bytes
    }
}

/// `BITMAPINFOHEADER` for uncompressed 24-bit images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapInfoHeader {
    pub width: i32,
    /// Written as given. A positive height is read as bottom-up by most viewers.
    pub height: i32,
}

impl BitmapInfoHeader {
    pub fn to_bytes(&self) -> [u8; INFO_HEADER_SIZE] {
        let mut bytes = [0u8; INFO_HEADER_SIZE];
        bytes[0..4].copy_from_slice(&(INFO_HEADER_SIZE as u32).to_le_bytes());
        bytes[4..8].copy_from_slice(&self.width.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.height.to_le_bytes());
        bytes[12..14].copy_from_slice(&1u16.to_le_bytes());
        bytes[14..16].copy_from_slice(&((BYTES_PER_PIXEL * 8) as u16).to_le_bytes());
        // compression, image size, resolution and palette fields stay zero
        bytes
    }
}

/// Bytes of padding after each row so rows start on 4-byte boundaries.
pub fn row_padding(width: usize) -> usize {
    (4 - (width * BYTES_PER_PIXEL) % 4) % 4
}

/// Builds both headers for a `width` x `height` image.
pub fn headers_for(width: usize, height: usize) -> Result<(BitmapFileHeader, BitmapInfoHeader)> {
    let invalid = || PipelineError::InvalidDimensions { width, height };
    if width == 0 || height == 0 {
        return Err(invalid());
    }

    let stride = width * BYTES_PER_PIXEL + row_padding(width);
    let file_size = stride
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_add(FILE_HEADER_SIZE + INFO_HEADER_SIZE))
        .and_then(|size| u32::try_from(size).ok())
        .ok_or_else(invalid)?;

    let file_header = BitmapFileHeader {
        file_size,
        pixel_offset: (FILE_HEADER_SIZE + INFO_HEADER_SIZE) as u32,
    };
    let info_header = BitmapInfoHeader {
        width: i32::try_from(width).map_err(|_| invalid())?,
        height: i32::try_from(height).map_err(|_| invalid())?,
    };
    Ok((file_header, info_header))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_aligns_rows() {
        assert_eq!(row_padding(1), 1);
        assert_eq!(row_padding(2), 2);
        assert_eq!(row_padding(3), 3);
        assert_eq!(row_padding(4), 0);
        assert_eq!(row_padding(50), 2);
    }

    #[test]
    fn file_header_layout() {
        let (file_header, _) = headers_for(50, 16).unwrap();
        let bytes = file_header.to_bytes();

        assert_eq!(&bytes[0..2], b"BM");
        assert_eq!(u32::from_le_bytes(bytes[2..6].try_into().unwrap()), 54 + 152 * 16);
        assert_eq!(&bytes[6..10], &[0, 0, 0, 0]);
        assert_eq!(u32::from_le_bytes(bytes[10..14].try_into().unwrap()), 54);
    }

    #[test]
    fn info_header_layout() {
        let (_, info_header) = headers_for(300, 70_000).unwrap();
        let bytes = info_header.to_bytes();

        assert_eq!(u32::from_le_bytes(bytes[0..4].try_into().unwrap()), 40);
        assert_eq!(i32::from_le_bytes(bytes[4..8].try_into().unwrap()), 300);
        assert_eq!(i32::from_le_bytes(bytes[8..12].try_into().unwrap()), 70_000);
        assert_eq!(u16::from_le_bytes(bytes[12..14].try_into().unwrap()), 1);
        assert_eq!(u16::from_le_bytes(bytes[14..16].try_into().unwrap()), 24);
        assert!(bytes[16..].iter().all(|&b| b == 0));
    }

    #[test]
    fn oversized_or_empty_image_is_rejected() {
        assert!(headers_for(1 << 20, 1 << 20).is_err());
        assert!(headers_for(0, 5).is_err());
    }
}

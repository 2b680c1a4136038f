//! Pixel buffer types

/// Red, green and blue.
pub const BYTES_PER_PIXEL: usize = 3;

/// Rendered image data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Pixel data interleaved [R, G, B, R, G, B, ...], top row first
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// A black buffer of the given size. Both sides must be non-zero.
    pub(crate) fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * BYTES_PER_PIXEL],
        }
    }

    pub fn pixel(&self, row: usize, col: usize) -> [u8; 3] {
        let i = (row * self.width + col) * BYTES_PER_PIXEL;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    pub fn row_stride(&self) -> usize {
        self.width * BYTES_PER_PIXEL
    }
}

/// Rounds to the nearest byte. NaN and negatives map to 0.
pub(crate) fn to_byte(intensity: f64) -> u8 {
    if intensity.is_nan() {
        return 0;
    }
    intensity.round().clamp(0.0, 255.0) as u8
}

//! BMP writing module
//!
//! This module provides uncompressed 24-bit BMP output for pixel buffers.

mod writer;
mod standard_bmp_writer;
pub mod header;

pub use writer::BitmapWriter;
pub use standard_bmp_writer::StandardBmpWriter;
pub use header::{BitmapFileHeader, BitmapInfoHeader, FILE_HEADER_SIZE, INFO_HEADER_SIZE};

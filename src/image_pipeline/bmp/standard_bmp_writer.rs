use std::io::Write;
use tracing::debug;
use crate::image_pipeline::bmp::header::{headers_for, row_padding};
use crate::image_pipeline::bmp::writer::BitmapWriter;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::render::types::{PixelBuffer, BYTES_PER_PIXEL};

/// Writes rows in buffer order, top row first, with BGR pixels.
pub struct StandardBmpWriter;

impl BitmapWriter for StandardBmpWriter {
    fn write_bmp(&self, image: &PixelBuffer, output: &mut dyn Write) -> Result<()> {
        debug!("Encoding BMP image: {}x{}", image.width, image.height);

        let (file_header, info_header) = headers_for(image.width, image.height)?;
        output.write_all(&file_header.to_bytes())?;
        output.write_all(&info_header.to_bytes())?;

        let padding = row_padding(image.width);
        let mut row_bytes = Vec::with_capacity(image.row_stride() + padding);
        for row in image.data.chunks_exact(image.row_stride()) {
            row_bytes.clear();
            for rgb in row.chunks_exact(BYTES_PER_PIXEL) {
                row_bytes.extend_from_slice(&[rgb[2], rgb[1], rgb[0]]);
            }
            row_bytes.resize(row_bytes.len() + padding, 0);
            output.write_all(&row_bytes)?;
        }

        debug!("BMP encoding complete");
        Ok(())
    }
}

use std::io::Write;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::render::types::PixelBuffer;

pub trait BitmapWriter {
    fn write_bmp(&self, image: &PixelBuffer, output: &mut dyn Write) -> Result<()>;
}

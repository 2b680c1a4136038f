use crate::image_pipeline::calibration::CalibratedGrid;
use crate::image_pipeline::render::types::PixelBuffer;

pub trait GridRenderer {
    fn render(&self, grid: &CalibratedGrid) -> PixelBuffer;
}

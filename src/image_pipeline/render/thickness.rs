use rayon::prelude::*;
use tracing::debug;

use crate::image_pipeline::calibration::CalibratedGrid;
use crate::image_pipeline::render::renderer::GridRenderer;
use crate::image_pipeline::render::types::{to_byte, PixelBuffer, BYTES_PER_PIXEL};

/// Gray levels per unit of thickness.
pub const THICKNESS_SCALE: f64 = 25.0;

/// Thickness assigned to cells with no positive intensity.
pub const THICKNESS_SENTINEL: f64 = 10.0;

/// Renders `-ln(value)` as a grayscale thickness map.
///
/// The calibrated flag is ignored. Non-positive and NaN values take the
/// sentinel thickness.
#[derive(Debug, Clone, Copy)]
pub struct ThicknessRenderer {
    pub scale: f64,
    pub sentinel: f64,
}

impl Default for ThicknessRenderer {
    fn default() -> Self {
        Self {
            scale: THICKNESS_SCALE,
            sentinel: THICKNESS_SENTINEL,
        }
    }
}

impl ThicknessRenderer {
    pub fn thickness(&self, value: f64) -> f64 {
        if value > 0.0 { -value.ln() } else { self.sentinel }
    }
}

impl GridRenderer for ThicknessRenderer {
    fn render(&self, grid: &CalibratedGrid) -> PixelBuffer {
        debug!("Rendering thickness image: {}x{}", grid.width(), grid.height());
        let mut buffer = PixelBuffer::new(grid.width(), grid.height());
        let stride = buffer.row_stride();

        buffer.data
            .par_chunks_mut(stride)
            .zip(grid.cells().par_chunks(grid.width()))
            .for_each(|(pixels, cells)| {
                for (pixel, cell) in pixels.chunks_exact_mut(BYTES_PER_PIXEL).zip(cells) {
                    pixel.fill(to_byte(self.thickness(cell.value) * self.scale));
                }
            });

        buffer
    }
}

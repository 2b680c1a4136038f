use rayon::prelude::*;
use tracing::debug;

use crate::image_pipeline::calibration::CalibratedGrid;
use crate::image_pipeline::render::renderer::GridRenderer;
use crate::image_pipeline::render::types::{to_byte, PixelBuffer, BYTES_PER_PIXEL};

const CALIBRATED_MARKER: [u8; 3] = [255, 0, 0];

/// Renders calibrated cells in red and everything else as gray
/// `round(value * 255)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedRenderer;

impl GridRenderer for NormalizedRenderer {
    fn render(&self, grid: &CalibratedGrid) -> PixelBuffer {
        debug!("Rendering normalized image: {}x{}", grid.width(), grid.height());
        let mut buffer = PixelBuffer::new(grid.width(), grid.height());
        let stride = buffer.row_stride();

        buffer.data
            .par_chunks_mut(stride)
            .zip(grid.cells().par_chunks(grid.width()))
            .for_each(|(pixels, cells)| {
                for (pixel, cell) in pixels.chunks_exact_mut(BYTES_PER_PIXEL).zip(cells) {
                    if cell.calibrated {
                        pixel.copy_from_slice(&CALIBRATED_MARKER);
                    } else {
                        pixel.fill(to_byte(cell.value * 255.0));
                    }
                }
            });

        buffer
    }
}

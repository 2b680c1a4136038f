use rayon::prelude::*;
use tracing::debug;

use crate::image_pipeline::calibration::types::CalibratedGrid;
use crate::image_pipeline::grid::RawGrid;

/// Removes the baseline signal from every raw count.
///
/// Each cell becomes `max(0, raw - threshold)` and starts uncalibrated.
pub fn subtract_background(raw: &RawGrid, threshold: u32) -> CalibratedGrid {
    let width = raw.width();
    let mut grid = CalibratedGrid::uncalibrated(width, raw.height());

    grid.cells_mut()
        .par_chunks_mut(width)
        .zip(raw.counts().par_chunks(width))
        .for_each(|(cells, counts)| {
            for (cell, &count) in cells.iter_mut().zip(counts) {
                cell.value = f64::from(count.saturating_sub(threshold));
            }
        });

    debug!("Background subtracted with threshold {}", threshold);
    grid
}

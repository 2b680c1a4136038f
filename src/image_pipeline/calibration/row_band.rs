use tracing::{debug, warn};

use crate::image_pipeline::calibration::types::CalibratedGrid;
use crate::image_pipeline::common::error::{PipelineError, Result};

/// Reductions computed by the row-band stage
#[derive(Debug, Clone, PartialEq)]
pub struct RowBandStats {
    /// Per-column average over the trailing band rows
    pub averages: Vec<f64>,
    /// Arithmetic mean of `averages`
    pub overall_mean: f64,
}

/// Corrects detector drift against the trailing `band_rows` rows.
///
/// Every band cell is latched as calibrated and keeps its
/// background-subtracted value. Every other uncalibrated cell in column `j`
/// is scaled by `overall_mean / averages[j]`, or zeroed when that column's
/// average is zero.
pub fn calibrate_row_band(grid: &mut CalibratedGrid, band_rows: usize) -> Result<RowBandStats> {
    let (width, height) = (grid.width(), grid.height());
    if height < band_rows {
        return Err(PipelineError::InsufficientRows {
            required: band_rows,
            actual: height,
        });
    }

    let mut averages = vec![0.0; width];
    for row in height - band_rows..height {
        for (sum, cell) in averages.iter_mut().zip(grid.row_mut(row)) {
            *sum += cell.value;
            cell.calibrated = true;
        }
    }
    for sum in &mut averages {
        *sum /= band_rows as f64;
    }

    let overall_mean = averages.iter().sum::<f64>() / width as f64;
    debug!("Row band overall mean: {}", overall_mean);

    let zero_columns = averages.iter().filter(|&&avg| avg == 0.0).count();
    if zero_columns > 0 {
        warn!("{} columns have a zero row-band average", zero_columns);
    }

    for row in 0..height {
        for (cell, &avg) in grid.row_mut(row).iter_mut().zip(&averages) {
            if cell.calibrated {
                continue;
            }
            if avg != 0.0 {
                cell.value *= overall_mean / avg;
            } else {
                cell.value = 0.0;
            }
        }
    }

    Ok(RowBandStats { averages, overall_mean })
}

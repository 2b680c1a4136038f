use rayon::prelude::*;
use tracing::{debug, warn};

use crate::image_pipeline::calibration::types::{CalibratedGrid, ZeroBandPolicy};
use crate::image_pipeline::common::error::{PipelineError, Result};

/// Reductions computed by the column-band stage
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnBandStats {
    /// Per-row band average. The divisor is always the band width, even when
    /// some band cells were already calibrated and skipped.
    pub averages: Vec<f64>,
    /// Rows whose band average is zero
    pub zero_rows: usize,
}

/// Corrects per-channel gain against the trailing `band_columns` columns.
///
/// Uncalibrated band cells feed the row average and are latched. Remaining
/// uncalibrated cells are divided by their row's average, then every cell
/// above 1.0 is clamped to 1.0 regardless of its flag.
pub fn calibrate_column_band(
    grid: &mut CalibratedGrid,
    band_columns: usize,
    policy: ZeroBandPolicy,
) -> Result<ColumnBandStats> {
    let width = grid.width();
    if width < band_columns {
        return Err(PipelineError::InsufficientColumns {
            required: band_columns,
            actual: width,
        });
    }

    let first = width - band_columns;
    let averages: Vec<f64> = grid
        .cells_mut()
        .chunks_exact_mut(width)
        .map(|row| {
            let mut sum = 0.0;
            for cell in &mut row[first..] {
                if !cell.calibrated {
                    sum += cell.value;
                    cell.calibrated = true;
                }
            }
            sum / band_columns as f64
        })
        .collect();

    let zero_rows = averages.iter().filter(|&&avg| avg == 0.0).count();
    if zero_rows > 0 {
        warn!(
            "{} rows have a zero column-band average, applying {:?}",
            zero_rows, policy
        );
    }

    grid.cells_mut()
        .par_chunks_mut(width)
        .zip(averages.par_iter())
        .for_each(|(row, &avg)| {
            let zero_fill = avg == 0.0 && policy == ZeroBandPolicy::ZeroFill;
            for cell in row {
                if !cell.calibrated {
                    if zero_fill {
                        cell.value = 0.0;
                    } else {
                        cell.value /= avg;
                    }
                }
                if cell.value > 1.0 {
                    cell.value = 1.0;
                }
            }
        });

    debug!("Column band calibrated {} rows", averages.len());
    Ok(ColumnBandStats { averages, zero_rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from_rows(rows: &[&[f64]]) -> CalibratedGrid {
        let mut grid = CalibratedGrid::uncalibrated(rows[0].len(), rows.len());
        for (i, values) in rows.iter().enumerate() {
            for (cell, &value) in grid.row_mut(i).iter_mut().zip(values.iter()) {
                cell.value = value;
            }
        }
        grid
    }

    #[test]
    fn insufficient_columns_fails() {
        let mut grid = CalibratedGrid::uncalibrated(49, 20);
        let err = calibrate_column_band(&mut grid, 50, ZeroBandPolicy::ZeroFill).unwrap_err();
        assert!(matches!(err, PipelineError::InsufficientColumns { required: 50, actual: 49 }));
    }

    #[test]
    fn divides_by_band_average_and_latches_band() {
        let mut grid = grid_from_rows(&[&[1.0, 3.0, 2.0, 6.0]]);
        let stats = calibrate_column_band(&mut grid, 2, ZeroBandPolicy::ZeroFill).unwrap();

        assert_eq!(stats.averages, vec![4.0]);
        assert_eq!(grid.get(0, 0).value, 0.25);
        assert_eq!(grid.get(0, 1).value, 0.75);
        assert!(!grid.get(0, 0).calibrated);
        assert!(grid.get(0, 2).calibrated && grid.get(0, 3).calibrated);
    }

    #[test]
    fn skipped_cells_still_count_in_divisor() {
        let mut grid = grid_from_rows(&[&[1.0, 4.0, 4.0]]);
        grid.get_mut(0, 2).calibrated = true;
        let stats = calibrate_column_band(&mut grid, 2, ZeroBandPolicy::ZeroFill).unwrap();

        assert_eq!(stats.averages, vec![2.0]);
        assert_eq!(grid.get(0, 0).value, 0.5);
    }

    #[test]
    fn clamps_every_cell_including_calibrated() {
        let mut grid = grid_from_rows(&[&[8.0, 2.0, 2.0], &[952.0, 952.0, 952.0]]);
        for cell in grid.row_mut(1) {
            cell.calibrated = true;
        }
        calibrate_column_band(&mut grid, 2, ZeroBandPolicy::ZeroFill).unwrap();

        assert_eq!(grid.get(0, 0).value, 1.0);
        assert!(grid.row(1).iter().all(|c| c.value == 1.0));
        assert!(grid.cells().iter().all(|c| c.value <= 1.0));
    }

    #[test]
    fn zero_fill_policy_zeroes_row() {
        let mut grid = grid_from_rows(&[&[5.0, 0.0, 0.0]]);
        let stats = calibrate_column_band(&mut grid, 2, ZeroBandPolicy::ZeroFill).unwrap();

        assert_eq!(stats.zero_rows, 1);
        assert_eq!(grid.get(0, 0).value, 0.0);
    }

    #[test]
    fn propagate_policy_divides_by_zero() {
        let mut grid = grid_from_rows(&[&[5.0, 0.0, 0.0, 0.0]]);
        calibrate_column_band(&mut grid, 2, ZeroBandPolicy::Propagate).unwrap();

        assert_eq!(grid.get(0, 0).value, 1.0);
        assert!(grid.get(0, 1).value.is_nan());
    }
}

use tracing::{info, instrument};

use crate::image_pipeline::calibration::background::subtract_background;
use crate::image_pipeline::calibration::column_band::{calibrate_column_band, ColumnBandStats};
use crate::image_pipeline::calibration::row_band::{calibrate_row_band, RowBandStats};
use crate::image_pipeline::calibration::types::{CalibratedGrid, CalibrationConfig};
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::grid::RawGrid;

/// Calibrated grid together with the band reductions that produced it
#[derive(Debug, Clone)]
pub struct CalibrationOutput {
    pub grid: CalibratedGrid,
    pub row_band: RowBandStats,
    pub column_band: ColumnBandStats,
}

/// Runs the three calibration stages over a raw grid.
///
/// Holds no state besides its configuration, so calibrating the same grid
/// twice yields identical output.
#[derive(Debug, Clone, Default)]
pub struct Calibrator {
    config: CalibrationConfig,
}

impl Calibrator {
    pub fn new(config: CalibrationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    pub fn calibrate(&self, raw: &RawGrid) -> Result<CalibratedGrid> {
        self.calibrate_with_stats(raw).map(|output| output.grid)
    }

    #[instrument(skip(self, raw), fields(width = raw.width(), height = raw.height()))]
    pub fn calibrate_with_stats(&self, raw: &RawGrid) -> Result<CalibrationOutput> {
        let mut grid = {
            let _span = tracing::info_span!("background").entered();
            subtract_background(raw, self.config.signal_threshold)
        };

        let row_band = {
            let _span = tracing::info_span!("row_band", rows = self.config.row_band_rows).entered();
            calibrate_row_band(&mut grid, self.config.row_band_rows)?
        };

        let column_band = {
            let _span = tracing::info_span!(
                "column_band",
                columns = self.config.column_band_columns
            ).entered();
            calibrate_column_band(
                &mut grid,
                self.config.column_band_columns,
                self.config.zero_band_policy,
            )?
        };

        info!(
            calibrated = grid.calibrated_count(),
            total = grid.cells().len(),
            "Calibration complete"
        );

        Ok(CalibrationOutput { grid, row_band, column_band })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::calibration::types::ZeroBandPolicy;
    use crate::image_pipeline::common::error::PipelineError;

    fn ramp_grid(width: usize, height: usize) -> RawGrid {
        let counts = (0..width * height)
            .map(|i| 2048 + ((i * 7919) % 4000) as u32)
            .collect();
        RawGrid::new(width, height, counts).unwrap()
    }

    #[test]
    fn all_threshold_grid_is_fully_calibrated_zero() {
        let raw = RawGrid::filled(50, 15, 2048).unwrap();
        let grid = Calibrator::default().calibrate(&raw).unwrap();

        assert_eq!(grid.calibrated_count(), 50 * 15);
        assert!(grid.cells().iter().all(|c| c.value == 0.0));
    }

    #[test]
    fn single_row_above_band_with_exact_band_width() {
        let mut counts = vec![3000; 50 * 16];
        counts[..50].fill(2048);
        let raw = RawGrid::new(50, 16, counts).unwrap();

        let output = Calibrator::default().calibrate_with_stats(&raw).unwrap();

        assert!(output.row_band.averages.iter().all(|&avg| avg == 952.0));
        assert_eq!(output.row_band.overall_mean, 952.0);
        assert_eq!(output.column_band.averages[0], 0.0);
        assert_eq!(output.grid.calibrated_count(), 50 * 16);
        assert!(output.grid.row(0).iter().all(|c| c.value == 0.0));
        assert!(output.grid.row(15).iter().all(|c| c.value == 1.0));
    }

    #[test]
    fn zero_band_row_left_of_band_is_zero_filled() {
        let mut counts = vec![3000; 60 * 16];
        counts[..60].fill(2048);
        counts[..5].fill(4000);
        let raw = RawGrid::new(60, 16, counts).unwrap();

        let grid = Calibrator::default().calibrate(&raw).unwrap();
        assert!(grid.row(0)[..10].iter().all(|c| c.value == 0.0 && !c.calibrated));
    }

    #[test]
    fn zero_band_row_propagates_when_asked() {
        let mut counts = vec![3000; 60 * 16];
        counts[..60].fill(2048);
        counts[..5].fill(4000);
        let raw = RawGrid::new(60, 16, counts).unwrap();
        let config = CalibrationConfig::builder()
            .zero_band_policy(ZeroBandPolicy::Propagate)
            .build();

        let grid = Calibrator::new(config).calibrate(&raw).unwrap();
        assert!(grid.row(0)[..5].iter().all(|c| c.value == 1.0));
        assert!(grid.row(0)[5..10].iter().all(|c| c.value.is_nan()));
    }

    #[test]
    fn row_check_runs_before_column_check() {
        let raw = RawGrid::filled(10, 14, 5000).unwrap();
        let err = Calibrator::default().calibrate(&raw).unwrap_err();
        assert!(matches!(err, PipelineError::InsufficientRows { .. }));
    }

    #[test]
    fn narrow_grid_fails_column_band() {
        let raw = RawGrid::filled(49, 15, 5000).unwrap();
        let err = Calibrator::default().calibrate(&raw).unwrap_err();
        assert!(matches!(err, PipelineError::InsufficientColumns { required: 50, actual: 49 }));
    }

    #[test]
    fn calibration_is_repeatable() {
        let raw = ramp_grid(64, 40);
        let calibrator = Calibrator::default();
        let first = calibrator.calibrate(&raw).unwrap();
        let second = calibrator.calibrate(&raw).unwrap();

        let bits = |grid: &CalibratedGrid| -> Vec<(u64, bool)> {
            grid.cells().iter().map(|c| (c.value.to_bits(), c.calibrated)).collect()
        };
        assert_eq!(bits(&first), bits(&second));
    }

    #[test]
    fn final_values_never_exceed_one() {
        let raw = ramp_grid(80, 30);
        let output = Calibrator::default().calibrate_with_stats(&raw).unwrap();

        assert!(output.column_band.averages[..15].iter().all(|&avg| avg > 0.0));
        assert!(output.column_band.averages[15..].iter().all(|&avg| avg == 0.0));
        assert!(output.grid.cells().iter().all(|c| c.value <= 1.0 && c.value >= 0.0));
        // band rows plus the uncalibrated band cells of every row above them
        assert_eq!(output.grid.calibrated_count(), 15 * 80 + 15 * 50);
    }
}

//! Calibration data and configuration types

/// Baseline count removed from every raw reading.
pub const SIGNAL_THRESHOLD: u32 = 2048;

/// Trailing rows used as the drift reference band.
pub const ROW_BAND_ROWS: usize = 15;

/// Trailing columns used as the detector channel reference band.
pub const COLUMN_BAND_COLUMNS: usize = 50;

/// One calibrated grid cell
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CalibratedCell {
    /// Intensity; its scale depends on how far calibration has progressed
    pub value: f64,
    /// Set once a band reduction has consumed this cell. Never cleared.
    pub calibrated: bool,
}

/// Calibrated cells, stored row-major with the same shape as the raw grid
#[derive(Debug, Clone, PartialEq)]
pub struct CalibratedGrid {
    width: usize,
    height: usize,
    cells: Vec<CalibratedCell>,
}

impl CalibratedGrid {
    /// A `width` x `height` grid of zero-valued, uncalibrated cells.
    ///
    /// Both sides must be non-zero; outside the crate grids only come from
    /// calibrating a [`RawGrid`](crate::image_pipeline::grid::RawGrid), which
    /// rejects empty dimensions.
    pub(crate) fn uncalibrated(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![CalibratedCell::default(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, row: usize, col: usize) -> &CalibratedCell {
        &self.cells[row * self.width + col]
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> &mut CalibratedCell {
        &mut self.cells[row * self.width + col]
    }

    pub fn row(&self, row: usize) -> &[CalibratedCell] {
        let start = row * self.width;
        &self.cells[start..start + self.width]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [CalibratedCell] {
        let start = row * self.width;
        &mut self.cells[start..start + self.width]
    }

    pub fn rows(&self) -> std::slice::ChunksExact<'_, CalibratedCell> {
        self.cells.chunks_exact(self.width)
    }

    pub fn cells(&self) -> &[CalibratedCell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [CalibratedCell] {
        &mut self.cells
    }

    /// Number of cells latched as calibrated.
    pub fn calibrated_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.calibrated).count()
    }
}

/// What column-band normalization does with a row whose band average is zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ZeroBandPolicy {
    /// Set the row's remaining uncalibrated cells to zero, like the row-band guard
    #[default]
    ZeroFill,
    /// Divide anyway. Infinities clamp to 1.0; NaN is left for the renderers.
    Propagate,
}

/// Configuration for the calibration stages
#[derive(Debug, Clone)]
pub struct CalibrationConfig {
    /// Count subtracted during background removal
    pub signal_threshold: u32,
    /// Number of trailing rows averaged for drift correction (at least 1)
    pub row_band_rows: usize,
    /// Number of trailing columns averaged for channel correction (at least 1)
    pub column_band_columns: usize,
    /// Handling of a zero column-band average
    pub zero_band_policy: ZeroBandPolicy,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            signal_threshold: SIGNAL_THRESHOLD,
            row_band_rows: ROW_BAND_ROWS,
            column_band_columns: COLUMN_BAND_COLUMNS,
            zero_band_policy: ZeroBandPolicy::ZeroFill,
        }
    }
}

impl CalibrationConfig {
    pub fn builder() -> CalibrationConfigBuilder {
        CalibrationConfigBuilder::default()
    }
}

/// Builder for CalibrationConfig
#[derive(Default)]
pub struct CalibrationConfigBuilder {
    signal_threshold: Option<u32>,
    row_band_rows: Option<usize>,
    column_band_columns: Option<usize>,
    zero_band_policy: Option<ZeroBandPolicy>,
}

impl CalibrationConfigBuilder {
    pub fn signal_threshold(mut self, threshold: u32) -> Self {
        self.signal_threshold = Some(threshold);
        self
    }

    pub fn row_band_rows(mut self, rows: usize) -> Self {
        self.row_band_rows = Some(rows);
        self
    }

    pub fn column_band_columns(mut self, columns: usize) -> Self {
        self.column_band_columns = Some(columns);
        self
    }

    pub fn zero_band_policy(mut self, policy: ZeroBandPolicy) -> Self {
        self.zero_band_policy = Some(policy);
        self
    }

    pub fn build(self) -> CalibrationConfig {
        let default = CalibrationConfig::default();
        CalibrationConfig {
            signal_threshold: self.signal_threshold.unwrap_or(default.signal_threshold),
            row_band_rows: self.row_band_rows.unwrap_or(default.row_band_rows).max(1),
            column_band_columns: self
                .column_band_columns
                .unwrap_or(default.column_band_columns)
                .max(1),
            zero_band_policy: self.zero_band_policy.unwrap_or(default.zero_band_policy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = CalibrationConfig::builder()
            .signal_threshold(100)
            .row_band_rows(3)
            .zero_band_policy(ZeroBandPolicy::Propagate)
            .build();

        assert_eq!(config.signal_threshold, 100);
        assert_eq!(config.row_band_rows, 3);
        assert_eq!(config.column_band_columns, COLUMN_BAND_COLUMNS);
        assert_eq!(config.zero_band_policy, ZeroBandPolicy::Propagate);
    }

    #[test]
    fn test_default_config_matches_recipe() {
        let config = CalibrationConfig::default();
        assert_eq!(config.signal_threshold, 2048);
        assert_eq!(config.row_band_rows, 15);
        assert_eq!(config.column_band_columns, 50);
        assert_eq!(config.zero_band_policy, ZeroBandPolicy::ZeroFill);
    }

    #[test]
    fn test_zero_band_sizes_are_raised_to_one() {
        let config = CalibrationConfig::builder()
            .row_band_rows(0)
            .column_band_columns(0)
            .build();
        assert_eq!(config.row_band_rows, 1);
        assert_eq!(config.column_band_columns, 1);
    }

    #[test]
    fn test_grid_accessors() {
        let mut grid = CalibratedGrid::uncalibrated(3, 2);
        grid.get_mut(1, 2).value = 0.5;
        grid.row_mut(0)[1].calibrated = true;

        assert_eq!(grid.get(1, 2).value, 0.5);
        assert_eq!(grid.rows().count(), 2);
        assert_eq!(grid.calibrated_count(), 1);
        assert!(grid.row(0)[1].calibrated);
    }
}

//! Radiometric calibration module
//!
//! Calibration runs three stages in order, each consuming the previous
//! stage's grid:
//!
//! 1. background subtraction against a fixed signal threshold
//! 2. row-band (drift) normalization over the trailing rows
//! 3. column-band (detector channel) normalization over the trailing columns
//!
//! Band reductions latch the cells they read as calibrated so later stages
//! leave them alone.

mod background;
mod row_band;
mod column_band;
mod calibrator;
pub mod types;

pub use background::subtract_background;
pub use row_band::{calibrate_row_band, RowBandStats};
pub use column_band::{calibrate_column_band, ColumnBandStats};
pub use calibrator::{Calibrator, CalibrationOutput};
pub use types::{
    CalibratedCell,
    CalibratedGrid,
    CalibrationConfig,
    CalibrationConfigBuilder,
    ZeroBandPolicy,
    COLUMN_BAND_COLUMNS,
    ROW_BAND_ROWS,
    SIGNAL_THRESHOLD,
};

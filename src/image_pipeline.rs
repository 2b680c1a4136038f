//! Detector block calibration pipeline
//!
//! This module turns a raw detector-count grid into calibrated intensities and
//! renders them as 24-bit bitmaps, with separate modules for grid loading,
//! calibration, rendering, BMP writing, and orchestration.

pub mod common;
pub mod grid;
pub mod calibration;
pub mod render;
pub mod bmp;
pub mod conversions;

pub use common::{
    PipelineError,
    Result,
};

pub use grid::{
    RawGrid,
    GridReader,
    BlockIntReader,
};

pub use calibration::{
    CalibratedCell,
    CalibratedGrid,
    CalibrationConfig,
    CalibrationConfigBuilder,
    Calibrator,
    ZeroBandPolicy,
};

pub use render::{
    PixelBuffer,
    GridRenderer,
    NormalizedRenderer,
    ThicknessRenderer,
};

pub use bmp::{
    BitmapWriter,
    StandardBmpWriter,
};

pub use conversions::{
    BlockToBmpPipeline,
    PipelineTimings,
    StepTiming,
};

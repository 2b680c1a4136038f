use tracing::{info, instrument};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::image_pipeline::{
    bmp::{BitmapWriter, StandardBmpWriter},
    calibration::{CalibratedGrid, CalibrationConfig, Calibrator},
    common::error::{PipelineError, Result},
    conversions::timing::PipelineTimings,
    grid::{BlockIntReader, GridReader},
    render::{GridRenderer, NormalizedRenderer, ThicknessRenderer},
};

/// Loads a detector block, calibrates it, and writes bitmap views of the
/// result.
///
/// Calibration completes before anything is written, so a failing block
/// never produces partial output.
pub struct BlockToBmpPipeline<R: GridReader, W: BitmapWriter> {
    reader: R,
    writer: W,
    calibrator: Calibrator,
    thickness: ThicknessRenderer,
}

impl BlockToBmpPipeline<BlockIntReader, StandardBmpWriter> {
    pub fn new(config: CalibrationConfig) -> Self {
        Self::with_custom(BlockIntReader, StandardBmpWriter, config)
    }
}

impl<R: GridReader, W: BitmapWriter> BlockToBmpPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: CalibrationConfig) -> Self {
        Self {
            reader,
            writer,
            calibrator: Calibrator::new(config),
            thickness: ThicknessRenderer::default(),
        }
    }

    pub fn with_thickness(mut self, thickness: ThicknessRenderer) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn calibrate(&self, input_data: &[u8]) -> Result<CalibratedGrid> {
        self.calibrate_with_timings(input_data).map(|(grid, _)| grid)
    }

    #[instrument(skip(self, input_data), fields(input_size = input_data.len()))]
    pub fn calibrate_with_timings(&self, input_data: &[u8]) -> Result<(CalibratedGrid, PipelineTimings)> {
        let mut timings = PipelineTimings::new();
        info!("Starting block calibration");

        let raw_grid = timings.time("load_grid", || self.reader.read_grid(input_data))?;
        let grid = timings.time("calibrate", || self.calibrator.calibrate(&raw_grid))?;

        info!(
            width = grid.width(),
            height = grid.height(),
            "Block calibrated"
        );
        Ok((grid, timings))
    }

    pub fn calibrate_file<P: AsRef<Path>>(&self, input_path: P) -> Result<CalibratedGrid> {
        self.calibrate_file_with_timings(input_path).map(|(grid, _)| grid)
    }

    #[instrument(skip(self, input_path))]
    pub fn calibrate_file_with_timings<P: AsRef<Path>>(
        &self,
        input_path: P,
    ) -> Result<(CalibratedGrid, PipelineTimings)> {
        let input_path = input_path.as_ref();
        info!(input = %input_path.display(), "Reading block file");

        let mut timings = PipelineTimings::new();
        let input_data = timings
            .time("read_input_file", || std::fs::read(input_path))
            .map_err(|e| {
                PipelineError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?;

        let (grid, calibration_timings) = self.calibrate_with_timings(&input_data)?;
        timings.extend(calibration_timings);
        Ok((grid, timings))
    }

    /// Reads, calibrates and writes the normalized view in one go.
    ///
    /// Timings run from reading the block to encoding the bitmap. Nothing is
    /// written if loading or calibration fails.
    pub fn process_file_with_timings<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        normalized_path: Q,
    ) -> Result<(CalibratedGrid, PipelineTimings)> {
        let (grid, mut timings) = self.calibrate_file_with_timings(input_path)?;
        timings.extend(self.write_normalized_file_with_timings(&grid, normalized_path)?);
        Ok((grid, timings))
    }

    pub fn write_normalized(&self, grid: &CalibratedGrid, output: &mut dyn Write) -> Result<()> {
        self.write_normalized_with_timings(grid, output).map(|_| ())
    }

    pub fn write_thickness(&self, grid: &CalibratedGrid, output: &mut dyn Write) -> Result<()> {
        self.write_thickness_with_timings(grid, output).map(|_| ())
    }

    pub fn write_normalized_with_timings(
        &self,
        grid: &CalibratedGrid,
        output: &mut dyn Write,
    ) -> Result<PipelineTimings> {
        self.render_and_write("normalized", &NormalizedRenderer, grid, output)
    }

    pub fn write_thickness_with_timings(
        &self,
        grid: &CalibratedGrid,
        output: &mut dyn Write,
    ) -> Result<PipelineTimings> {
        self.render_and_write("thickness", &self.thickness, grid, output)
    }

    pub fn write_normalized_file<P: AsRef<Path>>(&self, grid: &CalibratedGrid, output_path: P) -> Result<()> {
        self.write_normalized_file_with_timings(grid, output_path).map(|_| ())
    }

    pub fn write_thickness_file<P: AsRef<Path>>(&self, grid: &CalibratedGrid, output_path: P) -> Result<()> {
        self.write_thickness_file_with_timings(grid, output_path).map(|_| ())
    }

    pub fn write_normalized_file_with_timings<P: AsRef<Path>>(
        &self,
        grid: &CalibratedGrid,
        output_path: P,
    ) -> Result<PipelineTimings> {
        self.write_file(output_path.as_ref(), |output| {
            self.write_normalized_with_timings(grid, output)
        })
    }

    pub fn write_thickness_file_with_timings<P: AsRef<Path>>(
        &self,
        grid: &CalibratedGrid,
        output_path: P,
    ) -> Result<PipelineTimings> {
        self.write_file(output_path.as_ref(), |output| {
            self.write_thickness_with_timings(grid, output)
        })
    }

    /// Steps are recorded as `render_<view>` and `encode_<view>`.
    fn render_and_write(
        &self,
        view: &str,
        renderer: &dyn GridRenderer,
        grid: &CalibratedGrid,
        output: &mut dyn Write,
    ) -> Result<PipelineTimings> {
        let mut timings = PipelineTimings::new();
        let image = timings.time(format!("render_{view}"), || renderer.render(grid));
        timings.time(format!("encode_{view}"), || self.writer.write_bmp(&image, output))?;
        Ok(timings)
    }

    fn write_file(
        &self,
        output_path: &Path,
        write: impl FnOnce(&mut dyn Write) -> Result<PipelineTimings>,
    ) -> Result<PipelineTimings> {
        info!(output = %output_path.display(), "Writing image");

        let file = std::fs::File::create(output_path).map_err(|e| {
            PipelineError::OutputWriteError(format!("{}: {}", output_path.display(), e))
        })?;
        let mut output = BufWriter::new(file);
        let timings = write(&mut output)?;
        output.flush()?;
        Ok(timings)
    }

    pub fn config(&self) -> &CalibrationConfig {
        self.calibrator.config()
    }

    pub fn set_config(&mut self, config: CalibrationConfig) {
        self.calibrator = Calibrator::new(config);
    }
}

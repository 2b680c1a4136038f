//! Raw detector grid types

use crate::image_pipeline::common::error::{PipelineError, Result};

/// Unprocessed detector counts, stored row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawGrid {
    width: usize,
    height: usize,
    counts: Vec<u32>,
}

impl RawGrid {
    /// Builds a grid from row-major counts.
    ///
    /// Fails with `InvalidDimensions` if either side is zero or if `counts`
    /// does not hold exactly `width * height` values.
    pub fn new(width: usize, height: usize, counts: Vec<u32>) -> Result<Self> {
        if width == 0 || height == 0 || width.checked_mul(height) != Some(counts.len()) {
            return Err(PipelineError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height, counts })
    }

    /// A grid with every cell set to `count`.
    pub fn filled(width: usize, height: usize, count: u32) -> Result<Self> {
        let len = width
            .checked_mul(height)
            .ok_or(PipelineError::InvalidDimensions { width, height })?;
        Self::new(width, height, vec![count; len])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.counts[row * self.width + col]
    }

    pub fn row(&self, row: usize) -> &[u32] {
        let start = row * self.width;
        &self.counts[start..start + self.width]
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }
}

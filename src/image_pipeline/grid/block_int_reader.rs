//! Reader for the `block.int` detector dump format.
//!
//! The file is a stream of little-endian 32-bit words:
//! `[width][height][14 reserved words][height * width counts, row-major]`.
//! Width precedes height. The reserved words carry acquisition metadata that
//! calibration does not use.

use tracing::{debug, warn};
use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::grid::reader::GridReader;
use crate::image_pipeline::grid::types::RawGrid;

/// Size of one word in the file.
pub const WORD_BYTES: usize = 4;

/// Reserved words between the dimensions and the counts.
pub const HEADER_WORDS: usize = 14;

const DATA_OFFSET: usize = (2 + HEADER_WORDS) * WORD_BYTES;

pub struct BlockIntReader;

fn read_word(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset + WORD_BYTES)?;
    Some(u32::from_le_bytes(bytes.try_into().ok()?))
}

impl GridReader for BlockIntReader {
    /// Parses a `block.int` byte stream into a [`RawGrid`].
    ///
    /// # Errors
    ///
    /// * `TruncatedInput` - the stream ends before the dimensions, the
    ///   reserved header, or the last count
    /// * `InvalidDimensions` - width or height is zero, or the byte size of
    ///   the grid does not fit in `usize`
    fn read_grid(&self, data: &[u8]) -> Result<RawGrid> {
        debug!("Parsing block data, {} bytes", data.len());

        let (width, height) = match (read_word(data, 0), read_word(data, WORD_BYTES)) {
            (Some(w), Some(h)) => (w as usize, h as usize),
            _ => {
                return Err(PipelineError::TruncatedInput {
                    expected: 2 * WORD_BYTES,
                    actual: data.len(),
                });
            }
        };

        if width == 0 || height == 0 {
            return Err(PipelineError::InvalidDimensions { width, height });
        }

        let data_len = width
            .checked_mul(height)
            .and_then(|cells| cells.checked_mul(WORD_BYTES))
            .and_then(|bytes| bytes.checked_add(DATA_OFFSET))
            .ok_or(PipelineError::InvalidDimensions { width, height })?;

        if data.len() < data_len {
            return Err(PipelineError::TruncatedInput {
                expected: data_len,
                actual: data.len(),
            });
        }
        if data.len() > data_len {
            warn!(
                "Ignoring {} trailing bytes after {}x{} grid",
                data.len() - data_len,
                width,
                height
            );
        }

        // Counts are unsigned. Words at or above 2^31 stay large positive
        // counts rather than wrapping negative and flooring to zero in
        // background subtraction.
        let counts: Vec<u32> = data[DATA_OFFSET..data_len]
            .chunks_exact(WORD_BYTES)
            .map(|word| u32::from_le_bytes([word[0], word[1], word[2], word[3]]))
            .collect();

        debug!("Parsed grid: {}x{}", width, height);

        RawGrid::new(width, height, counts)
    }
}

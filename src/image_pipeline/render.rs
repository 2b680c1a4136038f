//! Raster rendering module
//!
//! This module maps calibrated grids to 24-bit pixel buffers, either as the
//! normalized intensity view or as a derived thickness map.

mod renderer;
mod normalized;
mod thickness;
pub mod types;

pub use renderer::GridRenderer;
pub use normalized::NormalizedRenderer;
pub use thickness::{ThicknessRenderer, THICKNESS_SCALE, THICKNESS_SENTINEL};
pub use types::{PixelBuffer, BYTES_PER_PIXEL};

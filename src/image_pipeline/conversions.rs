//! Pipeline conversions module
//!
//! This module contains orchestration logic for turning detector blocks into
//! bitmaps, plus per-step timing.

mod block_to_bmp;
mod timing;


pub use block_to_bmp::BlockToBmpPipeline;
pub use timing::{PipelineTimings, StepTiming};

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::grid::types::RawGrid;

pub trait GridReader {
    fn read_grid(&self, data: &[u8]) -> Result<RawGrid>;
}

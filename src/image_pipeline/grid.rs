//! Raw grid loading module
//!
//! This module provides reading of detector-count blocks into a [`RawGrid`].

mod reader;
mod block_int_reader;
pub mod types;

pub use reader::GridReader;
pub use block_int_reader::{BlockIntReader, HEADER_WORDS, WORD_BYTES};
pub use types::RawGrid;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Invalid grid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Truncated input: expected {expected} bytes, found {actual}")]
    TruncatedInput { expected: usize, actual: usize },

    #[error("Not enough rows for row-band calibration: need {required}, got {actual}")]
    InsufficientRows { required: usize, actual: usize },

    #[error("Not enough columns for column-band calibration: need {required}, got {actual}")]
    InsufficientColumns { required: usize, actual: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

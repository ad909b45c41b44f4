use thiserror::Error;

/// Errors raised while validating the input of a diagram computation.
///
/// All of them are detected before the sweep starts, so a failed call never leaves
/// partial geometry behind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VoronoiError {
    #[error("site {index} has a non-finite coordinate ({x}, {y})")]
    NonFiniteSite { index: usize, x: f64, y: f64 },

    #[error("flat site buffer must hold x/y pairs, got {len} values")]
    OddCoordinateCount { len: usize },

    #[error("bounding box has a non-finite coordinate")]
    NonFiniteBounds,

    #[error("bounding box is empty or inverted: min {min:?}, max {max:?}")]
    InvalidBounds { min: [f64; 2], max: [f64; 2] },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

pub type Result<T> = std::result::Result<T, VoronoiError>;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("out of bounds")]
    OutOfBounds,

    #[error("invalid stride")]
    InvalidStride,

    #[error("raster has no channels")]
    EmptyRaster,

    #[error(
        "channel {channel} is {width}x{height}, expected {expected_width}x{expected_height}"
    )]
    ChannelSizeMismatch {
        channel: usize,
        width: usize,
        height: usize,
        expected_width: usize,
        expected_height: usize,
    },

    #[error("radius must be strictly positive, got {0}")]
    InvalidRadius(i64),

    #[error("pixel spacing must be positive and finite, got {0}")]
    InvalidPixelSpacing(f32),

    #[error("densification interval must be positive and finite, got {0}")]
    InvalidInterval(f32),

    #[error("curve must contain at least one point")]
    EmptyCurve,

    #[error("curve vertex {index} has a non-finite coordinate")]
    NonFiniteVertex { index: usize },
}

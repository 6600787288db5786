use bandconv_image::ImageError;

use crate::parallel::ParallelError;

/// An error type for the filter module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FilterError {
    /// The filter identifier is not one of the known filters.
    #[error("Unknown filter '{0}'. Use 'sobel', 'blur', or 'sharpen'.")]
    UnknownFilter(String),

    /// The kernel denominator is not a positive integer.
    #[error("Kernel denominator must be >= 1, got {0}")]
    InvalidDenominator(i32),

    /// The band buffers do not match the declared band shape.
    #[error("Band buffer holds {0} samples, expected {1}")]
    InvalidBandShape(usize, usize),

    /// Error from the image module.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error while dispatching the bands.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}

/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the image size is not valid.
    #[error("Invalid image size: {0}x{1}")]
    InvalidImageSize(usize, usize),

    /// Error when two images are expected to share a size but do not.
    #[error("Image size mismatch: expected {0}x{1}, got {2}x{3}")]
    ImageSizeMismatch(usize, usize, usize, usize),

    /// Error when the pixel buffer cannot be allocated.
    #[error("Failed to allocate {0} bytes for the image buffer")]
    AllocationFailure(usize),

    /// Error when the pixel index is out of bounds.
    #[error("Pixel coordinates ({0}, {1}) are out of bounds ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),
}

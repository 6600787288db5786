/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Error to open the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] bandconv_image::ImageError),

    /// Error to decode or encode the image.
    #[error("Failed to decode or encode the image. {0}")]
    ImageDecodeError(#[from] image::ImageError),

    /// The netpbm data is not an 8-bit graymap.
    #[error("Unsupported image format {0:?}, expected an 8-bit graymap")]
    UnsupportedImageFormat(image::ColorType),

    /// The image dimensions exceed what the encoder accepts.
    #[error("Image size {0} is too large to encode")]
    ImageTooLarge(bandconv_image::ImageSize),
}

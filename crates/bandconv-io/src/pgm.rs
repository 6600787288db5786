use std::path::Path;

use bandconv_image::{Image, ImageSize};
use image::{
    codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding},
    ColorType, ExtendedColorType, ImageEncoder, ImageFormat,
};

use crate::error::IoError;

/// Read a PGM image with a single channel (mono8).
///
/// Both the binary (`P5`) and ASCII (`P2`) variants are accepted.
///
/// # Arguments
///
/// * `file_path` - The path to the PGM file.
///
/// # Returns
///
/// A grayscale image with a single channel (mono8).
pub fn read_image_pgm_mono8(file_path: impl AsRef<Path>) -> Result<Image<u8, 1>, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let bytes = std::fs::read(file_path)?;
    let image = decode_image_pgm_mono8(&bytes)?;

    log::debug!(
        "read {}x{} graymap from {}",
        image.width(),
        image.height(),
        file_path.display()
    );

    Ok(image)
}

/// Write a PGM image with a single channel (mono8) as binary `P5`.
///
/// The whole file is encoded in memory before anything is written to disk.
///
/// # Arguments
///
/// * `file_path` - The path to the PGM file.
/// * `image` - The grayscale image to write.
pub fn write_image_pgm_mono8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 1>,
) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    let bytes = encode_image_pgm_mono8(image)?;
    std::fs::write(file_path, bytes)?;

    log::debug!(
        "wrote {}x{} graymap to {}",
        image.width(),
        image.height(),
        file_path.display()
    );

    Ok(())
}

/// Encode a grayscale image as a binary `P5` graymap with maximum value 255.
///
/// # Errors
///
/// Returns [`IoError::ImageTooLarge`] if a dimension does not fit the encoder.
///
/// # Examples
///
/// ```
/// use bandconv_image::Image;
/// use bandconv_io::pgm;
///
/// let image = Image::<u8, 1>::new([2, 1].into(), vec![7, 9]).unwrap();
/// let bytes = pgm::encode_image_pgm_mono8(&image).unwrap();
/// assert!(bytes.starts_with(b"P5"));
/// assert!(bytes.ends_with(&[7, 9]));
/// ```
pub fn encode_image_pgm_mono8(image: &Image<u8, 1>) -> Result<Vec<u8>, IoError> {
    let size = image.size();
    let (Ok(width), Ok(height)) = (u32::try_from(size.width), u32::try_from(size.height)) else {
        return Err(IoError::ImageTooLarge(size));
    };

    let mut bytes = Vec::with_capacity(image.as_slice().len() + 32);
    PnmEncoder::new(&mut bytes)
        .with_subtype(PnmSubtype::Graymap(SampleEncoding::Binary))
        .write_image(image.as_slice(), width, height, ExtendedColorType::L8)?;

    Ok(bytes)
}

/// Decode a `P5` or `P2` graymap from raw bytes.
///
/// # Arguments
///
/// * `bytes` - Raw bytes of the pgm file.
///
/// # Returns
///
/// A grayscale image with a single channel (mono8).
///
/// # Errors
///
/// Returns [`IoError::ImageDecodeError`] for malformed or truncated data and
/// [`IoError::UnsupportedImageFormat`] for netpbm images that are not 8-bit graymaps.
pub fn decode_image_pgm_mono8(bytes: &[u8]) -> Result<Image<u8, 1>, IoError> {
    let img = image::load_from_memory_with_format(bytes, ImageFormat::Pnm)?;

    if img.color() != ColorType::L8 {
        return Err(IoError::UnsupportedImageFormat(img.color()));
    }

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    Ok(Image::new(size, img.into_luma8().into_raw())?)
}

use std::borrow::Cow;

use bandconv_image::{Image, ImageError};

use super::{convolve_3x3, FilterError, Kernel3x3};
use crate::parallel::{par_iter_bands, partition, Band, ExecutionStrategy};

/// Apply a 3x3 kernel to a grayscale image.
///
/// The rows of the image are split into bands with [`partition`], one per thread of
/// the `strategy`, and each band is convolved concurrently into its own disjoint part
/// of `dst`. The rows above the first and below the last image row are taken as zero.
/// The result does not depend on the strategy or the number of threads.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1).
/// * `dst` - The destination image with shape (H, W, 1).
/// * `kernel` - The kernel to apply.
/// * `strategy` - How the bands are executed.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn filter_3x3(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    kernel: &Kernel3x3,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError> {
    if src.size() != dst.size() {
        return Err(ImageError::ImageSizeMismatch(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        )
        .into());
    }

    let (width, height) = (src.width(), src.height());
    let bands = partition(height, strategy.num_threads()?)?;

    log::debug!(
        "filtering {}x{} image in {} bands with {:?}",
        width,
        height,
        bands.len(),
        strategy
    );

    let src_data = src.as_slice();

    par_iter_bands(
        dst.as_slice_mut(),
        width,
        &bands,
        strategy,
        |band, dst_band| {
            let input_rows = band_with_halo(src_data, width, height, band);
            convolve_3x3(&input_rows, width, band.num_rows(), kernel, dst_band)
        },
    )
}

/// Apply a 3x3 kernel to a grayscale image into a newly allocated image.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1).
/// * `kernel` - The kernel to apply.
/// * `strategy` - How the bands are executed.
///
/// # Returns
///
/// The filtered image with the same size as `src`.
///
/// # Errors
///
/// Returns [`ImageError::AllocationFailure`] wrapped in [`FilterError::Image`] if the
/// output buffer cannot be allocated.
///
/// # Examples
///
/// ```
/// use bandconv_image::Image;
/// use bandconv_imgproc::{filter, parallel::ExecutionStrategy};
///
/// let image = Image::<u8, 1>::from_size_val([3, 3].into(), 255).unwrap();
/// let blurred = filter::apply_filter(
///     &image,
///     &filter::FilterKind::Blur.kernel(),
///     ExecutionStrategy::Fixed(2),
/// ).unwrap();
///
/// assert_eq!(blurred.get_pixel(1, 1, 0).unwrap(), 255);
/// assert_eq!(blurred.get_pixel(0, 0, 0).unwrap(), 113);
/// ```
pub fn apply_filter(
    src: &Image<u8, 1>,
    kernel: &Kernel3x3,
    strategy: ExecutionStrategy,
) -> Result<Image<u8, 1>, FilterError> {
    let mut dst = Image::from_size_val(src.size(), 0u8)?;
    filter_3x3(src, &mut dst, kernel, strategy)?;
    Ok(dst)
}

/// The rows a band needs from the input: its own rows plus one halo row on each side.
///
/// Interior bands borrow straight from `src`. Bands touching the top or bottom of the
/// image get a zero row in place of the missing neighbor.
fn band_with_halo(src: &[u8], width: usize, height: usize, band: Band) -> Cow<'_, [u8]> {
    let has_top = band.start_row() > 0;
    let has_bottom = band.end_row() < height;

    let first_row = if has_top {
        band.start_row() - 1
    } else {
        band.start_row()
    };
    let last_row = if has_bottom {
        band.end_row() + 1
    } else {
        band.end_row()
    };
    let rows = &src[first_row * width..last_row * width];

    if has_top && has_bottom {
        return Cow::Borrowed(rows);
    }

    let mut padded = Vec::with_capacity((band.num_rows() + 2) * width);
    if !has_top {
        padded.resize(width, 0);
    }
    padded.extend_from_slice(rows);
    if !has_bottom {
        padded.resize(padded.len() + width, 0);
    }

    Cow::Owned(padded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::kernels::{FilterKind, BOX_BLUR, SHARPEN};
    use crate::parallel::ParallelError;
    use bandconv_image::ImageSize;

    #[test]
    fn test_band_with_halo() -> Result<(), FilterError> {
        #[rustfmt::skip]
        let src = [
            1, 1,
            2, 2,
            3, 3,
            4, 4,
        ];
        let bands = partition(4, 2)?;

        let top = band_with_halo(&src, 2, 4, bands[0]);
        assert_eq!(top.as_ref(), &[0, 0, 1, 1, 2, 2, 3, 3]);
        assert!(matches!(top, Cow::Owned(_)));

        let bottom = band_with_halo(&src, 2, 4, bands[1]);
        assert_eq!(bottom.as_ref(), &[2, 2, 3, 3, 4, 4, 0, 0]);

        let bands = partition(4, 4)?;
        let interior = band_with_halo(&src, 2, 4, bands[1]);
        assert_eq!(interior.as_ref(), &[1, 1, 2, 2, 3, 3]);
        assert!(matches!(interior, Cow::Borrowed(_)));

        let whole = band_with_halo(&src, 2, 4, partition(4, 1)?[0]);
        assert_eq!(whole.len(), 12);
        Ok(())
    }

    #[test]
    fn test_blur_border_zero_padding() -> Result<(), FilterError> {
        let image = Image::<u8, 1>::from_size_val([3, 3].into(), 255)?;
        let blurred = apply_filter(&image, &BOX_BLUR, ExecutionStrategy::Serial)?;

        assert_eq!(blurred.get_pixel(1, 1, 0)?, 255);
        for (x, y) in [(0, 0), (2, 0), (0, 2), (2, 2)] {
            assert_eq!(blurred.get_pixel(x, y, 0)?, (4 * 255 / 9) as u8);
        }
        Ok(())
    }

    #[test]
    fn test_sharpen_uniform_interior() -> Result<(), FilterError> {
        let size = ImageSize {
            width: 6,
            height: 5,
        };
        let image = Image::<u8, 1>::from_size_val(size, 90)?;
        let sharp = apply_filter(&image, &SHARPEN, ExecutionStrategy::Fixed(3))?;

        for y in 1..size.height - 1 {
            for x in 1..size.width - 1 {
                assert_eq!(sharp.get_pixel(x, y, 0)?, 90);
            }
        }
        Ok(())
    }

    #[test]
    fn test_single_thread_matches_one_row_per_band() -> Result<(), FilterError> {
        let size = ImageSize {
            width: 7,
            height: 9,
        };
        let data = (0..size.width * size.height)
            .map(|i| (i * 37 % 256) as u8)
            .collect::<Vec<_>>();
        let image = Image::<u8, 1>::new(size, data)?;

        for kind in FilterKind::ALL {
            let kernel = kind.kernel();
            let serial = apply_filter(&image, &kernel, ExecutionStrategy::Fixed(1))?;
            let per_row = apply_filter(&image, &kernel, ExecutionStrategy::Fixed(size.height))?;
            assert_eq!(serial, per_row, "{kind}");
        }
        Ok(())
    }

    #[test]
    fn test_more_threads_than_rows() -> Result<(), FilterError> {
        let image = Image::<u8, 1>::new([4, 2].into(), vec![10, 20, 30, 40, 50, 60, 70, 80])?;
        let expected = apply_filter(&image, &BOX_BLUR, ExecutionStrategy::Serial)?;
        let actual = apply_filter(&image, &BOX_BLUR, ExecutionStrategy::Fixed(6))?;
        assert_eq!(expected, actual);
        Ok(())
    }

    #[test]
    fn test_single_row_image() -> Result<(), FilterError> {
        let image = Image::<u8, 1>::new([3, 1].into(), vec![90, 90, 90])?;
        let blurred = apply_filter(&image, &BOX_BLUR, ExecutionStrategy::Fixed(2))?;
        assert_eq!(blurred.as_slice(), &[20, 30, 20]);
        Ok(())
    }

    #[test]
    fn test_filter_size_mismatch() -> Result<(), FilterError> {
        let src = Image::<u8, 1>::from_size_val([3, 3].into(), 0)?;
        let mut dst = Image::<u8, 1>::from_size_val([3, 2].into(), 0)?;
        let res = filter_3x3(&src, &mut dst, &BOX_BLUR, ExecutionStrategy::Serial);
        assert_eq!(
            res,
            Err(FilterError::Image(ImageError::ImageSizeMismatch(3, 3, 3, 2)))
        );
        Ok(())
    }

    #[test]
    fn test_filter_invalid_thread_count() -> Result<(), FilterError> {
        let src = Image::<u8, 1>::from_size_val([3, 3].into(), 0)?;
        for n in [0, usize::MAX] {
            let res = apply_filter(&src, &BOX_BLUR, ExecutionStrategy::Fixed(n));
            assert_eq!(
                res,
                Err(FilterError::Parallel(ParallelError::InvalidThreadCount(n)))
            );
        }
        Ok(())
    }

    #[test]
    fn test_filter_overflowing_kernel() -> Result<(), FilterError> {
        let image = Image::<u8, 1>::from_size_val([3, 3].into(), 255)?;
        let kernel = Kernel3x3::new([100_000_000; 9], 1)?;
        let output = apply_filter(&image, &kernel, ExecutionStrategy::Fixed(2))?;
        assert_eq!(output.as_slice(), &[255; 9]);
        Ok(())
    }
}

use super::{FilterError, Kernel3x3};

/// Convolve a band of rows with a 3x3 kernel.
///
/// `input_rows` holds `num_rows + 2` rows of `width` samples. Output row `i` is
/// centered on input row `i + 1`, so the first and last input rows only act as halo.
/// Columns outside `[0, width)` contribute zero to the weighted sum. Each sum is
/// divided by the kernel denominator and clamped to `[0, 255]`.
///
/// # Arguments
///
/// * `input_rows` - The band plus one halo row above and one below, row-major.
/// * `width` - The number of samples in a row.
/// * `num_rows` - The number of output rows.
/// * `kernel` - The kernel to apply.
/// * `dst` - The output band, `num_rows * width` samples.
///
/// # Errors
///
/// Returns [`FilterError::InvalidBandShape`] if the buffers do not match `width` and `num_rows`.
///
/// # Examples
///
/// ```
/// use bandconv_imgproc::filter::{convolve_3x3, kernels};
///
/// #[rustfmt::skip]
/// let input = [
///     0, 0, 0,
///     9, 9, 9,
///     0, 0, 0,
/// ];
/// let mut dst = [0u8; 3];
/// convolve_3x3(&input, 3, 1, &kernels::BOX_BLUR, &mut dst).unwrap();
/// assert_eq!(dst, [2, 3, 2]);
/// ```
pub fn convolve_3x3(
    input_rows: &[u8],
    width: usize,
    num_rows: usize,
    kernel: &Kernel3x3,
    dst: &mut [u8],
) -> Result<(), FilterError> {
    if input_rows.len() != (num_rows + 2) * width {
        return Err(FilterError::InvalidBandShape(
            input_rows.len(),
            (num_rows + 2) * width,
        ));
    }
    if dst.len() != num_rows * width {
        return Err(FilterError::InvalidBandShape(dst.len(), num_rows * width));
    }
    if width == 0 {
        return Ok(());
    }

    for (i, dst_row) in dst.chunks_exact_mut(width).enumerate() {
        let window = &input_rows[i * width..(i + 3) * width];

        for (j, dst_px) in dst_row.iter_mut().enumerate() {
            // clip the 3 columns of the window to the row
            let kx_start = if j == 0 { 1 } else { 0 };
            let kx_end = if j + 1 == width { 2 } else { 3 };

            let mut sum = 0i64;
            for (ky, row) in window.chunks_exact(width).enumerate() {
                for kx in kx_start..kx_end {
                    let x = j + kx - 1;
                    sum += row[x] as i64 * kernel.weight(ky, kx) as i64;
                }
            }

            *dst_px = kernel.normalize(sum);
        }
    }

    Ok(())
}

use std::{fmt, str::FromStr};

use super::FilterError;

/// A 3x3 integer convolution kernel with a normalization denominator.
///
/// The weights are stored row-major: `weights[ky * 3 + kx]` multiplies the neighbor
/// at row offset `ky - 1` and column offset `kx - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel3x3 {
    weights: [i32; 9],
    denominator: i32,
}

/// Top sobel kernel, responds to horizontal edges that get darker downwards.
#[rustfmt::skip]
pub const SOBEL_TOP: Kernel3x3 = Kernel3x3 {
    weights: [
         1,  2,  1,
         0,  0,  0,
        -1, -2, -1,
    ],
    denominator: 1,
};

/// Uniform box blur kernel.
pub const BOX_BLUR: Kernel3x3 = Kernel3x3 {
    weights: [1; 9],
    denominator: 9,
};

/// Sharpen kernel.
#[rustfmt::skip]
pub const SHARPEN: Kernel3x3 = Kernel3x3 {
    weights: [
         0, -1,  0,
        -1,  5, -1,
         0, -1,  0,
    ],
    denominator: 1,
};

impl Kernel3x3 {
    /// Create a new kernel.
    ///
    /// # Arguments
    ///
    /// * `weights` - The row-major 3x3 weights.
    /// * `denominator` - The value the weighted sum is divided by. Must be >= 1.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidDenominator`] if `denominator < 1`.
    pub fn new(weights: [i32; 9], denominator: i32) -> Result<Self, FilterError> {
        if denominator < 1 {
            return Err(FilterError::InvalidDenominator(denominator));
        }
        Ok(Self {
            weights,
            denominator,
        })
    }

    /// The row-major weights.
    pub fn weights(&self) -> &[i32; 9] {
        &self.weights
    }

    /// The normalization denominator.
    pub fn denominator(&self) -> i32 {
        self.denominator
    }

    /// The weight at kernel row `ky` and column `kx`, both in `0..3`.
    #[inline]
    pub fn weight(&self, ky: usize, kx: usize) -> i32 {
        self.weights[ky * 3 + kx]
    }

    /// Divide a weighted sum by the denominator and clamp it to the u8 range.
    ///
    /// The division truncates towards zero. The sum is taken as `i64` so that nine
    /// products of a sample and an `i32` weight never overflow.
    #[inline]
    pub fn normalize(&self, sum: i64) -> u8 {
        (sum / self.denominator as i64).clamp(0, u8::MAX as i64) as u8
    }
}

/// The fixed set of filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// Top sobel edge detection.
    Sobel,
    /// Box blur.
    Blur,
    /// Sharpen.
    Sharpen,
}

impl FilterKind {
    /// All the filters, in declaration order.
    pub const ALL: [FilterKind; 3] = [FilterKind::Sobel, FilterKind::Blur, FilterKind::Sharpen];

    /// The kernel of the filter.
    pub fn kernel(self) -> Kernel3x3 {
        match self {
            FilterKind::Sobel => SOBEL_TOP,
            FilterKind::Blur => BOX_BLUR,
            FilterKind::Sharpen => SHARPEN,
        }
    }

    /// The identifier of the filter, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            FilterKind::Sobel => "sobel",
            FilterKind::Blur => "blur",
            FilterKind::Sharpen => "sharpen",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterKind {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| FilterError::UnknownFilter(s.to_string()))
    }
}

/// Look up the kernel of a filter by its identifier.
///
/// # Arguments
///
/// * `name` - One of `sobel`, `blur` or `sharpen`.
///
/// # Errors
///
/// Returns [`FilterError::UnknownFilter`] for any other identifier.
///
/// # Examples
///
/// ```
/// use bandconv_imgproc::filter::kernels;
///
/// let kernel = kernels::kernel_from_name("blur").unwrap();
/// assert_eq!(kernel.denominator(), 9);
///
/// assert!(kernels::kernel_from_name("emboss").is_err());
/// ```
pub fn kernel_from_name(name: &str) -> Result<Kernel3x3, FilterError> {
    Ok(name.parse::<FilterKind>()?.kernel())
}

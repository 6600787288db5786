//! Filter operations
//!
//! This module provides 3x3 convolution filters for grayscale images.

/// Filter kernels
pub mod kernels;
pub use kernels::{FilterKind, Kernel3x3};

/// Single band convolution
mod convolution;
pub use convolution::*;

/// Errors raised by the filters
mod error;
pub use error::FilterError;

/// Filter operations
mod ops;
pub use ops::*;

#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`IoError`] variants for file access and image decoding errors.
pub mod error;

/// PGM image encoding and decoding.
///
/// Read and write binary (`P5`) and ASCII (`P2`) portable graymaps.
pub mod pgm;

pub use crate::error::IoError;

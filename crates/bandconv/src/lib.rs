#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use bandconv_image as image;

#[doc(inline)]
pub use bandconv_imgproc as imgproc;

#[doc(inline)]
pub use bandconv_io as io;

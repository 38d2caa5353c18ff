#![cfg_attr(docsrs, feature(doc_cfg))]

//! Two engines over the same packed/indexed philosophy: [`bitmask`], a
//! column-major word-packed 1-bit-per-pixel plane with overlap/draw/erase/
//! scale/convolve/connected-components; and [`transform`] plus
//! [`bitmask::threshold`], which sample/write a host-owned [`surface`]
//! through trait methods rather than raw per-bpp pointer walks.

pub mod bitmask;
pub mod error;
pub mod surface;
pub mod transform;
mod word;

pub use bitmask::Bitmask;
pub use error::{RasterError, Result};
pub use surface::{PixelFormat, PixelSurface, PixelSurfaceMut, Rect, RasterSurface};

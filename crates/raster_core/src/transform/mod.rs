//! Pixel-raster transforms: quarter-turn rotation, arbitrary-angle
//! rotation, integer nearest-neighbor stretch, and two-pass separable
//! smoothscale. All four sample a [`PixelSurface`] and write into a
//! [`PixelSurfaceMut`]; `src` and `dst` must not be the same surface,
//! matching the reference's in-place-unsafe pointer walks.
//!
//! [`PixelSurface`]: crate::surface::PixelSurface
//! [`PixelSurfaceMut`]: crate::surface::PixelSurfaceMut

mod rotate;
mod rotate90;
mod smoothscale;
mod stretch;

pub use rotate::rotate;
pub use rotate90::rotate90;
pub use smoothscale::smoothscale;
pub use stretch::stretch;

//! Thresholding: turn a pixel surface into a bit-plane by comparing each
//! pixel's colour against either a reference colour or a second surface,
//! within a per-channel tolerance.

use super::Bitmask;
use crate::surface::PixelSurface;

fn abs_diff(a: u8, b: u8) -> i16 {
    (a as i16 - b as i16).abs()
}

/// Writes into `dst` (which callers size to match `src`) wherever `src`'s
/// pixel is within `threshold`'s decoded tolerance of its reference
/// colour: `other`'s matching pixel when given, else `color`.
///
/// `palette_colors = false` additionally takes a degenerate path when both
/// `src` and `other` are 8-bit: the raw byte values are compared directly
/// (tolerance taken from the red channel only) instead of going through
/// the palette, for callers whose 8-bit surfaces are really greyscale
/// samples rather than indexed colour.
pub fn threshold<S, O>(
    dst: &mut Bitmask,
    src: &S,
    other: Option<&O>,
    color: u32,
    threshold: u32,
    palette_colors: bool,
) where
    S: PixelSurface,
    O: PixelSurface,
{
    let (r, g, b, _) = src.format().decode_rgba(color);
    let (tr, tg, tb, _) = src.format().decode_rgba(threshold);

    let raw_value_path = !palette_colors
        && src.bpp() == 1
        && other.map(|o| o.bpp() == 1).unwrap_or(false);

    for y in 0..src.height() {
        for x in 0..src.width() {
            let hit = if let Some(other) = other {
                let ps = src.pixel_at(x, y);
                let po = other.pixel_at(x, y);
                if raw_value_path {
                    abs_diff(po as u8, ps as u8) < tr as i16
                } else {
                    let (rs, gs, bs, _) = src.format().decode_rgba(ps);
                    let (ro, go, bo, _) = other.format().decode_rgba(po);
                    abs_diff(ro, rs) < tr as i16 && abs_diff(go, gs) < tg as i16 && abs_diff(bo, bs) < tb as i16
                }
            } else {
                let ps = src.pixel_at(x, y);
                let (rs, gs, bs, _) = src.format().decode_rgba(ps);
                abs_diff(r, rs) < tr as i16 && abs_diff(g, gs) < tg as i16 && abs_diff(b, bs) < tb as i16
            };
            if hit {
                dst.setbit(x, y);
            }
        }
    }
}

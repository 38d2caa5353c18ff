//! Whole-bit-plane reshaping ops: `scale`, `convolve`.

use super::algebra::draw;
use super::Bitmask;
use crate::error::Result;

/// Resample `src` to a new `w x h` bit-plane using the same nearest-
/// neighbour Bresenham stepping as [`crate::transform::stretch`]. A
/// bit-plane is just a 1-bit-per-pixel raster, so the two share their
/// integer-DDA walk. `w < 1 || h < 1` degenerates to a single all-zero bit
/// (the reference implementation's own documented behaviour for a
/// degenerate target size, rather than an error).
pub fn scale(src: &Bitmask, w: i64, h: i64) -> Result<Bitmask> {
    if w < 1 || h < 1 {
        return Bitmask::create(1, 1);
    }
    let (w, h) = (w as usize, h as usize);
    let mut dst = Bitmask::create(w, h)?;
    if src.width() == 0 || src.height() == 0 {
        return Ok(dst);
    }

    let src_w = src.width() as i64;
    let src_h = src.height() as i64;
    let dst_w = w as i64;
    let dst_h = h as i64;

    let mut src_y = 0i64;
    let mut h_err = src_h * 2 - dst_h * 2;
    for y in 0..h {
        let mut src_x = 0i64;
        let mut w_err = src_w * 2 - dst_w * 2;
        for x in 0..w {
            if src.getbit(src_x as usize, src_y as usize) {
                dst.setbit(x, y);
            }
            while w_err >= 0 {
                src_x += 1;
                w_err -= dst_w * 2;
            }
            w_err += src_w * 2;
        }
        while h_err >= 0 {
            src_y += 1;
            h_err -= dst_h * 2;
        }
        h_err += src_h * 2;
    }
    Ok(dst)
}

/// Morphological dilation of `o` by `a` through `b`: for every set bit
/// `(bx, by)` of `b`, draws `a` onto `o` at
/// `(xoffset + b.w - 1 - bx, yoffset + b.h - 1 - by)`. `o` is not cleared
/// first; callers that want a fresh result create `o` themselves.
pub fn convolve(a: &Bitmask, b: &Bitmask, o: &mut Bitmask, xoffset: i64, yoffset: i64) {
    let (bw, bh) = (b.width() as i64, b.height() as i64);
    for by in 0..bh {
        for bx in 0..bw {
            if b.getbit(bx as usize, by as usize) {
                draw(o, a, xoffset + bw - 1 - bx, yoffset + bh - 1 - by);
            }
        }
    }
}

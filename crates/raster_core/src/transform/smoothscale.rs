//! Two-pass separable smoothscale: area-averaging on shrink, bilinear on
//! expand, X then Y, over a 32-bit-per-pixel working buffer.
//! 24-bit sources/destinations are promoted to 32 bits for the filter
//! passes and demoted back on the way out, mirroring the reference's
//! `convert_24_32`/`convert_32_24` bracket around the same two passes.
//!
//! Unlike the reference, the X and Y passes never share a caller-sized
//! scratch buffer threaded through by pitch. Each pass owns a freshly
//! allocated, tightly packed `width * 4` row stride, so there is no
//! `needXY`-shaped bookkeeping and no pointer arithmetic to get wrong.
//! Every allocation goes through [`try_zeroed_vec`], so a failure anywhere
//! in the pipeline surfaces as [`RasterError::Alloc`] rather than the
//! reference's leak-then-use-after-free on its `xmult0`/`xmult1` tables.

use crate::error::{try_zeroed_vec, Result};
use crate::surface::{PixelSurface, PixelSurfaceMut};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

const FIXED_ONE: i64 = 0x1_0000;
const FIXED_ONE_SQ: i64 = 0x1_0000_0000;

/// Promote `src` (bpp 3 or 4) to a tightly packed 32bpp byte buffer.
fn to_rgba32(src: &[u8], width: usize, height: usize, pitch: usize, bpp: u8) -> Result<Vec<u8>> {
    let mut out = try_zeroed_vec(width * 4 * height)?;
    match bpp {
        4 => {
            for y in 0..height {
                let srow = y * pitch;
                let drow = y * width * 4;
                out[drow..drow + width * 4].copy_from_slice(&src[srow..srow + width * 4]);
            }
        }
        3 => {
            for y in 0..height {
                for x in 0..width {
                    let si = y * pitch + x * 3;
                    let di = (y * width + x) * 4;
                    out[di] = src[si];
                    out[di + 1] = src[si + 1];
                    out[di + 2] = src[si + 2];
                    out[di + 3] = 0xff;
                }
            }
        }
        _ => unreachable!("smoothscale only supports 24 and 32 bpp surfaces"),
    }
    Ok(out)
}

/// Demote a tightly packed 32bpp buffer back into `dst`'s own pitch/bpp.
fn from_rgba32(src: &[u8], width: usize, height: usize, dst: &mut [u8], pitch: usize, bpp: u8) {
    match bpp {
        4 => {
            for y in 0..height {
                let srow = y * width * 4;
                let drow = y * pitch;
                dst[drow..drow + width * 4].copy_from_slice(&src[srow..srow + width * 4]);
            }
        }
        3 => {
            for y in 0..height {
                for x in 0..width {
                    let si = (y * width + x) * 4;
                    let di = y * pitch + x * 3;
                    dst[di] = src[si];
                    dst[di + 1] = src[si + 1];
                    dst[di + 2] = src[si + 2];
                }
            }
        }
        _ => unreachable!("smoothscale only supports 24 and 32 bpp surfaces"),
    }
}

/// Area-averaging shrink along rows. `src_w > dst_w`.
fn filter_shrink_x(src: &[u8], height: usize, src_w: usize, dst_w: usize) -> Result<Vec<u8>> {
    let xspace = (FIXED_ONE * src_w as i64) / dst_w as i64;
    let xrecip = FIXED_ONE_SQ / xspace;
    let mut out = try_zeroed_vec(dst_w * 4 * height)?;

    for y in 0..height {
        let mut acc = [0u16; 4];
        let mut xcounter = xspace;
        let mut dx = 0usize;
        for sx in 0..src_w {
            let sbase = (y * src_w + sx) * 4;
            if xcounter > FIXED_ONE {
                for c in 0..4 {
                    acc[c] = acc[c].wrapping_add(src[sbase + c] as u16);
                }
                xcounter -= FIXED_ONE;
            } else {
                let xfrac = FIXED_ONE - xcounter;
                let dbase = (y * dst_w + dx) * 4;
                for c in 0..4 {
                    let partial = (src[sbase + c] as i64 * xcounter) >> 16;
                    out[dbase + c] = (((acc[c] as i64 + partial) * xrecip) >> 16) as u8;
                    acc[c] = ((src[sbase + c] as i64 * xfrac) >> 16) as u16;
                }
                dx += 1;
                xcounter = xspace - xfrac;
            }
        }
        debug_assert_eq!(dx, dst_w);
    }
    Ok(out)
}

/// Area-averaging shrink along columns. `src_h > dst_h`.
fn filter_shrink_y(src: &[u8], width: usize, src_h: usize, dst_h: usize) -> Result<Vec<u8>> {
    let yspace = (FIXED_ONE * src_h as i64) / dst_h as i64;
    let yrecip = FIXED_ONE_SQ / yspace;
    let row = width * 4;
    let mut out = try_zeroed_vec(row * dst_h)?;
    let mut acc = try_zeroed_vec::<u16>(row)?;

    let mut ycounter = yspace;
    let mut dy = 0usize;
    for sy in 0..src_h {
        let srow = sy * row;
        if ycounter > FIXED_ONE {
            for i in 0..row {
                acc[i] = acc[i].wrapping_add(src[srow + i] as u16);
            }
            ycounter -= FIXED_ONE;
        } else {
            let yfrac = FIXED_ONE - ycounter;
            let drow = dy * row;
            for i in 0..row {
                let partial = (src[srow + i] as i64 * ycounter) >> 16;
                out[drow + i] = (((acc[i] as i64 + partial) * yrecip) >> 16) as u8;
                acc[i] = ((src[srow + i] as i64 * yfrac) >> 16) as u16;
            }
            dy += 1;
            ycounter = yspace - yfrac;
        }
    }
    debug_assert_eq!(dy, dst_h);
    Ok(out)
}

/// Bilinear expand along rows. `dst_w > src_w`.
fn filter_expand_x(src: &[u8], height: usize, src_w: usize, dst_w: usize) -> Result<Vec<u8>> {
    let mut xidx0 = try_zeroed_vec::<usize>(dst_w)?;
    let mut xmult0 = try_zeroed_vec::<i64>(dst_w)?;
    let mut xmult1 = try_zeroed_vec::<i64>(dst_w)?;
    for x in 0..dst_w {
        xidx0[x] = (x * (src_w - 1)) / dst_w;
        let m1 = (FIXED_ONE * ((x * (src_w - 1)) % dst_w) as i64) / dst_w as i64;
        xmult1[x] = m1;
        xmult0[x] = FIXED_ONE - m1;
    }

    let mut out = try_zeroed_vec(dst_w * 4 * height)?;
    for y in 0..height {
        let srow = y * src_w * 4;
        let drow = y * dst_w * 4;
        for x in 0..dst_w {
            // xidx0[x] + 1 < src_w whenever src_w > 1 (x*(src_w-1)/dst_w
            // caps below src_w - 1); only a 1-wide source needs the guard,
            // where xmult1 is always zero and the absent sample is moot.
            let has_next = xidx0[x] + 1 < src_w;
            let sbase = srow + xidx0[x] * 4;
            let dbase = drow + x * 4;
            for c in 0..4 {
                let s0 = src[sbase + c] as i64;
                let s1 = if has_next { src[sbase + 4 + c] as i64 } else { 0 };
                out[dbase + c] = ((s0 * xmult0[x] + s1 * xmult1[x]) >> 16) as u8;
            }
        }
    }
    Ok(out)
}

/// One destination row's worth of bilinear-Y work: independent of every
/// other row, so safe to run on any worker thread.
fn expand_y_row(src: &[u8], row: usize, src_h: usize, dst_h: usize, y: usize, out_row: &mut [u8]) {
    let yidx0 = (y * (src_h - 1)) / dst_h;
    let m1 = (FIXED_ONE * ((y * (src_h - 1)) % dst_h) as i64) / dst_h as i64;
    let ymult0 = FIXED_ONE - m1;
    let ymult1 = m1;
    let has_next = yidx0 + 1 < src_h;
    let row0 = yidx0 * row;
    let row1 = if has_next { (yidx0 + 1) * row } else { row0 };
    for i in 0..row {
        let s0 = src[row0 + i] as i64;
        let s1 = if has_next { src[row1 + i] as i64 } else { 0 };
        out_row[i] = ((s0 * ymult0 + s1 * ymult1) >> 16) as u8;
    }
}

/// Bilinear expand along columns. `dst_h > src_h`. Every destination row is
/// computed from its own pair of source rows with no shared accumulator,
/// so under the `parallel` feature this walks `dst_h` with rayon instead of
/// a sequential loop: output is bit-identical either way, since each row's
/// formula does not depend on this function's iteration order at all.
fn filter_expand_y(src: &[u8], width: usize, src_h: usize, dst_h: usize) -> Result<Vec<u8>> {
    let row = width * 4;
    let mut out = try_zeroed_vec(row * dst_h)?;

    #[cfg(feature = "parallel")]
    out.par_chunks_mut(row)
        .enumerate()
        .for_each(|(y, out_row)| expand_y_row(src, row, src_h, dst_h, y, out_row));

    #[cfg(not(feature = "parallel"))]
    for (y, out_row) in out.chunks_mut(row).enumerate() {
        expand_y_row(src, row, src_h, dst_h, y, out_row);
    }

    Ok(out)
}

/// Resamples `src` into `dst`'s (already allocated) dimensions using
/// area-averaging on axes that shrink and bilinear interpolation on axes
/// that expand; an axis that doesn't change size is passed through
/// unfiltered. `src`'s `bpp` must be 3 or 4 (the caller's responsibility);
/// `dst` is written with the same `bpp` as `src`.
pub fn smoothscale<S, D>(src: &S, dst: &mut D) -> Result<()>
where
    S: PixelSurface,
    D: PixelSurfaceMut,
{
    let bpp = src.bpp();
    debug_assert!(bpp == 3 || bpp == 4, "smoothscale: only 24 and 32 bpp surfaces are supported");

    let (src_w, src_h) = (src.width(), src.height());
    let (dst_w, dst_h) = (dst.width(), dst.height());

    let src32 = to_rgba32(src.data(), src_w, src_h, src.pitch(), bpp)?;

    let after_x = if dst_w < src_w {
        filter_shrink_x(&src32, src_h, src_w, dst_w)?
    } else if dst_w > src_w {
        filter_expand_x(&src32, src_h, src_w, dst_w)?
    } else {
        src32
    };

    let final32 = if dst_h < src_h {
        filter_shrink_y(&after_x, dst_w, src_h, dst_h)?
    } else if dst_h > src_h {
        filter_expand_y(&after_x, dst_w, src_h, dst_h)?
    } else {
        after_x
    };

    from_rgba32(&final32, dst_w, dst_h, dst.data_mut(), dst.pitch(), bpp);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{PixelFormat, RasterSurface};

    #[test]
    fn identity_passes_through_unfiltered() {
        let mut src = RasterSurface::new(4, 4, 4, PixelFormat::RGBA8888);
        for y in 0..4 {
            for x in 0..4 {
                src.set_pixel_at(x, y, 0x0103_0507 + (y * 4 + x) as u32);
            }
        }
        let mut dst = RasterSurface::new(4, 4, 4, PixelFormat::RGBA8888);
        smoothscale(&src, &mut dst).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(dst.pixel_at(x, y), src.pixel_at(x, y));
            }
        }
    }

    #[test]
    fn uniform_color_shrink_stays_uniform() {
        let mut src = RasterSurface::new(4, 4, 4, PixelFormat::RGBA8888);
        let color = u32::from_ne_bytes([200, 100, 50, 255]);
        for y in 0..4 {
            for x in 0..4 {
                src.set_pixel_at(x, y, color);
            }
        }
        let mut dst = RasterSurface::new(2, 2, 4, PixelFormat::RGBA8888);
        smoothscale(&src, &mut dst).unwrap();
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(dst.pixel_at(x, y), color);
            }
        }
    }

    #[test]
    fn expand_interpolates_between_known_samples() {
        let mut src = RasterSurface::new(2, 1, 4, PixelFormat::RGBA8888);
        src.set_pixel_at(0, 0, u32::from_ne_bytes([10, 20, 30, 255]));
        src.set_pixel_at(1, 0, u32::from_ne_bytes([200, 210, 220, 255]));
        let mut dst = RasterSurface::new(4, 1, 4, PixelFormat::RGBA8888);
        smoothscale(&src, &mut dst).unwrap();
        assert_eq!(dst.pixel_at(0, 0), u32::from_ne_bytes([10, 20, 30, 255]));
        assert_eq!(dst.pixel_at(1, 0), u32::from_ne_bytes([57, 67, 77, 255]));
        assert_eq!(dst.pixel_at(2, 0), u32::from_ne_bytes([105, 115, 125, 255]));
        assert_eq!(dst.pixel_at(3, 0), u32::from_ne_bytes([152, 162, 172, 255]));
    }

    #[test]
    fn one_pixel_wide_source_expands_without_reading_past_its_row() {
        let mut src = RasterSurface::new(1, 3, 4, PixelFormat::RGBA8888);
        for y in 0..3 {
            src.set_pixel_at(0, y, u32::from_ne_bytes([10, 20, 30, 255 - y as u8]));
        }
        let mut dst = RasterSurface::new(3, 3, 4, PixelFormat::RGBA8888);
        smoothscale(&src, &mut dst).unwrap();
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(dst.pixel_at(x, y), src.pixel_at(0, y));
            }
        }
    }

    #[test]
    fn twenty_four_bit_roundtrip_preserves_color() {
        let mut src = RasterSurface::new(4, 4, 3, PixelFormat::RGB888);
        for y in 0..4 {
            for x in 0..4 {
                src.set_pixel_at(x, y, 0x0010_2030 + (y * 4 + x) as u32);
            }
        }
        let mut dst = RasterSurface::new(4, 4, 3, PixelFormat::RGB888);
        smoothscale(&src, &mut dst).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(dst.pixel_at(x, y), src.pixel_at(x, y));
            }
        }
    }
}

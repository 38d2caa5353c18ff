//! Quarter-turn rotation.

use crate::surface::{PixelSurface, PixelSurfaceMut};

/// Rotates `src` by `angle` (a multiple of 90, either sign) into `dst`.
///
/// `dst`'s dimensions must already match the rotated source: `(w, h)` for
/// a 0 or 180 degree turn, `(h, w)` for 90 or 270. This is the caller's
/// responsibility and is not checked outside debug builds.
pub fn rotate90<S, D>(src: &S, dst: &mut D, angle: i32)
where
    S: PixelSurface,
    D: PixelSurfaceMut,
{
    let n = (((angle / 90) % 4) + 4) % 4;
    let (sw, sh) = (src.width() as i64, src.height() as i64);

    debug_assert_eq!(
        (dst.width(), dst.height()),
        if n % 2 == 0 { (src.width(), src.height()) } else { (src.height(), src.width()) },
        "rotate90: dst dimensions must match the rotated source",
    );

    for dy in 0..dst.height() {
        for dx in 0..dst.width() {
            let (dxi, dyi) = (dx as i64, dy as i64);
            let (sx, sy) = match n {
                0 => (dxi, dyi),
                1 => (sw - 1 - dyi, dxi),
                2 => (sw - 1 - dxi, sh - 1 - dyi),
                _ => (dyi, sh - 1 - dxi),
            };
            let value = src.pixel_at(sx as usize, sy as usize);
            dst.set_pixel_at(dx, dy, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{PixelFormat, RasterSurface};

    fn stamped(w: usize, h: usize) -> RasterSurface {
        let mut s = RasterSurface::new(w, h, 1, PixelFormat::RGB888);
        for y in 0..h {
            for x in 0..w {
                s.set_pixel_at(x, y, (y * w + x) as u32);
            }
        }
        s
    }

    #[test]
    fn identity_at_zero_degrees() {
        let src = stamped(3, 4);
        let mut dst = RasterSurface::new(3, 4, 1, PixelFormat::RGB888);
        rotate90(&src, &mut dst, 0);
        for y in 0..4 {
            for x in 0..3 {
                assert_eq!(dst.pixel_at(x, y), src.pixel_at(x, y));
            }
        }
    }

    #[test]
    fn quarter_turn_swaps_dimensions() {
        let src = stamped(3, 2);
        let mut dst = RasterSurface::new(2, 3, 1, PixelFormat::RGB888);
        rotate90(&src, &mut dst, 90);
        // src column 0 becomes dst's last row.
        assert_eq!(dst.pixel_at(0, 2), src.pixel_at(0, 0));
        assert_eq!(dst.pixel_at(1, 2), src.pixel_at(0, 1));
    }

    #[test]
    fn two_quarter_turns_match_one_half_turn() {
        let src = stamped(5, 3);
        let mut once = RasterSurface::new(5, 3, 1, PixelFormat::RGB888);
        rotate90(&src, &mut once, 180);

        let mut quarter = RasterSurface::new(3, 5, 1, PixelFormat::RGB888);
        rotate90(&src, &mut quarter, 90);
        let mut twice = RasterSurface::new(5, 3, 1, PixelFormat::RGB888);
        rotate90(&quarter, &mut twice, 90);

        for y in 0..3 {
            for x in 0..5 {
                assert_eq!(once.pixel_at(x, y), twice.pixel_at(x, y));
            }
        }
    }

    #[test]
    fn negative_angle_matches_equivalent_positive_turn() {
        let src = stamped(4, 3);
        let mut a = RasterSurface::new(3, 4, 1, PixelFormat::RGB888);
        rotate90(&src, &mut a, -90);
        let mut b = RasterSurface::new(3, 4, 1, PixelFormat::RGB888);
        rotate90(&src, &mut b, 270);
        for y in 0..4 {
            for x in 0..3 {
                assert_eq!(a.pixel_at(x, y), b.pixel_at(x, y));
            }
        }
    }
}

#![allow(non_camel_case_types)]
#![allow(clippy::missing_safety_doc)]

use raster_core::bitmask::{algebra, components, ops, threshold};
use raster_core::surface::{PixelFormat, RasterSurface};
use raster_core::transform;
use raster_core::{Bitmask, RasterError, Rect};

/// Allocation failed, mirroring the reference implementation's `-2`
/// `AllocError` sentinel; every other return value is success.
const RB_ALLOC_ERROR: i32 = -2;

fn alloc_code(err: RasterError) -> i32 {
    match err {
        RasterError::Alloc => RB_ALLOC_ERROR,
    }
}

// ---------------------------------------------------------------------
// Bit-plane (rb_*)
// ---------------------------------------------------------------------

pub struct rb_bitmask(Bitmask);

#[no_mangle]
pub unsafe extern "C" fn rb_create(w: u32, h: u32) -> *mut rb_bitmask {
    match Bitmask::create(w as usize, h as usize) {
        Ok(m) => Box::into_raw(Box::new(rb_bitmask(m))),
        Err(_) => std::ptr::null_mut(),
    }
}

#[no_mangle]
pub unsafe extern "C" fn rb_destroy(m: *mut rb_bitmask) {
    let _ = Box::from_raw(m);
}

#[no_mangle]
pub unsafe extern "C" fn rb_width(m: *const rb_bitmask) -> u32 {
    (*m).0.width() as u32
}

#[no_mangle]
pub unsafe extern "C" fn rb_height(m: *const rb_bitmask) -> u32 {
    (*m).0.height() as u32
}

#[no_mangle]
pub unsafe extern "C" fn rb_getbit(m: *const rb_bitmask, x: u32, y: u32) -> bool {
    (*m).0.getbit(x as usize, y as usize)
}

#[no_mangle]
pub unsafe extern "C" fn rb_setbit(m: *mut rb_bitmask, x: u32, y: u32) {
    (*m).0.setbit(x as usize, y as usize);
}

#[no_mangle]
pub unsafe extern "C" fn rb_clearbit(m: *mut rb_bitmask, x: u32, y: u32) {
    (*m).0.clearbit(x as usize, y as usize);
}

#[no_mangle]
pub unsafe extern "C" fn rb_clear(m: *mut rb_bitmask) {
    (*m).0.clear();
}

#[no_mangle]
pub unsafe extern "C" fn rb_fill(m: *mut rb_bitmask) {
    (*m).0.fill();
}

#[no_mangle]
pub unsafe extern "C" fn rb_invert(m: *mut rb_bitmask) {
    (*m).0.invert();
}

#[no_mangle]
pub unsafe extern "C" fn rb_count(m: *const rb_bitmask) -> u32 {
    (*m).0.count()
}

#[no_mangle]
pub unsafe extern "C" fn rb_overlap(
    a: *const rb_bitmask,
    b: *const rb_bitmask,
    xoffset: i64,
    yoffset: i64,
) -> bool {
    algebra::overlap(&(*a).0, &(*b).0, xoffset, yoffset)
}

#[no_mangle]
pub unsafe extern "C" fn rb_overlap_area(
    a: *const rb_bitmask,
    b: *const rb_bitmask,
    xoffset: i64,
    yoffset: i64,
) -> u32 {
    algebra::overlap_area(&(*a).0, &(*b).0, xoffset, yoffset)
}

/// Returns `true` and writes the first overlapping coordinate into
/// `out_x`/`out_y` (scanned column-major, matching the reference's bit
/// order) if `a` and `b` overlap at this offset; `false` and leaves the
/// outputs untouched otherwise.
#[no_mangle]
pub unsafe extern "C" fn rb_overlap_pos(
    a: *const rb_bitmask,
    b: *const rb_bitmask,
    xoffset: i64,
    yoffset: i64,
    out_x: *mut i64,
    out_y: *mut i64,
) -> bool {
    match algebra::overlap_pos(&(*a).0, &(*b).0, xoffset, yoffset) {
        Some((x, y)) => {
            *out_x = x;
            *out_y = y;
            true
        }
        None => false,
    }
}

#[no_mangle]
pub unsafe extern "C" fn rb_overlap_mask(
    a: *const rb_bitmask,
    b: *const rb_bitmask,
    c: *mut rb_bitmask,
    xoffset: i64,
    yoffset: i64,
) {
    algebra::overlap_mask(&(*a).0, &(*b).0, &mut (*c).0, xoffset, yoffset);
}

#[no_mangle]
pub unsafe extern "C" fn rb_draw(
    a: *mut rb_bitmask,
    b: *const rb_bitmask,
    xoffset: i64,
    yoffset: i64,
) {
    algebra::draw(&mut (*a).0, &(*b).0, xoffset, yoffset);
}

#[no_mangle]
pub unsafe extern "C" fn rb_erase(
    a: *mut rb_bitmask,
    b: *const rb_bitmask,
    xoffset: i64,
    yoffset: i64,
) {
    algebra::erase(&mut (*a).0, &(*b).0, xoffset, yoffset);
}

#[no_mangle]
pub unsafe extern "C" fn rb_scale(src: *const rb_bitmask, w: i64, h: i64) -> *mut rb_bitmask {
    match ops::scale(&(*src).0, w, h) {
        Ok(m) => Box::into_raw(Box::new(rb_bitmask(m))),
        Err(_) => std::ptr::null_mut(),
    }
}

#[no_mangle]
pub unsafe extern "C" fn rb_convolve(
    a: *const rb_bitmask,
    b: *const rb_bitmask,
    o: *mut rb_bitmask,
    xoffset: i64,
    yoffset: i64,
) {
    ops::convolve(&(*a).0, &(*b).0, &mut (*o).0, xoffset, yoffset);
}

pub struct rb_rect_list(Vec<Rect>);

#[no_mangle]
pub unsafe extern "C" fn rb_bounding_rects(mask: *const rb_bitmask) -> *mut rb_rect_list {
    match components::bounding_rects(&(*mask).0) {
        Ok(rects) => Box::into_raw(Box::new(rb_rect_list(rects))),
        Err(_) => std::ptr::null_mut(),
    }
}

#[no_mangle]
pub unsafe extern "C" fn rb_rect_list_len(list: *const rb_rect_list) -> u32 {
    (*list).0.len() as u32
}

#[repr(C)]
pub struct rb_rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl From<Rect> for rb_rect {
    fn from(r: Rect) -> Self {
        Self { x: r.x, y: r.y, w: r.w, h: r.h }
    }
}

#[no_mangle]
pub unsafe extern "C" fn rb_rect_list_get(list: *const rb_rect_list, index: u32) -> rb_rect {
    (*list).0[index as usize].into()
}

#[no_mangle]
pub unsafe extern "C" fn rb_rect_list_destroy(list: *mut rb_rect_list) {
    let _ = Box::from_raw(list);
}

pub struct rb_bitmask_list(Vec<Bitmask>);

#[no_mangle]
pub unsafe extern "C" fn rb_connected_components(
    mask: *const rb_bitmask,
    min: u32,
) -> *mut rb_bitmask_list {
    match components::connected_components(&(*mask).0, min) {
        Ok(parts) => Box::into_raw(Box::new(rb_bitmask_list(parts))),
        Err(_) => std::ptr::null_mut(),
    }
}

#[no_mangle]
pub unsafe extern "C" fn rb_bitmask_list_len(list: *const rb_bitmask_list) -> u32 {
    (*list).0.len() as u32
}

/// Clones element `index` out into a fresh owned handle the caller must
/// destroy with [`rb_destroy`]; the list itself keeps its own copy until
/// [`rb_bitmask_list_destroy`] runs.
#[no_mangle]
pub unsafe extern "C" fn rb_bitmask_list_get(
    list: *const rb_bitmask_list,
    index: u32,
) -> *mut rb_bitmask {
    Box::into_raw(Box::new(rb_bitmask((*list).0[index as usize].clone())))
}

#[no_mangle]
pub unsafe extern "C" fn rb_bitmask_list_destroy(list: *mut rb_bitmask_list) {
    let _ = Box::from_raw(list);
}

/// `has_seed = false` ignores `seed_x`/`seed_y` and picks by raw pixel
/// count; `has_seed = true` picks whichever component contains the seed.
#[no_mangle]
pub unsafe extern "C" fn rb_largest_component(
    mask: *const rb_bitmask,
    has_seed: bool,
    seed_x: u32,
    seed_y: u32,
) -> *mut rb_bitmask {
    let seed = has_seed.then_some((seed_x as usize, seed_y as usize));
    match components::largest_component(&(*mask).0, seed) {
        Ok(m) => Box::into_raw(Box::new(rb_bitmask(m))),
        Err(_) => std::ptr::null_mut(),
    }
}

// ---------------------------------------------------------------------
// Pixel surfaces and transforms (rb_*)
// ---------------------------------------------------------------------

#[repr(C)]
#[derive(Copy, Clone)]
pub struct rb_pixel_format {
    pub rmask: u32,
    pub gmask: u32,
    pub bmask: u32,
    pub amask: u32,
    pub rshift: u8,
    pub gshift: u8,
    pub bshift: u8,
    pub ashift: u8,
    pub rloss: u8,
    pub gloss: u8,
    pub bloss: u8,
    pub aloss: u8,
}

impl From<rb_pixel_format> for PixelFormat {
    fn from(f: rb_pixel_format) -> Self {
        Self {
            rmask: f.rmask,
            gmask: f.gmask,
            bmask: f.bmask,
            amask: f.amask,
            rshift: f.rshift,
            gshift: f.gshift,
            bshift: f.bshift,
            ashift: f.ashift,
            rloss: f.rloss,
            gloss: f.gloss,
            bloss: f.bloss,
            aloss: f.aloss,
        }
    }
}

pub struct rb_surface(RasterSurface);

#[no_mangle]
pub unsafe extern "C" fn rb_surface_create(
    width: u32,
    height: u32,
    bpp: u8,
    format: rb_pixel_format,
) -> *mut rb_surface {
    let surface = RasterSurface::new(width as usize, height as usize, bpp, format.into());
    Box::into_raw(Box::new(rb_surface(surface)))
}

#[no_mangle]
pub unsafe extern "C" fn rb_surface_destroy(s: *mut rb_surface) {
    let _ = Box::from_raw(s);
}

#[no_mangle]
pub unsafe extern "C" fn rb_surface_width(s: *const rb_surface) -> u32 {
    use raster_core::PixelSurface;
    (*s).0.width() as u32
}

#[no_mangle]
pub unsafe extern "C" fn rb_surface_height(s: *const rb_surface) -> u32 {
    use raster_core::PixelSurface;
    (*s).0.height() as u32
}

#[no_mangle]
pub unsafe extern "C" fn rb_surface_pitch(s: *const rb_surface) -> u32 {
    use raster_core::PixelSurface;
    (*s).0.pitch() as u32
}

/// Pointer to the surface's own packed pixel bytes, `pitch * height` long.
/// Valid until the surface is destroyed; the host writes/reads pixels
/// through it directly, matching an SDL-style owned-buffer surface.
#[no_mangle]
pub unsafe extern "C" fn rb_surface_data(s: *mut rb_surface) -> *mut u8 {
    use raster_core::PixelSurfaceMut;
    (*s).0.data_mut().as_mut_ptr()
}

#[no_mangle]
pub unsafe extern "C" fn rb_rotate90(src: *const rb_surface, dst: *mut rb_surface, angle: i32) {
    transform::rotate90(&(*src).0, &mut (*dst).0, angle);
}

#[no_mangle]
pub unsafe extern "C" fn rb_rotate(
    src: *const rb_surface,
    dst: *mut rb_surface,
    bgcolor: u32,
    sin_theta: f64,
    cos_theta: f64,
) {
    transform::rotate(&(*src).0, &mut (*dst).0, bgcolor, sin_theta, cos_theta);
}

#[no_mangle]
pub unsafe extern "C" fn rb_stretch(src: *const rb_surface, dst: *mut rb_surface) {
    transform::stretch(&(*src).0, &mut (*dst).0);
}

#[no_mangle]
pub unsafe extern "C" fn rb_smoothscale(src: *const rb_surface, dst: *mut rb_surface) -> i32 {
    match transform::smoothscale(&(*src).0, &mut (*dst).0) {
        Ok(()) => 0,
        Err(e) => alloc_code(e),
    }
}

#[no_mangle]
pub unsafe extern "C" fn rb_threshold(
    dst: *mut rb_bitmask,
    src: *const rb_surface,
    other: *const rb_surface,
    color: u32,
    tolerance: u32,
    palette_colors: bool,
) {
    let other_ref = if other.is_null() { None } else { Some(&(*other).0) };
    threshold::threshold(&mut (*dst).0, &(*src).0, other_ref, color, tolerance, palette_colors);
}

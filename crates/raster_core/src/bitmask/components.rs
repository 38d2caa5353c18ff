//! Connected-component labeling, built on the SAUF algorithm (Wu, Otoo,
//! Suzuki, "Two Strategies to Speed up Connected Component Labeling
//! Algorithms"): one forward pass assigns provisional
//! labels using a decision tree over the three already-visited 8-neighbours,
//! recording equivalences in an array-based union-find; a second pass
//! flattens the union-find and turns provisional labels into final ones.
//!
//! Three consumers share the same labeling pass and diverge only in what
//! they do with it afterwards: [`bounding_rects`] keeps every component and
//! walks pixels once more to grow each one's rectangle; [`connected_components`]
//! additionally drops components under `min` pixels before allocating one
//! [`Bitmask`] per survivor; [`largest_component`] never compacts labels at
//! all, just chases each root to find (or pick, if seeded) the biggest one.

use super::Bitmask;
use crate::error::{try_zeroed_vec, Result};
use crate::surface::Rect;

/// Per-pixel provisional labels plus the union-find/size bookkeeping built
/// up while assigning them. Label `0` means "background"; real labels are
/// `1..=parent.len()-1`. `parent[0]` is a permanent `0` sentinel, matching
/// every downstream lookup of an unset pixel's label resolving to the
/// background root.
struct Labeling {
    image: Vec<u32>,
    parent: Vec<u32>,
    largest: Vec<u32>,
    w: usize,
    h: usize,
}

fn find_root(parent: &[u32], mut x: u32) -> u32 {
    while parent[x as usize] < x {
        x = parent[x as usize];
    }
    x
}

/// Resolves the union of the components rooted at `c_label` and
/// `other_label`, taking whichever root is smaller and compressing both
/// chains down to it. Used for the two 8-connectivity cases where a pixel
/// touches two already-labeled neighbours that turn out to be the same
/// component under a different provisional label.
fn union_labels(parent: &mut [u32], c_label: u32, other_label: u32) -> u32 {
    let mut root = find_root(parent, c_label);
    if c_label != other_label {
        let aroot = find_root(parent, other_label);
        if root > aroot {
            root = aroot;
        }
        let mut temp = other_label;
        while parent[temp as usize] > root {
            let next = parent[temp as usize];
            parent[temp as usize] = root;
            temp = next;
        }
    }
    let mut croot = c_label;
    while parent[croot as usize] > root {
        let next = parent[croot as usize];
        parent[croot as usize] = root;
        croot = next;
    }
    root
}

fn new_label(parent: &mut Vec<u32>, largest: &mut Vec<u32>) -> u32 {
    let l = parent.len() as u32;
    parent.push(l);
    largest.push(0);
    l
}

/// The forward labeling pass, 8-connected. Diverges from the reference
/// decision tree in one place: the up-right diagonal neighbour ("c") is
/// only consulted when `x + 1 < w`, rather than read unconditionally:
/// for a single-column bit-plane the reference reads one cell to the
/// right of the row it's still filling in, which for `w == 1` is the
/// pixel currently being computed. Treating a nonexistent neighbour as
/// absent instead is the only sensible reading for a 1-wide image.
fn label(mask: &Bitmask) -> Result<Labeling> {
    let w = mask.width();
    let h = mask.height();
    let mut image = try_zeroed_vec(w * h)?;
    let mut parent: Vec<u32> = vec![0];
    let mut largest: Vec<u32> = vec![0];

    if w == 0 || h == 0 {
        return Ok(Labeling { image, parent, largest, w, h });
    }

    macro_rules! set {
        ($idx:expr, $lbl:expr) => {{
            let lbl = $lbl;
            image[$idx] = lbl;
            largest[lbl as usize] += 1;
        }};
    }

    if mask.getbit(0, 0) {
        let l = new_label(&mut parent, &mut largest);
        set!(0, l);
    }

    for x in 1..w {
        if mask.getbit(x, 0) {
            let d = image[x - 1];
            let l = if d != 0 { d } else { new_label(&mut parent, &mut largest) };
            set!(x, l);
        }
    }

    for y in 1..h {
        let b = image[(y - 1) * w];
        let c = if w > 1 { image[(y - 1) * w + 1] } else { 0 };
        if mask.getbit(0, y) {
            let l = if b != 0 {
                b
            } else if c != 0 {
                c
            } else {
                new_label(&mut parent, &mut largest)
            };
            set!(y * w, l);
        }

        for x in 1..w.saturating_sub(1) {
            if !mask.getbit(x, y) {
                continue;
            }
            let b = image[(y - 1) * w + x];
            let l = if b != 0 {
                b
            } else {
                let c = image[(y - 1) * w + x + 1];
                if c != 0 {
                    let a = image[(y - 1) * w + x - 1];
                    if a != 0 {
                        union_labels(&mut parent, c, a)
                    } else {
                        let d = image[y * w + x - 1];
                        if d != 0 {
                            union_labels(&mut parent, c, d)
                        } else {
                            c
                        }
                    }
                } else {
                    let a = image[(y - 1) * w + x - 1];
                    if a != 0 {
                        a
                    } else {
                        let d = image[y * w + x - 1];
                        if d != 0 {
                            d
                        } else {
                            new_label(&mut parent, &mut largest)
                        }
                    }
                }
            };
            set!(y * w + x, l);
        }

        if w > 1 {
            let x = w - 1;
            if mask.getbit(x, y) {
                let b = image[(y - 1) * w + x];
                let l = if b != 0 {
                    b
                } else {
                    let a = image[(y - 1) * w + x - 1];
                    if a != 0 {
                        a
                    } else {
                        let d = image[y * w + x - 1];
                        if d != 0 {
                            d
                        } else {
                            new_label(&mut parent, &mut largest)
                        }
                    }
                };
                set!(y * w + x, l);
            }
        }
    }

    log::debug!("labeled {}x{} mask into {} provisional labels", w, h, parent.len() - 1);
    Ok(Labeling { image, parent, largest, w, h })
}

/// The bounding rectangle of every 8-connected component in `mask`, in no
/// particular order.
pub fn bounding_rects(mask: &Bitmask) -> Result<Vec<Rect>> {
    let Labeling { image, mut parent, w, h, .. } = label(mask)?;
    let num_labels = parent.len() as u32 - 1;

    let mut next = 0u32;
    for x in 1..=num_labels as usize {
        if parent[x] < x as u32 {
            parent[x] = parent[parent[x] as usize];
        } else {
            next += 1;
            parent[x] = next;
        }
    }
    if next == 0 {
        return Ok(Vec::new());
    }

    let mut rects: Vec<Option<Rect>> = vec![None; next as usize + 1];
    for y in 0..h {
        for x in 0..w {
            let raw = image[y * w + x] as usize;
            if raw == 0 {
                continue;
            }
            let lbl = parent[raw] as usize;
            if let Some(r) = rects[lbl].as_mut() {
                let old_x = r.x;
                r.x = r.x.min(x as i32);
                r.y = r.y.min(y as i32);
                r.w = ((r.w as i32 + old_x).max(x as i32 + 1) - r.x) as u32;
                r.h = r.h.max((y as i32 - r.y + 1) as u32);
            } else {
                rects[lbl] = Some(Rect { x: x as i32, y: y as i32, w: 1, h: 1 });
            }
        }
    }
    Ok(rects.into_iter().skip(1).map(|r| r.expect("every label index was written at least once")).collect())
}

/// One [`Bitmask`] per 8-connected component of `mask` with at least `min`
/// set pixels, each the same size as `mask`.
pub fn connected_components(mask: &Bitmask, min: u32) -> Result<Vec<Bitmask>> {
    let Labeling { image, mut parent, mut largest, w, h } = label(mask)?;
    let num_labels = parent.len() as u32 - 1;

    for x in 1..=num_labels as usize {
        if parent[x] < x as u32 {
            largest[parent[x] as usize] += largest[x];
        }
    }

    let mut next = 0u32;
    for x in 1..=num_labels as usize {
        if parent[x] < x as u32 {
            parent[x] = parent[parent[x] as usize];
        } else if largest[x] >= min {
            next += 1;
            parent[x] = next;
        } else {
            parent[x] = 0;
        }
    }
    if next == 0 {
        return Ok(Vec::new());
    }

    let mut comps = Vec::new();
    for _ in 0..next {
        comps.push(Bitmask::create(w, h)?);
    }
    for y in 0..h {
        for x in 0..w {
            let raw = image[y * w + x] as usize;
            if raw == 0 {
                continue;
            }
            let lbl = parent[raw];
            if lbl != 0 {
                comps[lbl as usize - 1].setbit(x, y);
            }
        }
    }
    Ok(comps)
}

/// The single largest 8-connected component of `mask`, or, when `seed` is
/// given, the component containing that pixel regardless of its size. A
/// `seed` naming a background pixel returns whichever background-labeled
/// region that resolves to, which is not a useful answer and is the
/// caller's mistake to avoid. A `seed` outside the mask's bounds is logged
/// and treated as no seed at all, falling back to picking by size.
pub fn largest_component(mask: &Bitmask, seed: Option<(usize, usize)>) -> Result<Bitmask> {
    let Labeling { image, mut parent, mut largest, w, h } = label(mask)?;
    let num_labels = parent.len() as u32 - 1;
    let mut output = Bitmask::create(w, h)?;

    if num_labels == 0 {
        return Ok(output);
    }

    let mut max_label = 1u32;
    for x in 2..=num_labels {
        let xi = x as usize;
        if parent[xi] != x {
            largest[parent[xi] as usize] += largest[xi];
            parent[xi] = parent[parent[xi] as usize];
        }
        if largest[parent[xi] as usize] > largest[max_label as usize] {
            max_label = parent[xi];
        }
    }

    let max_label = match seed {
        Some((x, y)) if x < w && y < h => parent[image[y * w + x] as usize],
        Some((x, y)) => {
            log::warn!("largest_component seed ({x}, {y}) is outside the {w}x{h} mask, ignoring it");
            max_label
        }
        None => max_label,
    };

    for y in 0..h {
        for x in 0..w {
            if parent[image[y * w + x] as usize] == max_label {
                output.setbit(x, y);
            }
        }
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_rows(rows: &[&str]) -> Bitmask {
        let h = rows.len();
        let w = rows[0].len();
        let mut m = Bitmask::create(w, h).unwrap();
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c == '#' {
                    m.setbit(x, y);
                }
            }
        }
        m
    }

    #[test]
    fn s4_two_diagonal_squares_are_one_component_eight_connected() {
        let m = from_rows(&["##...", "##...", "..##.", "..##.", "....."]);
        let rects = bounding_rects(&m).unwrap();
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0], Rect { x: 0, y: 0, w: 4, h: 4 });
    }

    #[test]
    fn two_separate_blobs_give_two_rects() {
        let m = from_rows(&["##....", "##....", "......", "....##", "....##"]);
        let mut rects = bounding_rects(&m).unwrap();
        rects.sort_by_key(|r| (r.x, r.y));
        assert_eq!(rects, vec![Rect { x: 0, y: 0, w: 2, h: 2 }, Rect { x: 4, y: 3, w: 2, h: 2 }]);
    }

    #[test]
    fn empty_mask_has_no_components() {
        let m = Bitmask::create(10, 10).unwrap();
        assert!(bounding_rects(&m).unwrap().is_empty());
        assert!(connected_components(&m, 1).unwrap().is_empty());
        assert_eq!(largest_component(&m, None).unwrap().count(), 0);
    }

    #[test]
    fn connected_components_drops_small_blobs() {
        let m = from_rows(&["#....", ".....", ".###.", ".###.", ".###."]);
        let big_only = connected_components(&m, 2).unwrap();
        assert_eq!(big_only.len(), 1);
        assert_eq!(big_only[0].count(), 9);

        let all = connected_components(&m, 1).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn largest_component_picks_biggest_by_pixel_count() {
        let m = from_rows(&["#....", ".....", ".###.", ".###.", "....."]);
        let out = largest_component(&m, None).unwrap();
        assert_eq!(out.count(), 9);
        assert!(!out.getbit(0, 0));
    }

    #[test]
    fn largest_component_seed_overrides_size() {
        let m = from_rows(&["#....", ".....", ".###.", ".###.", "....."]);
        let out = largest_component(&m, Some((0, 0))).unwrap();
        assert_eq!(out.count(), 1);
        assert!(out.getbit(0, 0));
    }

    #[test]
    fn largest_component_with_out_of_bounds_seed_falls_back_to_biggest() {
        let m = from_rows(&["#....", ".....", ".###.", ".###.", "....."]);
        let out = largest_component(&m, Some((99, 99))).unwrap();
        assert_eq!(out.count(), 9);
    }

    #[test]
    fn single_column_mask_does_not_panic_and_labels_correctly() {
        let m = from_rows(&["#", "#", ".", "#"]);
        let rects = bounding_rects(&m).unwrap();
        let mut rects = rects;
        rects.sort_by_key(|r| r.y);
        assert_eq!(rects, vec![Rect { x: 0, y: 0, w: 1, h: 2 }, Rect { x: 0, y: 3, w: 1, h: 1 }]);
    }

    #[test]
    fn full_grid_is_single_component() {
        let mut m = Bitmask::create(20, 15).unwrap();
        m.fill();
        let rects = bounding_rects(&m).unwrap();
        assert_eq!(rects, vec![Rect { x: 0, y: 0, w: 20, h: 15 }]);
    }
}

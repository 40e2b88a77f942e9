//! Slot geometry for group avatars.
//!
//! All positions derive from the output square's side, so the same layout
//! works at any resolution. The outer radius `R` is half the shorter side.

/// Axis-aligned rectangle in floating-point pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectF {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl RectF {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle anchored at the origin.
    pub const fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> (f32, f32) {
        (
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Shrink by `dx`/`dy` on every side (negative values grow).
    pub fn inset(&self, dx: f32, dy: f32) -> Self {
        Self::new(
            self.left + dx,
            self.top + dy,
            self.right - dx,
            self.bottom - dy,
        )
    }

    pub fn intersection(&self, other: &RectF) -> Option<RectF> {
        let r = RectF::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        );
        (r.width() > 0.0 && r.height() > 0.0).then_some(r)
    }

    /// True when `other` lies within `self`, allowing `epsilon` of slack.
    pub fn contains_rect(&self, other: &RectF, epsilon: f32) -> bool {
        other.left >= self.left - epsilon
            && other.top >= self.top - epsilon
            && other.right <= self.right + epsilon
            && other.bottom <= self.bottom + epsilon
    }
}

/// How [`Matrix::rect_to_rect`] maps a source onto a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleToFit {
    /// Scale each axis independently so the source covers the destination.
    Fill,
    /// Uniform scale so the source fits inside, centered.
    Center,
}

/// Scale-then-translate transform: `x' = sx * x + tx`, `y' = sy * y + ty`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub sx: f32,
    pub sy: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        sx: 1.0,
        sy: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn rect_to_rect(src: &RectF, dst: &RectF, fit: ScaleToFit) -> Self {
        let sx = dst.width() / src.width();
        let sy = dst.height() / src.height();

        match fit {
            ScaleToFit::Fill => Self {
                sx,
                sy,
                tx: dst.left - src.left * sx,
                ty: dst.top - src.top * sy,
            },
            ScaleToFit::Center => {
                let s = sx.min(sy);
                let tx = dst.left + (dst.width() - src.width() * s) / 2.0 - src.left * s;
                let ty = dst.top + (dst.height() - src.height() * s) / 2.0 - src.top * s;
                Self {
                    sx: s,
                    sy: s,
                    tx,
                    ty,
                }
            }
        }
    }

    pub fn map_point(&self, x: f32, y: f32) -> (f32, f32) {
        (self.sx * x + self.tx, self.sy * y + self.ty)
    }
}

/// Where each participant image lands inside a `width` x `height` group
/// avatar.
///
/// `corner_radius` is the roundness factor in `[0, 1]` (0 = square slots,
/// 1 = circles). Group sizes above four use the first four slots.
pub fn dest_rects(width: u32, height: u32, group_size: usize, corner_radius: f32) -> Vec<RectF> {
    let w = width as f32;
    let h = height as f32;
    let half_w = w / 2.0;
    let half_h = h / 2.0;
    let outer_radius = w.min(h) / 2.0;
    let corner_radius = corner_radius.clamp(0.0, 1.0);

    match group_size {
        0 => Vec::new(),
        1 => vec![RectF::from_size(w, h)],
        2 => {
            // +-------+
            // | 0 |   |
            // +-------+
            // |   | 1 |
            // +-------+
            // Two silhouettes touching at the center, pushed along the
            // diagonal by an inset that grows with roundness.
            let image_size = outer_radius;
            let inset = corner_radius * 0.5f32.sqrt() * outer_radius / 4.0;
            let diag = inset / 2f32.sqrt();
            vec![
                RectF::new(inset, inset, image_size + diag, image_size + diag),
                RectF::new(image_size - diag, image_size - diag, w - inset, h - inset),
            ]
        }
        3 => {
            // +-------+
            // | | 0 | |
            // +-------+
            // | 1 | 2 |
            // +-------+
            // The slot radius r interpolates linearly between R/2 (square)
            // and (2*sqrt(3) - 3) * R, the radius of three mutually touching
            // circles inscribed in a circle of radius R.
            let r_factor = 0.5 + ((2.0 * 3f32.sqrt() - 3.0) - 0.5) * corner_radius;
            let image_size = r_factor * outer_radius;

            let left1 = half_w - image_size;
            let right1 = half_w + image_size;
            let sqrt3 = 3f32.sqrt();
            let top2 = ((sqrt3 - 1.0) * corner_radius + 1.0) * image_size
                + (1.0 - corner_radius) * image_size;
            let bottom2 = top2 + 2.0 * image_size;

            vec![
                RectF::new(left1, 0.0, right1, 2.0 * image_size),
                RectF::new(left1 - image_size, top2, left1 + image_size, bottom2),
                RectF::new(right1 - image_size, top2, right1 + image_size, bottom2),
            ]
        }
        _ => {
            // +-------+
            // | 0 | 1 |
            // +-------+
            // | 2 | 3 |
            // +-------+
            // Outer edges are inset by a fraction of the slot's half-diagonal.
            let inset = corner_radius * 0.5f32.sqrt() * outer_radius / 4.0;
            vec![
                RectF::new(inset, inset, half_w, half_h),
                RectF::new(half_w, inset, w - inset, half_h),
                RectF::new(inset, half_h, half_w, h - inset),
                RectF::new(half_w, half_h, w - inset, h - inset),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;
    const RADII: [f32; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];
    const SIZES: [u32; 3] = [48, 97, 128];

    fn inset_for(size: u32, corner_radius: f32) -> f32 {
        corner_radius * 0.5f32.sqrt() * (size as f32 / 2.0) / 4.0
    }

    #[test]
    fn test_single_slot_fills_square() {
        let rects = dest_rects(64, 64, 1, 1.0);
        assert_eq!(rects, vec![RectF::from_size(64.0, 64.0)]);
    }

    #[test]
    fn test_empty_group() {
        assert!(dest_rects(64, 64, 0, 1.0).is_empty());
    }

    #[test]
    fn test_large_groups_use_four_slots() {
        assert_eq!(dest_rects(64, 64, 7, 0.5).len(), 4);
    }

    #[test]
    fn test_slots_stay_in_bounds() {
        for &size in &SIZES {
            let bounds = RectF::from_size(size as f32, size as f32);
            for &cr in &RADII {
                for group in 2..=4 {
                    for rect in dest_rects(size, size, group, cr) {
                        assert!(
                            bounds.contains_rect(&rect, EPS),
                            "size={size} cr={cr} group={group} rect={rect:?}"
                        );
                        assert!(rect.width() > 0.0 && rect.height() > 0.0);
                    }
                }
            }
        }
    }

    #[test]
    fn test_two_slots_overlap_within_inset() {
        for &size in &SIZES {
            for &cr in &RADII {
                let rects = dest_rects(size, size, 2, cr);
                let tolerance = inset_for(size, cr) * 2f32.sqrt();
                if let Some(overlap) = rects[0].intersection(&rects[1]) {
                    assert!(overlap.width() <= tolerance + EPS);
                    assert!(overlap.height() <= tolerance + EPS);
                }
            }
        }
    }

    #[test]
    fn test_four_slots_do_not_overlap() {
        for &size in &SIZES {
            for &cr in &RADII {
                let rects = dest_rects(size, size, 4, cr);
                for i in 0..rects.len() {
                    for j in (i + 1)..rects.len() {
                        assert!(rects[i].intersection(&rects[j]).is_none());
                    }
                }
            }
        }
    }

    #[test]
    fn test_three_slot_circles_do_not_overlap() {
        for &cr in &RADII {
            let rects = dest_rects(128, 128, 3, cr);
            for i in 0..rects.len() {
                for j in (i + 1)..rects.len() {
                    let (ax, ay) = rects[i].center();
                    let (bx, by) = rects[j].center();
                    let distance = ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt();
                    let radii = rects[i].width() / 2.0 + rects[j].width() / 2.0;
                    assert!(distance >= radii - EPS, "cr={cr} i={i} j={j}");
                }
            }
        }
    }

    #[test]
    fn test_three_slot_radius_interpolation() {
        let square = dest_rects(100, 100, 3, 0.0);
        assert!((square[0].width() - 50.0).abs() < EPS);

        let round = dest_rects(100, 100, 3, 1.0);
        let expected = 2.0 * (2.0 * 3f32.sqrt() - 3.0) * 50.0;
        assert!((round[0].width() - expected).abs() < EPS);
    }

    #[test]
    fn test_center_fit_matrix() {
        let src = RectF::from_size(10.0, 20.0);
        let dst = RectF::from_size(100.0, 100.0);
        let m = Matrix::rect_to_rect(&src, &dst, ScaleToFit::Center);

        assert_eq!(m.sx, 5.0);
        assert_eq!(m.map_point(0.0, 0.0), (25.0, 0.0));
        assert_eq!(m.map_point(10.0, 20.0), (75.0, 100.0));
    }
}

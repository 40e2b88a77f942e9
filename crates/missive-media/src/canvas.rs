//! Minimal drawing surface used by the compositor.
//!
//! Only three primitives are needed: fill a rounded rectangle, draw an
//! image through a transform clipped to a rounded rectangle, and stroke a
//! rounded rectangle outline. [`RasterCanvas`] implements them on a
//! `tiny_skia::Pixmap`, converting to and from [`RgbaImage`] at the edges.

use image::{Rgba, RgbaImage};
use tiny_skia::{
    ColorU8, FillRule, FilterQuality, Paint, Path, PathBuilder, Pattern, Pixmap, Rect,
    SpreadMode, Stroke, Transform,
};

use crate::geometry::{Matrix, RectF};

/// Cubic Bezier control distance for a quarter ellipse.
const KAPPA: f32 = 0.552_284_8;

/// A rectangle with elliptical corners of radii `rx`/`ry`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundRect {
    pub rect: RectF,
    pub rx: f32,
    pub ry: f32,
}

impl RoundRect {
    pub fn new(rect: RectF, rx: f32, ry: f32) -> Self {
        let rx = rx.clamp(0.0, rect.width().max(0.0) / 2.0);
        let ry = ry.clamp(0.0, rect.height().max(0.0) / 2.0);
        Self { rect, rx, ry }
    }

    /// Corner radii as a fraction of the half extent: 0 gives a square,
    /// 1 an ellipse inscribed in `rect`.
    pub fn with_corner_factor(rect: RectF, corner_radius: f32) -> Self {
        Self::new(
            rect,
            corner_radius * rect.width() / 2.0,
            corner_radius * rect.height() / 2.0,
        )
    }

    /// Outline as a closed path, or `None` when the rectangle is empty.
    fn path(&self) -> Option<Path> {
        let r = &self.rect;
        if self.rx <= 0.0 || self.ry <= 0.0 {
            return Rect::from_ltrb(r.left, r.top, r.right, r.bottom).map(PathBuilder::from_rect);
        }

        let (rx, ry) = (self.rx, self.ry);
        let (kx, ky) = (rx * KAPPA, ry * KAPPA);

        let mut pb = PathBuilder::new();
        pb.move_to(r.left + rx, r.top);
        pb.line_to(r.right - rx, r.top);
        pb.cubic_to(r.right - rx + kx, r.top, r.right, r.top + ry - ky, r.right, r.top + ry);
        pb.line_to(r.right, r.bottom - ry);
        pb.cubic_to(
            r.right,
            r.bottom - ry + ky,
            r.right - rx + kx,
            r.bottom,
            r.right - rx,
            r.bottom,
        );
        pb.line_to(r.left + rx, r.bottom);
        pb.cubic_to(r.left + rx - kx, r.bottom, r.left, r.bottom - ry + ky, r.left, r.bottom - ry);
        pb.line_to(r.left, r.top + ry);
        pb.cubic_to(r.left, r.top + ry - ky, r.left + rx - kx, r.top, r.left + rx, r.top);
        pb.close();
        pb.finish()
    }
}

/// Drawing capabilities needed to render an avatar.
pub trait Canvas {
    fn fill_round_rect(&mut self, shape: &RoundRect, color: Rgba<u8>);

    /// Draw `image` mapped through `matrix`, clipped to `clip`. Destination
    /// pixels that map outside the source repeat its nearest edge pixel.
    fn draw_image(&mut self, image: &RgbaImage, matrix: &Matrix, clip: &RoundRect);

    /// Stroke the outline of `shape`, centered on it, `stroke_width` wide.
    fn stroke_round_rect(&mut self, shape: &RoundRect, color: Rgba<u8>, stroke_width: f32);
}

/// [`Canvas`] over an anti-aliased `tiny_skia` pixmap.
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    pixmap: Pixmap,
}

impl RasterCanvas {
    /// A fully transparent canvas, or `None` when either side is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Some(Self {
            pixmap: Pixmap::new(width, height)?,
        })
    }

    pub fn into_image(self) -> RgbaImage {
        let mut image = RgbaImage::new(self.pixmap.width(), self.pixmap.height());
        for (dst, src) in image.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        image
    }
}

impl Canvas for RasterCanvas {
    fn fill_round_rect(&mut self, shape: &RoundRect, color: Rgba<u8>) {
        let Some(path) = shape.path() else {
            return;
        };
        self.pixmap.fill_path(
            &path,
            &solid_paint(color),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    fn draw_image(&mut self, image: &RgbaImage, matrix: &Matrix, clip: &RoundRect) {
        let Some(source) = to_pixmap(image) else {
            return;
        };
        let Some(path) = clip.path() else {
            return;
        };
        let transform = Transform::from_row(matrix.sx, 0.0, 0.0, matrix.sy, matrix.tx, matrix.ty);

        let mut paint = Paint::default();
        paint.anti_alias = true;
        paint.shader = Pattern::new(
            source.as_ref(),
            SpreadMode::Pad,
            FilterQuality::Bilinear,
            1.0,
            transform,
        );
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    fn stroke_round_rect(&mut self, shape: &RoundRect, color: Rgba<u8>, stroke_width: f32) {
        let Some(path) = shape.path() else {
            return;
        };
        let stroke = Stroke {
            width: stroke_width,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(
            &path,
            &solid_paint(color),
            &stroke,
            Transform::identity(),
            None,
        );
    }
}

fn solid_paint(color: Rgba<u8>) -> Paint<'static> {
    let [r, g, b, a] = color.0;
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

/// Premultiplied copy of `image`; `None` for an empty image.
fn to_pixmap(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

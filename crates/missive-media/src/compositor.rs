//! Group avatar composition.
//!
//! Each participant image is rendered into its own slot bitmap (center-fit,
//! masked to a rounded rectangle, optionally backed and outlined) and the
//! slot bitmaps are then placed into the output square at the positions
//! computed by [`dest_rects`].

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};
use tracing::debug;

use crate::canvas::{Canvas, RasterCanvas, RoundRect};
use crate::error::AvatarError;
use crate::geometry::{dest_rects, Matrix, RectF, ScaleToFit};

/// Width of the optional outline drawn around each slot, in pixels.
pub const STROKE_WIDTH: f32 = 6.0;

/// Most slots a group avatar can hold.
pub const MAX_SLOTS: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct AvatarConfig {
    /// Side of the output square, in pixels.
    pub size: u32,
    /// Images beyond this many are ignored; 1 disables composition.
    pub max_group_size: usize,
    /// Painted under each slot when `fill_background` is set.
    pub background: Rgba<u8>,
    /// Slot outline color; a fully transparent color disables the outline.
    pub stroke: Rgba<u8>,
    pub fill_background: bool,
    /// Roundness factor in `[0, 1]`.
    pub corner_radius: f32,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            size: 128,
            max_group_size: MAX_SLOTS,
            background: Rgba([0x9e, 0x9e, 0x9e, 0xff]),
            stroke: Rgba([0, 0, 0, 0]),
            fill_background: true,
            corner_radius: 1.0,
        }
    }
}

impl AvatarConfig {
    /// Convert a roundness percentage to a factor, capping at 100%.
    pub fn corner_radius_from_percent(percent: u32) -> f32 {
        percent.min(100) as f32 / 100.0
    }
}

/// Compose up to four images into one square avatar.
///
/// Returns `None` when no usable image is given (zero-sized images count as
/// absent) or the output size is zero, so callers can keep their current
/// icon. A single image (or `max_group_size == 1`) is returned as is when it
/// already has the output size, otherwise scaled to fill the output square.
pub fn compose_avatar(images: &[RgbaImage], config: &AvatarConfig) -> Option<RgbaImage> {
    let images: Vec<&RgbaImage> = images
        .iter()
        .filter(|image| image.width() > 0 && image.height() > 0)
        .collect();
    let first = images.first()?;
    let size = config.size;
    if size == 0 {
        return None;
    }

    let group_size = images
        .len()
        .min(config.max_group_size.max(1))
        .min(MAX_SLOTS);

    if group_size == 1 {
        return Some(fit_square(first, size));
    }

    let rects = dest_rects(size, size, group_size, config.corner_radius);
    debug!(group_size, size, "composing group avatar");

    let mut canvas = RasterCanvas::new(size, size)?;
    for (image, dest) in images.iter().zip(&rects) {
        let Some(slot) = render_slot(image, dest, config) else {
            continue;
        };
        let slot_rect = RectF::from_size(slot.width() as f32, slot.height() as f32);
        let matrix = Matrix::rect_to_rect(&slot_rect, dest, ScaleToFit::Fill);
        canvas.draw_image(&slot, &matrix, &RoundRect::new(*dest, 0.0, 0.0));
    }

    Some(canvas.into_image())
}

/// Mask a single image to the rounded-rect silhouette used for slots.
/// An empty image comes back unchanged.
pub fn clip_to_round_rect(image: &RgbaImage, corner_radius: f32) -> RgbaImage {
    let Some(mut canvas) = RasterCanvas::new(image.width(), image.height()) else {
        return image.clone();
    };
    let bounds = RectF::from_size(image.width() as f32, image.height() as f32);
    canvas.draw_image(
        image,
        &Matrix::IDENTITY,
        &RoundRect::with_corner_factor(bounds, corner_radius),
    );
    canvas.into_image()
}

/// Draw `source` into `dest` through the slot mask.
///
/// Order matters: background first, then the image, then the outline.
pub fn draw_masked<C: Canvas>(
    canvas: &mut C,
    source: &RgbaImage,
    dest: &RectF,
    config: &AvatarConfig,
) {
    let source_rect = RectF::from_size(source.width() as f32, source.height() as f32);
    let matrix = Matrix::rect_to_rect(&source_rect, dest, ScaleToFit::Center);
    let mask = RoundRect::with_corner_factor(*dest, config.corner_radius);

    if config.fill_background {
        canvas.fill_round_rect(&mask, config.background);
    }

    canvas.draw_image(source, &matrix, &mask);

    if config.stroke.0[3] != 0 {
        let half = STROKE_WIDTH / 2.0;
        let outline = RoundRect::with_corner_factor(dest.inset(half, half), config.corner_radius);
        canvas.stroke_round_rect(&outline, config.stroke, STROKE_WIDTH);
    }
}

fn render_slot(source: &RgbaImage, dest: &RectF, config: &AvatarConfig) -> Option<RgbaImage> {
    let width = dest.width().round().max(1.0) as u32;
    let height = dest.height().round().max(1.0) as u32;

    let mut canvas = RasterCanvas::new(width, height)?;
    let bounds = RectF::from_size(width as f32, height as f32);
    draw_masked(&mut canvas, source, &bounds, config);
    Some(canvas.into_image())
}

fn fit_square(image: &RgbaImage, size: u32) -> RgbaImage {
    if image.width() == size && image.height() == size {
        return image.clone();
    }
    DynamicImage::ImageRgba8(image.clone())
        .resize_to_fill(size, size, FilterType::Triangle)
        .to_rgba8()
}

/// Decode an image file into RGBA.
pub fn load_image(path: &Path) -> Result<RgbaImage, AvatarError> {
    let bytes = std::fs::read(path)?;
    Ok(image::load_from_memory(&bytes)?.to_rgba8())
}

/// Encode an image; the format follows the file extension.
pub fn save_image(image: &RgbaImage, path: &Path) -> Result<(), AvatarError> {
    image.save(path)?;
    Ok(())
}

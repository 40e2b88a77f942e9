//! # missive-media
//!
//! Conversation avatar composition.
//!
//! Up to four participant images are placed into one square icon. Slot
//! geometry ([`geometry`]) is pure arithmetic expressed in fractions of the
//! output square; pixel work goes through the [`canvas::Canvas`] capability
//! trait, with [`canvas::RasterCanvas`] as the in-memory implementation.

pub mod canvas;
pub mod compositor;
pub mod geometry;

mod error;

pub use canvas::{Canvas, RasterCanvas, RoundRect};
pub use compositor::{clip_to_round_rect, compose_avatar, load_image, save_image, AvatarConfig};
pub use error::AvatarError;
pub use geometry::{dest_rects, Matrix, RectF, ScaleToFit};

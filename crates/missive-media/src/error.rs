use thiserror::Error;

/// Errors produced while loading or saving avatar images.
#[derive(Error, Debug)]
pub enum AvatarError {
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

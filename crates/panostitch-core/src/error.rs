use thiserror::Error;

#[derive(Error, Debug)]
pub enum StitchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Need at least {required} usable images, got {usable}")]
    InsufficientInput { usable: usize, required: usize },

    #[error("Image {index} has degenerate dimensions: {width}x{height}")]
    DegenerateImage {
        index: usize,
        width: usize,
        height: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Stitching strategy failed: {0}")]
    Strategy(String),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Invalid job manifest: {0}")]
    Manifest(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, StitchError>;

#![allow(dead_code)]

use panostitch_core::composite::CompositeConfig;
use panostitch_core::frame::{ColorGrid, FieldOfView, SourceImage};

pub const RED: [f32; 3] = [255.0, 0.0, 0.0];
pub const BLUE: [f32; 3] = [0.0, 0.0, 255.0];

/// A single-colored source image at the given heading.
pub fn solid_source(width: usize, height: usize, rgb: [f32; 3], azimuth: f64, elevation: f64) -> SourceImage {
    SourceImage::new(ColorGrid::solid(height, width, rgb), azimuth, elevation)
}

/// Source whose pixel values encode their own position, for sampling tests.
pub fn ramp_grid(width: usize, height: usize) -> ColorGrid {
    ColorGrid::from_fn(height, width, |row, col| {
        [col as f32, row as f32, (row * width + col) as f32 % 256.0]
    })
}

/// Composite settings with a square field of view.
pub fn square_fov_config(fov_deg: f64) -> CompositeConfig {
    CompositeConfig {
        fov: FieldOfView::new(fov_deg, fov_deg),
        ..CompositeConfig::default()
    }
}

/// Write a solid PNG into `dir` and return its path.
pub fn write_solid_png(
    dir: &std::path::Path,
    name: &str,
    width: u32,
    height: u32,
    rgb: [u8; 3],
) -> std::path::PathBuf {
    let path = dir.join(name);
    image::RgbImage::from_pixel(width, height, image::Rgb(rgb))
        .save(&path)
        .expect("write test png");
    path
}

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, Rgb, Rgb32FImage, RgbImage};
use tracing::debug;

use crate::consts::{JPEG_QUALITY, MAX_CHANNEL_VALUE};
use crate::error::{Result, StitchError};
use crate::frame::{ColorGrid, Orientation, SourceImage};

/// Convert an 8-bit RGB image into a color grid in [0, 255].
pub fn grid_from_rgb8(img: &RgbImage) -> ColorGrid {
    let (w, h) = img.dimensions();
    ColorGrid::from_fn(h as usize, w as usize, |row, col| {
        let Rgb([r, g, b]) = *img.get_pixel(col as u32, row as u32);
        [r as f32, g as f32, b as f32]
    })
}

/// Convert a float RGB image with samples in [0, 1] into a color grid.
pub fn grid_from_rgb32f(img: &Rgb32FImage) -> ColorGrid {
    let (w, h) = img.dimensions();
    ColorGrid::from_fn(h as usize, w as usize, |row, col| {
        let Rgb(px) = *img.get_pixel(col as u32, row as u32);
        px.map(|v| v * MAX_CHANNEL_VALUE)
    })
}

/// Quantize a color grid to 8-bit RGB, clamping out-of-range samples.
pub fn grid_to_rgb8(grid: &ColorGrid) -> RgbImage {
    let mut img = RgbImage::new(grid.width() as u32, grid.height() as u32);
    for row in 0..grid.height() {
        for col in 0..grid.width() {
            let rgb = grid
                .pixel(row, col)
                .map(|v| v.clamp(0.0, MAX_CHANNEL_VALUE).round() as u8);
            img.put_pixel(col as u32, row as u32, Rgb(rgb));
        }
    }
    img
}

/// Float RGB image with samples scaled into [0, 1].
pub fn grid_to_rgb32f(grid: &ColorGrid) -> Rgb32FImage {
    let mut img = Rgb32FImage::new(grid.width() as u32, grid.height() as u32);
    for row in 0..grid.height() {
        for col in 0..grid.width() {
            let rgb = grid.pixel(row, col).map(|v| v / MAX_CHANNEL_VALUE);
            img.put_pixel(col as u32, row as u32, Rgb(rgb));
        }
    }
    img
}

/// Decode any format supported by `image` into a color grid.
pub fn load_color_grid(path: &Path) -> Result<ColorGrid> {
    let img = image::open(path)?;
    Ok(grid_from_rgb8(&img.to_rgb8()))
}

/// Load one source photograph. Zero-sized images are rejected as
/// [`StitchError::DegenerateImage`] with the given batch `index`.
pub fn load_source(path: &Path, orientation: Orientation, index: usize) -> Result<SourceImage> {
    let pixels = load_color_grid(path)?;
    if pixels.is_degenerate() {
        return Err(StitchError::DegenerateImage {
            index,
            width: pixels.width(),
            height: pixels.height(),
        });
    }
    debug!(
        path = %path.display(),
        width = pixels.width(),
        height = pixels.height(),
        "Loaded source image"
    );
    Ok(SourceImage {
        pixels,
        orientation,
        label: Some(path.display().to_string()),
    })
}

/// Encode a grid as baseline JPEG at the panorama quality setting.
pub fn encode_jpeg(grid: &ColorGrid) -> Result<Vec<u8>> {
    let img = grid_to_rgb8(grid);
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(Cursor::new(&mut bytes), JPEG_QUALITY).encode_image(&img)?;
    Ok(bytes)
}

/// Save a panorama, choosing the format from the file extension.
/// JPEG output uses [`JPEG_QUALITY`]; anything unrecognized is written as PNG.
pub fn save_panorama(grid: &ColorGrid, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg" | "jpeg") => {
            std::fs::write(path, encode_jpeg(grid)?)?;
        }
        Some(other) => match ImageFormat::from_extension(other) {
            Some(format) => grid_to_rgb8(grid).save_with_format(path, format)?,
            None => grid_to_rgb8(grid).save_with_format(path, ImageFormat::Png)?,
        },
        None => grid_to_rgb8(grid).save_with_format(path, ImageFormat::Png)?,
    }
    Ok(())
}

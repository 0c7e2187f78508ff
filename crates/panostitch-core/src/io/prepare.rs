use image::imageops::{self, FilterType};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::frame::{ColorGrid, SourceImage};
use crate::io::image_io::{grid_from_rgb32f, grid_to_rgb32f};

/// Per-source adjustments applied before compositing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PrepareConfig {
    /// Longest side, in pixels, a source may have. Larger sources are
    /// resized with their aspect ratio preserved.
    #[serde(default)]
    pub max_input_dimension: Option<u32>,
    /// Mirror every source left-to-right (front cameras that save mirrored
    /// selfies).
    #[serde(default)]
    pub mirror_horizontal: bool,
}

impl PrepareConfig {
    /// True when preparation would leave every source unchanged.
    pub fn is_identity(&self) -> bool {
        self.max_input_dimension.is_none() && !self.mirror_horizontal
    }
}

/// Apply `config` to every source, preserving order and orientations.
/// Degenerate sources pass through untouched so the compositor can report
/// them.
pub fn prepare_sources(sources: Vec<SourceImage>, config: &PrepareConfig) -> Vec<SourceImage> {
    sources
        .into_iter()
        .map(|mut source| {
            if source.pixels.is_degenerate() {
                return source;
            }
            if let Some(max_dim) = config.max_input_dimension {
                source.pixels = downscale(&source.pixels, max_dim);
            }
            if config.mirror_horizontal {
                source.pixels = source.pixels.flip_horizontal();
            }
            source
        })
        .collect()
}

/// Shrink `grid` so that its longest side is at most `max_dim`. Grids that
/// already fit are returned as a copy.
pub fn downscale(grid: &ColorGrid, max_dim: u32) -> ColorGrid {
    let (w, h) = (grid.width() as u32, grid.height() as u32);
    let longest = w.max(h);
    if max_dim == 0 || longest <= max_dim {
        return grid.clone();
    }

    let scale = max_dim as f64 / longest as f64;
    let new_w = ((w as f64 * scale).round() as u32).max(1);
    let new_h = ((h as f64 * scale).round() as u32).max(1);
    debug!(from_w = w, from_h = h, new_w, new_h, "Downscaling source");

    let resized = imageops::resize(&grid_to_rgb32f(grid), new_w, new_h, FilterType::Triangle);
    grid_from_rgb32f(&resized)
}

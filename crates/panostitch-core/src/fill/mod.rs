pub mod distance;
pub mod gradient;
pub mod telea;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::composite::OutputCanvas;
use crate::consts::{DEFAULT_FILL_SMOOTHING_SIGMA, DEFAULT_INPAINT_RADIUS};
use crate::filters::gaussian_blur::{gaussian_blur_color, HorizontalEdge};

use self::distance::{nearest_valid, wrapped_column_distance};
use self::gradient::paint_sky_gradient;
use self::telea::inpaint_telea;

/// How uncovered canvas regions are repaired.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GapFillMethod {
    /// Copy the nearest covered pixel, then smooth inside the gaps.
    #[default]
    Propagate,
    /// Paint a sky/horizon/ground backdrop.
    SkyGradient,
    /// Leave gaps black.
    None,
}

impl std::fmt::Display for GapFillMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GapFillMethod::Propagate => write!(f, "Propagate"),
            GapFillMethod::SkyGradient => write!(f, "Sky Gradient"),
            GapFillMethod::None => write!(f, "None"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GapFillConfig {
    #[serde(default)]
    pub method: GapFillMethod,
    /// Gaussian sigma (canvas pixels) applied to propagated fill. 0 disables.
    #[serde(default = "default_smoothing_sigma")]
    pub smoothing_sigma: f32,
    /// Run fast-marching inpainting over the gaps after propagation.
    #[serde(default)]
    pub inpaint: bool,
    #[serde(default = "default_inpaint_radius")]
    pub inpaint_radius: usize,
}

fn default_smoothing_sigma() -> f32 {
    DEFAULT_FILL_SMOOTHING_SIGMA
}

fn default_inpaint_radius() -> usize {
    DEFAULT_INPAINT_RADIUS
}

impl Default for GapFillConfig {
    fn default() -> Self {
        Self {
            method: GapFillMethod::default(),
            smoothing_sigma: DEFAULT_FILL_SMOOTHING_SIGMA,
            inpaint: false,
            inpaint_radius: DEFAULT_INPAINT_RADIUS,
        }
    }
}

/// What the gap filler did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FillReport {
    /// Canvas pixels with no coverage before filling.
    pub gap_pixels: usize,
    /// Gap pixels that received a color.
    pub filled_pixels: usize,
}

/// Repair the gaps of a normalized canvas in place. Only gap pixels (weight
/// at or below `threshold`) are modified; the weight grid is left as is.
///
/// Never fails: a canvas with no covered pixel is returned unmodified by
/// the propagating filler.
pub fn fill_gaps(canvas: &mut OutputCanvas, threshold: f32, config: &GapFillConfig) -> FillReport {
    let gap = canvas.gap_mask(threshold);
    let gap_pixels = gap.iter().filter(|&&g| g).count();
    if gap_pixels == 0 {
        debug!("No gaps to fill");
        return FillReport::default();
    }

    let filled_pixels = match config.method {
        GapFillMethod::None => 0,
        GapFillMethod::SkyGradient => paint_sky_gradient(&mut canvas.color, &gap),
        GapFillMethod::Propagate => {
            let Some(nearest) = nearest_valid(&gap) else {
                warn!("Canvas has no covered pixels; leaving gaps unfilled");
                return FillReport {
                    gap_pixels,
                    filled_pixels: 0,
                };
            };

            // First pass: nearest covered color.
            let mut filled = canvas.color.clone();
            for ((row, col), &(nr, nc)) in nearest.indexed_iter() {
                if gap[[row, col]] {
                    filled.set_pixel(row, col, canvas.color.pixel(nr, nc));
                }
            }

            // Second pass: soften the Voronoi edges, inside gaps only.
            let smoothed = if config.smoothing_sigma > 0.0 {
                gaussian_blur_color(&filled, config.smoothing_sigma, HorizontalEdge::Wrap)
            } else {
                filled
            };
            for ((row, col), &g) in gap.indexed_iter() {
                if g {
                    canvas.color.set_pixel(row, col, smoothed.pixel(row, col));
                }
            }

            // Third pass: re-march the strip along the coverage boundary so the
            // seam between real and propagated pixels blends.
            if config.inpaint {
                let band = seam_band(&gap, &nearest, 2 * config.inpaint_radius);
                let inpainted = inpaint_telea(&mut canvas.color, &band, config.inpaint_radius);
                debug!(pixels = inpainted, "Fast-marching inpainting done");
            }
            gap_pixels
        }
    };

    info!(
        gap_pixels,
        filled_pixels,
        method = %config.method,
        "Gap fill complete"
    );

    FillReport {
        gap_pixels,
        filled_pixels,
    }
}

/// Gap pixels within `width` pixels of the nearest covered pixel.
fn seam_band(gap: &Array2<bool>, nearest: &Array2<(usize, usize)>, width: usize) -> Array2<bool> {
    let limit = (width * width) as f64;
    Array2::from_shape_fn(gap.dim(), |(row, col)| {
        if !gap[[row, col]] {
            return false;
        }
        let (nr, nc) = nearest[[row, col]];
        let dy = row as f64 - nr as f64;
        let dx = wrapped_column_distance(col, nc, gap.ncols()) as f64;
        dx * dx + dy * dy <= limit
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seam_band_is_limited_to_boundary_strip() {
        let gap = Array2::from_shape_fn((1, 20), |(_, c)| c >= 5);
        let nearest = Array2::from_shape_fn((1, 20), |(_, c)| (0, c.min(4)));
        let band = seam_band(&gap, &nearest, 3);
        let marked: Vec<usize> = (0..20).filter(|&c| band[[0, c]]).collect();
        assert_eq!(marked, vec![5, 6, 7]);
    }
}

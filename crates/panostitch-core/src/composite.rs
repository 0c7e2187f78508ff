use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ndarray::{Array2, ArrayViewMut1, Zip};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::camera::{Camera, Direction, EdgePolicy};
use crate::consts::{
    DEFAULT_FEATHER_FRACTION, DEFAULT_GRAZING_EPSILON, DEFAULT_WEIGHT_THRESHOLD,
    PARALLEL_PIXEL_THRESHOLD,
};
use crate::equirect::{AzimuthOrigin, EquirectGrid};
use crate::error::{Result, StitchError};
use crate::feather::{FeatherMask, MaskCache};
use crate::frame::{ColorGrid, FieldOfView, SourceImage};
use crate::sampler::BilinearTap;

/// Projection and blending parameters shared by every source in a batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompositeConfig {
    /// Feather width as a fraction of each image dimension, in (0, 0.5).
    #[serde(default = "default_feather_fraction")]
    pub feather_fraction: f32,
    /// Weights at or below this count as "no coverage".
    #[serde(default = "default_weight_threshold")]
    pub weight_threshold: f32,
    /// Minimum cosine to the camera axis for a direction to be projected.
    #[serde(default = "default_grazing_epsilon")]
    pub grazing_epsilon: f64,
    #[serde(default)]
    pub azimuth_origin: AzimuthOrigin,
    #[serde(default)]
    pub edge_policy: EdgePolicy,
    /// Intrinsic field of view of every camera.
    #[serde(default)]
    pub fov: FieldOfView,
}

fn default_feather_fraction() -> f32 {
    DEFAULT_FEATHER_FRACTION
}

fn default_weight_threshold() -> f32 {
    DEFAULT_WEIGHT_THRESHOLD
}

fn default_grazing_epsilon() -> f64 {
    DEFAULT_GRAZING_EPSILON
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            feather_fraction: DEFAULT_FEATHER_FRACTION,
            weight_threshold: DEFAULT_WEIGHT_THRESHOLD,
            grazing_epsilon: DEFAULT_GRAZING_EPSILON,
            azimuth_origin: AzimuthOrigin::default(),
            edge_policy: EdgePolicy::default(),
            fov: FieldOfView::default(),
        }
    }
}

impl CompositeConfig {
    pub fn validate(&self) -> Result<()> {
        let fov_ok = |deg: f64| deg > 0.0 && deg < 180.0;
        if !fov_ok(self.fov.horizontal_deg) || !fov_ok(self.fov.vertical_deg) {
            return Err(StitchError::InvalidConfig(format!(
                "Field of view must be in (0, 180) degrees, got {}",
                self.fov
            )));
        }
        if !(self.feather_fraction > 0.0 && self.feather_fraction < 0.5) {
            return Err(StitchError::InvalidConfig(format!(
                "Feather fraction must be in (0.0, 0.5), got {}",
                self.feather_fraction
            )));
        }
        if !(self.weight_threshold >= 0.0 && self.weight_threshold < 1.0) {
            return Err(StitchError::InvalidConfig(format!(
                "Weight threshold must be in [0.0, 1.0), got {}",
                self.weight_threshold
            )));
        }
        if !(self.grazing_epsilon >= 0.0 && self.grazing_epsilon < 1.0) {
            return Err(StitchError::InvalidConfig(format!(
                "Grazing epsilon must be in [0.0, 1.0), got {}",
                self.grazing_epsilon
            )));
        }
        if let EdgePolicy::Clamp { margin } = self.edge_policy {
            if !(0.0..0.5).contains(&margin) {
                return Err(StitchError::InvalidConfig(format!(
                    "Edge clamp margin must be in [0.0, 0.5), got {}",
                    margin
                )));
            }
        }
        Ok(())
    }

    /// Camera for one source orientation under this configuration.
    pub fn camera_for(&self, source: &SourceImage) -> Camera {
        Camera::new(&source.orientation, &self.fov)
            .with_grazing_epsilon(self.grazing_epsilon)
            .with_edge_policy(self.edge_policy)
    }
}

/// Accumulation buffers for one stitch: weighted color sums and total weight.
///
/// After [`OutputCanvas::normalize`] `color` holds the blended image and
/// gap pixels are black.
#[derive(Clone, Debug)]
pub struct OutputCanvas {
    pub color: ColorGrid,
    pub weight: Array2<f32>,
}

impl OutputCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            color: ColorGrid::zeros(height, width),
            weight: Array2::zeros((height, width)),
        }
    }

    pub fn width(&self) -> usize {
        self.weight.ncols()
    }

    pub fn height(&self) -> usize {
        self.weight.nrows()
    }

    /// Divide accumulated color by accumulated weight. Pixels whose weight is
    /// at or below `threshold` are zeroed. Returns the number of such gaps.
    pub fn normalize(&mut self, threshold: f32) -> usize {
        let weight = &self.weight;
        for plane in self.color.channels_mut() {
            Zip::from(plane).and(weight).for_each(|c, &w| {
                if w > threshold {
                    *c /= w;
                } else {
                    *c = 0.0;
                }
            });
        }
        self.gap_count(threshold)
    }

    /// True where no source contributed more than `threshold`.
    pub fn gap_mask(&self, threshold: f32) -> Array2<bool> {
        self.weight.mapv(|w| w <= threshold)
    }

    pub fn gap_count(&self, threshold: f32) -> usize {
        self.weight.iter().filter(|&&w| w <= threshold).count()
    }

    /// Fraction of canvas pixels with weight above `threshold`.
    pub fn coverage(&self, threshold: f32) -> f64 {
        let total = self.weight.len();
        if total == 0 {
            return 0.0;
        }
        (total - self.gap_count(threshold)) as f64 / total as f64
    }
}

/// A source image with its camera and feather mask resolved.
struct PreparedSource<'a> {
    pixels: &'a ColorGrid,
    camera: Camera,
    mask: Arc<FeatherMask>,
    max_x: f64,
    max_y: f64,
}

impl<'a> PreparedSource<'a> {
    fn new(source: &'a SourceImage, camera: Camera, mask: Arc<FeatherMask>) -> Self {
        Self {
            pixels: &source.pixels,
            camera,
            mask,
            max_x: (source.width() - 1) as f64,
            max_y: (source.height() - 1) as f64,
        }
    }

    /// Feather-weighted color seen along `direction`, or `None` when this
    /// source does not cover it.
    fn contribution(&self, direction: &Direction, threshold: f32) -> Option<([f32; 3], f32)> {
        let tap = self.tap(direction)?;
        let weight = self.mask.sample(&tap);
        if weight < threshold {
            return None;
        }
        Some((tap.apply_color(self.pixels), weight))
    }

    fn weight(&self, direction: &Direction) -> f32 {
        self.tap(direction)
            .map(|tap| self.mask.sample(&tap))
            .unwrap_or(0.0)
    }

    fn tap(&self, direction: &Direction) -> Option<BilinearTap> {
        let (u, v) = self.camera.project(direction).coords()?;
        Some(BilinearTap::new(
            u * self.max_x,
            v * self.max_y,
            self.pixels.width(),
            self.pixels.height(),
        ))
    }
}

/// True when `source` can contribute weight: it has pixels and its feather
/// mask rises above the weight threshold somewhere.
pub fn is_usable(source: &SourceImage, config: &CompositeConfig) -> bool {
    !source.pixels.is_degenerate()
        && FeatherMask::peak_weight(source.width(), source.height(), config.feather_fraction)
            > config.weight_threshold
}

/// Number of sources in `sources` that pass [`is_usable`].
pub fn usable_source_count(sources: &[SourceImage], config: &CompositeConfig) -> usize {
    sources.iter().filter(|s| is_usable(s, config)).count()
}

/// Drop sources that cannot contribute, logging each one.
fn usable_sources<'a>(sources: &'a [SourceImage], config: &CompositeConfig) -> Vec<&'a SourceImage> {
    sources
        .iter()
        .enumerate()
        .filter_map(|(i, source)| {
            if !is_usable(source, config) {
                let err = StitchError::DegenerateImage {
                    index: i,
                    width: source.width(),
                    height: source.height(),
                };
                warn!("Skipping {}: {}", source.display_name(i), err);
                None
            } else {
                Some(source)
            }
        })
        .collect()
}

fn check_canvas(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(StitchError::InvalidConfig(format!(
            "Output canvas must be non-empty, got {}x{}",
            width, height
        )));
    }
    Ok(())
}

/// Project every source onto a `width` x `height` equirectangular canvas and
/// accumulate feather-weighted color. The returned canvas is not normalized.
pub fn composite(
    sources: &[SourceImage],
    width: usize,
    height: usize,
    config: &CompositeConfig,
) -> Result<OutputCanvas> {
    composite_with_progress(sources, width, height, config, |_| {})
}

/// [`composite`] with a progress callback, called with the completed
/// fraction of canvas rows. The callback may run on worker threads.
pub fn composite_with_progress<F>(
    sources: &[SourceImage],
    width: usize,
    height: usize,
    config: &CompositeConfig,
    on_progress: F,
) -> Result<OutputCanvas>
where
    F: Fn(f32) + Sync,
{
    config.validate()?;
    check_canvas(width, height)?;

    let usable = usable_sources(sources, config);
    if usable.is_empty() {
        return Err(StitchError::InsufficientInput {
            usable: 0,
            required: 1,
        });
    }

    let mut masks = MaskCache::new(config.feather_fraction);
    let prepared: Vec<PreparedSource> = usable
        .iter()
        .map(|&source| {
            debug!(
                azimuth = source.orientation.azimuth_deg,
                elevation = source.orientation.elevation_deg,
                width = source.width(),
                height = source.height(),
                "Preparing source"
            );
            let mask = masks.get(source.width(), source.height());
            PreparedSource::new(source, config.camera_for(source), mask)
        })
        .collect();

    info!(
        sources = prepared.len(),
        masks = masks.len(),
        width,
        height,
        fov = %config.fov,
        "Compositing"
    );

    let grid = EquirectGrid::new(width, height, config.azimuth_origin);
    let threshold = config.weight_threshold;
    let rows_done = AtomicUsize::new(0);

    let mut canvas = OutputCanvas::new(width, height);
    let OutputCanvas { color, weight } = &mut canvas;
    let [red, green, blue] = color.channels_mut();

    let accumulate = |row: usize,
                      mut weight_row: ArrayViewMut1<f32>,
                      mut red_row: ArrayViewMut1<f32>,
                      mut green_row: ArrayViewMut1<f32>,
                      mut blue_row: ArrayViewMut1<f32>| {
        for col in 0..width {
            let direction = grid.direction(row, col);
            let mut rgb = [0.0f32; 3];
            let mut total = 0.0f32;
            // Fixed source order per pixel keeps the sums bit-reproducible.
            for source in &prepared {
                if let Some((color, w)) = source.contribution(&direction, threshold) {
                    rgb[0] += color[0] * w;
                    rgb[1] += color[1] * w;
                    rgb[2] += color[2] * w;
                    total += w;
                }
            }
            weight_row[col] += total;
            red_row[col] += rgb[0];
            green_row[col] += rgb[1];
            blue_row[col] += rgb[2];
        }
        let done = rows_done.fetch_add(1, Ordering::Relaxed) + 1;
        on_progress(done as f32 / height as f32);
    };

    let rows = Zip::indexed(weight.rows_mut())
        .and(red.rows_mut())
        .and(green.rows_mut())
        .and(blue.rows_mut());

    if width * height >= PARALLEL_PIXEL_THRESHOLD {
        rows.par_for_each(accumulate);
    } else {
        rows.for_each(accumulate);
    }

    Ok(canvas)
}

/// Fraction of the canvas each source covers with weight above the
/// threshold, in input order. Sources that cannot contribute report 0.
pub fn source_coverage(
    sources: &[SourceImage],
    width: usize,
    height: usize,
    config: &CompositeConfig,
) -> Result<Vec<f64>> {
    config.validate()?;
    check_canvas(width, height)?;

    let grid = EquirectGrid::new(width, height, config.azimuth_origin);
    let mut masks = MaskCache::new(config.feather_fraction);
    let total = (width * height) as f64;

    let coverage = sources
        .iter()
        .map(|source| {
            if !is_usable(source, config) {
                return 0.0;
            }
            let mask = masks.get(source.width(), source.height());
            let prepared = PreparedSource::new(source, config.camera_for(source), mask);
            let covered: usize = (0..height)
                .map(|row| {
                    (0..width)
                        .filter(|&col| {
                            prepared.weight(&grid.direction(row, col)) > config.weight_threshold
                        })
                        .count()
                })
                .sum();
            covered as f64 / total
        })
        .collect();

    Ok(coverage)
}

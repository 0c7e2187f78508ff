use std::collections::HashMap;
use std::sync::Arc;

use ndarray::Array2;

use crate::sampler::BilinearTap;

/// Hermite smoothstep on [0, 1].
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Per-image blend weights: 1.0 in the interior, easing to 0.0 at all four
/// borders over `fraction` of each dimension.
#[derive(Clone, Debug)]
pub struct FeatherMask {
    weights: Array2<f32>,
}

impl FeatherMask {
    pub fn new(width: usize, height: usize, fraction: f32) -> Self {
        let ramp_x = edge_ramp(width, fraction);
        let ramp_y = edge_ramp(height, fraction);

        let weights = Array2::from_shape_fn((height, width), |(row, col)| {
            smoothstep(ramp_x[col].min(ramp_y[row]))
        });
        Self { weights }
    }

    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    pub fn width(&self) -> usize {
        self.weights.ncols()
    }

    pub fn height(&self) -> usize {
        self.weights.nrows()
    }

    /// Weight at integer pixel (row, col).
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.weights[[row, col]]
    }

    /// Weight at a precomputed bilinear tap.
    pub fn sample(&self, tap: &BilinearTap) -> f32 {
        tap.apply(&self.weights)
    }

    /// Largest weight a `width` x `height` mask reaches, without building it.
    /// Images one or two pixels across are all border and peak at 0.
    pub fn peak_weight(width: usize, height: usize, fraction: f32) -> f32 {
        if width == 0 || height == 0 {
            return 0.0;
        }
        let ramp_x = ramp_value((width - 1) / 2, width, fraction);
        let ramp_y = ramp_value((height - 1) / 2, height, fraction);
        smoothstep(ramp_x.min(ramp_y))
    }
}

/// Normalized distance to the nearer border along one axis, saturating at 1.
fn edge_ramp(size: usize, fraction: f32) -> Vec<f32> {
    (0..size)
        .map(|i| ramp_value(i.min(size - 1 - i), size, fraction))
        .collect()
}

fn ramp_value(dist: usize, size: usize, fraction: f32) -> f32 {
    let extent = fraction * size as f32;
    if extent > 0.0 {
        (dist as f32 / extent).min(1.0)
    } else {
        1.0
    }
}

/// Masks depend only on image size, so images sharing dimensions share one.
#[derive(Debug)]
pub struct MaskCache {
    fraction: f32,
    masks: HashMap<(usize, usize), Arc<FeatherMask>>,
}

impl MaskCache {
    pub fn new(fraction: f32) -> Self {
        Self {
            fraction,
            masks: HashMap::new(),
        }
    }

    pub fn get(&mut self, width: usize, height: usize) -> Arc<FeatherMask> {
        let fraction = self.fraction;
        self.masks
            .entry((width, height))
            .or_insert_with(|| Arc::new(FeatherMask::new(width, height, fraction)))
            .clone()
    }

    /// Number of distinct mask sizes generated so far.
    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
}

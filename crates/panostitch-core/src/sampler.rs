use ndarray::Array2;

use crate::frame::ColorGrid;

/// The four neighbouring pixels and blend factors for one fractional
/// coordinate. Built once and applied to every plane of an image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BilinearTap {
    x0: usize,
    x1: usize,
    y0: usize,
    y1: usize,
    fx: f32,
    fy: f32,
}

impl BilinearTap {
    /// Clamp `(x, y)` into a `width` x `height` image and locate its
    /// neighbours. Coordinates are clamped, never wrapped.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(x: f64, y: f64, width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "cannot sample an empty image");
        let (x0, x1, fx) = axis_tap(x, width);
        let (y0, y1, fy) = axis_tap(y, height);
        Self {
            x0,
            x1,
            y0,
            y1,
            fx,
            fy,
        }
    }

    /// Blend the four neighbours of `plane`.
    pub fn apply(&self, plane: &Array2<f32>) -> f32 {
        let v00 = plane[[self.y0, self.x0]];
        let v10 = plane[[self.y0, self.x1]];
        let v01 = plane[[self.y1, self.x0]];
        let v11 = plane[[self.y1, self.x1]];
        let (fx, fy) = (self.fx, self.fy);

        v00 * (1.0 - fx) * (1.0 - fy) + v10 * fx * (1.0 - fy) + v01 * (1.0 - fx) * fy + v11 * fx * fy
    }

    pub fn apply_color(&self, grid: &ColorGrid) -> [f32; 3] {
        [
            self.apply(&grid.red),
            self.apply(&grid.green),
            self.apply(&grid.blue),
        ]
    }
}

fn axis_tap(coord: f64, size: usize) -> (usize, usize, f32) {
    let max = (size - 1) as f64;
    let c = if coord.is_nan() { 0.0 } else { coord.clamp(0.0, max) };
    let i0 = c.floor() as usize;
    let i1 = (i0 + 1).min(size - 1);
    (i0, i1, (c - i0 as f64) as f32)
}

/// Bilinearly sample a single plane at fractional `(x, y)`. An empty plane
/// samples as 0.
pub fn bilinear_sample(plane: &Array2<f32>, x: f64, y: f64) -> f32 {
    let (h, w) = plane.dim();
    if h == 0 || w == 0 {
        return 0.0;
    }
    BilinearTap::new(x, y, w, h).apply(plane)
}

/// Bilinearly sample all three channels of a color grid. An empty grid
/// samples as black.
pub fn sample_color(grid: &ColorGrid, x: f64, y: f64) -> [f32; 3] {
    if grid.is_degenerate() {
        return [0.0; 3];
    }
    BilinearTap::new(x, y, grid.width(), grid.height()).apply_color(grid)
}

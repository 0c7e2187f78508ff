use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::frame::ColorGrid;

/// How the kernel reads past the left/right edge of a plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HorizontalEdge {
    /// Repeat the border column.
    Clamp,
    /// Continue from the opposite edge, as on a 360° panorama.
    Wrap,
}

/// Gaussian-blur each channel of a color grid.
pub fn gaussian_blur_color(grid: &ColorGrid, sigma: f32, edge: HorizontalEdge) -> ColorGrid {
    ColorGrid {
        red: gaussian_blur_array(&grid.red, sigma, edge),
        green: gaussian_blur_array(&grid.green, sigma, edge),
        blue: gaussian_blur_array(&grid.blue, sigma, edge),
    }
}

/// Separable Gaussian blur of a single plane. Rows above/below the plane are
/// clamped; columns follow `edge`. A non-positive sigma returns a copy.
pub fn gaussian_blur_array(data: &Array2<f32>, sigma: f32, edge: HorizontalEdge) -> Array2<f32> {
    if sigma <= 0.0 || data.is_empty() {
        return data.clone();
    }
    let kernel = make_gaussian_kernel(sigma);
    let row_pass = convolve_rows(data, &kernel, edge);
    convolve_cols(&row_pass, &kernel)
}

fn make_gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (sigma * 3.0).ceil() as usize;
    let size = 2 * radius + 1;
    let mut kernel = vec![0.0f32; size];
    let s2 = 2.0 * sigma * sigma;
    let mut sum = 0.0f32;

    for (i, k) in kernel.iter_mut().enumerate() {
        let x = i as f32 - radius as f32;
        *k = (-x * x / s2).exp();
        sum += *k;
    }

    for v in &mut kernel {
        *v /= sum;
    }

    kernel
}

fn column_index(col: usize, offset: isize, w: usize, edge: HorizontalEdge) -> usize {
    let c = col as isize + offset;
    match edge {
        HorizontalEdge::Clamp => c.clamp(0, w as isize - 1) as usize,
        HorizontalEdge::Wrap => c.rem_euclid(w as isize) as usize,
    }
}

fn convolve_rows(data: &Array2<f32>, kernel: &[f32], edge: HorizontalEdge) -> Array2<f32> {
    let (h, w) = data.dim();
    let radius = kernel.len() as isize / 2;

    let convolve_row = |row: usize| -> Vec<f32> {
        (0..w)
            .map(|col| {
                kernel
                    .iter()
                    .enumerate()
                    .map(|(ki, &kv)| {
                        let src_col = column_index(col, ki as isize - radius, w, edge);
                        data[[row, src_col]] * kv
                    })
                    .sum()
            })
            .collect()
    };

    collect_rows(h, w, convolve_row)
}

fn convolve_cols(data: &Array2<f32>, kernel: &[f32]) -> Array2<f32> {
    let (h, w) = data.dim();
    let radius = kernel.len() as isize / 2;

    let convolve_row = |row: usize| -> Vec<f32> {
        (0..w)
            .map(|col| {
                kernel
                    .iter()
                    .enumerate()
                    .map(|(ki, &kv)| {
                        let src_row =
                            (row as isize + ki as isize - radius).clamp(0, h as isize - 1) as usize;
                        data[[src_row, col]] * kv
                    })
                    .sum()
            })
            .collect()
    };

    collect_rows(h, w, convolve_row)
}

/// Evaluate `f` for every row (in parallel for large planes) and assemble the
/// results into an array.
fn collect_rows<F>(h: usize, w: usize, f: F) -> Array2<f32>
where
    F: Fn(usize) -> Vec<f32> + Sync,
{
    let rows: Vec<Vec<f32>> = if h * w >= PARALLEL_PIXEL_THRESHOLD {
        (0..h).into_par_iter().map(&f).collect()
    } else {
        (0..h).map(&f).collect()
    };

    let mut result = Array2::<f32>::zeros((h, w));
    for (row, row_data) in rows.into_iter().enumerate() {
        for (col, val) in row_data.into_iter().enumerate() {
            result[[row, col]] = val;
        }
    }
    result
}

//! Exact Euclidean feature transform (Felzenszwalb & Huttenlocher): for every
//! pixel, the nearest pixel that is not a gap.
//!
//! Columns wrap: the canvas spans 360° of azimuth, so column 0 and column
//! `W - 1` are neighbours.

use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Nearest non-gap pixel `(row, col)` for every pixel of `gap`.
///
/// Valid pixels map to themselves. Returns `None` when every pixel is a gap.
pub fn nearest_valid(gap: &Array2<bool>) -> Option<Array2<(usize, usize)>> {
    let (h, w) = gap.dim();
    if gap.iter().all(|&g| g) {
        return None;
    }

    // Pass 1: nearest valid row within each column.
    let column_nearest = nearest_in_columns(gap);

    // Pass 2: lower envelope of parabolas along each row, over three copies
    // of the row so sites across the seam compete.
    let solve_row = |row: usize| -> Vec<(usize, usize)> {
        let (f, site_rows): (Vec<f64>, Vec<usize>) = (0..3 * w)
            .map(|i| match column_nearest[[row, i % w]] {
                Some(r) => {
                    let d = row as f64 - r as f64;
                    (d * d, r)
                }
                None => (f64::INFINITY, 0),
            })
            .unzip();

        let envelope = lower_envelope(&f);
        envelope[w..2 * w]
            .iter()
            .map(|&site| (site_rows[site], site % w))
            .collect()
    };

    let rows: Vec<Vec<(usize, usize)>> = if h * w >= PARALLEL_PIXEL_THRESHOLD {
        (0..h).into_par_iter().map(solve_row).collect()
    } else {
        (0..h).map(solve_row).collect()
    };

    let mut result = Array2::from_elem((h, w), (0usize, 0usize));
    for (row, row_data) in rows.into_iter().enumerate() {
        for (col, nearest) in row_data.into_iter().enumerate() {
            result[[row, col]] = nearest;
        }
    }
    Some(result)
}

/// Euclidean distance from every pixel to its nearest non-gap pixel.
pub fn distance_to_valid(gap: &Array2<bool>) -> Option<Array2<f32>> {
    let nearest = nearest_valid(gap)?;
    Some(Array2::from_shape_fn(gap.dim(), |(row, col)| {
        let (r, c) = nearest[[row, col]];
        let dy = row as f32 - r as f32;
        let dx = wrapped_column_distance(col, c, gap.ncols()) as f32;
        (dx * dx + dy * dy).sqrt()
    }))
}

/// Horizontal distance between two columns of a canvas `width` wide, going
/// whichever way round is shorter.
pub fn wrapped_column_distance(a: usize, b: usize, width: usize) -> usize {
    let d = a.abs_diff(b);
    d.min(width - d)
}

fn nearest_in_columns(gap: &Array2<bool>) -> Array2<Option<usize>> {
    let (h, w) = gap.dim();
    let mut nearest = Array2::from_elem((h, w), None);

    // Downward sweep: nearest valid row at or above.
    for row in 0..h {
        for col in 0..w {
            nearest[[row, col]] = if !gap[[row, col]] {
                Some(row)
            } else if row > 0 {
                nearest[[row - 1, col]]
            } else {
                None
            };
        }
    }

    // Upward sweep: keep whichever of above/below is closer.
    let mut below: Vec<Option<usize>> = vec![None; w];
    for row in (0..h).rev() {
        for col in 0..w {
            if !gap[[row, col]] {
                below[col] = Some(row);
            }
            if let Some(b) = below[col] {
                let closer = match nearest[[row, col]] {
                    Some(a) => b - row < row - a,
                    None => true,
                };
                if closer {
                    nearest[[row, col]] = Some(b);
                }
            }
        }
    }

    nearest
}

/// For every index `q`, the site `p` minimizing `(q - p)^2 + f[p]`.
/// At least one entry of `f` must be finite.
fn lower_envelope(f: &[f64]) -> Vec<usize> {
    let n = f.len();
    let sites: Vec<usize> = (0..n).filter(|&i| f[i].is_finite()).collect();

    let intersect = |p: usize, q: usize| -> f64 {
        let (pf, qf) = (p as f64, q as f64);
        ((f[q] + qf * qf) - (f[p] + pf * pf)) / (2.0 * (qf - pf))
    };

    let mut v = vec![0usize; sites.len()];
    let mut z = vec![0.0f64; sites.len() + 1];
    let mut k = 0;
    v[0] = sites[0];
    z[0] = f64::NEG_INFINITY;
    z[1] = f64::INFINITY;

    for &q in &sites[1..] {
        let mut s = intersect(v[k], q);
        while s <= z[k] {
            k -= 1;
            s = intersect(v[k], q);
        }
        k += 1;
        v[k] = q;
        z[k] = s;
        z[k + 1] = f64::INFINITY;
    }

    let mut result = Vec::with_capacity(n);
    k = 0;
    for q in 0..n {
        while z[k + 1] < q as f64 {
            k += 1;
        }
        result.push(v[k]);
    }
    result
}

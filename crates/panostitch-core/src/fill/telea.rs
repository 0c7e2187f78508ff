//! Fast-marching inpainting after Telea (2004).
//!
//! The gap region is filled from its boundary inward in order of arrival
//! time `T`; each newly reached pixel becomes a weighted average of the known
//! pixels within `radius`, weighted by direction (alignment with the march
//! front normal), distance, and level-set proximity.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use ndarray::Array2;

use crate::frame::ColorGrid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cell {
    Known,
    Band,
    Inside,
}

/// Narrow-band heap entry, ordered by arrival time then position.
#[derive(Clone, Copy, Debug)]
struct BandEntry {
    t: f64,
    row: usize,
    col: usize,
}

impl PartialEq for BandEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BandEntry {}

impl PartialOrd for BandEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BandEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.t
            .total_cmp(&other.t)
            .then(self.row.cmp(&other.row))
            .then(self.col.cmp(&other.col))
    }
}

struct FastMarch<'a> {
    color: &'a mut ColorGrid,
    cells: Array2<Cell>,
    t: Array2<f64>,
    heap: BinaryHeap<Reverse<BandEntry>>,
    radius: usize,
}

/// Inpaint every `gap` pixel of `color` from the surrounding known pixels.
/// Pixels outside `gap` are never modified. Returns the number of pixels
/// filled.
pub fn inpaint_telea(color: &mut ColorGrid, gap: &Array2<bool>, radius: usize) -> usize {
    let (h, w) = gap.dim();
    let cells = gap.mapv(|g| if g { Cell::Inside } else { Cell::Known });
    let t = gap.mapv(|g| if g { f64::INFINITY } else { 0.0 });

    let mut march = FastMarch {
        color,
        cells,
        t,
        heap: BinaryHeap::new(),
        radius: radius.max(1),
    };

    // Seed the band with known pixels that touch the gap.
    for row in 0..h {
        for col in 0..w {
            if march.cells[[row, col]] == Cell::Known
                && march
                    .neighbours(row, col)
                    .any(|(r, c)| march.cells[[r, c]] == Cell::Inside)
            {
                march.cells[[row, col]] = Cell::Band;
                march.heap.push(Reverse(BandEntry { t: 0.0, row, col }));
            }
        }
    }

    march.run()
}

impl FastMarch<'_> {
    fn dims(&self) -> (usize, usize) {
        self.cells.dim()
    }

    /// 4-connected neighbours inside the grid.
    fn neighbours(&self, row: usize, col: usize) -> impl Iterator<Item = (usize, usize)> {
        let (h, w) = self.dims();
        let candidates = [
            (row.checked_sub(1), Some(col)),
            (Some(row + 1).filter(|&r| r < h), Some(col)),
            (Some(row), col.checked_sub(1)),
            (Some(row), Some(col + 1).filter(|&c| c < w)),
        ];
        candidates
            .into_iter()
            .filter_map(|(r, c)| Some((r?, c?)))
    }

    fn run(&mut self) -> usize {
        let mut filled = 0;
        while let Some(Reverse(entry)) = self.heap.pop() {
            let (row, col) = (entry.row, entry.col);
            if self.cells[[row, col]] == Cell::Known {
                continue;
            }
            self.cells[[row, col]] = Cell::Known;

            let next: Vec<(usize, usize)> = self.neighbours(row, col).collect();
            for (r, c) in next {
                if self.cells[[r, c]] == Cell::Known {
                    continue;
                }
                let arrival = self.arrival_time(r, c);
                if arrival < self.t[[r, c]] {
                    self.t[[r, c]] = arrival;
                }
                if self.cells[[r, c]] == Cell::Inside {
                    self.cells[[r, c]] = Cell::Band;
                    self.inpaint_pixel(r, c);
                    filled += 1;
                }
                self.heap.push(Reverse(BandEntry {
                    t: self.t[[r, c]],
                    row: r,
                    col: c,
                }));
            }
        }
        filled
    }

    /// Arrival time at `(row, col)` from the eikonal equation `|∇T| = 1`,
    /// taking the best of the four quadrant solutions.
    fn arrival_time(&self, row: usize, col: usize) -> f64 {
        let (h, w) = self.dims();
        let at = |r: Option<usize>, c: Option<usize>| -> f64 {
            match (r, c) {
                (Some(r), Some(c)) if r < h && c < w && self.cells[[r, c]] != Cell::Inside => {
                    self.t[[r, c]]
                }
                _ => f64::INFINITY,
            }
        };
        let up = at(row.checked_sub(1), Some(col));
        let down = at(Some(row + 1), Some(col));
        let left = at(Some(row), col.checked_sub(1));
        let right = at(Some(row), Some(col + 1));

        [
            solve_eikonal(up, left),
            solve_eikonal(down, left),
            solve_eikonal(up, right),
            solve_eikonal(down, right),
        ]
        .into_iter()
        .fold(f64::INFINITY, f64::min)
    }

    /// Central-difference gradient of `T`, falling back to one-sided
    /// differences next to unreached pixels.
    fn t_gradient(&self, row: usize, col: usize) -> (f64, f64) {
        let (h, w) = self.dims();
        let center = self.t[[row, col]];
        let reached = |r: usize, c: usize| self.cells[[r, c]] != Cell::Inside;

        let axis = |prev: Option<(usize, usize)>, next: Option<(usize, usize)>| -> f64 {
            let prev = prev.filter(|&(r, c)| reached(r, c)).map(|(r, c)| self.t[[r, c]]);
            let next = next.filter(|&(r, c)| reached(r, c)).map(|(r, c)| self.t[[r, c]]);
            match (prev, next) {
                (Some(p), Some(n)) => (n - p) / 2.0,
                (Some(p), None) => center - p,
                (None, Some(n)) => n - center,
                (None, None) => 0.0,
            }
        };

        let gy = axis(
            row.checked_sub(1).map(|r| (r, col)),
            Some(row + 1).filter(|&r| r < h).map(|r| (r, col)),
        );
        let gx = axis(
            col.checked_sub(1).map(|c| (row, c)),
            Some(col + 1).filter(|&c| c < w).map(|c| (row, c)),
        );
        (gy, gx)
    }

    fn inpaint_pixel(&mut self, row: usize, col: usize) {
        let (h, w) = self.dims();
        let (gy, gx) = self.t_gradient(row, col);
        let t_here = self.t[[row, col]];
        let radius = self.radius as isize;
        let radius_sq = (radius * radius) as f64;

        let mut sum = [0.0f64; 3];
        let mut weight_sum = 0.0f64;

        for dr in -radius..=radius {
            for dc in -radius..=radius {
                let r = row as isize + dr;
                let c = col as isize + dc;
                if r < 0 || c < 0 || r >= h as isize || c >= w as isize {
                    continue;
                }
                let (r, c) = (r as usize, c as usize);
                if self.cells[[r, c]] != Cell::Known {
                    continue;
                }
                let (ry, rx) = (-(dr as f64), -(dc as f64));
                let len_sq = ry * ry + rx * rx;
                if len_sq == 0.0 || len_sq > radius_sq {
                    continue;
                }

                let mut dir = (ry * gy + rx * gx) / len_sq.sqrt();
                if dir.abs() <= 0.01 {
                    dir = 1e-6;
                }
                let dst = 1.0 / len_sq;
                let lev = 1.0 / (1.0 + (self.t[[r, c]] - t_here).abs());
                let weight = (dir * dst * lev).abs();

                let px = self.color.pixel(r, c);
                for (s, v) in sum.iter_mut().zip(px) {
                    *s += weight * v as f64;
                }
                weight_sum += weight;
            }
        }

        if weight_sum > 0.0 {
            let rgb = sum.map(|s| (s / weight_sum) as f32);
            self.color.set_pixel(row, col, rgb);
        }
    }
}

/// Solve `(T - t1)^2 + (T - t2)^2 = 1` for the upwind arrival time.
fn solve_eikonal(t1: f64, t2: f64) -> f64 {
    match (t1.is_finite(), t2.is_finite()) {
        (true, true) => {
            let diff = t1 - t2;
            if diff.abs() >= std::f64::consts::SQRT_2 {
                1.0 + t1.min(t2)
            } else {
                (t1 + t2 + (2.0 - diff * diff).sqrt()) / 2.0
            }
        }
        (true, false) => 1.0 + t1,
        (false, true) => 1.0 + t2,
        (false, false) => f64::INFINITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve_eikonal_single_neighbour() {
        assert_eq!(solve_eikonal(2.0, f64::INFINITY), 3.0);
        assert_eq!(solve_eikonal(f64::INFINITY, f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_solve_eikonal_diagonal_front() {
        // Equal neighbours: T = t + 1/sqrt(2).
        let t = solve_eikonal(1.0, 1.0);
        assert!((t - (1.0 + std::f64::consts::FRAC_1_SQRT_2)).abs() < 1e-12);
    }

    #[test]
    fn test_inpaint_fills_hole_with_surrounding_color() {
        let mut color = ColorGrid::solid(9, 9, [40.0, 80.0, 120.0]);
        let gap = Array2::from_shape_fn((9, 9), |(r, c)| (3..6).contains(&r) && (3..6).contains(&c));
        for r in 3..6 {
            for c in 3..6 {
                color.set_pixel(r, c, [0.0, 0.0, 0.0]);
            }
        }

        let filled = inpaint_telea(&mut color, &gap, 3);
        assert_eq!(filled, 9);
        for r in 3..6 {
            for c in 3..6 {
                let px = color.pixel(r, c);
                assert!((px[0] - 40.0).abs() < 1e-3, "({r},{c}) = {px:?}");
                assert!((px[2] - 120.0).abs() < 1e-3, "({r},{c}) = {px:?}");
            }
        }
    }
}

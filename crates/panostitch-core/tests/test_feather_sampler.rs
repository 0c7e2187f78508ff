mod common;

use approx::assert_abs_diff_eq;
use ndarray::Array2;
use panostitch_core::feather::{smoothstep, FeatherMask, MaskCache};
use panostitch_core::sampler::{bilinear_sample, sample_color};

use common::ramp_grid;

// ---------------------------------------------------------------------------
// Feather mask
// ---------------------------------------------------------------------------

#[test]
fn test_smoothstep_endpoints() {
    assert_eq!(smoothstep(0.0), 0.0);
    assert_eq!(smoothstep(1.0), 1.0);
    assert_eq!(smoothstep(0.5), 0.5);
    assert_eq!(smoothstep(-3.0), 0.0);
    assert_eq!(smoothstep(7.0), 1.0);
}

#[test]
fn test_mask_center_and_corners() {
    let mask = FeatherMask::new(100, 80, 0.2);
    assert_eq!(mask.at(40, 50), 1.0);
    assert_eq!(mask.at(0, 0), 0.0);
    assert_eq!(mask.at(0, 99), 0.0);
    assert_eq!(mask.at(79, 0), 0.0);
    assert_eq!(mask.at(79, 99), 0.0);
}

#[test]
fn test_mask_symmetric_under_flips() {
    let mask = FeatherMask::new(37, 22, 0.25);
    let (h, w) = (mask.height(), mask.width());
    for row in 0..h {
        for col in 0..w {
            let v = mask.at(row, col);
            assert_eq!(v, mask.at(h - 1 - row, col));
            assert_eq!(v, mask.at(row, w - 1 - col));
        }
    }
}

#[test]
fn test_mask_monotonic_toward_center() {
    let mask = FeatherMask::new(64, 48, 0.3);
    let mid_row = 24;
    for col in 1..32 {
        assert!(mask.at(mid_row, col) >= mask.at(mid_row, col - 1));
    }
    let mid_col = 32;
    for row in 1..24 {
        assert!(mask.at(row, mid_col) >= mask.at(row - 1, mid_col));
    }
    assert!(mask.weights().iter().all(|&w| (0.0..=1.0).contains(&w)));
}

#[test]
fn test_peak_weight_matches_built_mask() {
    let cases = [
        (100, 80, 0.2),
        (5, 4, 0.3),
        (3, 9, 0.05),
        (2, 50, 0.05),
        (40, 1, 0.1),
    ];
    for (w, h, fraction) in cases {
        let mask = FeatherMask::new(w, h, fraction);
        let max = mask.weights().iter().cloned().fold(0.0f32, f32::max);
        assert_eq!(FeatherMask::peak_weight(w, h, fraction), max, "{w}x{h}");
    }
    assert_eq!(FeatherMask::peak_weight(2, 2, 0.05), 0.0);
    assert_eq!(FeatherMask::peak_weight(0, 10, 0.05), 0.0);
}

#[test]
fn test_mask_cache_shares_sizes() {
    let mut cache = MaskCache::new(0.2);
    let a = cache.get(100, 50);
    let b = cache.get(100, 50);
    let c = cache.get(50, 100);
    assert!(std::sync::Arc::ptr_eq(&a, &b));
    assert_eq!(c.width(), 50);
    assert_eq!(cache.len(), 2);
}

// ---------------------------------------------------------------------------
// Sampler
// ---------------------------------------------------------------------------

#[test]
fn test_sample_at_integer_is_exact() {
    let grid = ramp_grid(13, 9);
    for row in 0..9 {
        for col in 0..13 {
            assert_eq!(
                sample_color(&grid, col as f64, row as f64),
                grid.pixel(row, col)
            );
        }
    }
}

#[test]
fn test_sample_midpoint_blends_neighbours() {
    let plane = Array2::from_shape_vec((2, 2), vec![0.0, 10.0, 20.0, 30.0]).unwrap();
    assert_abs_diff_eq!(bilinear_sample(&plane, 0.5, 0.0), 5.0, epsilon = 1e-6);
    assert_abs_diff_eq!(bilinear_sample(&plane, 0.0, 0.5), 10.0, epsilon = 1e-6);
    assert_abs_diff_eq!(bilinear_sample(&plane, 0.5, 0.5), 15.0, epsilon = 1e-6);
    assert_abs_diff_eq!(bilinear_sample(&plane, 0.25, 0.75), 17.5, epsilon = 1e-6);
}

#[test]
fn test_sample_clamps_instead_of_wrapping() {
    let grid = ramp_grid(8, 4);
    assert_eq!(sample_color(&grid, -5.0, -1.0), grid.pixel(0, 0));
    assert_eq!(sample_color(&grid, 100.0, 2.0), grid.pixel(2, 7));
    assert_eq!(sample_color(&grid, 7.0, 3.0), grid.pixel(3, 7));
    assert_eq!(sample_color(&grid, f64::NAN, 0.0), grid.pixel(0, 0));
}

#[test]
fn test_sample_empty_image_is_zero() {
    let plane = Array2::<f32>::zeros((0, 4));
    assert_eq!(bilinear_sample(&plane, 1.0, 0.0), 0.0);
    let grid = panostitch_core::frame::ColorGrid::zeros(3, 0);
    assert_eq!(sample_color(&grid, 0.0, 1.0), [0.0; 3]);
}

#[test]
fn test_sample_single_pixel_image() {
    let plane = Array2::from_elem((1, 1), 42.0f32);
    assert_eq!(bilinear_sample(&plane, 0.3, 0.7), 42.0);
}

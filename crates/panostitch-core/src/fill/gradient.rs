use ndarray::Array2;

use crate::frame::ColorGrid;

/// Color stops of the backdrop, top of the canvas (t = 0) to bottom (t = 1).
const SKY_STOPS: [(f32, [f32; 3]); 6] = [
    (0.0, [26.0, 26.0, 46.0]),
    (0.3, [26.0, 26.0, 46.0]),
    (0.45, [135.0, 206.0, 235.0]),
    (0.55, [200.0, 200.0, 180.0]),
    (0.7, [139.0, 115.0, 85.0]),
    (1.0, [50.0, 50.0, 50.0]),
];

/// Backdrop color at normalized canvas height `t` in [0, 1]: night sky,
/// day sky, horizon haze, ground, dark ground.
pub fn sky_gradient_color(t: f32) -> [f32; 3] {
    let t = t.clamp(0.0, 1.0);
    for pair in SKY_STOPS.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let lt = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
            return [
                c0[0] + (c1[0] - c0[0]) * lt,
                c0[1] + (c1[1] - c0[1]) * lt,
                c0[2] + (c1[2] - c0[2]) * lt,
            ];
        }
    }
    SKY_STOPS[SKY_STOPS.len() - 1].1
}

/// Paint every gap pixel with the backdrop color for its row.
pub fn paint_sky_gradient(color: &mut ColorGrid, gap: &Array2<bool>) -> usize {
    let (h, w) = gap.dim();
    let mut painted = 0;
    for row in 0..h {
        let rgb = sky_gradient_color(row as f32 / h as f32);
        for col in 0..w {
            if gap[[row, col]] {
                color.set_pixel(row, col, rgb);
                painted += 1;
            }
        }
    }
    painted
}

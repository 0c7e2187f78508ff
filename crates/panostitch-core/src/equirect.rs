use serde::{Deserialize, Serialize};

use crate::camera::Direction;

/// Which canvas column corresponds to azimuth 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AzimuthOrigin {
    /// Azimuth 0 at the center column; the left edge is azimuth -180.
    #[default]
    Center,
    /// Azimuth 0 at the left edge, increasing to 360 at the right edge.
    LeftEdge,
}

impl AzimuthOrigin {
    /// Azimuth in degrees for the left edge of canvas column `col`.
    pub fn azimuth_for_column(&self, col: usize, width: usize) -> f64 {
        let az = col as f64 / width as f64 * 360.0;
        match self {
            AzimuthOrigin::Center => az - 180.0,
            AzimuthOrigin::LeftEdge => az,
        }
    }

    /// Fractional canvas column for an azimuth in degrees.
    pub fn column_for_azimuth(&self, azimuth_deg: f64, width: usize) -> f64 {
        let shifted = match self {
            AzimuthOrigin::Center => azimuth_deg + 180.0,
            AzimuthOrigin::LeftEdge => azimuth_deg,
        };
        shifted.rem_euclid(360.0) / 360.0 * width as f64
    }
}

impl std::fmt::Display for AzimuthOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AzimuthOrigin::Center => write!(f, "Center"),
            AzimuthOrigin::LeftEdge => write!(f, "Left Edge"),
        }
    }
}

/// Elevation in degrees for canvas row `row`: +90 on the top row, -90 below
/// the bottom row.
pub fn elevation_for_row(row: usize, height: usize) -> f64 {
    90.0 - row as f64 / height as f64 * 180.0
}

/// Fractional canvas row for an elevation in degrees.
pub fn row_for_elevation(elevation_deg: f64, height: usize) -> f64 {
    (90.0 - elevation_deg.clamp(-90.0, 90.0)) / 180.0 * height as f64
}

/// Precomputed per-row and per-column trigonometry for an equirectangular
/// canvas, so per-pixel directions cost two multiplies.
#[derive(Clone, Debug)]
pub struct EquirectGrid {
    width: usize,
    height: usize,
    origin: AzimuthOrigin,
    /// (sin az, cos az) per column.
    columns: Vec<(f64, f64)>,
    /// (sin el, cos el) per row.
    rows: Vec<(f64, f64)>,
}

impl EquirectGrid {
    pub fn new(width: usize, height: usize, origin: AzimuthOrigin) -> Self {
        let columns = (0..width)
            .map(|col| origin.azimuth_for_column(col, width).to_radians().sin_cos())
            .collect();
        let rows = (0..height)
            .map(|row| elevation_for_row(row, height).to_radians().sin_cos())
            .collect();
        Self {
            width,
            height,
            origin,
            columns,
            rows,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn origin(&self) -> AzimuthOrigin {
        self.origin
    }

    /// Viewing direction of canvas pixel (row, col).
    pub fn direction(&self, row: usize, col: usize) -> Direction {
        let (sin_az, cos_az) = self.columns[col];
        let (sin_el, cos_el) = self.rows[row];
        Direction::from_trig(sin_az, cos_az, sin_el, cos_el)
    }

    /// Nearest canvas pixel (row, col) for an azimuth/elevation pair.
    pub fn pixel_for(&self, azimuth_deg: f64, elevation_deg: f64) -> (usize, usize) {
        let col = self.origin.column_for_azimuth(azimuth_deg, self.width).round() as usize
            % self.width.max(1);
        let row = (row_for_elevation(elevation_deg, self.height).round() as usize)
            .min(self.height.saturating_sub(1));
        (row, col)
    }
}

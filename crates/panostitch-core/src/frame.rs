use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_H_FOV_DEG, DEFAULT_V_FOV_DEG, MAX_CHANNEL_VALUE};

/// Three-channel color grid stored as separate planes.
/// Sample values are f32 in the display range [0.0, 255.0].
#[derive(Clone, Debug, PartialEq)]
pub struct ColorGrid {
    pub red: Array2<f32>,
    pub green: Array2<f32>,
    pub blue: Array2<f32>,
}

impl ColorGrid {
    /// Zero-filled (black) grid, shape = (height, width).
    pub fn zeros(height: usize, width: usize) -> Self {
        Self {
            red: Array2::zeros((height, width)),
            green: Array2::zeros((height, width)),
            blue: Array2::zeros((height, width)),
        }
    }

    /// Grid filled with a single color.
    pub fn solid(height: usize, width: usize, rgb: [f32; 3]) -> Self {
        Self {
            red: Array2::from_elem((height, width), rgb[0]),
            green: Array2::from_elem((height, width), rgb[1]),
            blue: Array2::from_elem((height, width), rgb[2]),
        }
    }

    /// Build a grid from a per-pixel function of (row, col).
    pub fn from_fn<F>(height: usize, width: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> [f32; 3],
    {
        let mut grid = Self::zeros(height, width);
        for row in 0..height {
            for col in 0..width {
                grid.set_pixel(row, col, f(row, col));
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.red.ncols()
    }

    pub fn height(&self) -> usize {
        self.red.nrows()
    }

    /// True when either dimension is zero.
    pub fn is_degenerate(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn pixel(&self, row: usize, col: usize) -> [f32; 3] {
        [
            self.red[[row, col]],
            self.green[[row, col]],
            self.blue[[row, col]],
        ]
    }

    pub fn set_pixel(&mut self, row: usize, col: usize, rgb: [f32; 3]) {
        self.red[[row, col]] = rgb[0];
        self.green[[row, col]] = rgb[1];
        self.blue[[row, col]] = rgb[2];
    }

    /// Mutable access to all three planes at once.
    pub fn channels_mut(&mut self) -> [&mut Array2<f32>; 3] {
        [&mut self.red, &mut self.green, &mut self.blue]
    }

    pub fn channels(&self) -> [&Array2<f32>; 3] {
        [&self.red, &self.green, &self.blue]
    }

    /// Clamp every sample into the display range.
    pub fn clamp_to_display(&mut self) {
        for plane in self.channels_mut() {
            plane.mapv_inplace(|v| v.clamp(0.0, MAX_CHANNEL_VALUE));
        }
    }

    /// Mirror the grid left-to-right.
    pub fn flip_horizontal(&self) -> Self {
        let w = self.width();
        Self::from_fn(self.height(), w, |row, col| self.pixel(row, w - 1 - col))
    }
}

/// Camera heading in degrees.
///
/// Azimuth wraps around 360; elevation is clamped to [-90, 90] when a camera
/// basis is built from it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
}

impl Orientation {
    pub fn new(azimuth_deg: f64, elevation_deg: f64) -> Self {
        Self {
            azimuth_deg,
            elevation_deg,
        }
    }

    /// Azimuth wrapped into [0, 360).
    pub fn normalized_azimuth(&self) -> f64 {
        self.azimuth_deg.rem_euclid(360.0)
    }

    /// Elevation clamped into [-90, 90].
    pub fn clamped_elevation(&self) -> f64 {
        self.elevation_deg.clamp(-90.0, 90.0)
    }
}

/// Intrinsic field of view shared by every camera in a batch, in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldOfView {
    pub horizontal_deg: f64,
    pub vertical_deg: f64,
}

impl FieldOfView {
    pub fn new(horizontal_deg: f64, vertical_deg: f64) -> Self {
        Self {
            horizontal_deg,
            vertical_deg,
        }
    }
}

impl Default for FieldOfView {
    fn default() -> Self {
        Self {
            horizontal_deg: DEFAULT_H_FOV_DEG,
            vertical_deg: DEFAULT_V_FOV_DEG,
        }
    }
}

impl std::fmt::Display for FieldOfView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°x{}°", self.horizontal_deg, self.vertical_deg)
    }
}

/// A decoded photograph and the direction it was taken in.
#[derive(Clone, Debug)]
pub struct SourceImage {
    pub pixels: ColorGrid,
    pub orientation: Orientation,
    /// Where the image came from, for log messages.
    pub label: Option<String>,
}

impl SourceImage {
    pub fn new(pixels: ColorGrid, azimuth_deg: f64, elevation_deg: f64) -> Self {
        Self {
            pixels,
            orientation: Orientation::new(azimuth_deg, elevation_deg),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    pub fn height(&self) -> usize {
        self.pixels.height()
    }

    /// Label for log output, falling back to the batch index.
    pub fn display_name(&self, index: usize) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| format!("image #{}", index))
    }
}

//! Pinhole camera model on the viewing sphere.
//!
//! World axes: `y` points up, `z` points toward azimuth 0 on the horizon and
//! `x` toward azimuth 90°. A camera's basis satisfies `right × up = forward`.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_GRAZING_EPSILON;
use crate::frame::{FieldOfView, Orientation};

/// Unit viewing direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Direction(Vector3<f64>);

impl Direction {
    /// Direction for an (azimuth, elevation) pair in degrees.
    pub fn from_angles(azimuth_deg: f64, elevation_deg: f64) -> Self {
        let (sin_az, cos_az) = azimuth_deg.to_radians().sin_cos();
        let (sin_el, cos_el) = elevation_deg.to_radians().sin_cos();
        Self::from_trig(sin_az, cos_az, sin_el, cos_el)
    }

    /// Direction from precomputed sines and cosines of azimuth and elevation.
    pub(crate) fn from_trig(sin_az: f64, cos_az: f64, sin_el: f64, cos_el: f64) -> Self {
        Self(Vector3::new(cos_el * sin_az, sin_el, cos_el * cos_az))
    }

    /// Normalize an arbitrary non-zero vector into a direction.
    pub fn from_vector(v: Vector3<f64>) -> Self {
        Self(v.normalize())
    }

    pub fn as_vector(&self) -> &Vector3<f64> {
        &self.0
    }

    pub fn dot(&self, other: &Vector3<f64>) -> f64 {
        self.0.dot(other)
    }

    /// Azimuth in degrees, wrapped into [0, 360).
    pub fn azimuth_deg(&self) -> f64 {
        self.0.x.atan2(self.0.z).to_degrees().rem_euclid(360.0)
    }

    /// Elevation in degrees, in [-90, 90].
    pub fn elevation_deg(&self) -> f64 {
        self.0.y.clamp(-1.0, 1.0).asin().to_degrees()
    }
}

/// Orthonormal camera frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraBasis {
    pub forward: Vector3<f64>,
    pub right: Vector3<f64>,
    pub up: Vector3<f64>,
}

impl CameraBasis {
    /// Closed-form basis for a heading. Cameras never roll: `right` always
    /// stays in the horizontal plane.
    pub fn from_orientation(orientation: &Orientation) -> Self {
        let az = orientation.azimuth_deg.to_radians();
        let el = orientation.clamped_elevation().to_radians();
        let (sin_az, cos_az) = az.sin_cos();
        let (sin_el, cos_el) = el.sin_cos();

        Self {
            forward: Vector3::new(cos_el * sin_az, sin_el, cos_el * cos_az),
            right: Vector3::new(cos_az, 0.0, -sin_az),
            up: Vector3::new(-sin_el * sin_az, cos_el, -sin_el * cos_az),
        }
    }
}

/// How projections that land just outside the frame are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum EdgePolicy {
    /// Anything outside [0, 1] is out of frame.
    #[default]
    Reject,
    /// Coordinates within `margin` of the frame are clamped onto the border.
    /// Hides hairline seams at the FOV boundary at the cost of smearing the
    /// outermost row/column.
    Clamp { margin: f64 },
}

impl std::fmt::Display for EdgePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgePolicy::Reject => write!(f, "Reject"),
            EdgePolicy::Clamp { margin } => write!(f, "Clamp (margin {})", margin),
        }
    }
}

/// Result of projecting a direction into a camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    /// Normalized image coordinates, `u` left→right and `v` top→bottom.
    Visible { u: f64, v: f64 },
    /// Behind the camera or at a grazing angle to it.
    Behind,
    /// In front of the camera but outside its field of view.
    OutOfFrame,
}

impl Projection {
    pub fn coords(&self) -> Option<(f64, f64)> {
        match *self {
            Projection::Visible { u, v } => Some((u, v)),
            _ => None,
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, Projection::Visible { .. })
    }
}

/// A posed pinhole camera.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    basis: CameraBasis,
    tan_half_h: f64,
    tan_half_v: f64,
    grazing_epsilon: f64,
    edge_policy: EdgePolicy,
}

impl Camera {
    pub fn new(orientation: &Orientation, fov: &FieldOfView) -> Self {
        Self {
            basis: CameraBasis::from_orientation(orientation),
            tan_half_h: (fov.horizontal_deg.to_radians() / 2.0).tan(),
            tan_half_v: (fov.vertical_deg.to_radians() / 2.0).tan(),
            grazing_epsilon: DEFAULT_GRAZING_EPSILON,
            edge_policy: EdgePolicy::default(),
        }
    }

    pub fn with_grazing_epsilon(mut self, epsilon: f64) -> Self {
        self.grazing_epsilon = epsilon;
        self
    }

    pub fn with_edge_policy(mut self, policy: EdgePolicy) -> Self {
        self.edge_policy = policy;
        self
    }

    pub fn basis(&self) -> &CameraBasis {
        &self.basis
    }

    /// Project a viewing direction onto the image plane.
    pub fn project(&self, direction: &Direction) -> Projection {
        let dot_fwd = direction.dot(&self.basis.forward);
        if dot_fwd <= self.grazing_epsilon {
            return Projection::Behind;
        }

        let x = direction.dot(&self.basis.right) / dot_fwd;
        let y = direction.dot(&self.basis.up) / dot_fwd;

        let u = 0.5 + 0.5 * x / self.tan_half_h;
        let v = 0.5 - 0.5 * y / self.tan_half_v;

        match self.edge_policy {
            EdgePolicy::Reject => {
                if (0.0..=1.0).contains(&u) && (0.0..=1.0).contains(&v) {
                    Projection::Visible { u, v }
                } else {
                    Projection::OutOfFrame
                }
            }
            EdgePolicy::Clamp { margin } => {
                let range = -margin..=1.0 + margin;
                if range.contains(&u) && range.contains(&v) {
                    Projection::Visible {
                        u: u.clamp(0.0, 1.0),
                        v: v.clamp(0.0, 1.0),
                    }
                } else {
                    Projection::OutOfFrame
                }
            }
        }
    }

    /// Viewing direction through normalized image coordinates `(u, v)`.
    pub fn unproject(&self, u: f64, v: f64) -> Direction {
        let x = (u - 0.5) * 2.0 * self.tan_half_h;
        let y = (0.5 - v) * 2.0 * self.tan_half_v;
        Direction::from_vector(self.basis.forward + self.basis.right * x + self.basis.up * y)
    }
}

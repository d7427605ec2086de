//! Machine-space geometry.
//!
//! Coordinates are millimetres in the machine's work coordinate system.

use serde::{Deserialize, Serialize};

/// A point in 3-D machine space (X, Y, Z), in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Point3 {
    /// Creates a new point.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Creates a point on the Z = 0 plane.
    pub const fn xy(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point3) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Distance to another point projected onto the XY plane.
    pub fn planar_distance_to(&self, other: &Point3) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Unit direction vector from `self` towards `other`.
    ///
    /// Returns `None` when the points coincide.
    pub fn direction_to(&self, other: &Point3) -> Option<[f64; 3]> {
        let length = self.distance_to(other);
        if length <= f64::EPSILON {
            return None;
        }
        Some([
            (other.x - self.x) / length,
            (other.y - self.y) / length,
            (other.z - self.z) / length,
        ])
    }

    /// Angle of the vector from `center` to `self` in the XY plane, radians.
    pub fn angle_from(&self, center: &Point3) -> f64 {
        (self.y - center.y).atan2(self.x - center.x)
    }

    /// True when every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

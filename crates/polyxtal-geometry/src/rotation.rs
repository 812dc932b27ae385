//! Rigid rotations about the coordinate axes.
//!
//! Grains are oriented by three sequential right-handed axis rotations,
//! composed in the fixed order x, then y, then z. The composition order is a
//! compatibility contract: reordering it changes every generated structure.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// Rotation angles about the x, y, and z axes (radians).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A composed rigid rotation.
#[derive(Debug, Clone)]
pub struct Rotation {
    matrix: Matrix3<f64>,
}

impl Rotation {
    /// Compose the axis rotations in the contractual order: about x, then y,
    /// then z.
    pub fn from_orientation(orientation: &Orientation) -> Self {
        let matrix =
            about_z(orientation.z) * about_y(orientation.y) * about_x(orientation.x);
        Self { matrix }
    }

    /// The inverse rotation: negated angles applied in the reverse order.
    /// The matrix is orthonormal, so this is its transpose.
    pub fn inverse(&self) -> Self {
        Self {
            matrix: self.matrix.transpose(),
        }
    }

    /// Apply the rotation to a point about the origin.
    pub fn apply(&self, point: [f64; 3]) -> [f64; 3] {
        let rotated = self.matrix * Vector3::new(point[0], point[1], point[2]);
        [rotated.x, rotated.y, rotated.z]
    }
}

fn about_x(angle: f64) -> Matrix3<f64> {
    let (sin, cos) = angle.sin_cos();
    Matrix3::new(
        1.0, 0.0, 0.0, //
        0.0, cos, -sin, //
        0.0, sin, cos,
    )
}

fn about_y(angle: f64) -> Matrix3<f64> {
    let (sin, cos) = angle.sin_cos();
    Matrix3::new(
        cos, 0.0, sin, //
        0.0, 1.0, 0.0, //
        -sin, 0.0, cos,
    )
}

fn about_z(angle: f64) -> Matrix3<f64> {
    let (sin, cos) = angle.sin_cos();
    Matrix3::new(
        cos, -sin, 0.0, //
        sin, cos, 0.0, //
        0.0, 0.0, 1.0,
    )
}

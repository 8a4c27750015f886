// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ray representation.

use crate::error::{Error, Result};
use nalgebra::{Isometry3, Point3, Unit, Vector3};

/// A ray in 3D space defined by origin and unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f64>,
    pub direction: Unit<Vector3<f64>>,
}

impl Ray {
    pub fn new(origin: Point3<f64>, direction: Unit<Vector3<f64>>) -> Self {
        Self { origin, direction }
    }

    /// Create a ray from a direction vector of any length.
    pub fn from_vector(origin: Point3<f64>, direction: Vector3<f64>) -> Result<Self> {
        Unit::try_new(direction, 1e-12)
            .map(|direction| Self { origin, direction })
            .ok_or_else(|| Error::InvalidRay(format!("zero direction from {origin}")))
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction.into_inner() * t
    }

    /// Express this ray in the local frame of `transform`.
    ///
    /// Isometries preserve distances, so parameters along the local ray are
    /// the same as along the original one.
    pub fn to_local(&self, transform: &Isometry3<f64>) -> Self {
        Self {
            origin: transform.inverse_transform_point(&self.origin),
            direction: transform.inverse_transform_unit_vector(&self.direction),
        }
    }
}

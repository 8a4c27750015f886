// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planes and ray-plane intersection (closed-form).

use crate::ray::Ray;
use nalgebra::{Point3, Vector3};

/// Denominators below this are treated as a ray parallel to the plane.
const PARALLEL_EPSILON: f64 = 1e-12;

/// Plane definition
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    /// Point on the plane
    pub point: Point3<f64>,
    /// Normal vector (must be normalized)
    pub normal: Vector3<f64>,
}

impl Plane {
    /// Create a new plane
    pub fn new(point: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            point,
            normal: normal.normalize(),
        }
    }

    /// Ray parameter where `ray` crosses this plane.
    ///
    /// Returns `None` if the ray is parallel to the plane or crosses it
    /// behind its origin.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f64> {
        let denom = ray.direction.dot(&self.normal);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.point - ray.origin).dot(&self.normal) / denom;
        if t < 0.0 {
            return None;
        }
        Some(t)
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layered planar wall solids.
//!
//! A wall is described the way building models store it: a horizontal
//! location line at the wall's base elevation, a height, and a stack of
//! layer thicknesses centred on the location line. In the wall's local frame
//! the solid is the box `u ∈ [0, length]`, `w ∈ [-t/2, t/2]`, `v ∈ [0, height]`
//! where `u` runs along the location line, `w` along the wall normal and `v`
//! up.
//!
//! Every layer boundary is a plane parallel to the location line. A ray that
//! crosses the wall reports one parameter per boundary plane it crosses inside
//! the box, so a wall with `n` layers yields `n + 1` hits.

use crate::error::{Error, Result};
use crate::plane::Plane;
use crate::ray::Ray;
use nalgebra::{Point3, Vector3};
use smallvec::SmallVec;
use wallhole_core::ElementId;

/// Tolerance for box bounds and degenerate directions.
const EPSILON: f64 = 1e-9;

/// Parameters along a ray where it crosses a wall, ascending.
pub type Crossings = SmallVec<[f64; 8]>;

/// A vertical wall with one or more layers.
#[derive(Debug, Clone)]
pub struct WallSolid {
    pub id: ElementId,
    /// Location line start, at the wall's base elevation.
    pub start: Point3<f64>,
    /// Location line end, at the wall's base elevation.
    pub end: Point3<f64>,
    pub height: f64,
    /// Layer thicknesses from the negative-normal face to the positive one.
    pub layers: SmallVec<[f64; 4]>,
}

/// Local frame of a wall: origin at the location line start.
#[derive(Debug, Clone, Copy)]
struct WallFrame {
    origin: Point3<f64>,
    /// Unit vector along the location line.
    along: Vector3<f64>,
    /// Unit horizontal normal.
    normal: Vector3<f64>,
    length: f64,
}

impl WallSolid {
    /// Create a wall, validating its shape.
    pub fn new(
        id: impl Into<ElementId>,
        start: Point3<f64>,
        end: Point3<f64>,
        height: f64,
        layers: &[f64],
    ) -> Result<Self> {
        let id = id.into();
        let invalid = |reason: &str| Error::InvalidWall {
            id,
            reason: reason.to_string(),
        };

        if (end.z - start.z).abs() > EPSILON {
            return Err(invalid("location line is not horizontal"));
        }
        if (end - start).norm() <= EPSILON {
            return Err(invalid("location line has zero length"));
        }
        if !(height.is_finite() && height > 0.0) {
            return Err(invalid("height must be positive"));
        }
        if layers.is_empty() {
            return Err(invalid("wall has no layers"));
        }
        if layers.iter().any(|t| !(t.is_finite() && *t > 0.0)) {
            return Err(invalid("layer thickness must be positive"));
        }

        Ok(Self {
            id,
            start,
            end,
            height,
            layers: layers.iter().copied().collect(),
        })
    }

    /// Create a wall with a single layer of `thickness`.
    pub fn single_layer(
        id: impl Into<ElementId>,
        start: Point3<f64>,
        end: Point3<f64>,
        height: f64,
        thickness: f64,
    ) -> Result<Self> {
        Self::new(id, start, end, height, &[thickness])
    }

    /// Total thickness of all layers.
    pub fn thickness(&self) -> f64 {
        self.layers.iter().sum()
    }

    fn frame(&self) -> WallFrame {
        let delta = self.end - self.start;
        let along = delta.normalize();
        let normal = Vector3::new(-along.y, along.x, 0.0).normalize();
        WallFrame {
            origin: self.start,
            along,
            normal,
            length: delta.norm(),
        }
    }

    /// Planes of every layer boundary, from the negative-normal face outwards.
    pub fn layer_faces(&self) -> Vec<Plane> {
        let frame = self.frame();
        let mut offset = -self.thickness() / 2.0;
        let mut faces = Vec::with_capacity(self.layers.len() + 1);
        faces.push(Plane::new(
            frame.origin + frame.normal * offset,
            frame.normal,
        ));
        for layer in &self.layers {
            offset += layer;
            faces.push(Plane::new(
                frame.origin + frame.normal * offset,
                frame.normal,
            ));
        }
        faces
    }

    /// Parameters along `ray` where it crosses this wall, ascending.
    ///
    /// The solid's entry and exit are always reported, whichever face they
    /// lie on, plus every interior layer boundary crossed in between.
    pub fn intersect(&self, ray: &Ray) -> Crossings {
        let frame = self.frame();
        let half = self.thickness() / 2.0;

        let Some((t_min, t_max)) = self.slab_range(&frame, ray, half) else {
            return Crossings::new();
        };

        let mut crossings = Crossings::new();
        crossings.push(t_min);
        if t_max > t_min + EPSILON {
            crossings.push(t_max);
        }
        if ray.direction.dot(&frame.normal).abs() >= EPSILON {
            crossings.extend(
                self.layer_faces()
                    .iter()
                    .filter_map(|face| face.intersect_ray(ray))
                    .filter(|t| *t > t_min + EPSILON && *t < t_max - EPSILON),
            );
        }

        crossings.sort_by(|a, b| a.total_cmp(b));
        crossings.dedup_by(|a, b| (*a - *b).abs() <= EPSILON);
        crossings
    }

    /// Entry/exit parameters of `ray` through the wall box, clipped to `t >= 0`.
    fn slab_range(&self, frame: &WallFrame, ray: &Ray, half: f64) -> Option<(f64, f64)> {
        let offset = ray.origin - frame.origin;
        let axes = [
            (offset.dot(&frame.along), ray.direction.dot(&frame.along), 0.0, frame.length),
            (offset.dot(&frame.normal), ray.direction.dot(&frame.normal), -half, half),
            (offset.z, ray.direction.z, 0.0, self.height),
        ];

        let mut t_min = 0.0_f64;
        let mut t_max = f64::INFINITY;
        for (p0, dp, lo, hi) in axes {
            if dp.abs() < EPSILON {
                if p0 < lo - EPSILON || p0 > hi + EPSILON {
                    return None;
                }
                continue;
            }
            let t1 = (lo - p0) / dp;
            let t2 = (hi - p0) / dp;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
        }

        if t_max + EPSILON >= t_min {
            Some((t_min, t_max))
        } else {
            None
        }
    }
}

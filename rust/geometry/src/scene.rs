// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Barrier scene: ray casting against the walls of a model and its links.
//!
//! The scene holds the wall solids of the active model plus any number of
//! link instances, each placing the walls of a secondary model with a rigid
//! transform. A cast returns one [`RayHit`] per wall face crossed, tagged with
//! a local or linked [`BarrierRef`], sorted by distance from the ray origin.

use crate::error::{Error, Result};
use crate::ray::Ray;
use crate::view::View3d;
use crate::wall::WallSolid;
use nalgebra::{Isometry3, Point3, Unit, Vector3};
use wallhole_core::{BarrierRef, ElementId, RayHit};

/// Walls of a linked model placed in the active model.
#[derive(Debug, Clone)]
pub struct LinkInstance {
    /// Id of the link instance element in the active model.
    pub id: ElementId,
    /// Linked model coordinates to active model coordinates.
    pub transform: Isometry3<f64>,
    pub walls: Vec<WallSolid>,
}

impl LinkInstance {
    pub fn new(id: impl Into<ElementId>, transform: Isometry3<f64>) -> Self {
        Self {
            id: id.into(),
            transform,
            walls: Vec::new(),
        }
    }

    pub fn with_wall(mut self, wall: WallSolid) -> Self {
        self.walls.push(wall);
        self
    }
}

/// All castable barrier geometry of one active model.
#[derive(Debug, Clone, Default)]
pub struct BarrierScene {
    walls: Vec<WallSolid>,
    links: Vec<LinkInstance>,
}

impl BarrierScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_wall(&mut self, wall: WallSolid) {
        self.walls.push(wall);
    }

    pub fn add_link(&mut self, link: LinkInstance) {
        self.links.push(link);
    }

    /// Number of walls, linked ones included.
    pub fn wall_count(&self) -> usize {
        self.walls.len() + self.links.iter().map(|l| l.walls.len()).sum::<usize>()
    }

    /// Casts a ray and returns every visible wall crossing within
    /// `max_distance`, nearest first.
    pub fn cast(
        &self,
        view: &View3d,
        origin: &Point3<f64>,
        direction: &Unit<Vector3<f64>>,
        max_distance: f64,
    ) -> Result<Vec<RayHit>> {
        if view.is_template {
            return Err(Error::TemplateView(view.id));
        }

        let ray = Ray::new(*origin, *direction);
        let mut hits = Vec::new();

        for wall in &self.walls {
            let reference = BarrierRef::local(wall.id);
            if view.is_visible(&reference) {
                collect(&mut hits, reference, wall, &ray, max_distance);
            }
        }

        for link in &self.links {
            let local_ray = ray.to_local(&link.transform);
            for wall in &link.walls {
                let reference = BarrierRef::linked(link.id, wall.id);
                if view.is_visible(&reference) {
                    collect(&mut hits, reference, wall, &local_ray, max_distance);
                }
            }
        }

        hits.sort_by(|a, b| a.proximity.total_cmp(&b.proximity));
        Ok(hits)
    }
}

fn collect(
    hits: &mut Vec<RayHit>,
    reference: BarrierRef,
    wall: &WallSolid,
    ray: &Ray,
    max_distance: f64,
) {
    hits.extend(
        wall.intersect(ray)
            .into_iter()
            .filter(|t| *t <= max_distance)
            .map(|t| RayHit::new(reference, t)),
    );
}

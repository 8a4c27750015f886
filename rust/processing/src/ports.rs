// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Contracts of the host environment.
//!
//! Resolution only needs to cast rays and look barriers up
//! ([`RayCaster`], [`BarrierResolver`]); both are implemented for plain
//! closures so the resolver can be driven by functions. Placement and the
//! command need the full host document: marker symbols and instances,
//! transactional mutation, views and the conduits of the source model.

use crate::config::ParameterNames;
use nalgebra::{Point3, Unit, Vector3};
use wallhole_core::{
    Barrier, BarrierRef, Conduit, ConduitKind, ElementId, Level, MarkerSize, RayHit, Result,
};
use wallhole_geometry::View3d;

/// Casts a ray against barrier geometry.
pub trait RayCaster {
    /// All barrier crossings along the ray. May include hits beyond
    /// `max_distance`; callers filter.
    fn cast(
        &self,
        origin: &Point3<f64>,
        direction: &Unit<Vector3<f64>>,
        max_distance: f64,
    ) -> Result<Vec<RayHit>>;
}

impl<F> RayCaster for F
where
    F: Fn(&Point3<f64>, &Unit<Vector3<f64>>, f64) -> Vec<RayHit>,
{
    fn cast(
        &self,
        origin: &Point3<f64>,
        direction: &Unit<Vector3<f64>>,
        max_distance: f64,
    ) -> Result<Vec<RayHit>> {
        Ok(self(origin, direction, max_distance))
    }
}

/// Resolves a hit's barrier reference to the barrier and its level.
pub trait BarrierResolver {
    /// `None` when either the barrier or its level cannot be found.
    fn resolve(&self, reference: &BarrierRef) -> Option<(Barrier, Level)>;
}

impl<F> BarrierResolver for F
where
    F: Fn(&BarrierRef) -> Option<(Barrier, Level)>,
{
    fn resolve(&self, reference: &BarrierRef) -> Option<(Barrier, Level)> {
        self(reference)
    }
}

/// Creation and sizing of marker instances.
pub trait MarkerPlacement {
    fn is_active(&self, symbol: ElementId) -> bool;

    /// Make `symbol` usable for placement. Idempotent.
    fn activate(&mut self, symbol: ElementId) -> Result<()>;

    /// Create one marker of `symbol` hosted on `barrier` at `point`.
    fn place(
        &mut self,
        point: &Point3<f64>,
        symbol: ElementId,
        barrier: &Barrier,
        level: &Level,
    ) -> Result<ElementId>;

    fn set_parameter(&mut self, instance: ElementId, name: &str, value: f64) -> Result<()>;

    /// Delete an instance created earlier in the current unit.
    fn discard(&mut self, instance: ElementId) -> Result<()>;

    /// Write `size` onto the instance's size parameters.
    fn set_size(
        &mut self,
        instance: ElementId,
        size: &MarkerSize,
        names: &ParameterNames,
    ) -> Result<()> {
        match *size {
            MarkerSize::Rectangular { width, height } => {
                self.set_parameter(instance, &names.width, width)?;
                self.set_parameter(instance, &names.height, height)
            }
            MarkerSize::Round { radius } => self.set_parameter(instance, &names.radius, radius),
        }
    }
}

/// All-or-nothing mutation scopes of the host model.
pub trait Transactional {
    fn begin(&mut self, name: &str) -> Result<()>;
    fn commit(&mut self) -> Result<()>;
    /// Discard everything done since `begin`. No-op without an open unit.
    fn rollback(&mut self);
}

/// One open model.
pub trait HostDocument: BarrierResolver + MarkerPlacement + Transactional {
    fn title(&self) -> &str;

    fn views(&self) -> &[View3d];

    /// Conduits of `kind` stored in this model.
    fn conduits(&self, kind: ConduitKind) -> Vec<Conduit>;

    /// First generic-model marker symbol of the family named `family_name`.
    fn find_symbol(&self, family_name: &str) -> Option<ElementId>;

    fn cast_ray(
        &self,
        view: ElementId,
        origin: &Point3<f64>,
        direction: &Unit<Vector3<f64>>,
        max_distance: f64,
    ) -> Result<Vec<RayHit>>;
}

/// The set of open models and which one is active.
pub trait HostSession {
    type Document: HostDocument + Sync;

    fn documents(&self) -> &[Self::Document];
    fn documents_mut(&mut self) -> &mut [Self::Document];
    fn active_index(&self) -> usize;
}

/// Ray casting through one view of a host document.
pub struct ViewCaster<'d, D: ?Sized> {
    document: &'d D,
    view: ElementId,
}

impl<'d, D: HostDocument + ?Sized> ViewCaster<'d, D> {
    pub fn new(document: &'d D, view: ElementId) -> Self {
        Self { document, view }
    }
}

impl<D: HostDocument + ?Sized> RayCaster for ViewCaster<'_, D> {
    fn cast(
        &self,
        origin: &Point3<f64>,
        direction: &Unit<Vector3<f64>>,
        max_distance: f64,
    ) -> Result<Vec<RayHit>> {
        self.document
            .cast_ray(self.view, origin, direction, max_distance)
    }
}

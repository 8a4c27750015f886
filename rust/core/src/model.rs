// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Data model consumed and produced by penetration resolution.
//!
//! Conduits come from the mechanical (source) model, barriers and levels from
//! the architectural (active) model. Both are read-only here; the only values
//! created per pass are [`RayHit`]s, [`Penetration`]s and [`MarkerSize`]s.

use crate::error::{Error, Result};
use crate::ids::{BarrierRef, ElementId};
use nalgebra::{Point3, Unit, Vector3};
use serde::{Deserialize, Serialize};

/// Lengths below this are treated as zero when deriving a direction.
const MIN_SEGMENT_LENGTH: f64 = 1e-9;

/// Location curve of a conduit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Curve {
    Line {
        start: Point3<f64>,
        end: Point3<f64>,
    },
    Arc {
        center: Point3<f64>,
        radius: f64,
        normal: Vector3<f64>,
        start_angle: f64,
        end_angle: f64,
    },
    Spline {
        control_points: Vec<Point3<f64>>,
    },
}

impl Curve {
    pub fn line(start: Point3<f64>, end: Point3<f64>) -> Self {
        Curve::Line { start, end }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Curve::Line { .. } => "line",
            Curve::Arc { .. } => "arc",
            Curve::Spline { .. } => "spline",
        }
    }

    /// Returns the straight segment this curve describes, if it is one.
    ///
    /// Arcs, splines and zero-length lines have no single ray direction.
    pub fn as_segment(&self) -> Option<Segment> {
        match self {
            Curve::Line { start, end } => {
                let delta = end - start;
                let length = delta.norm();
                let direction = Unit::try_new(delta, MIN_SEGMENT_LENGTH)?;
                Some(Segment {
                    origin: *start,
                    direction,
                    length,
                })
            }
            Curve::Arc { .. } | Curve::Spline { .. } => None,
        }
    }
}

/// A straight conduit centerline, ready to be cast as a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub origin: Point3<f64>,
    pub direction: Unit<Vector3<f64>>,
    pub length: f64,
}

impl Segment {
    /// Point at `proximity` along the segment: `origin + direction * proximity`.
    #[inline]
    pub fn point_at(&self, proximity: f64) -> Point3<f64> {
        self.origin + self.direction.into_inner() * proximity
    }

    /// Whether a hit at `proximity` lies on this segment (end inclusive).
    #[inline]
    pub fn covers(&self, proximity: f64) -> bool {
        proximity <= self.length
    }
}

/// Kind of linear run, which decides the marker shape and sizing formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConduitKind {
    /// Ducts; marked with rectangular openings.
    Ducted,
    /// Pipes; marked with round openings.
    Piped,
}

impl ConduitKind {
    pub const ALL: [ConduitKind; 2] = [ConduitKind::Ducted, ConduitKind::Piped];

    pub fn marker_shape(&self) -> MarkerShape {
        match self {
            ConduitKind::Ducted => MarkerShape::Rectangular,
            ConduitKind::Piped => MarkerShape::Round,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConduitKind::Ducted => "duct",
            ConduitKind::Piped => "pipe",
        }
    }
}

impl std::fmt::Display for ConduitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerShape {
    Rectangular,
    Round,
}

/// A duct or pipe run from the source model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conduit {
    pub id: ElementId,
    pub kind: ConduitKind,
    pub path: Curve,
    /// Nominal diameter (ducts).
    pub diameter: f64,
    /// Outer diameter (pipes). `None` when the host does not expose it.
    pub outer_diameter: Option<f64>,
}

impl Conduit {
    pub fn duct(id: impl Into<ElementId>, path: Curve, diameter: f64) -> Self {
        Self {
            id: id.into(),
            kind: ConduitKind::Ducted,
            path,
            diameter,
            outer_diameter: None,
        }
    }

    pub fn pipe(id: impl Into<ElementId>, path: Curve, outer_diameter: f64) -> Self {
        Self {
            id: id.into(),
            kind: ConduitKind::Piped,
            path,
            diameter: outer_diameter,
            outer_diameter: Some(outer_diameter),
        }
    }

    /// The conduit centerline as a straight segment.
    pub fn segment(&self) -> Result<Segment> {
        self.path
            .as_segment()
            .ok_or_else(|| Error::UnsupportedGeometry {
                conduit: self.id,
                reason: match &self.path {
                    Curve::Line { .. } => "zero-length line".to_string(),
                    other => format!("{} location is not a straight segment", other.kind_name()),
                },
            })
    }
}

/// A vertical datum referenced by barriers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: ElementId,
    pub name: String,
    pub elevation: f64,
}

/// A planar vertical element a conduit may pass through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barrier {
    pub reference: BarrierRef,
    pub name: String,
    pub level_id: ElementId,
}

/// Raw intersection of a conduit ray with a barrier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub reference: BarrierRef,
    /// Distance from the ray origin.
    pub proximity: f64,
}

impl RayHit {
    pub fn new(reference: BarrierRef, proximity: f64) -> Self {
        Self {
            reference,
            proximity,
        }
    }
}

/// A resolved crossing of one conduit through one barrier.
#[derive(Debug, Clone, PartialEq)]
pub struct Penetration<'c> {
    pub point: Point3<f64>,
    pub barrier: Barrier,
    pub level: Level,
    pub conduit: &'c Conduit,
}

/// Dimensions written onto a placed marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MarkerSize {
    Rectangular { width: f64, height: f64 },
    Round { radius: f64 },
}

impl MarkerSize {
    pub fn shape(&self) -> MarkerShape {
        match self {
            MarkerSize::Rectangular { .. } => MarkerShape::Rectangular,
            MarkerSize::Round { .. } => MarkerShape::Round,
        }
    }
}

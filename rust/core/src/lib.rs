// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # WallHole Core
//!
//! Shared vocabulary for placing opening markers where ducts and pipes pass
//! through walls.
//!
//! ## Overview
//!
//! - **Identities**: [`ElementId`] and the composite [`BarrierRef`] that also
//!   addresses walls inside linked models
//! - **Data model**: conduits, barriers, levels, ray hits and penetrations
//! - **Deduplication**: stable, first-hit-wins filtering of ray hits per barrier
//! - **Sizing**: marker dimensions derived from conduit cross-sections
//!
//! ## Quick Start
//!
//! ```rust
//! use wallhole_core::{deduplicate_hits, BarrierRef, RayHit};
//!
//! let hits = vec![
//!     RayHit::new(BarrierRef::local(7), 2.0),
//!     RayHit::new(BarrierRef::local(7), 2.3),
//! ];
//! let unique = deduplicate_hits(hits);
//! assert_eq!(unique.len(), 1);
//! assert_eq!(unique[0].proximity, 2.0);
//! ```

pub mod dedup;
pub mod error;
pub mod ids;
pub mod model;
pub mod sizing;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Unit, Vector3};

pub use dedup::{dedup_by, dedup_by_key, deduplicate_hits, hit_key, HitList};
pub use error::{Error, Result};
pub use ids::{BarrierRef, ElementId};
pub use model::{
    Barrier, Conduit, ConduitKind, Curve, Level, MarkerShape, MarkerSize, Penetration, RayHit,
    Segment,
};
pub use sizing::{size_for, OUTER_DIAMETER_PARAMETER};

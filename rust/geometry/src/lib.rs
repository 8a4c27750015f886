// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! WallHole Geometry
//!
//! Ray casting against layered planar walls, scoped by 3D views and extended
//! across linked models, using nalgebra for points and rigid transforms.

pub mod error;
pub mod plane;
pub mod ray;
pub mod scene;
pub mod view;
pub mod wall;

// Re-export nalgebra types for convenience
pub use nalgebra::{Isometry3, Point3, Unit, Vector3};

pub use error::{Error, Result};
pub use plane::Plane;
pub use ray::Ray;
pub use scene::{BarrierScene, LinkInstance};
pub use view::View3d;
pub use wall::{Crossings, WallSolid};

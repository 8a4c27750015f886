// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # WallHole Processing
//!
//! Turns conduit centerlines into opening markers in a host model.
//!
//! The host is reached only through the traits in [`ports`]: ray casting,
//! barrier lookup, marker placement and commit units. [`HoleCommand`] runs
//! the whole workflow against any [`HostSession`]; [`memory`] provides an
//! in-memory host.
//!
//! ```rust
//! use wallhole_core::{Conduit, Curve, ElementId, Level, Point3};
//! use wallhole_geometry::{View3d, WallSolid};
//! use wallhole_processing::memory::{MemoryDocument, MemorySession};
//! use wallhole_processing::{Config, HoleCommand};
//!
//! let mut arch = MemoryDocument::new("Tower_AR");
//! let level = arch.add_level(Level { id: ElementId(1), name: "L1".into(), elevation: 0.0 });
//! let start = Point3::new(0.0, 5.0, 0.0);
//! let wall = WallSolid::single_layer(10, start, Point3::new(20.0, 5.0, 0.0), 3.0, 0.25)?;
//! arch.add_wall(wall, "Basic Wall", level);
//! arch.add_view(View3d::new(2, "{3D}"));
//! arch.add_symbol("Отверстие", "Standard", &["Ширина", "Высота"]);
//! arch.add_symbol("Круглое отверстие", "Standard", &["Радиус"]);
//!
//! let mut hvac = MemoryDocument::new("Tower_ОВ");
//! let path = Curve::line(Point3::new(4.0, 0.0, 1.5), Point3::new(4.0, 10.0, 1.5));
//! hvac.add_conduit(Conduit::duct(100, path, 0.4));
//!
//! let mut session = MemorySession::new(arch);
//! session.open(hvac);
//!
//! let report = HoleCommand::new(Config::default()).run(&mut session)?;
//! assert_eq!(report.total_placed(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cancel;
pub mod command;
pub mod commit;
pub mod config;
pub mod logging;
pub mod memory;
pub mod placement;
pub mod ports;
pub mod report;
pub mod resolver;

pub use cancel::CancelToken;
pub use command::HoleCommand;
pub use commit::CommitUnit;
pub use config::{Config, ParameterNames};
pub use logging::init_logging;
pub use placement::{activate_symbol, place_markers, PlacementOutcome};
pub use ports::{
    BarrierResolver, HostDocument, HostSession, MarkerPlacement, RayCaster, Transactional,
    ViewCaster,
};
pub use report::{PassReport, PassStatus, RunReport};
pub use resolver::{PenetrationResolver, Resolution};

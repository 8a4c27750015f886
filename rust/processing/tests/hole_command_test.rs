// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end runs of the hole command against the in-memory host.

use approx::assert_relative_eq;
use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use wallhole_core::{BarrierRef, Conduit, ConduitKind, Curve, ElementId, Error, Level, Point3};
use wallhole_geometry::{LinkInstance, View3d, WallSolid};
use wallhole_processing::memory::{MarkerInstance, MemoryDocument, MemorySession};
use wallhole_processing::{CancelToken, Config, HoleCommand, HostDocument, PassStatus};

const RECT: &str = "Отверстие";
const ROUND: &str = "Круглое отверстие";

fn storey(id: i64, name: &str) -> Level {
    Level {
        id: ElementId(id),
        name: name.into(),
        elevation: 0.0,
    }
}

fn run_along_y(x: f64, y_end: f64) -> Curve {
    Curve::line(Point3::new(x, 0.0, 1.5), Point3::new(x, y_end, 1.5))
}

/// Architectural model: a plain wall at y = 5 and a three-layer wall at y = 8.
fn architecture(families: &[&str]) -> MemoryDocument {
    let mut doc = MemoryDocument::new("Tower_AR");
    let level = doc.add_level(storey(1, "Level 1"));

    let plain = WallSolid::single_layer(
        10,
        Point3::new(0.0, 5.0, 0.0),
        Point3::new(20.0, 5.0, 0.0),
        3.0,
        0.25,
    )
    .unwrap();
    let layered = WallSolid::new(
        11,
        Point3::new(0.0, 8.0, 0.0),
        Point3::new(20.0, 8.0, 0.0),
        3.0,
        &[0.05, 0.2, 0.05],
    )
    .unwrap();
    doc.add_wall(plain, "Basic Wall 250", level);
    doc.add_wall(layered, "Exterior Wall 300", level);

    doc.add_view(View3d::template(3, "3D Template"));
    doc.add_view(View3d::new(2, "{3D}"));

    for family in families {
        if *family == RECT {
            doc.add_symbol(RECT, "Standard", &["Ширина", "Высота"]);
        } else {
            doc.add_symbol(*family, "Standard", &["Радиус"]);
        }
    }
    doc
}

/// Mechanical model with two ducts and two pipes.
fn mechanical() -> MemoryDocument {
    let mut doc = MemoryDocument::new("Tower_ОВ");
    doc.add_conduit(Conduit::duct(100, run_along_y(4.0, 10.0), 0.4));
    doc.add_conduit(Conduit::duct(101, run_along_y(30.0, 10.0), 0.4));
    doc.add_conduit(Conduit::pipe(200, run_along_y(6.0, 6.0), 0.1));
    doc.add_conduit(Conduit::pipe(
        201,
        Curve::Arc {
            center: Point3::new(2.0, 2.0, 1.5),
            radius: 4.0,
            normal: Vector3::z(),
            start_angle: 0.0,
            end_angle: 1.2,
        },
        0.05,
    ));
    doc
}

fn session(arch: MemoryDocument) -> MemorySession {
    let mut session = MemorySession::new(arch);
    session.open(mechanical());
    session
}

fn markers_of(doc: &MemoryDocument, family: &str) -> Vec<MarkerInstance> {
    let symbol = doc.find_symbol(family).expect("family should be loaded");
    doc.instances()
        .iter()
        .filter(|i| i.symbol == symbol)
        .cloned()
        .collect()
}

#[test]
fn places_rectangular_and_round_markers() {
    let mut session = session(architecture(&[RECT, ROUND]));
    let report = HoleCommand::new(Config::default())
        .run(&mut session)
        .unwrap();

    assert_eq!(report.source_model, "Tower_ОВ");
    assert_eq!(report.active_model, "Tower_AR");
    assert_eq!(report.total_placed(), 3);

    let ducts = report.pass(ConduitKind::Ducted).unwrap();
    assert_eq!(ducts.status, PassStatus::Completed);
    assert_eq!(ducts.conduits, 2);
    assert_eq!(ducts.penetrations, 2);
    assert!(ducts.activated);
    assert!(ducts.diagnostics.is_empty());

    let pipes = report.pass(ConduitKind::Piped).unwrap();
    assert_eq!(pipes.conduits, 2);
    assert_eq!(pipes.penetrations, 1);
    assert_eq!(pipes.diagnostics.len(), 1);
    assert!(pipes.diagnostics[0].contains("not a straight segment"));

    let doc = session.active();
    let rect = markers_of(doc, RECT);
    assert_eq!(rect.len(), 2);
    assert_eq!(rect[0].host, BarrierRef::local(10));
    assert_relative_eq!(rect[0].point.y, 4.875, epsilon = 1e-9);
    assert_relative_eq!(rect[0].point.x, 4.0, epsilon = 1e-9);
    assert_relative_eq!(rect[0].point.z, 1.5, epsilon = 1e-9);
    assert_eq!(rect[0].parameter("Ширина"), Some(0.4));
    assert_eq!(rect[0].parameter("Высота"), Some(0.4));
    assert_eq!(rect[0].level, ElementId(1));

    // Four layer faces, one marker on the first.
    assert_eq!(rect[1].host, BarrierRef::local(11));
    assert_relative_eq!(rect[1].point.y, 7.85, epsilon = 1e-9);

    let round = markers_of(doc, ROUND);
    assert_eq!(round.len(), 1);
    assert_eq!(round[0].host, BarrierRef::local(10));
    assert_relative_eq!(round[0].parameter("Радиус").unwrap(), 0.05, epsilon = 1e-12);
}

#[test]
fn units_are_committed_per_phase_in_pass_order() {
    let mut session = session(architecture(&[RECT, ROUND]));
    HoleCommand::new(Config::default())
        .run(&mut session)
        .unwrap();

    assert_eq!(
        session.active().committed_units(),
        [
            "Activate rectangular openings".to_string(),
            "Place rectangular openings".to_string(),
            "Activate round openings".to_string(),
            "Place round openings".to_string(),
        ]
    );
}

#[test]
fn already_active_symbols_are_left_alone() {
    let mut session = session(architecture(&[RECT, ROUND]));
    let command = HoleCommand::new(Config::default());
    command.run(&mut session).unwrap();

    let second = command.run(&mut session).unwrap();
    assert!(second.passes.iter().all(|p| !p.activated));
    assert_eq!(session.active().instances().len(), 6);
}

#[test]
fn conduit_ending_on_wall_face_counts() {
    let arch = architecture(&[RECT, ROUND]);
    let mut hvac = MemoryDocument::new("Tower_ОВ");
    hvac.add_conduit(Conduit::duct(100, run_along_y(4.0, 4.875), 0.3));
    hvac.add_conduit(Conduit::duct(101, run_along_y(5.0, 4.87), 0.3));

    let mut session = MemorySession::new(arch);
    session.open(hvac);
    let report = HoleCommand::new(Config::default())
        .run(&mut session)
        .unwrap();

    let ducts = report.pass(ConduitKind::Ducted).unwrap();
    assert_eq!(ducts.placed.len(), 1);
    let marker = &session.active().instances()[0];
    assert_relative_eq!(marker.point.x, 4.0, epsilon = 1e-9);
}

#[test]
fn linked_walls_are_hosted_through_their_link() {
    let mut arch = architecture(&[RECT, ROUND]);
    let shifted = Isometry3::from_parts(
        Translation3::new(0.0, 3.0, 0.0),
        UnitQuaternion::identity(),
    );
    let linked_wall = WallSolid::single_layer(
        10,
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(20.0, 0.0, 0.0),
        3.0,
        0.25,
    )
    .unwrap();
    arch.add_link(
        LinkInstance::new(300, shifted).with_wall(linked_wall),
        storey(50, "Structure L1"),
    );

    let mut session = session(arch);
    HoleCommand::new(Config::default())
        .run(&mut session)
        .unwrap();

    let rect = markers_of(session.active(), RECT);
    assert_eq!(rect.len(), 3);
    // Same element id as the local wall, different barrier.
    assert_eq!(rect[0].host, BarrierRef::linked(300, 10));
    assert_eq!(rect[0].level, ElementId(50));
    assert_relative_eq!(rect[0].point.y, 2.875, epsilon = 1e-9);
    assert_eq!(rect[1].host, BarrierRef::local(10));
}

#[test]
fn hidden_walls_are_not_penetrated() {
    let mut arch = architecture(&[RECT, ROUND]);
    arch.view_mut(ElementId(2))
        .unwrap()
        .hide(BarrierRef::local(11));

    let mut session = session(arch);
    let report = HoleCommand::new(Config::default())
        .run(&mut session)
        .unwrap();

    let ducts = report.pass(ConduitKind::Ducted).unwrap();
    assert_eq!(ducts.penetrations, 1);
    assert_eq!(session.active().instances()[0].host, BarrierRef::local(10));
}

#[test]
fn dangling_barrier_is_reported_and_skipped() {
    let mut arch = architecture(&[RECT, ROUND]);
    arch.forget_barrier(&BarrierRef::local(11));

    let mut session = session(arch);
    let report = HoleCommand::new(Config::default())
        .run(&mut session)
        .unwrap();

    let ducts = report.pass(ConduitKind::Ducted).unwrap();
    assert_eq!(ducts.placed.len(), 1);
    assert_eq!(ducts.diagnostics, ["dangling reference to barrier #11".to_string()]);
}

#[test]
fn missing_round_family_skips_pipe_pass() {
    let mut session = session(architecture(&[RECT]));
    let report = HoleCommand::new(Config::default())
        .run(&mut session)
        .unwrap();

    assert_eq!(report.pass(ConduitKind::Ducted).unwrap().placed.len(), 2);
    let pipes = report.pass(ConduitKind::Piped).unwrap();
    assert_eq!(pipes.status, PassStatus::SkippedMissingFamily);
    assert_eq!(pipes.conduits, 2);
    assert!(pipes.placed.is_empty());
    assert_eq!(session.active().instances().len(), 2);
}

#[test]
fn missing_rectangular_family_skips_duct_pass() {
    let mut session = session(architecture(&[ROUND]));
    let report = HoleCommand::new(Config::default())
        .run(&mut session)
        .unwrap();

    assert_eq!(
        report.pass(ConduitKind::Ducted).unwrap().status,
        PassStatus::SkippedMissingFamily
    );
    assert_eq!(report.pass(ConduitKind::Piped).unwrap().placed.len(), 1);
}

#[test]
fn both_families_missing_is_an_error() {
    let mut session = session(architecture(&[]));
    let err = HoleCommand::new(Config::default())
        .run(&mut session)
        .unwrap_err();
    assert!(matches!(err, Error::MissingCollaborator(_)));
    assert!(session.active().committed_units().is_empty());
}

#[test]
fn missing_source_model_is_an_error() {
    let mut session = MemorySession::new(architecture(&[RECT, ROUND]));
    let err = HoleCommand::new(Config::default())
        .run(&mut session)
        .unwrap_err();
    assert!(matches!(err, Error::MissingCollaborator(_)));
}

#[test]
fn only_template_views_is_an_error() {
    let mut arch = MemoryDocument::new("Tower_AR");
    arch.add_view(View3d::template(3, "3D Template"));
    arch.add_symbol(RECT, "Standard", &["Ширина", "Высота"]);

    let mut session = session(arch);
    let err = HoleCommand::new(Config::default())
        .run(&mut session)
        .unwrap_err();
    assert!(matches!(err, Error::MissingCollaborator(_)));
}

#[test]
fn source_marker_is_configurable() {
    let mut session = session(architecture(&[RECT, ROUND]));
    let config = Config {
        source_title_marker: "_AR".into(),
        ..Config::default()
    };
    let report = HoleCommand::new(config).run(&mut session).unwrap();

    // The architectural model has no conduits.
    assert_eq!(report.source_model, "Tower_AR");
    assert_eq!(report.total_placed(), 0);
}

#[test]
fn rejected_placement_skips_only_that_penetration() {
    let mut arch = architecture(&[RECT, ROUND]);
    arch.reject_placement_on(BarrierRef::local(10));

    let mut session = session(arch);
    let report = HoleCommand::new(Config::default())
        .run(&mut session)
        .unwrap();

    let ducts = report.pass(ConduitKind::Ducted).unwrap();
    assert_eq!(ducts.penetrations, 2);
    assert_eq!(ducts.placed.len(), 1);
    assert!(ducts.diagnostics[0].starts_with("placement rejected on barrier #10"));
    assert_eq!(report.pass(ConduitKind::Piped).unwrap().placed.len(), 0);
}

#[test]
fn marker_without_size_parameter_is_discarded() {
    let mut arch = architecture(&[ROUND]);
    arch.add_symbol(RECT, "Legacy", &["Ширина"]);

    let mut session = session(arch);
    let report = HoleCommand::new(Config::default())
        .run(&mut session)
        .unwrap();

    let ducts = report.pass(ConduitKind::Ducted).unwrap();
    assert!(ducts.placed.is_empty());
    assert_eq!(ducts.diagnostics.len(), 2);
    assert!(ducts.diagnostics[0].contains("Высота"));
    assert!(markers_of(session.active(), RECT).is_empty());
    assert_eq!(markers_of(session.active(), ROUND).len(), 1);
}

#[test]
fn pipe_without_outer_diameter_is_skipped() {
    let arch = architecture(&[RECT, ROUND]);
    let mut hvac = MemoryDocument::new("Tower_ОВ");
    hvac.add_conduit(Conduit {
        outer_diameter: None,
        ..Conduit::pipe(200, run_along_y(6.0, 6.0), 0.1)
    });

    let mut session = MemorySession::new(arch);
    session.open(hvac);
    let report = HoleCommand::new(Config::default())
        .run(&mut session)
        .unwrap();

    let pipes = report.pass(ConduitKind::Piped).unwrap();
    assert_eq!(pipes.penetrations, 1);
    assert!(pipes.placed.is_empty());
    assert!(pipes.diagnostics[0].contains("RBS_PIPE_OUTER_DIAMETER"));
}

#[test]
fn host_failure_rolls_back_the_placement_unit() {
    let mut arch = architecture(&[RECT, ROUND]);
    arch.fail_after_placements(1);

    let mut session = session(arch);
    let err = HoleCommand::new(Config::default())
        .run(&mut session)
        .unwrap_err();
    assert!(matches!(err, Error::Host(_)));

    let doc = session.active();
    assert!(doc.instances().is_empty());
    assert_eq!(doc.committed_units(), ["Activate rectangular openings".to_string()]);
    let rect = doc.find_symbol(RECT).unwrap();
    assert!(doc.symbol(rect).unwrap().active);
}

#[test]
fn cancelled_run_changes_nothing() {
    let cancel = CancelToken::new();
    cancel.cancel();

    let mut session = session(architecture(&[RECT, ROUND]));
    let err = HoleCommand::new(Config::default())
        .with_cancel(cancel)
        .run(&mut session)
        .unwrap_err();

    assert_eq!(err, Error::Cancelled);
    assert!(session.active().committed_units().is_empty());
    assert!(session.active().instances().is_empty());
}

#[test]
fn parallel_resolution_matches_sequential() {
    let mut sequential = session(architecture(&[RECT, ROUND]));
    let mut parallel = session(architecture(&[RECT, ROUND]));

    let a = HoleCommand::new(Config::default())
        .run(&mut sequential)
        .unwrap();
    let b = HoleCommand::new(Config {
        parallel: true,
        ..Config::default()
    })
    .run(&mut parallel)
    .unwrap();

    assert_eq!(a, b);
    assert_eq!(sequential.active().instances(), parallel.active().instances());
}

#[test]
fn report_serializes_to_json() {
    let mut session = session(architecture(&[RECT]));
    let report = HoleCommand::new(Config::default())
        .run(&mut session)
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(value["source_model"], "Tower_ОВ");
    assert_eq!(value["passes"][0]["kind"], "Ducted");
    assert_eq!(value["passes"][1]["status"], "skipped_missing_family");
    assert_eq!(value["passes"][0]["placed"].as_array().unwrap().len(), 2);
}

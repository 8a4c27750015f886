// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory host models.
//!
//! [`MemoryDocument`] implements every host contract over plain collections
//! and a [`BarrierScene`]: conduits, walls and levels, linked models, 3D
//! views, marker symbols and instances. Mutation is only allowed inside an
//! open unit; rollback restores the state captured when the unit was opened.
//! Placement failures can be injected to exercise the error paths.

use crate::ports::{BarrierResolver, HostDocument, HostSession, MarkerPlacement, Transactional};
use nalgebra::{Point3, Unit, Vector3};
use rustc_hash::{FxHashMap, FxHashSet};
use wallhole_core::{
    Barrier, BarrierRef, Conduit, ConduitKind, ElementId, Error, Level, RayHit, Result,
};
use wallhole_geometry::{BarrierScene, LinkInstance, View3d, WallSolid};

/// First id handed out for elements the document creates itself.
const FIRST_CREATED_ID: i64 = 1_000_000;

/// A loadable marker family type.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSymbol {
    pub id: ElementId,
    pub family_name: String,
    pub type_name: String,
    pub active: bool,
    /// Instance parameters every marker of this symbol carries.
    pub parameters: Vec<String>,
}

/// A placed marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerInstance {
    pub id: ElementId,
    pub symbol: ElementId,
    pub point: Point3<f64>,
    pub host: BarrierRef,
    pub level: ElementId,
    pub parameters: FxHashMap<String, f64>,
}

impl MarkerInstance {
    pub fn parameter(&self, name: &str) -> Option<f64> {
        self.parameters.get(name).copied()
    }
}

/// Barrier data of a model reached through a link instance.
#[derive(Debug, Clone, Default)]
struct LinkedModel {
    barriers: FxHashMap<ElementId, Barrier>,
    levels: FxHashMap<ElementId, Level>,
}

/// Mutable state captured when a unit opens.
#[derive(Debug, Clone)]
struct OpenUnit {
    name: String,
    symbols: Vec<MarkerSymbol>,
    instances: Vec<MarkerInstance>,
    next_id: i64,
    placements: usize,
}

/// One in-memory model.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    title: String,
    conduits: Vec<Conduit>,
    levels: FxHashMap<ElementId, Level>,
    barriers: FxHashMap<ElementId, Barrier>,
    links: FxHashMap<ElementId, LinkedModel>,
    scene: BarrierScene,
    views: Vec<View3d>,
    symbols: Vec<MarkerSymbol>,
    instances: Vec<MarkerInstance>,
    next_id: i64,
    open_unit: Option<OpenUnit>,
    committed_units: Vec<String>,
    rejected_hosts: FxHashSet<BarrierRef>,
    fail_after: Option<usize>,
    placements: usize,
}

impl MemoryDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            conduits: Vec::new(),
            levels: FxHashMap::default(),
            barriers: FxHashMap::default(),
            links: FxHashMap::default(),
            scene: BarrierScene::new(),
            views: Vec::new(),
            symbols: Vec::new(),
            instances: Vec::new(),
            next_id: FIRST_CREATED_ID,
            open_unit: None,
            committed_units: Vec::new(),
            rejected_hosts: FxHashSet::default(),
            fail_after: None,
            placements: 0,
        }
    }

    pub fn add_level(&mut self, level: Level) -> ElementId {
        let id = level.id;
        self.levels.insert(id, level);
        id
    }

    /// Add a wall on `level`, both as barrier data and castable geometry.
    pub fn add_wall(&mut self, wall: WallSolid, name: impl Into<String>, level: ElementId) {
        let reference = BarrierRef::local(wall.id);
        self.barriers.insert(
            wall.id,
            Barrier {
                reference,
                name: name.into(),
                level_id: level,
            },
        );
        self.scene.add_wall(wall);
    }

    /// Add a linked model whose walls all sit on `level`.
    pub fn add_link(&mut self, link: LinkInstance, level: Level) {
        let mut model = LinkedModel::default();
        for wall in &link.walls {
            model.barriers.insert(
                wall.id,
                Barrier {
                    reference: BarrierRef::linked(link.id, wall.id),
                    name: format!("Linked wall {}", wall.id),
                    level_id: level.id,
                },
            );
        }
        model.levels.insert(level.id, level);
        self.links.insert(link.id, model);
        self.scene.add_link(link);
    }

    /// Drop a barrier's data but keep its geometry, leaving hits on it dangling.
    pub fn forget_barrier(&mut self, reference: &BarrierRef) {
        match reference.linked {
            None => {
                self.barriers.remove(&reference.element);
            }
            Some(linked) => {
                if let Some(model) = self.links.get_mut(&reference.element) {
                    model.barriers.remove(&linked);
                }
            }
        }
    }

    pub fn add_conduit(&mut self, conduit: Conduit) {
        self.conduits.push(conduit);
    }

    pub fn add_view(&mut self, view: View3d) {
        self.views.push(view);
    }

    /// Load a marker symbol. New symbols start inactive.
    pub fn add_symbol(
        &mut self,
        family_name: impl Into<String>,
        type_name: impl Into<String>,
        parameters: &[&str],
    ) -> ElementId {
        let id = self.allocate_id();
        self.symbols.push(MarkerSymbol {
            id,
            family_name: family_name.into(),
            type_name: type_name.into(),
            active: false,
            parameters: parameters.iter().map(|p| p.to_string()).collect(),
        });
        id
    }

    /// Make every placement on `reference` fail with a placement error.
    pub fn reject_placement_on(&mut self, reference: BarrierRef) {
        self.rejected_hosts.insert(reference);
    }

    /// Make the host fail outright once `count` placements were attempted.
    pub fn fail_after_placements(&mut self, count: usize) {
        self.fail_after = Some(count);
    }

    pub fn view_mut(&mut self, id: ElementId) -> Option<&mut View3d> {
        self.views.iter_mut().find(|v| v.id == id)
    }

    pub fn symbol(&self, id: ElementId) -> Option<&MarkerSymbol> {
        self.symbols.iter().find(|s| s.id == id)
    }

    pub fn instances(&self) -> &[MarkerInstance] {
        &self.instances
    }

    /// Names of the units committed so far, oldest first.
    pub fn committed_units(&self) -> &[String] {
        &self.committed_units
    }

    pub fn scene(&self) -> &BarrierScene {
        &self.scene
    }

    fn allocate_id(&mut self) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        id
    }

    fn require_unit(&self, operation: &str) -> Result<()> {
        if self.open_unit.is_some() {
            Ok(())
        } else {
            Err(Error::Host(format!("{operation} outside of a commit unit")))
        }
    }

    fn symbol_mut(&mut self, id: ElementId) -> Result<&mut MarkerSymbol> {
        self.symbols
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::Host(format!("unknown marker symbol {id}")))
    }
}

impl BarrierResolver for MemoryDocument {
    fn resolve(&self, reference: &BarrierRef) -> Option<(Barrier, Level)> {
        let (barrier, levels) = match reference.linked {
            None => (self.barriers.get(&reference.element)?, &self.levels),
            Some(linked) => {
                let model = self.links.get(&reference.element)?;
                (model.barriers.get(&linked)?, &model.levels)
            }
        };
        let level = levels.get(&barrier.level_id)?;
        Some((barrier.clone(), level.clone()))
    }
}

impl MarkerPlacement for MemoryDocument {
    fn is_active(&self, symbol: ElementId) -> bool {
        self.symbol(symbol).map(|s| s.active).unwrap_or(false)
    }

    fn activate(&mut self, symbol: ElementId) -> Result<()> {
        self.require_unit("symbol activation")?;
        self.symbol_mut(symbol)?.active = true;
        Ok(())
    }

    fn place(
        &mut self,
        point: &Point3<f64>,
        symbol: ElementId,
        barrier: &Barrier,
        level: &Level,
    ) -> Result<ElementId> {
        self.require_unit("marker placement")?;

        if let Some(limit) = self.fail_after {
            if self.placements >= limit {
                return Err(Error::Host("placement limit exceeded".into()));
            }
        }
        self.placements += 1;

        let reject = |reason: &str| Error::PlacementError {
            barrier: barrier.reference,
            reason: reason.to_string(),
        };
        if self.rejected_hosts.contains(&barrier.reference) {
            return Err(reject("host rejected the marker"));
        }
        if barrier.level_id != level.id {
            return Err(reject("level does not match the host barrier"));
        }

        let parameters = {
            let symbol = self.symbol_mut(symbol)?;
            if !symbol.active {
                return Err(reject("marker symbol is not active"));
            }
            symbol
                .parameters
                .iter()
                .map(|name| (name.clone(), 0.0))
                .collect()
        };

        let id = self.allocate_id();
        self.instances.push(MarkerInstance {
            id,
            symbol,
            point: *point,
            host: barrier.reference,
            level: level.id,
            parameters,
        });
        Ok(id)
    }

    fn set_parameter(&mut self, instance: ElementId, name: &str, value: f64) -> Result<()> {
        self.require_unit("parameter write")?;
        let marker = self
            .instances
            .iter_mut()
            .find(|i| i.id == instance)
            .ok_or_else(|| Error::Host(format!("unknown marker instance {instance}")))?;
        match marker.parameters.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::MissingParameter {
                element: instance,
                name: name.to_string(),
            }),
        }
    }

    fn discard(&mut self, instance: ElementId) -> Result<()> {
        self.require_unit("marker deletion")?;
        let before = self.instances.len();
        self.instances.retain(|i| i.id != instance);
        if self.instances.len() == before {
            return Err(Error::Host(format!("unknown marker instance {instance}")));
        }
        Ok(())
    }
}

impl Transactional for MemoryDocument {
    fn begin(&mut self, name: &str) -> Result<()> {
        if let Some(open) = &self.open_unit {
            return Err(Error::Host(format!(
                "cannot open {name:?} while {:?} is open",
                open.name
            )));
        }
        self.open_unit = Some(OpenUnit {
            name: name.to_string(),
            symbols: self.symbols.clone(),
            instances: self.instances.clone(),
            next_id: self.next_id,
            placements: self.placements,
        });
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let unit = self
            .open_unit
            .take()
            .ok_or_else(|| Error::Host("no open commit unit".into()))?;
        self.committed_units.push(unit.name);
        Ok(())
    }

    fn rollback(&mut self) {
        if let Some(unit) = self.open_unit.take() {
            self.symbols = unit.symbols;
            self.instances = unit.instances;
            self.next_id = unit.next_id;
            self.placements = unit.placements;
        }
    }
}

impl HostDocument for MemoryDocument {
    fn title(&self) -> &str {
        &self.title
    }

    fn views(&self) -> &[View3d] {
        &self.views
    }

    fn conduits(&self, kind: ConduitKind) -> Vec<Conduit> {
        self.conduits
            .iter()
            .filter(|c| c.kind == kind)
            .cloned()
            .collect()
    }

    fn find_symbol(&self, family_name: &str) -> Option<ElementId> {
        self.symbols
            .iter()
            .find(|s| s.family_name == family_name)
            .map(|s| s.id)
    }

    fn cast_ray(
        &self,
        view: ElementId,
        origin: &Point3<f64>,
        direction: &Unit<Vector3<f64>>,
        max_distance: f64,
    ) -> Result<Vec<RayHit>> {
        let view = self
            .views
            .iter()
            .find(|v| v.id == view)
            .ok_or_else(|| Error::MissingCollaborator(format!("3D view {view}")))?;
        Ok(self.scene.cast(view, origin, direction, max_distance)?)
    }
}

/// A set of open in-memory models, one of them active.
#[derive(Debug, Clone)]
pub struct MemorySession {
    documents: Vec<MemoryDocument>,
    active: usize,
}

impl MemorySession {
    /// Session whose only (and active) model is `active`.
    pub fn new(active: MemoryDocument) -> Self {
        Self {
            documents: vec![active],
            active: 0,
        }
    }

    /// Open another model; returns its index.
    pub fn open(&mut self, document: MemoryDocument) -> usize {
        self.documents.push(document);
        self.documents.len() - 1
    }

    pub fn active(&self) -> &MemoryDocument {
        &self.documents[self.active]
    }

    pub fn active_mut(&mut self) -> &mut MemoryDocument {
        &mut self.documents[self.active]
    }
}

impl HostSession for MemorySession {
    type Document = MemoryDocument;

    fn documents(&self) -> &[MemoryDocument] {
        &self.documents
    }

    fn documents_mut(&mut self) -> &mut [MemoryDocument] {
        &mut self.documents
    }

    fn active_index(&self) -> usize {
        self.active
    }
}

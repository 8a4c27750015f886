// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 3D views used to scope ray casts.

use rustc_hash::FxHashSet;
use wallhole_core::{BarrierRef, ElementId};

/// A 3D view of the active model.
///
/// Ray casts only see barriers visible in the view. Hiding a link instance
/// (`BarrierRef::local(instance)`) hides every barrier reached through it.
#[derive(Debug, Clone)]
pub struct View3d {
    pub id: ElementId,
    pub name: String,
    /// Templates only carry settings and are never cast against.
    pub is_template: bool,
    hidden: FxHashSet<BarrierRef>,
}

impl View3d {
    pub fn new(id: impl Into<ElementId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_template: false,
            hidden: FxHashSet::default(),
        }
    }

    pub fn template(id: impl Into<ElementId>, name: impl Into<String>) -> Self {
        Self {
            is_template: true,
            ..Self::new(id, name)
        }
    }

    pub fn hide(&mut self, reference: BarrierRef) {
        self.hidden.insert(reference);
    }

    pub fn is_visible(&self, reference: &BarrierRef) -> bool {
        if self.hidden.contains(reference) {
            return false;
        }
        !(reference.is_linked() && self.hidden.contains(&BarrierRef::local(reference.element)))
    }
}

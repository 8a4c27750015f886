// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element identities.
//!
//! Every element in a host model is addressed by an [`ElementId`]. Barriers
//! that live in a secondary (linked) model are reached through a link instance
//! in the active model, so a barrier reference is the pair of the active-model
//! id and the optional id inside the linked model. That pair is what hit
//! deduplication compares.

use serde::{Deserialize, Serialize};

/// Identifier of an element inside one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub i64);

impl ElementId {
    /// Sentinel used by hosts for "no element".
    pub const INVALID: ElementId = ElementId(-1);

    /// Returns `true` unless this is [`ElementId::INVALID`].
    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for ElementId {
    fn from(value: i64) -> Self {
        ElementId(value)
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Reference to a barrier as seen from the active model.
///
/// `element` is the id of the barrier itself for local barriers, or the id of
/// the link instance for barriers in a linked model. `linked` carries the id
/// of the barrier inside the linked model.
///
/// Two hits refer to the same logical barrier iff their references are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BarrierRef {
    pub element: ElementId,
    pub linked: Option<ElementId>,
}

impl BarrierRef {
    /// Reference to a barrier stored in the active model.
    pub fn local(element: impl Into<ElementId>) -> Self {
        Self {
            element: element.into(),
            linked: None,
        }
    }

    /// Reference to barrier `element` of the model placed by link `instance`.
    pub fn linked(instance: impl Into<ElementId>, element: impl Into<ElementId>) -> Self {
        Self {
            element: instance.into(),
            linked: Some(element.into()),
        }
    }

    pub fn is_linked(&self) -> bool {
        self.linked.is_some()
    }
}

impl std::fmt::Display for BarrierRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.linked {
            Some(linked) => write!(f, "{}/{}", self.element, linked),
            None => write!(f, "{}", self.element),
        }
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Serializable summary of a hole placement run.

use serde::{Deserialize, Serialize};
use wallhole_core::{ConduitKind, ElementId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassStatus {
    Completed,
    /// The marker family for this conduit kind is not loaded.
    SkippedMissingFamily,
}

/// Outcome of one conduit kind's pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassReport {
    pub kind: ConduitKind,
    pub family: String,
    pub status: PassStatus,
    pub conduits: usize,
    pub penetrations: usize,
    pub placed: Vec<ElementId>,
    /// Whether the marker symbol had to be activated.
    pub activated: bool,
    /// Human readable reasons for every skipped conduit, hit or penetration.
    pub diagnostics: Vec<String>,
}

impl PassReport {
    pub(crate) fn skipped(kind: ConduitKind, family: &str, conduits: usize) -> Self {
        Self {
            kind,
            family: family.to_string(),
            status: PassStatus::SkippedMissingFamily,
            conduits,
            penetrations: 0,
            placed: Vec::new(),
            activated: false,
            diagnostics: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub source_model: String,
    pub active_model: String,
    pub passes: Vec<PassReport>,
}

impl RunReport {
    pub fn total_placed(&self) -> usize {
        self.passes.iter().map(|p| p.placed.len()).sum()
    }

    pub fn pass(&self, kind: ConduitKind) -> Option<&PassReport> {
        self.passes.iter().find(|p| p.kind == kind)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

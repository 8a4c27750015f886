// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command configuration.
//!
//! Defaults match the Russian-locale project templates the command was
//! written for: the mechanical model is recognised by `ОВ` in its title and
//! the marker families and their size parameters carry Russian names.
//! Every value can be overridden from `WALLHOLE_*` environment variables or
//! a JSON document.

use serde::{Deserialize, Serialize};
use wallhole_core::ConduitKind;

/// Names of the size parameters on marker instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterNames {
    pub width: String,
    pub height: String,
    pub radius: String,
}

impl Default for ParameterNames {
    fn default() -> Self {
        Self {
            width: "Ширина".into(),
            height: "Высота".into(),
            radius: "Радиус".into(),
        }
    }
}

/// Opening placement configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Substring identifying the source (mechanical) model by title.
    pub source_title_marker: String,
    /// Family of rectangular markers, placed for ducts.
    pub rectangular_family: String,
    /// Family of round markers, placed for pipes.
    pub round_family: String,
    pub parameters: ParameterNames,
    /// Resolve conduits on the rayon pool.
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_title_marker: "ОВ".into(),
            rectangular_family: "Отверстие".into(),
            round_family: "Круглое отверстие".into(),
            parameters: ParameterNames::default(),
            parallel: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str, default: String| lookup(key).unwrap_or(default);

        Self {
            source_title_marker: text("WALLHOLE_SOURCE_MARKER", defaults.source_title_marker),
            rectangular_family: text("WALLHOLE_RECT_FAMILY", defaults.rectangular_family),
            round_family: text("WALLHOLE_ROUND_FAMILY", defaults.round_family),
            parameters: ParameterNames {
                width: text("WALLHOLE_WIDTH_PARAM", defaults.parameters.width),
                height: text("WALLHOLE_HEIGHT_PARAM", defaults.parameters.height),
                radius: text("WALLHOLE_RADIUS_PARAM", defaults.parameters.radius),
            },
            parallel: lookup("WALLHOLE_PARALLEL")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.parallel),
        }
    }

    /// Parse configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Marker family used for conduits of `kind`.
    pub fn family_for(&self, kind: ConduitKind) -> &str {
        match kind {
            ConduitKind::Ducted => &self.rectangular_family,
            ConduitKind::Piped => &self.round_family,
        }
    }
}

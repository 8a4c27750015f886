// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The hole placement command.
//!
//! A run reads ducts and pipes from the source model (the first open model
//! whose title carries the configured marker) and places openings in the
//! active model, where the walls live. Ducts are handled first with the
//! rectangular family, then pipes with the round family. Each pass commits
//! its symbol activation and its placements as two separate units, so a
//! fatal error in a later pass leaves earlier work in place.

use crate::cancel::CancelToken;
use crate::config::Config;
use crate::placement::{activate_symbol, place_markers};
use crate::ports::{HostDocument, HostSession, ViewCaster};
use crate::report::{PassReport, PassStatus, RunReport};
use crate::resolver::PenetrationResolver;
use wallhole_core::{Conduit, ConduitKind, ElementId, Error, MarkerShape, Result};

/// Places wall opening markers for every duct and pipe of the source model.
#[derive(Debug, Clone, Default)]
pub struct HoleCommand {
    config: Config,
    cancel: CancelToken,
}

/// Conduits of one kind together with the symbol that marks them.
struct Pass<'a> {
    kind: ConduitKind,
    family: &'a str,
    symbol: Option<ElementId>,
    conduits: Vec<Conduit>,
}

impl HoleCommand {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            cancel: CancelToken::new(),
        }
    }

    /// Use `cancel` to stop the run from another thread.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn run<S>(&self, session: &mut S) -> Result<RunReport>
    where
        S: HostSession + ?Sized,
    {
        let marker = self.config.source_title_marker.as_str();
        let source = session
            .documents()
            .iter()
            .find(|doc| doc.title().contains(marker))
            .ok_or_else(|| {
                Error::MissingCollaborator(format!("no open model title contains {marker:?}"))
            })?;
        let source_model = source.title().to_string();

        let passes: Vec<Pass<'_>> = ConduitKind::ALL
            .iter()
            .map(|&kind| Pass {
                kind,
                family: self.config.family_for(kind),
                symbol: None,
                conduits: source.conduits(kind),
            })
            .collect();

        let active_index = session.active_index();
        let document = session
            .documents_mut()
            .get_mut(active_index)
            .ok_or_else(|| Error::MissingCollaborator("active model".into()))?;
        let active_model = document.title().to_string();

        let view = document
            .views()
            .iter()
            .find(|view| !view.is_template)
            .map(|view| view.id)
            .ok_or_else(|| {
                Error::MissingCollaborator(format!("non-template 3D view in {active_model:?}"))
            })?;

        let passes: Vec<Pass<'_>> = passes
            .into_iter()
            .map(|pass| Pass {
                symbol: document.find_symbol(pass.family),
                ..pass
            })
            .collect();
        if passes.iter().all(|pass| pass.symbol.is_none()) {
            let families: Vec<&str> = passes.iter().map(|pass| pass.family).collect();
            return Err(Error::MissingCollaborator(format!(
                "marker families {families:?} are not loaded in {active_model:?}"
            )));
        }

        tracing::info!(
            source = %source_model,
            active = %active_model,
            view = %view,
            parallel = self.config.parallel,
            "Starting hole placement"
        );

        let mut reports = Vec::with_capacity(passes.len());
        for pass in &passes {
            let report = match pass.symbol {
                Some(symbol) => self.run_pass(&mut *document, pass, symbol, view)?,
                None => {
                    tracing::warn!(
                        kind = %pass.kind,
                        family = pass.family,
                        "Marker family not loaded, skipping pass"
                    );
                    PassReport::skipped(pass.kind, pass.family, pass.conduits.len())
                }
            };
            reports.push(report);
        }

        let report = RunReport {
            source_model,
            active_model,
            passes: reports,
        };
        tracing::info!(placed = report.total_placed(), "Hole placement finished");
        Ok(report)
    }

    fn run_pass<D>(
        &self,
        document: &mut D,
        pass: &Pass<'_>,
        symbol: ElementId,
        view: ElementId,
    ) -> Result<PassReport>
    where
        D: HostDocument + Sync + ?Sized,
    {
        self.cancel.check()?;
        let shape = shape_name(pass.kind.marker_shape());

        let activation = format!("Activate {shape} openings");
        let activated = activate_symbol(&mut *document, symbol, &activation)?;

        let resolution = {
            let reader: &D = &*document;
            let caster = ViewCaster::new(reader, view);
            let resolver = PenetrationResolver::with_cancel(self.cancel.clone());
            if self.config.parallel {
                resolver.resolve_parallel(&pass.conduits, &caster, reader)?
            } else {
                resolver.resolve(&pass.conduits, &caster, reader)?
            }
        };

        let outcome = place_markers(
            document,
            pass.kind,
            symbol,
            &resolution.penetrations,
            &self.config.parameters,
            &self.cancel,
            &format!("Place {shape} openings"),
        )?;

        tracing::info!(
            kind = %pass.kind,
            conduits = pass.conduits.len(),
            penetrations = resolution.penetrations.len(),
            placed = outcome.placed.len(),
            skipped = outcome.skipped.len(),
            "Pass complete"
        );

        let diagnostics = resolution
            .diagnostics
            .iter()
            .chain(&outcome.skipped)
            .map(ToString::to_string)
            .collect();

        Ok(PassReport {
            kind: pass.kind,
            family: pass.family.to_string(),
            status: PassStatus::Completed,
            conduits: pass.conduits.len(),
            penetrations: resolution.penetrations.len(),
            placed: outcome.placed,
            activated,
            diagnostics,
        })
    }
}

fn shape_name(shape: MarkerShape) -> &'static str {
    match shape {
        MarkerShape::Rectangular => "rectangular",
        MarkerShape::Round => "round",
    }
}

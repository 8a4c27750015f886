// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Penetration resolution.
//!
//! For every conduit the centerline is cast as a ray of the conduit's own
//! length. Hits past the end of the conduit are dropped (the end itself is
//! inclusive), repeated hits on the same barrier collapse onto the first one,
//! and each surviving hit becomes a [`Penetration`] at
//! `origin + direction * proximity` hosted on the resolved barrier and level.
//!
//! Conduits are independent. A conduit that is not a straight segment and a
//! hit whose barrier no longer resolves are reported as diagnostics and
//! skipped; cancellation and ray casting failures abort the pass.

use crate::cancel::CancelToken;
use crate::ports::{BarrierResolver, RayCaster};
use rayon::prelude::*;
use wallhole_core::{deduplicate_hits, Conduit, Error, Penetration, Result};

/// Penetrations found for a batch of conduits plus the recoverable problems
/// met along the way.
#[derive(Debug, Default)]
pub struct Resolution<'c> {
    pub penetrations: Vec<Penetration<'c>>,
    pub diagnostics: Vec<Error>,
}

impl<'c> Resolution<'c> {
    fn append(&mut self, other: Resolution<'c>) {
        self.penetrations.extend(other.penetrations);
        self.diagnostics.extend(other.diagnostics);
    }
}

/// Maps conduits to the barrier penetrations along their centerlines.
#[derive(Debug, Clone, Default)]
pub struct PenetrationResolver {
    cancel: CancelToken,
}

impl PenetrationResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel(cancel: CancelToken) -> Self {
        Self { cancel }
    }

    /// Resolve `conduits` one after the other, keeping input order.
    pub fn resolve<'c, R, B>(
        &self,
        conduits: &'c [Conduit],
        caster: &R,
        barriers: &B,
    ) -> Result<Resolution<'c>>
    where
        R: RayCaster + ?Sized,
        B: BarrierResolver + ?Sized,
    {
        let mut resolution = Resolution::default();
        for conduit in conduits {
            resolution.append(self.resolve_conduit(conduit, caster, barriers)?);
        }
        self.log_summary(conduits.len(), &resolution);
        Ok(resolution)
    }

    /// Same result as [`resolve`](Self::resolve), with conduits resolved on
    /// the rayon pool.
    pub fn resolve_parallel<'c, R, B>(
        &self,
        conduits: &'c [Conduit],
        caster: &R,
        barriers: &B,
    ) -> Result<Resolution<'c>>
    where
        R: RayCaster + Sync + ?Sized,
        B: BarrierResolver + Sync + ?Sized,
    {
        let per_conduit: Vec<Resolution<'c>> = conduits
            .par_iter()
            .map(|conduit| self.resolve_conduit(conduit, caster, barriers))
            .collect::<Result<_>>()?;

        let mut resolution = Resolution::default();
        for part in per_conduit {
            resolution.append(part);
        }
        self.log_summary(conduits.len(), &resolution);
        Ok(resolution)
    }

    /// Penetrations of a single conduit, in the order the ray met them.
    pub fn resolve_conduit<'c, R, B>(
        &self,
        conduit: &'c Conduit,
        caster: &R,
        barriers: &B,
    ) -> Result<Resolution<'c>>
    where
        R: RayCaster + ?Sized,
        B: BarrierResolver + ?Sized,
    {
        self.cancel.check()?;
        let mut resolution = Resolution::default();

        let segment = match conduit.segment() {
            Ok(segment) => segment,
            Err(err) => {
                tracing::warn!(conduit = %conduit.id, error = %err, "Skipping conduit");
                resolution.diagnostics.push(err);
                return Ok(resolution);
            }
        };

        let raw = caster.cast(&segment.origin, &segment.direction, segment.length)?;
        let raw_count = raw.len();
        let hits = deduplicate_hits(raw.into_iter().filter(|hit| segment.covers(hit.proximity)));

        tracing::debug!(
            conduit = %conduit.id,
            length = segment.length,
            raw_hits = raw_count,
            unique_hits = hits.len(),
            "Cast conduit centerline"
        );

        for hit in hits {
            match barriers.resolve(&hit.reference) {
                Some((barrier, level)) => resolution.penetrations.push(Penetration {
                    point: segment.point_at(hit.proximity),
                    barrier,
                    level,
                    conduit,
                }),
                None => {
                    tracing::warn!(
                        conduit = %conduit.id,
                        barrier = %hit.reference,
                        "Skipping hit on unresolvable barrier"
                    );
                    resolution
                        .diagnostics
                        .push(Error::DanglingReference(hit.reference));
                }
            }
        }

        Ok(resolution)
    }

    fn log_summary(&self, conduits: usize, resolution: &Resolution<'_>) {
        tracing::info!(
            conduits,
            penetrations = resolution.penetrations.len(),
            diagnostics = resolution.diagnostics.len(),
            "Resolved penetrations"
        );
    }
}

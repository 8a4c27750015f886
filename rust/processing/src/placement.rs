// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Marker activation and placement phases.

use crate::cancel::CancelToken;
use crate::commit::CommitUnit;
use crate::config::ParameterNames;
use crate::ports::{MarkerPlacement, Transactional};
use wallhole_core::{size_for, ConduitKind, ElementId, Error, Penetration, Result};

/// What one placement phase did.
#[derive(Debug, Default)]
pub struct PlacementOutcome {
    /// Created marker instances, in penetration order.
    pub placed: Vec<ElementId>,
    /// Penetrations left without a marker, with the reason.
    pub skipped: Vec<Error>,
}

/// Activate `symbol` in its own commit unit if it is not active yet.
///
/// Returns whether an activation was performed.
pub fn activate_symbol<D>(document: &mut D, symbol: ElementId, unit_name: &str) -> Result<bool>
where
    D: MarkerPlacement + Transactional + ?Sized,
{
    let mut unit = CommitUnit::begin(document, unit_name)?;
    let activated = if unit.is_active(symbol) {
        false
    } else {
        unit.activate(symbol)?;
        true
    };
    unit.commit()?;
    tracing::debug!(symbol = %symbol, activated, "Marker symbol ready");
    Ok(activated)
}

/// Place one marker of `symbol` per penetration inside a single commit unit.
///
/// Sizing, placement and parameter errors skip that penetration only. Any
/// other error, cancellation included, rolls back every placement of the
/// phase.
pub fn place_markers<D>(
    document: &mut D,
    kind: ConduitKind,
    symbol: ElementId,
    penetrations: &[Penetration<'_>],
    names: &ParameterNames,
    cancel: &CancelToken,
    unit_name: &str,
) -> Result<PlacementOutcome>
where
    D: MarkerPlacement + Transactional + ?Sized,
{
    let mut unit = CommitUnit::begin(document, unit_name)?;
    let mut outcome = PlacementOutcome::default();

    for penetration in penetrations {
        cancel.check()?;
        match place_one(&mut *unit, kind, symbol, penetration, names) {
            Ok(instance) => outcome.placed.push(instance),
            Err(err) if err.is_recoverable() => {
                tracing::warn!(
                    conduit = %penetration.conduit.id,
                    barrier = %penetration.barrier.reference,
                    error = %err,
                    "Skipping penetration"
                );
                outcome.skipped.push(err);
            }
            Err(err) => {
                tracing::error!(unit = %unit.name(), error = %err, "Placement phase aborted");
                return Err(err);
            }
        }
    }

    unit.commit()?;
    tracing::info!(
        kind = %kind,
        placed = outcome.placed.len(),
        skipped = outcome.skipped.len(),
        "Placed markers"
    );
    Ok(outcome)
}

fn place_one<D>(
    document: &mut D,
    kind: ConduitKind,
    symbol: ElementId,
    penetration: &Penetration<'_>,
    names: &ParameterNames,
) -> Result<ElementId>
where
    D: MarkerPlacement + ?Sized,
{
    let size = size_for(kind, penetration.conduit)?;
    let instance = document.place(
        &penetration.point,
        symbol,
        &penetration.barrier,
        &penetration.level,
    )?;

    if let Err(err) = document.set_size(instance, &size, names) {
        document.discard(instance)?;
        return Err(err);
    }
    Ok(instance)
}

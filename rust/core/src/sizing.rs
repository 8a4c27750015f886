// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Marker sizing from conduit cross-sections.
//!
//! Rectangular markers are square with side equal to the duct's nominal
//! diameter, even for ducts with independent width and height. Round markers
//! take half the pipe's outer diameter as radius.

use crate::error::{Error, Result};
use crate::model::{Conduit, ConduitKind, MarkerSize};

/// Host parameter that carries a pipe's outer diameter.
pub const OUTER_DIAMETER_PARAMETER: &str = "RBS_PIPE_OUTER_DIAMETER";

/// Computes the marker dimensions for `conduit` when marked as `kind`.
///
/// Fails with [`Error::InvalidArgument`] for non-finite, zero or negative
/// cross-sections and with [`Error::MissingParameter`] for a round marker on
/// a conduit without an outer diameter.
pub fn size_for(kind: ConduitKind, conduit: &Conduit) -> Result<MarkerSize> {
    match kind {
        ConduitKind::Ducted => {
            let side = positive(conduit, "diameter", conduit.diameter)?;
            Ok(MarkerSize::Rectangular {
                width: side,
                height: side,
            })
        }
        ConduitKind::Piped => {
            let outer = conduit
                .outer_diameter
                .ok_or_else(|| Error::MissingParameter {
                    element: conduit.id,
                    name: OUTER_DIAMETER_PARAMETER.to_string(),
                })?;
            let outer = positive(conduit, "outer diameter", outer)?;
            Ok(MarkerSize::Round {
                radius: outer / 2.0,
            })
        }
    }
}

fn positive(conduit: &Conduit, what: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidArgument(format!(
            "conduit {} has {} {}",
            conduit.id, what, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Curve;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn path() -> Curve {
        Curve::line(Point3::origin(), Point3::new(5.0, 0.0, 0.0))
    }

    #[test]
    fn rectangular_is_square_of_diameter() {
        let duct = Conduit::duct(1, path(), 0.4);
        assert_eq!(
            size_for(ConduitKind::Ducted, &duct).unwrap(),
            MarkerSize::Rectangular {
                width: 0.4,
                height: 0.4
            }
        );
    }

    #[test]
    fn round_is_half_outer_diameter() {
        let pipe = Conduit::pipe(2, path(), 0.12);
        match size_for(ConduitKind::Piped, &pipe).unwrap() {
            MarkerSize::Round { radius } => assert_relative_eq!(radius, 0.06),
            other => panic!("expected round marker, got {other:?}"),
        }
    }

    #[test]
    fn round_uses_outer_not_nominal_diameter() {
        let mut pipe = Conduit::pipe(3, path(), 0.114);
        pipe.diameter = 0.1;
        match size_for(ConduitKind::Piped, &pipe).unwrap() {
            MarkerSize::Round { radius } => assert_relative_eq!(radius, 0.057),
            other => panic!("expected round marker, got {other:?}"),
        }
    }

    #[test]
    fn non_positive_cross_section_fails_fast() {
        let duct = Conduit::duct(4, path(), 0.0);
        assert!(matches!(
            size_for(ConduitKind::Ducted, &duct),
            Err(Error::InvalidArgument(_))
        ));

        let pipe = Conduit::pipe(5, path(), -0.2);
        assert!(matches!(
            size_for(ConduitKind::Piped, &pipe),
            Err(Error::InvalidArgument(_))
        ));

        let duct = Conduit::duct(6, path(), f64::NAN);
        assert!(size_for(ConduitKind::Ducted, &duct).is_err());
    }

    #[test]
    fn missing_outer_diameter() {
        let duct = Conduit::duct(7, path(), 0.3);
        match size_for(ConduitKind::Piped, &duct) {
            Err(Error::MissingParameter { element, name }) => {
                assert_eq!(element, duct.id);
                assert_eq!(name, OUTER_DIAMETER_PARAMETER);
            }
            other => panic!("expected MissingParameter, got {other:?}"),
        }
    }
}

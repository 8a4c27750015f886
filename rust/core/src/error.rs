// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types shared by resolution and placement.

use crate::ids::{BarrierRef, ElementId};
use thiserror::Error;

/// Result type alias for penetration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving penetrations or placing markers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A required model, view or marker kind could not be found.
    #[error("missing collaborator: {0}")]
    MissingCollaborator(String),

    /// A conduit whose location is not a straight segment.
    #[error("conduit {conduit} has unsupported geometry: {reason}")]
    UnsupportedGeometry { conduit: ElementId, reason: String },

    /// A ray hit whose barrier or level no longer resolves.
    #[error("dangling reference to barrier {0}")]
    DanglingReference(BarrierRef),

    /// The host refused to create a marker on this barrier.
    #[error("placement rejected on barrier {barrier}: {reason}")]
    PlacementError { barrier: BarrierRef, reason: String },

    /// An element lacks a parameter the operation needs.
    #[error("element {element} has no parameter {name:?}")]
    MissingParameter { element: ElementId, name: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("operation cancelled")]
    Cancelled,

    /// Any other failure reported by the host model.
    #[error("host failure: {0}")]
    Host(String),
}

impl Error {
    /// Whether the current item can be skipped and processing continued.
    ///
    /// Missing collaborators, cancellation and host failures abort the
    /// surrounding run or phase; everything else only affects one conduit,
    /// hit or penetration.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::UnsupportedGeometry { .. }
            | Error::DanglingReference(_)
            | Error::PlacementError { .. }
            | Error::MissingParameter { .. }
            | Error::InvalidArgument(_) => true,
            Error::MissingCollaborator(_) | Error::Cancelled | Error::Host(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_classification() {
        assert!(Error::DanglingReference(BarrierRef::local(1)).is_recoverable());
        assert!(Error::UnsupportedGeometry {
            conduit: ElementId(3),
            reason: "arc".into()
        }
        .is_recoverable());
        assert!(Error::MissingParameter {
            element: ElementId(3),
            name: "Радиус".into()
        }
        .is_recoverable());
        assert!(!Error::Cancelled.is_recoverable());
        assert!(!Error::MissingCollaborator("3D view".into()).is_recoverable());
        assert!(!Error::Host("disk full".into()).is_recoverable());
    }

    #[test]
    fn messages_name_the_element() {
        let err = Error::PlacementError {
            barrier: BarrierRef::linked(10, 4),
            reason: "level mismatch".into(),
        };
        assert_eq!(
            err.to_string(),
            "placement rejected on barrier #10/#4: level mismatch"
        );
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;
use wallhole_core::ElementId;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or querying barrier geometry
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid wall {id}: {reason}")]
    InvalidWall { id: ElementId, reason: String },

    #[error("Invalid ray: {0}")]
    InvalidRay(String),

    #[error("View {0} is a template and cannot be used for ray casting")]
    TemplateView(ElementId),

    #[error("Core error: {0}")]
    CoreError(#[from] wallhole_core::Error),
}

impl From<Error> for wallhole_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::CoreError(inner) => inner,
            Error::InvalidWall { .. } | Error::InvalidRay(_) => {
                wallhole_core::Error::InvalidArgument(err.to_string())
            }
            Error::TemplateView(_) => wallhole_core::Error::MissingCollaborator(err.to_string()),
        }
    }
}

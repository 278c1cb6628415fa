//! Errores del motor de clasificación.
//!
//! Solo `MalformedSchema` es fatal. Los otros dos se absorben por import:
//! `NotInSourceTree` significa que la regla no aplica y
//! `UnresolvableWildcardSegment` que la violación se reporta sin arreglo.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsdError {
    #[error("path '{path}' is outside the source root '{marker}'")]
    NotInSourceTree { path: String, marker: String },

    #[error("wildcard at position {position} has no concrete segment to substitute")]
    UnresolvableWildcardSegment { position: usize },

    #[error("malformed project structure at '{path}': {reason}")]
    MalformedSchema { path: String, reason: String },
}

impl FsdError {
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedSchema {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type FsdResult<T> = Result<T, FsdError>;

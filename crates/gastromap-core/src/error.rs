// crates/gastromap-core/src/error.rs

use crate::controller::Phase;
use thiserror::Error;

/// Errors produced while loading datasets or driving the map.
///
/// Dataset failures fall into two families: [`MapError::Fetch`] (the bytes
/// never arrived) and the parse family ([`MapError::Parse`],
/// [`MapError::InvalidFeature`]). Both halt the bootstrap sequence.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to fetch {path}: {reason}")]
    Fetch { path: String, reason: String },

    #[error("failed to parse {dataset}: {reason}")]
    Parse { dataset: String, reason: String },

    #[error("invalid feature #{index} in {dataset}: {reason}")]
    InvalidFeature {
        dataset: String,
        index: usize,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("bounds are not valid: {0}")]
    InvalidBounds(String),

    #[error("step requires phase {expected:?}, controller is in {found:?}")]
    OutOfOrder { expected: Phase, found: Phase },

    #[error("unknown category {0:?}")]
    UnknownCategory(String),

    #[error("renderer error: {0}")]
    Render(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl MapError {
    pub fn fetch(path: impl Into<String>, reason: impl ToString) -> Self {
        MapError::Fetch {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn parse(dataset: impl Into<String>, reason: impl ToString) -> Self {
        MapError::Parse {
            dataset: dataset.into(),
            reason: reason.to_string(),
        }
    }

    /// Network or transport failure (including missing files).
    pub fn is_fetch(&self) -> bool {
        matches!(self, MapError::Fetch { .. } | MapError::Io(_))
    }

    /// Malformed JSON, malformed GeoJSON or a feature that violates the typed record.
    pub fn is_parse(&self) -> bool {
        matches!(
            self,
            MapError::Parse { .. } | MapError::InvalidFeature { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, MapError>;

//! Error taxonomy for the ward prediction pipeline.
//!
//! [`DataLoadError`] covers the boundary dataset and is fatal to whichever
//! command needed the store. [`PredictionError`] covers everything that can
//! go wrong between a user interaction and a rendered result; all of its
//! variants are reported to the user and none of them abort the process.

use crate::geometry::GeometryError;

/// Errors raised while loading the ward boundary dataset.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The dataset file could not be opened or read.
    #[error("cannot read boundary dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The CSV structure is malformed or a required column is missing.
    #[error("malformed boundary dataset: {0}")]
    Csv(#[from] csv::Error),

    /// A row's geometry column failed to parse into a usable polygon.
    #[error("ward {ward}: {source}")]
    Geometry {
        ward: i64,
        #[source]
        source: GeometryError,
    },

    /// Two rows carry the same ward identifier.
    #[error("duplicate ward identifier {0} in boundary dataset")]
    Duplicate(i64),
}

/// Errors raised while turning a user selection into a rendered prediction.
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    /// A time-of-day label outside the fixed six-bucket set.
    #[error("unknown time bucket label {0:?}")]
    InvalidBucketLabel(String),

    /// The selection is missing a piece a prediction request needs.
    #[error("selection incomplete: {0}")]
    IncompleteSelection(&'static str),

    /// The request body could not be encoded as JSON.
    #[error("prediction request could not be encoded: {reason}")]
    Encode { reason: String },

    /// The prediction service answered with a non-success status.
    #[error("prediction service returned HTTP {status}")]
    Http { status: u16 },

    /// The prediction service could not be reached or timed out.
    #[error("prediction service unreachable: {cause}")]
    Network { cause: String },

    /// The prediction service answered 2xx but the body was unreadable.
    #[error("prediction service response could not be decoded: {reason}")]
    Decode { reason: String },
}

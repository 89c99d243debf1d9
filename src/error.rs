//! Error types for the import pipeline.
//!
//! Everything fatal funnels into [`ImportError`]; the binary wraps it in
//! `anyhow` at the boundary. Rejection of a candidate edge by the encoding
//! engine is not an error and never appears here.

use thiserror::Error;

/// Fatal conditions that abort an import run.
#[derive(Error, Debug)]
pub enum ImportError {
    /// A numeric attribute held non-numeric text.
    #[error("malformed numeric value {value:?} for attribute {key:?} in feature {feature_id}")]
    MalformedNumber {
        feature_id: i64,
        key: String,
        value: String,
    },

    /// A direction-of-travel attribute outside the recognized vocabulary.
    #[error("unrecognized oneway value {value:?} in feature {feature_id}")]
    UnrecognizedOneway { feature_id: i64, value: String },

    /// The junction detection pass finished without allocating a single node.
    /// The field is not named `source` so the derive does not treat it as an
    /// error cause.
    #[error("no usable geometry found in {origin}")]
    EmptyDataset { origin: String },

    /// The input file is not a GeoJSON FeatureCollection.
    #[error("invalid GeoJSON: {0}")]
    InvalidGeoJson(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Persist(#[from] bincode::Error),
}

/// Result type alias for import operations.
pub type Result<T> = std::result::Result<T, ImportError>;

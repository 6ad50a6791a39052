//! Error type used by the crate.

use thiserror::Error;

use crate::geometry::GeometryKind;
use crate::sr::Sr;

/// Result alias used throughout the crate.
pub type Result<T, E = ShapeError> = std::result::Result<T, E>;

/// Error enum.
#[derive(Debug, Error)]
pub enum ShapeError {
    /// The spatial reference has no resolvable projection.
    #[error("invalid spatial reference {sr}: {message}")]
    InvalidSr {
        /// Spatial reference that could not be resolved.
        sr: Sr,
        /// Human readable reason.
        message: String,
        /// Error reported by the projection engine, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Metric projection preference outside of the known set.
    #[error("unsupported metric projection: {0}")]
    UnsupportedMetricProjection(String),

    /// Unit conversion requested for a dimension other than 1, 2 or 3.
    #[error("invalid dimension {0}: dimension must be between 1 and 3")]
    InvalidDimension(i32),

    /// Exported data cannot be turned back into a geometry.
    #[error("malformed export data: {0}")]
    MalformedExport(String),

    /// Exported data is not valid JSON for the expected structure.
    #[error("malformed export data: {0}")]
    Json(#[from] serde_json::Error),

    /// Exported geometry mapping is not a valid geometry.
    #[error("malformed geometry mapping: {0}")]
    Mapping(#[from] geojson::Error),

    /// The projection engine could not map a coordinate.
    #[error("failed to project ({x}, {y}) from {from} to {to}")]
    ProjectionFailed {
        /// Source spatial reference.
        from: Sr,
        /// Target spatial reference.
        to: Sr,
        /// X coordinate in the source spatial reference.
        x: f64,
        /// Y coordinate in the source spatial reference.
        y: f64,
    },

    /// The operation needs a point, but the geometry is empty.
    #[error("geometry is empty")]
    EmptyGeometry,

    /// A geometry wrapper was given a geometry of another kind.
    #[error("expected {expected} geometry, got {actual}")]
    WrongGeometryKind {
        /// Kind the wrapper accepts.
        expected: GeometryKind,
        /// Kind it was given.
        actual: GeometryKind,
    },

    /// A CRS definition is already known for the spatial reference.
    #[error("spatial reference {0} already has a definition")]
    DefinitionConflict(Sr),
}

impl ShapeError {
    pub(crate) fn invalid_sr(sr: &Sr, message: impl Into<String>) -> Self {
        Self::InvalidSr {
            sr: sr.clone(),
            message: message.into(),
            source: None,
        }
    }
}

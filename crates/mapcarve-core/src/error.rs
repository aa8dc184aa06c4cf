//! Error handling for Mapcarve
//!
//! Provides error types for the two layers of the engine:
//! - Geometry errors (codec/boolean-operation related)
//! - Service errors (persistence collaborator)
//!
//! All error types use `thiserror` for ergonomic error handling.
//!
//! Degenerate boolean-operation results are deliberately *not* errors: the
//! engine absorbs them as empty regions so that a partial geometric failure
//! never blocks the rest of a cut/dissolve recompute.

use thiserror::Error;

/// Geometry error type
///
/// Represents errors raised at the geometry codec boundary, before any
/// planar math runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeomError {
    /// Input geometry is not a Point, LineString or Polygon
    #[error("Unsupported geometry kind: {found}")]
    UnsupportedGeometryKind {
        /// The kind that was rejected (e.g. "MultiPolygon", "GeometryCollection").
        found: String,
    },

    /// Coordinate outside the projectable domain
    #[error("Coordinate out of range: lon {lon}, lat {lat}")]
    CoordinateOutOfRange {
        /// Longitude in degrees.
        lon: f64,
        /// Latitude in degrees.
        lat: f64,
    },
}

/// Persistence service error type
///
/// Represents errors surfaced by the external geometry service. These
/// always reach the initiating caller; the overlay engine performs no
/// compensating local action because none was taken before the durable
/// write resolved.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// No record with the given id
    #[error("Record not found: {id}")]
    NotFound {
        /// The id that was looked up.
        id: i64,
    },

    /// Another record already uses this name
    #[error("Duplicate name: {name}")]
    DuplicateName {
        /// The conflicting name.
        name: String,
    },

    /// The service rejected the submitted geometry
    #[error("Invalid geometry: {reason}")]
    InvalidGeometry {
        /// Why the geometry was rejected.
        reason: String,
    },

    /// Network or storage failure
    #[error("Transport error: {reason}")]
    Transport {
        /// The underlying failure description.
        reason: String,
    },

    /// The in-flight call was cancelled before it resolved
    #[error("Persistence call cancelled")]
    Cancelled,
}

/// Main error type for Mapcarve
///
/// A unified error type covering both layers. This is the primary error
/// type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geom(#[from] GeomError),

    /// Persistence service error
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Service(ServiceError::NotFound { .. }))
    }

    /// Check if this is a duplicate-name error
    pub fn is_duplicate_name(&self) -> bool {
        matches!(self, Error::Service(ServiceError::DuplicateName { .. }))
    }

    /// Check if this is a persistence failure of any kind
    pub fn is_service_error(&self) -> bool {
        matches!(self, Error::Service(_))
    }

    /// Check if this is a geometry codec error
    pub fn is_geom_error(&self) -> bool {
        matches!(self, Error::Geom(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

//! Shape data model
//!
//! A [`Shape`] is the atomic unit tracked by the overlay engine. The model
//! follows an arena-with-parent pattern: exactly one shape per durable id
//! holds the true canonical (persisted) geometry, and every derived piece
//! produced by cutting carries a copy of that canonical geometry rather
//! than recomputing it from what is currently rendered.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a tracked shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeId {
    /// Assigned by the persistence service; stable, one per user-drawn shape.
    Durable(i64),
    /// One piece of a durable polygon that was split after being cut.
    Derived {
        /// Durable id of the parent polygon.
        parent: i64,
        /// Piece index within one recompute.
        index: usize,
    },
    /// A not-yet-persisted piece; never sent to storage.
    Transient(Uuid),
}

impl ShapeId {
    /// Fresh transient id.
    pub fn transient() -> Self {
        ShapeId::Transient(Uuid::new_v4())
    }

    /// The durable id this shape belongs to, if any.
    pub fn durable_parent(&self) -> Option<i64> {
        match self {
            ShapeId::Durable(id) => Some(*id),
            ShapeId::Derived { parent, .. } => Some(*parent),
            ShapeId::Transient(_) => None,
        }
    }
}

impl std::fmt::Display for ShapeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeId::Durable(id) => write!(f, "{id}"),
            ShapeId::Derived { parent, index } => write!(f, "{parent}#{index}"),
            ShapeId::Transient(u) => write!(f, "tmp#{u}"),
        }
    }
}

/// Shape kind. Only `Polygon` participates in overlay maintenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Point,
    Line,
    Polygon,
}

impl ShapeKind {
    /// Classify a GeoJSON geometry. Multi-variants map onto the same kind,
    /// mirroring the service's type filter; collections are unclassified.
    pub fn of_geojson(value: &geojson::Value) -> Option<ShapeKind> {
        use geojson::Value;
        match value {
            Value::Point(_) | Value::MultiPoint(_) => Some(ShapeKind::Point),
            Value::LineString(_) | Value::MultiLineString(_) => Some(ShapeKind::Line),
            Value::Polygon(_) | Value::MultiPolygon(_) => Some(ShapeKind::Polygon),
            Value::GeometryCollection(_) => None,
        }
    }

    /// Classify a planar geometry.
    pub fn of_planar(geometry: &geo_types::Geometry<f64>) -> Option<ShapeKind> {
        use geo_types::Geometry;
        match geometry {
            Geometry::Point(_) | Geometry::MultiPoint(_) => Some(ShapeKind::Point),
            Geometry::Line(_) | Geometry::LineString(_) | Geometry::MultiLineString(_) => {
                Some(ShapeKind::Line)
            }
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) | Geometry::Rect(_)
            | Geometry::Triangle(_) => Some(ShapeKind::Polygon),
            Geometry::GeometryCollection(_) => None,
        }
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ShapeKind::Point => "Point",
            ShapeKind::Line => "LineString",
            ShapeKind::Polygon => "Polygon",
        };
        f.write_str(s)
    }
}

/// A renderable shape: a durable record, a derived cut piece, or a
/// dissolve-overlay region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    /// `None` only for overlay-derived entries owned by the dissolve cache.
    pub id: Option<ShapeId>,
    pub kind: ShapeKind,
    /// Planar geometry currently shown. May be a strict subset of the
    /// originally drawn region (a cut remainder).
    pub rendered: geo_types::Geometry<f64>,
    /// Original geographic geometry exactly as persisted. Never mutated by
    /// cutting; absent on overlay-derived entries.
    pub canonical: Option<geojson::Geometry>,
    /// Display label, shared by all pieces of the same durable shape.
    pub name: String,
    /// True only for entries owned by the dissolve cache; never persisted,
    /// never selectable for edit.
    pub overlay_derived: bool,
}

impl Shape {
    /// A shape backed by a durable record, rendered in full or cut down to
    /// a single remaining piece.
    pub fn durable(
        id: i64,
        kind: ShapeKind,
        rendered: geo_types::Geometry<f64>,
        canonical: geojson::Geometry,
        name: impl Into<String>,
    ) -> Self {
        Shape {
            id: Some(ShapeId::Durable(id)),
            kind,
            rendered,
            canonical: Some(canonical),
            name: name.into(),
            overlay_derived: false,
        }
    }

    /// One piece of a durable polygon split after cutting. Shares the
    /// parent's canonical geometry and name.
    pub fn derived(
        parent: i64,
        index: usize,
        rendered: geo_types::Geometry<f64>,
        canonical: geojson::Geometry,
        name: impl Into<String>,
    ) -> Self {
        Shape {
            id: Some(ShapeId::Derived { parent, index }),
            kind: ShapeKind::Polygon,
            rendered,
            canonical: Some(canonical),
            name: name.into(),
            overlay_derived: false,
        }
    }

    /// A dissolve-overlay region. No id, no canonical geometry.
    pub fn overlay(rendered: geo_types::Geometry<f64>) -> Self {
        Shape {
            id: None,
            kind: ShapeKind::Polygon,
            rendered,
            canonical: None,
            name: String::new(),
            overlay_derived: true,
        }
    }

    /// Durable id this shape belongs to, if it has one.
    pub fn durable_parent(&self) -> Option<i64> {
        self.id.as_ref().and_then(ShapeId::durable_parent)
    }
}

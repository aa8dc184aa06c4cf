//! # Mapcarve
//!
//! A map geometry editing engine: named points, lines and polygons are
//! persisted through an external service while the polygon layer is kept
//! visually non-overlapping. Each newly inserted polygon cuts away the
//! overlapped area of the ones below it, a polygon that loses all of its
//! area disappears, and a dissolved border overlay hides the internal cut
//! seams.
//!
//! The engine is split across three member crates, re-exported here:
//!
//! - [`mapcarve_core`] — the shape model, error taxonomy and the
//!   persistence service trait (plus an in-memory implementation).
//! - [`mapcarve_geom`] — geographic/planar codec, precision
//!   normalization, fallback-chained boolean operations and piece
//!   splitting.
//! - [`mapcarve_overlay`] — the overlay maintainer with its insertion
//!   state machine, the shape store and the dissolve cache.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use geo_types::{polygon, Geometry};
//! use mapcarve::{MemoryGeometryService, OverlayMaintainer};
//!
//! # #[tokio::main]
//! # async fn main() -> mapcarve::Result<()> {
//! let mut engine = OverlayMaintainer::new(Arc::new(MemoryGeometryService::new()));
//! let outcome = engine
//!     .insert(
//!         "zone",
//!         Geometry::Polygon(polygon![
//!             (x: 0.0, y: 0.0),
//!             (x: 2.0, y: 0.0),
//!             (x: 2.0, y: 2.0),
//!             (x: 0.0, y: 2.0),
//!         ]),
//!     )
//!     .await?;
//! println!("inserted shape {}", outcome.id());
//! # Ok(())
//! # }
//! ```

pub use mapcarve_core::{
    Error, GeomError, GeometryListItem, GeometryRecord, GeometryService, MemoryGeometryService,
    PageQuery, PageResult, Result, ServiceError, Shape, ShapeId, ShapeKind, SortKey, TypeFilter,
};
pub use mapcarve_geom as geom;
pub use mapcarve_overlay::{
    DissolveCache, DurableEntry, InsertOutcome, InsertState, Insertion, OverlayMaintainer,
    RenderOutput, ShapeStore, VisibleKinds,
};

//! Persistence collaborator interface
//!
//! The overlay engine never talks to storage directly; it consumes this
//! trait. Everything crossing the boundary is the *canonical* geographic
//! geometry (GeoJSON, lon/lat), never a cut or derived piece.

use crate::error::ServiceError;
use crate::shape::ShapeKind;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A persisted geometry record as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryRecord {
    pub id: i64,
    pub name: String,
    /// Canonical geographic geometry (EPSG:4326).
    pub geometry: geojson::Geometry,
}

/// A row of the paged listing. Geometry bodies are omitted; the listing is
/// read-only and not part of the overlay engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeometryListItem {
    pub id: i64,
    pub name: String,
    pub kind: ShapeKind,
}

/// Sort key for the paged listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    NameAsc,
    NameDesc,
    IdAsc,
    #[default]
    IdDesc,
}

impl SortKey {
    /// Parse the wire form (`name_asc`, `name_desc`, `id_asc`, `id_desc`).
    /// Unknown keys fall back to the default, descending id.
    pub fn parse(s: &str) -> SortKey {
        match s.trim().to_ascii_lowercase().as_str() {
            "name_asc" => SortKey::NameAsc,
            "name_desc" => SortKey::NameDesc,
            "id_asc" => SortKey::IdAsc,
            _ => SortKey::IdDesc,
        }
    }
}

/// Kind filter for the paged listing. Multi-variants of a kind match the
/// same filter (a MultiPolygon record is listed under `Polygon`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TypeFilter {
    #[default]
    All,
    Point,
    Line,
    Polygon,
}

impl TypeFilter {
    pub fn matches(&self, kind: ShapeKind) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Point => kind == ShapeKind::Point,
            TypeFilter::Line => kind == ShapeKind::Line,
            TypeFilter::Polygon => kind == ShapeKind::Polygon,
        }
    }
}

/// Query parameters for paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: u32,
    pub page_size: u32,
    pub sort: SortKey,
    pub type_filter: TypeFilter,
}

impl Default for PageQuery {
    fn default() -> Self {
        PageQuery {
            page: 1,
            page_size: 10,
            sort: SortKey::default(),
            type_filter: TypeFilter::default(),
        }
    }
}

/// One page of results plus paging metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

/// External geometry persistence service.
///
/// Implementations are remote in production; [`crate::MemoryGeometryService`]
/// is the in-process reference used by tests and demos.
#[async_trait]
pub trait GeometryService: Send + Sync {
    /// Durably store a new named geometry. Returns the full record with
    /// its assigned id.
    async fn create(
        &self,
        name: &str,
        geometry: geojson::Geometry,
    ) -> Result<GeometryRecord, ServiceError>;

    /// Replace the name and geometry of an existing record.
    async fn update(
        &self,
        id: i64,
        name: &str,
        geometry: geojson::Geometry,
    ) -> Result<GeometryRecord, ServiceError>;

    /// Remove a record.
    async fn delete(&self, id: i64) -> Result<(), ServiceError>;

    /// Read-only paged listing with sorting and a kind filter.
    async fn list_paged(
        &self,
        query: PageQuery,
    ) -> Result<PageResult<GeometryListItem>, ServiceError>;
}

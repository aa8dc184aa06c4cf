//! In-memory geometry service for testing/demo scenarios
//!
//! Mirrors the behavior of the production service closely enough for the
//! overlay engine not to notice: sequential ids from 1, case-insensitive
//! duplicate-name detection, page size clamped to 1..=100.

use crate::error::ServiceError;
use crate::service::{
    GeometryListItem, GeometryRecord, GeometryService, PageQuery, PageResult, SortKey,
};
use crate::shape::ShapeKind;
use async_trait::async_trait;
use parking_lot::Mutex;

const MAX_PAGE_SIZE: u32 = 100;

#[derive(Default)]
struct Inner {
    records: Vec<GeometryRecord>,
    next_id: i64,
}

/// Thread-safe in-memory geometry store.
#[derive(Default)]
pub struct MemoryGeometryService {
    inner: Mutex<Inner>,
}

impl MemoryGeometryService {
    pub fn new() -> Self {
        MemoryGeometryService {
            inner: Mutex::new(Inner { records: Vec::new(), next_id: 1 }),
        }
    }

    /// Number of stored records (test helper).
    pub fn len(&self) -> usize {
        self.inner.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn classify(geometry: &geojson::Geometry) -> Result<ShapeKind, ServiceError> {
        ShapeKind::of_geojson(&geometry.value).ok_or_else(|| ServiceError::InvalidGeometry {
            reason: format!("unsupported geometry kind: {}", geometry.value.type_name()),
        })
    }
}

#[async_trait]
impl GeometryService for MemoryGeometryService {
    async fn create(
        &self,
        name: &str,
        geometry: geojson::Geometry,
    ) -> Result<GeometryRecord, ServiceError> {
        Self::classify(&geometry)?;
        if name.trim().is_empty() {
            return Err(ServiceError::InvalidGeometry {
                reason: "name must not be empty".to_string(),
            });
        }

        let mut inner = self.inner.lock();
        if inner
            .records
            .iter()
            .any(|r| r.name.eq_ignore_ascii_case(name))
        {
            return Err(ServiceError::DuplicateName { name: name.to_string() });
        }

        let id = inner.next_id;
        inner.next_id += 1;
        let record = GeometryRecord { id, name: name.to_string(), geometry };
        inner.records.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: i64,
        name: &str,
        geometry: geojson::Geometry,
    ) -> Result<GeometryRecord, ServiceError> {
        Self::classify(&geometry)?;

        let mut inner = self.inner.lock();
        if !inner.records.iter().any(|r| r.id == id) {
            return Err(ServiceError::NotFound { id });
        }
        if inner
            .records
            .iter()
            .any(|r| r.id != id && r.name.eq_ignore_ascii_case(name))
        {
            return Err(ServiceError::DuplicateName { name: name.to_string() });
        }

        match inner.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.name = name.to_string();
                record.geometry = geometry;
                Ok(record.clone())
            }
            None => Err(ServiceError::NotFound { id }),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let mut inner = self.inner.lock();
        let before = inner.records.len();
        inner.records.retain(|r| r.id != id);
        if inner.records.len() == before {
            return Err(ServiceError::NotFound { id });
        }
        Ok(())
    }

    async fn list_paged(
        &self,
        query: PageQuery,
    ) -> Result<PageResult<GeometryListItem>, ServiceError> {
        let page = query.page.max(1);
        let page_size = query.page_size.clamp(1, MAX_PAGE_SIZE);

        let inner = self.inner.lock();
        let mut rows: Vec<GeometryListItem> = inner
            .records
            .iter()
            .filter_map(|r| {
                let kind = ShapeKind::of_geojson(&r.geometry.value)?;
                query
                    .type_filter
                    .matches(kind)
                    .then(|| GeometryListItem { id: r.id, name: r.name.clone(), kind })
            })
            .collect();

        match query.sort {
            SortKey::NameAsc => rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id))),
            SortKey::NameDesc => rows.sort_by(|a, b| b.name.cmp(&a.name).then(a.id.cmp(&b.id))),
            SortKey::IdAsc => rows.sort_by_key(|r| r.id),
            SortKey::IdDesc => rows.sort_by_key(|r| std::cmp::Reverse(r.id)),
        }

        let total_items = rows.len() as u64;
        let total_pages = total_items.div_ceil(page_size as u64) as u32;
        // Offset in u64: a large page number must yield an empty page, not
        // overflow the u32 multiplication.
        let start = (page as u64 - 1).saturating_mul(page_size as u64) as usize;
        let items = rows
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .collect();

        Ok(PageResult { items, page, page_size, total_items, total_pages })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::TypeFilter;

    fn point(lon: f64, lat: f64) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::Point(vec![lon, lat]))
    }

    fn polygon() -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::Polygon(vec![vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 0.0],
        ]]))
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let svc = MemoryGeometryService::new();
        let a = svc.create("a", point(1.0, 2.0)).await.unwrap();
        let b = svc.create("b", point(3.0, 4.0)).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_case_insensitive() {
        let svc = MemoryGeometryService::new();
        svc.create("Harbor", point(0.0, 0.0)).await.unwrap();
        let err = svc.create("harbor", point(1.0, 1.0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateName { .. }));
    }

    #[tokio::test]
    async fn test_update_checks_id_and_name() {
        let svc = MemoryGeometryService::new();
        let a = svc.create("a", point(0.0, 0.0)).await.unwrap();
        svc.create("b", point(1.0, 1.0)).await.unwrap();

        let err = svc.update(99, "x", point(0.0, 0.0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { id: 99 }));

        let err = svc.update(a.id, "B", point(0.0, 0.0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateName { .. }));

        let updated = svc.update(a.id, "a2", point(5.0, 5.0)).await.unwrap();
        assert_eq!(updated.name, "a2");
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let svc = MemoryGeometryService::new();
        assert!(matches!(
            svc.delete(1).await.unwrap_err(),
            ServiceError::NotFound { id: 1 }
        ));
    }

    #[tokio::test]
    async fn test_huge_page_number_yields_empty_page() {
        let svc = MemoryGeometryService::new();
        svc.create("a", point(0.0, 0.0)).await.unwrap();

        let page = svc
            .list_paged(PageQuery {
                page: u32::MAX,
                page_size: 100,
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 1);
    }

    #[tokio::test]
    async fn test_paging_filter_and_sort() {
        let svc = MemoryGeometryService::new();
        svc.create("delta", point(0.0, 0.0)).await.unwrap();
        svc.create("alpha", polygon()).await.unwrap();
        svc.create("charlie", point(1.0, 1.0)).await.unwrap();

        // Default sort is id_desc.
        let page = svc.list_paged(PageQuery::default()).await.unwrap();
        assert_eq!(page.total_items, 3);
        assert_eq!(page.items[0].name, "charlie");

        let page = svc
            .list_paged(PageQuery {
                type_filter: TypeFilter::Polygon,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].name, "alpha");
        assert_eq!(page.items[0].kind, ShapeKind::Polygon);

        let page = svc
            .list_paged(PageQuery {
                sort: SortKey::NameAsc,
                page_size: 2,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].name, "alpha");
        assert_eq!(page.total_pages, 2);
    }
}

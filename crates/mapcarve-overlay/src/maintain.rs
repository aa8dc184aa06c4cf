//! Overlay maintainer
//!
//! Orchestrates insertion of a new polygon against the existing set:
//! persists the original uncut geometry, cuts overlapped siblings, removes
//! fully consumed ones, materializes remainder pieces and rebuilds the
//! dissolve overlay.
//!
//! Every insertion moves through an explicit state machine,
//! `Drafted → PersistPending → Cutting → Settled`, or
//! `Drafted → PersistFailed` with zero local mutation. Holding the cut
//! phase behind a successful durable write is what makes "no speculative
//! topology changes" a structural invariant instead of a convention.

use crate::dissolve::DissolveCache;
use crate::store::ShapeStore;
use crate::view::{RenderOutput, VisibleKinds};
use geo::{BoundingRect, Intersects};
use geo_types::{Geometry, MultiPolygon, Polygon};
use mapcarve_core::{
    Error, GeomError, GeometryRecord, GeometryService, Result, ServiceError, Shape, ShapeKind,
};
use mapcarve_geom::{boolops, codec, locate, precision, split};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Phase of one insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertState {
    /// Candidate exists only in the editor; nothing sent anywhere.
    Drafted,
    /// Submitted to the persistence collaborator; awaiting the durable id.
    PersistPending,
    /// Durable id assigned; cut/remainder computation may run.
    Cutting,
    /// All pieces materialized and the dissolve overlay rebuilt.
    Settled,
    /// The durable write failed or was cancelled. Terminal; the local
    /// shape set was not touched.
    PersistFailed,
}

/// Result of a settled insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Rendered with the given number of pieces.
    Added { id: i64, pieces: usize },
    /// The polygon is fully covered by pre-existing polygons: the durable
    /// record exists server-side but nothing is rendered. Informational,
    /// not an error.
    FullyCovered { id: i64 },
}

impl InsertOutcome {
    pub fn id(&self) -> i64 {
        match self {
            InsertOutcome::Added { id, .. } | InsertOutcome::FullyCovered { id } => *id,
        }
    }
}

fn kind_label(planar: &Geometry<f64>) -> &'static str {
    match planar {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

/// Drawn candidates must be exactly one of the three editable kinds;
/// multi-variants and collections never enter the engine.
fn strict_kind(planar: &Geometry<f64>) -> std::result::Result<ShapeKind, GeomError> {
    match planar {
        Geometry::Point(_) => Ok(ShapeKind::Point),
        Geometry::LineString(_) => Ok(ShapeKind::Line),
        Geometry::Polygon(_) => Ok(ShapeKind::Polygon),
        other => Err(GeomError::UnsupportedGeometryKind {
            found: kind_label(other).to_string(),
        }),
    }
}

/// One in-flight insertion.
///
/// The maintainer's [`OverlayMaintainer::insert`] drives the machine end to
/// end; the individual transitions are public so a caller scheduling its
/// own persistence (or a test) can step through states explicitly.
#[derive(Debug)]
pub struct Insertion {
    name: String,
    kind: ShapeKind,
    planar: Geometry<f64>,
    state: InsertState,
    record: Option<GeometryRecord>,
}

impl Insertion {
    /// Capture a drawn candidate. Rejects unsupported geometry kinds
    /// before anything is sent anywhere.
    pub fn draft(name: impl Into<String>, planar: Geometry<f64>) -> Result<Self> {
        let kind = strict_kind(&planar)?;
        Ok(Insertion {
            name: name.into(),
            kind,
            planar,
            state: InsertState::Drafted,
            record: None,
        })
    }

    pub fn state(&self) -> InsertState {
        self.state
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `Drafted → PersistPending`. Returns the payload for the service:
    /// always the original, uncut geographic geometry.
    pub fn begin_persist(&mut self) -> Result<geojson::Geometry> {
        self.expect(InsertState::Drafted, "begin_persist")?;
        let payload = codec::to_geographic(&self.planar)?;
        self.state = InsertState::PersistPending;
        Ok(payload)
    }

    /// `PersistPending → PersistFailed`. Terminal; cancellation of an
    /// in-flight call takes the same transition.
    pub fn persist_failed(&mut self) {
        self.state = InsertState::PersistFailed;
    }

    /// `PersistPending → Cutting`, carrying the assigned durable record.
    pub fn persist_succeeded(&mut self, record: GeometryRecord) -> Result<()> {
        self.expect(InsertState::PersistPending, "persist_succeeded")?;
        self.record = Some(record);
        self.state = InsertState::Cutting;
        Ok(())
    }

    fn expect(&self, want: InsertState, op: &str) -> Result<()> {
        if self.state != want {
            return Err(Error::other(format!(
                "invalid insertion state for {op}: {:?}",
                self.state
            )));
        }
        Ok(())
    }
}

/// The overlay engine. Owns the shape store and the dissolve cache and
/// serializes every mutation through its `&mut self` methods; the only
/// suspension point is the awaited persistence call, before any local
/// state is touched.
pub struct OverlayMaintainer {
    service: Arc<dyn GeometryService>,
    store: ShapeStore,
    dissolve: DissolveCache,
    visible: VisibleKinds,
    snap_tolerance: f64,
    precision_scale: f64,
}

impl OverlayMaintainer {
    pub fn new(service: Arc<dyn GeometryService>) -> Self {
        OverlayMaintainer {
            service,
            store: ShapeStore::new(),
            dissolve: DissolveCache::new(),
            visible: VisibleKinds::all(),
            snap_tolerance: 0.0,
            precision_scale: precision::DEFAULT_SCALE,
        }
    }

    /// Snap tolerance for boolean fallbacks, derived by the caller from
    /// the current map resolution (typically `2 × resolution`).
    pub fn set_snap_tolerance(&mut self, tol: f64) {
        self.snap_tolerance = tol.max(0.0);
    }

    pub fn snap_tolerance(&self) -> f64 {
        self.snap_tolerance
    }

    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    pub fn visible_kinds(&self) -> VisibleKinds {
        self.visible
    }

    /// Change kind visibility; the dissolve overlay follows immediately.
    pub fn set_visible_kinds(&mut self, visible: VisibleKinds) {
        self.visible = visible;
        self.rebuild_dissolve();
    }

    /// Insert a drawn candidate: persist the original geometry, then run
    /// the cut phase. On persistence failure the local shape set is
    /// untouched and the error surfaces to the caller.
    pub async fn insert(&mut self, name: &str, planar: Geometry<f64>) -> Result<InsertOutcome> {
        let mut insertion = Insertion::draft(name, planar)?;
        let payload = insertion.begin_persist()?;
        // Nothing local is mutated until this await resolves successfully;
        // dropping the future mid-flight leaves the shape set untouched.
        match self.service.create(name, payload).await {
            Ok(record) => insertion.persist_succeeded(record)?,
            Err(err) => {
                insertion.persist_failed();
                return Err(err.into());
            }
        }
        self.settle(&mut insertion)
    }

    /// Run the Cutting phase of an insertion whose durable write already
    /// succeeded, then rebuild the dissolve overlay. `Cutting → Settled`.
    pub fn settle(&mut self, insertion: &mut Insertion) -> Result<InsertOutcome> {
        insertion.expect(InsertState::Cutting, "settle")?;
        let record = match insertion.record.take() {
            Some(record) => record,
            None => return Err(Error::other("insertion record missing in Cutting state")),
        };

        self.store.begin_mutation();
        let outcome = match insertion.planar.clone() {
            Geometry::Polygon(p) => {
                self.store.insert_entry(&record, ShapeKind::Polygon);
                self.place_polygon(
                    record.id,
                    &record.name,
                    &record.geometry,
                    MultiPolygon::new(vec![p]),
                    true,
                )
            }
            planar => {
                self.store.insert_entry(&record, insertion.kind);
                self.store.push_piece(Shape::durable(
                    record.id,
                    insertion.kind,
                    planar,
                    record.geometry.clone(),
                    &record.name,
                ));
                InsertOutcome::Added { id: record.id, pieces: 1 }
            }
        };

        insertion.state = InsertState::Settled;
        self.rebuild_dissolve();
        if let InsertOutcome::FullyCovered { id } = outcome {
            info!(id, "new polygon adds no visible area");
        }
        Ok(outcome)
    }

    /// Apply an edited/moved geometry to a durable shape. The caller keeps
    /// its provisional visual state reversible until this returns Ok; on
    /// success the polygon overlay is fully recomputed with the edited
    /// geometry taking the shape's original insertion slot. Returns the
    /// number of pieces the shape renders with afterwards.
    pub async fn apply_edit(&mut self, id: i64, edited_planar: Geometry<f64>) -> Result<usize> {
        let entry = self
            .store
            .entry(id)
            .ok_or(ServiceError::NotFound { id })?
            .clone();
        let kind = strict_kind(&edited_planar)?;
        if kind != entry.kind {
            return Err(Error::other(format!(
                "edit cannot change shape kind from {} to {}",
                entry.kind, kind
            )));
        }

        let geographic = codec::to_geographic(&edited_planar)?;
        let record = self.service.update(id, &entry.name, geographic).await?;

        self.store.begin_mutation();
        self.store.set_canonical(id, record.geometry.clone());
        match kind {
            ShapeKind::Point | ShapeKind::Line => {
                self.store.remove_pieces_for(id);
                self.store.push_piece(Shape::durable(
                    id,
                    kind,
                    edited_planar,
                    record.geometry,
                    &record.name,
                ));
            }
            ShapeKind::Polygon => self.replay_polygons(),
        }
        self.rebuild_dissolve();
        Ok(self.store.pieces_for(id).count())
    }

    /// Rename a durable shape; the new name propagates to all pieces after
    /// the persisted update succeeds.
    pub async fn rename(&mut self, id: i64, new_name: &str) -> Result<()> {
        let entry = self
            .store
            .entry(id)
            .ok_or(ServiceError::NotFound { id })?
            .clone();
        let record = self
            .service
            .update(id, new_name, entry.canonical.clone())
            .await?;
        self.store.rename(id, &record.name);
        Ok(())
    }

    /// Delete a durable shape and recompute everything it touched.
    pub async fn delete(&mut self, id: i64) -> Result<()> {
        self.service.delete(id).await?;
        self.store.begin_mutation();
        if let Some(entry) = self.store.remove_entry(id) {
            if entry.kind == ShapeKind::Polygon {
                self.replay_polygons();
            }
            self.rebuild_dissolve();
        }
        Ok(())
    }

    /// Snapshot for the rendering surface: visible pieces plus the
    /// dissolved border regions.
    pub fn render_output(&self) -> RenderOutput {
        RenderOutput {
            pieces: self
                .store
                .pieces()
                .iter()
                .filter(|p| self.visible.contains(p.kind))
                .cloned()
                .collect(),
            dissolved: self.dissolve.shapes(),
        }
    }

    pub fn dissolved_regions(&self) -> &[Polygon<f64>] {
        self.dissolve.regions()
    }

    /// Point shapes lying inside the rendered region of the given polygon
    /// (outer-ring containment). Empty when points are filtered out.
    pub fn points_inside(&self, polygon_id: i64) -> Vec<(i64, String)> {
        if !self.visible.point {
            return Vec::new();
        }
        let region = self.store.rendered_region(polygon_id);
        if region.0.is_empty() {
            return Vec::new();
        }
        let region = Geometry::MultiPolygon(region);
        self.store
            .pieces()
            .iter()
            .filter(|p| p.kind == ShapeKind::Point)
            .filter_map(|p| {
                let Geometry::Point(pt) = &p.rendered else {
                    return None;
                };
                if locate::point_in_planar_polygon(pt.0, &region) {
                    Some((p.durable_parent()?, p.name.clone()))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Place a polygon candidate against the current set: fully-covered
    /// check first (against the pre-cut rendered set), then cut the
    /// overlapped siblings, then materialize the candidate's remainder
    /// against the post-cut survivors.
    ///
    /// `discard_consumed` distinguishes a live insertion (consumed siblings
    /// move to the audit buffer and are untracked) from a replay, where a
    /// covered polygon merely renders zero pieces and stays tracked.
    fn place_polygon(
        &mut self,
        id: i64,
        name: &str,
        canonical: &geojson::Geometry,
        candidate: MultiPolygon<f64>,
        discard_consumed: bool,
    ) -> InsertOutcome {
        let snap = self.snap_tolerance;
        let candidate = precision::normalize(&candidate, self.precision_scale);
        if candidate.0.is_empty() {
            warn!(id, "candidate polygon is degenerate after normalization");
            self.store.set_polygon_pieces(id, name, canonical, vec![]);
            return InsertOutcome::FullyCovered { id };
        }

        let others: Vec<i64> = self
            .store
            .polygon_entries()
            .iter()
            .filter(|e| e.id != id)
            .map(|e| e.id)
            .collect();

        // Fully covered by the pre-cut set: render nothing, touch nothing.
        let mut probe = candidate.clone();
        for &other in &others {
            if probe.0.is_empty() {
                break;
            }
            let region = self.store.rendered_region(other);
            if region.0.is_empty() {
                continue;
            }
            probe = boolops::difference(&probe, &region, snap);
        }
        if probe.0.is_empty() {
            self.store.set_polygon_pieces(id, name, canonical, vec![]);
            return InsertOutcome::FullyCovered { id };
        }

        // Cut every existing polygon whose planar extent meets the candidate.
        let candidate_rect = candidate.bounding_rect();
        for &other in &others {
            let region = self.store.rendered_region(other);
            if region.0.is_empty() {
                continue;
            }
            let extents_touch = match (candidate_rect, region.bounding_rect()) {
                (Some(a), Some(b)) => a.intersects(&b),
                _ => false,
            };
            if !extents_touch {
                continue;
            }

            let cut = boolops::difference(&region, &candidate, snap);
            if cut.0.is_empty() {
                debug!(id = other, "existing polygon fully consumed");
                if discard_consumed {
                    self.store.consume_entry(other);
                } else if let Some(entry) = self.store.entry(other).cloned() {
                    self.store
                        .set_polygon_pieces(other, &entry.name, &entry.canonical, vec![]);
                }
            } else if let Some(entry) = self.store.entry(other).cloned() {
                self.store.set_polygon_pieces(
                    other,
                    &entry.name,
                    &entry.canonical,
                    split::split(cut),
                );
            }
        }

        // Remainder against the post-cut survivors; each step engages the
        // boolean fallback chain independently.
        let mut remainder = candidate;
        for &other in &others {
            if remainder.0.is_empty() {
                break;
            }
            let region = self.store.rendered_region(other);
            if region.0.is_empty() {
                continue;
            }
            remainder = boolops::difference(&remainder, &region, snap);
        }

        if remainder.0.is_empty() {
            self.store.set_polygon_pieces(id, name, canonical, vec![]);
            return InsertOutcome::FullyCovered { id };
        }
        let pieces = split::split(remainder);
        let count = pieces.len();
        self.store.set_polygon_pieces(id, name, canonical, pieces);
        InsertOutcome::Added { id, pieces: count }
    }

    /// Full recompute of the polygon overlay: every durable polygon's
    /// canonical geometry is re-placed in original insertion-sequence
    /// order through the same covered/cut/remainder routine. Never
    /// incremental, so edits cannot introduce order-dependent drift.
    fn replay_polygons(&mut self) {
        let entries = self.store.polygon_entries();
        self.store.clear_polygon_pieces();
        for entry in entries {
            match codec::to_planar(&entry.canonical) {
                Ok(Geometry::Polygon(p)) => {
                    self.place_polygon(
                        entry.id,
                        &entry.name,
                        &entry.canonical,
                        MultiPolygon::new(vec![p]),
                        false,
                    );
                }
                _ => warn!(id = entry.id, "canonical geometry is not polygonal; skipped"),
            }
        }
    }

    fn rebuild_dissolve(&mut self) {
        if !self.visible.polygon {
            self.dissolve.clear();
            return;
        }
        let regions: Vec<MultiPolygon<f64>> = self
            .store
            .pieces()
            .iter()
            .filter(|p| p.kind == ShapeKind::Polygon && !p.overlay_derived)
            .filter_map(|p| match &p.rendered {
                Geometry::Polygon(q) => Some(MultiPolygon::new(vec![q.clone()])),
                Geometry::MultiPolygon(mp) => Some(mp.clone()),
                _ => None,
            })
            .collect();
        self.dissolve.rebuild(regions);
    }
}

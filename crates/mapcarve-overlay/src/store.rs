//! Shape store
//!
//! Holds the durable records the engine tracks (one canonical geometry per
//! durable id, in insertion-sequence order) and the rendered pieces derived
//! from them. The store is pure state; all geometry math lives in the
//! maintainer.

use geo_types::{Geometry, MultiPolygon, Polygon};
use mapcarve_core::{GeometryRecord, Shape, ShapeKind};

/// One tracked durable record. The canonical geometry here is the single
/// source of truth for the record; derived pieces carry copies.
#[derive(Debug, Clone)]
pub struct DurableEntry {
    pub id: i64,
    pub name: String,
    pub kind: ShapeKind,
    /// Canonical geographic geometry exactly as persisted.
    pub canonical: geojson::Geometry,
    /// Insertion sequence; later entries cut earlier ones. Stable across
    /// edits so that recomputes preserve insertion order.
    pub seq: u64,
}

/// In-memory shape collection: durable entries plus rendered pieces.
#[derive(Default)]
pub struct ShapeStore {
    entries: Vec<DurableEntry>,
    pieces: Vec<Shape>,
    /// Entries fully consumed by the most recent insertion, kept around
    /// transiently for audit/undo and drained when the next mutation begins.
    consumed: Vec<DurableEntry>,
    next_seq: u64,
}

impl ShapeStore {
    pub fn new() -> Self {
        ShapeStore::default()
    }

    /// Opens a new mutation: the previous undo window closes and its
    /// consumed canonicals are discarded.
    pub fn begin_mutation(&mut self) {
        self.consumed.clear();
    }

    /// Track a freshly persisted record. Returns its sequence number.
    pub fn insert_entry(&mut self, record: &GeometryRecord, kind: ShapeKind) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(DurableEntry {
            id: record.id,
            name: record.name.clone(),
            kind,
            canonical: record.geometry.clone(),
            seq,
        });
        seq
    }

    pub fn entry(&self, id: i64) -> Option<&DurableEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Untrack an entry (deletion). Its pieces are removed as well.
    pub fn remove_entry(&mut self, id: i64) -> Option<DurableEntry> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        self.remove_pieces_for(id);
        Some(self.entries.remove(idx))
    }

    /// Move a fully consumed entry into the transient audit buffer and drop
    /// its pieces from the render set.
    pub fn consume_entry(&mut self, id: i64) {
        if let Some(entry) = self.remove_entry(id) {
            self.consumed.push(entry);
        }
    }

    /// Entries fully consumed by the insertion currently being settled.
    pub fn recently_consumed(&self) -> &[DurableEntry] {
        &self.consumed
    }

    /// Propagate a rename to the entry and all of its pieces.
    pub fn rename(&mut self, id: i64, name: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.name = name.to_string();
        }
        for piece in self.pieces.iter_mut() {
            if piece.durable_parent() == Some(id) {
                piece.name = name.to_string();
            }
        }
    }

    /// Replace the canonical geometry of an entry (after a successful
    /// persisted update).
    pub fn set_canonical(&mut self, id: i64, canonical: geojson::Geometry) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.canonical = canonical;
        }
    }

    /// Durable polygon entries in insertion-sequence order.
    pub fn polygon_entries(&self) -> Vec<DurableEntry> {
        let mut out: Vec<DurableEntry> = self
            .entries
            .iter()
            .filter(|e| e.kind == ShapeKind::Polygon)
            .cloned()
            .collect();
        out.sort_by_key(|e| e.seq);
        out
    }

    pub fn pieces(&self) -> &[Shape] {
        &self.pieces
    }

    pub fn pieces_for(&self, id: i64) -> impl Iterator<Item = &Shape> {
        self.pieces
            .iter()
            .filter(move |p| p.durable_parent() == Some(id))
    }

    /// The rendered polygonal region of a durable id: all of its pieces
    /// collected into one MultiPolygon. Empty when nothing is rendered.
    pub fn rendered_region(&self, id: i64) -> MultiPolygon<f64> {
        let mut polys: Vec<Polygon<f64>> = Vec::new();
        for piece in self.pieces_for(id) {
            match &piece.rendered {
                Geometry::Polygon(p) => polys.push(p.clone()),
                Geometry::MultiPolygon(mp) => polys.extend(mp.0.iter().cloned()),
                _ => {}
            }
        }
        MultiPolygon::new(polys)
    }

    pub fn remove_pieces_for(&mut self, id: i64) {
        self.pieces.retain(|p| p.durable_parent() != Some(id));
    }

    /// Drop every polygon piece (start of a full recompute).
    pub fn clear_polygon_pieces(&mut self) {
        self.pieces.retain(|p| p.kind != ShapeKind::Polygon);
    }

    pub fn push_piece(&mut self, piece: Shape) {
        self.pieces.push(piece);
    }

    /// Replace the rendered pieces of a durable polygon. A single piece
    /// keeps the plain durable id; several pieces get fresh piece indices,
    /// all sharing the parent id, canonical geometry and name.
    pub fn set_polygon_pieces(
        &mut self,
        id: i64,
        name: &str,
        canonical: &geojson::Geometry,
        pieces: Vec<Polygon<f64>>,
    ) {
        self.remove_pieces_for(id);
        if let [p] = &pieces[..] {
            self.pieces.push(Shape::durable(
                id,
                ShapeKind::Polygon,
                Geometry::Polygon(p.clone()),
                canonical.clone(),
                name,
            ));
        } else {
            for (index, p) in pieces.into_iter().enumerate() {
                self.pieces.push(Shape::derived(
                    id,
                    index,
                    Geometry::Polygon(p),
                    canonical.clone(),
                    name,
                ));
            }
        }
    }
}

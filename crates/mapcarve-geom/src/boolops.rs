//! Robust planar boolean operations
//!
//! `difference` and `union` over polygonal regions, with a layered fallback
//! strategy for numerically unstable inputs:
//!
//! 1. direct computation on the raw operands;
//! 2. snap-tolerant computation: vertices of the operands within a
//!    caller-supplied tolerance are coincided first (robustness against
//!    near-miss shared edges);
//! 3. precision-reduced computation: both operands are normalized, then the
//!    operation is retried.
//!
//! If all three tiers fail the operation yields the empty region — the
//! caller treats that as degenerate, never as a fatal error. Output
//! components thinner than the working tolerance are treated as empty:
//! "empty" wins over "degenerate sliver".

use crate::precision::{normalize, DEFAULT_SCALE};
use geo::{Area, BooleanOps, MapCoords, Validation};
use geo_types::{Coord, MultiPolygon};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, warn};

/// Working area tolerance in planar units²; output polygons at or below
/// this area are slivers and are dropped.
pub const SLIVER_AREA: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoolOp {
    Difference,
    Union,
}

impl BoolOp {
    fn name(self) -> &'static str {
        match self {
            BoolOp::Difference => "difference",
            BoolOp::Union => "union",
        }
    }
}

/// `a − b` with the full fallback chain.
pub fn difference(
    a: &MultiPolygon<f64>,
    b: &MultiPolygon<f64>,
    snap_tol: f64,
) -> MultiPolygon<f64> {
    run(BoolOp::Difference, a, b, snap_tol)
}

/// `a ∪ b` with the full fallback chain.
pub fn union(
    a: &MultiPolygon<f64>,
    b: &MultiPolygon<f64>,
    snap_tol: f64,
) -> MultiPolygon<f64> {
    run(BoolOp::Union, a, b, snap_tol)
}

fn run(
    op: BoolOp,
    a: &MultiPolygon<f64>,
    b: &MultiPolygon<f64>,
    snap_tol: f64,
) -> MultiPolygon<f64> {
    if let Some(out) = attempt(op, a, b) {
        return prune_slivers(out);
    }

    if snap_tol > 0.0 {
        debug!(op = op.name(), snap_tol, "direct computation failed, snapping operands");
        let snapped = snap_onto(b, a, snap_tol);
        if let Some(out) = attempt(op, a, &snapped) {
            return prune_slivers(out);
        }
    }

    debug!(op = op.name(), "retrying with reduced precision");
    let ra = normalize(a, DEFAULT_SCALE);
    let rb = normalize(b, DEFAULT_SCALE);
    if let Some(out) = attempt(op, &ra, &rb) {
        return prune_slivers(out);
    }

    warn!(op = op.name(), "all fallbacks failed, treating result as empty");
    MultiPolygon::new(vec![])
}

/// One isolated attempt: the backend may panic on degenerate input, and an
/// invalid result counts as a failure so the next tier engages.
fn attempt(op: BoolOp, a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> Option<MultiPolygon<f64>> {
    let out = catch_unwind(AssertUnwindSafe(|| match op {
        BoolOp::Difference => a.difference(b),
        BoolOp::Union => a.union(b),
    }))
    .ok()?;
    out.is_valid().then_some(out)
}

/// Moves every vertex of `subject` onto the nearest vertex of `target`
/// that lies within `tol`, coinciding near-identical vertices before the
/// operation runs.
fn snap_onto(
    subject: &MultiPolygon<f64>,
    target: &MultiPolygon<f64>,
    tol: f64,
) -> MultiPolygon<f64> {
    let anchors: Vec<Coord<f64>> = target
        .0
        .iter()
        .flat_map(|p| {
            p.exterior()
                .0
                .iter()
                .chain(p.interiors().iter().flat_map(|r| r.0.iter()))
                .copied()
        })
        .collect();
    let tol2 = tol * tol;

    subject.map_coords(|c| {
        let mut best: Option<(f64, Coord<f64>)> = None;
        for &a in &anchors {
            let dx = a.x - c.x;
            let dy = a.y - c.y;
            let d2 = dx * dx + dy * dy;
            if d2 <= tol2 && best.map_or(true, |(bd, _)| d2 < bd) {
                best = Some((d2, a));
            }
        }
        best.map_or(c, |(_, a)| a)
    })
}

fn prune_slivers(out: MultiPolygon<f64>) -> MultiPolygon<f64> {
    MultiPolygon::new(
        out.0
            .into_iter()
            .filter(|p| p.unsigned_area() > SLIVER_AREA)
            .collect(),
    )
}

//! Precision normalization
//!
//! Pre-processing applied before boolean operations: every coordinate is
//! rounded to a fixed decimal scale, and if the rounded region is no longer
//! simple it is repaired with a zero-distance dilation (a self-union through
//! the boolean backend). Never fails: irreparable input collapses to the
//! empty region and is treated as degenerate downstream.

use geo::{BooleanOps, Validation};
use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::warn;

/// Default rounding scale: 1e6 steps per planar unit (~1e-6 precision).
pub const DEFAULT_SCALE: f64 = 1e6;

fn round_coord(c: Coord<f64>, scale: f64) -> Coord<f64> {
    Coord {
        x: (c.x * scale).round() / scale,
        y: (c.y * scale).round() / scale,
    }
}

/// Rounds a ring and removes the consecutive duplicates that rounding can
/// introduce. Returns `None` when fewer than three distinct vertices are
/// left (the ring has collapsed).
fn round_ring(ring: &LineString<f64>, scale: f64) -> Option<LineString<f64>> {
    let mut coords: Vec<Coord<f64>> = Vec::with_capacity(ring.0.len());
    for &c in &ring.0 {
        let r = round_coord(c, scale);
        if coords.last() != Some(&r) {
            coords.push(r);
        }
    }
    // Drop the closing duplicate before counting distinct vertices.
    if coords.len() > 1 && coords.first() == coords.last() {
        coords.pop();
    }
    if coords.len() < 3 {
        return None;
    }
    Some(LineString::from(coords))
}

fn round_polygon(poly: &Polygon<f64>, scale: f64) -> Option<Polygon<f64>> {
    let exterior = round_ring(poly.exterior(), scale)?;
    let interiors = poly
        .interiors()
        .iter()
        .filter_map(|r| round_ring(r, scale))
        .collect();
    Some(Polygon::new(exterior, interiors))
}

/// Round every coordinate of `region` to `scale` and repair minor
/// self-intersections the rounding may have produced.
pub fn normalize(region: &MultiPolygon<f64>, scale: f64) -> MultiPolygon<f64> {
    let rounded = MultiPolygon::new(
        region
            .0
            .iter()
            .filter_map(|p| round_polygon(p, scale))
            .collect(),
    );
    if rounded.0.is_empty() || rounded.is_valid() {
        return rounded;
    }
    repair(&rounded)
}

/// Zero-distance dilation analogue: pass the region through the boolean
/// backend by unioning it with the empty region, which re-nodes rings and
/// resolves self-intersections without materially changing area.
fn repair(region: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    let repaired = catch_unwind(AssertUnwindSafe(|| {
        region.union(&MultiPolygon::<f64>::new(vec![]))
    }));
    match repaired {
        Ok(out) if out.is_valid() => out,
        _ => {
            warn!("precision repair failed; dropping region as degenerate");
            MultiPolygon::new(vec![])
        }
    }
}

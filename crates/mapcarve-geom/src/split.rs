//! Piece splitting
//!
//! Decomposes a (possibly multi-part) boolean-operation result into
//! single-polygon pieces. Output order is whatever the boolean backend
//! produced; nothing may depend on it for correctness, only for assigning
//! deterministic piece indices within one recompute.

use geo_types::{MultiPolygon, Polygon};

/// Split a polygonal result into one entry per connected component. Empty
/// input yields an empty list.
pub fn split(region: MultiPolygon<f64>) -> Vec<Polygon<f64>> {
    region
        .0
        .into_iter()
        .filter(|p| !p.exterior().0.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{polygon, LineString};

    #[test]
    fn test_empty_yields_empty() {
        assert!(split(MultiPolygon::new(vec![])).is_empty());
    }

    #[test]
    fn test_single_polygon_yields_one_piece() {
        let p = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)];
        assert_eq!(split(MultiPolygon::new(vec![p])).len(), 1);
    }

    #[test]
    fn test_multi_part_yields_one_piece_per_component() {
        let a = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)];
        let b = polygon![(x: 5.0, y: 5.0), (x: 6.0, y: 5.0), (x: 6.0, y: 6.0)];
        let pieces = split(MultiPolygon::new(vec![a, b]));
        assert_eq!(pieces.len(), 2);
    }

    #[test]
    fn test_degenerate_component_is_dropped() {
        let empty = Polygon::new(LineString::new(vec![]), vec![]);
        let real = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)];
        let pieces = split(MultiPolygon::new(vec![empty, real]));
        assert_eq!(pieces.len(), 1);
    }
}

//! Point-in-polygon location
//!
//! Ray-casting test against polygon outer rings, used to list the point
//! shapes lying inside a selected polygon. Interior rings are deliberately
//! ignored: a point inside a cut-out hole still belongs to the selected
//! polygon for listing purposes.

use geo_types::{Coord, Geometry, LineString};

/// Ray-casting test: is `pt` inside the ring?
pub fn point_in_ring(pt: Coord<f64>, ring: &LineString<f64>) -> bool {
    let coords = &ring.0;
    if coords.is_empty() {
        return false;
    }
    let mut inside = false;
    let mut j = coords.len() - 1;
    for i in 0..coords.len() {
        let (xi, yi) = (coords[i].x, coords[i].y);
        let (xj, yj) = (coords[j].x, coords[j].y);
        let straddles = (yi > pt.y) != (yj > pt.y);
        let dy = if (yj - yi).abs() < f64::EPSILON { 1e-12 } else { yj - yi };
        let x_cross = (xj - xi) * (pt.y - yi) / dy + xi;
        if straddles && pt.x < x_cross {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Outer-ring containment test for planar Polygon/MultiPolygon geometry.
/// Non-polygonal geometry is never "inside".
pub fn point_in_planar_polygon(pt: Coord<f64>, geometry: &Geometry<f64>) -> bool {
    match geometry {
        Geometry::Polygon(p) => point_in_ring(pt, p.exterior()),
        Geometry::MultiPolygon(mp) => mp.0.iter().any(|p| point_in_ring(pt, p.exterior())),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::polygon;

    #[test]
    fn test_point_in_square() {
        let sq = polygon![(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 4.0)];
        assert!(point_in_ring(Coord { x: 2.0, y: 2.0 }, sq.exterior()));
        assert!(!point_in_ring(Coord { x: 5.0, y: 2.0 }, sq.exterior()));
        assert!(!point_in_ring(Coord { x: -1.0, y: -1.0 }, sq.exterior()));
    }

    #[test]
    fn test_holes_are_ignored() {
        let annulus = geo_types::Polygon::new(
            LineString::from(vec![
                Coord { x: 0.0, y: 0.0 },
                Coord { x: 10.0, y: 0.0 },
                Coord { x: 10.0, y: 10.0 },
                Coord { x: 0.0, y: 10.0 },
                Coord { x: 0.0, y: 0.0 },
            ]),
            vec![LineString::from(vec![
                Coord { x: 4.0, y: 4.0 },
                Coord { x: 6.0, y: 4.0 },
                Coord { x: 6.0, y: 6.0 },
                Coord { x: 4.0, y: 6.0 },
                Coord { x: 4.0, y: 4.0 },
            ])],
        );
        let g = Geometry::Polygon(annulus);
        // Center lies in the hole but within the outer ring.
        assert!(point_in_planar_polygon(Coord { x: 5.0, y: 5.0 }, &g));
    }

    #[test]
    fn test_non_polygon_is_never_inside() {
        let g = Geometry::Point(geo_types::Point::new(0.0, 0.0));
        assert!(!point_in_planar_polygon(Coord { x: 0.0, y: 0.0 }, &g));
    }
}

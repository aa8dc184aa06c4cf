//! Geographic ↔ planar geometry codec
//!
//! Converts between the persisted GeoJSON representation (lon/lat,
//! EPSG:4326) and the planar working representation used for area and
//! boolean math (web-mercator meters). The round trip is lossless up to
//! the precision normalizer's tolerance.
//!
//! Only Point, LineString and Polygon are supported; everything else,
//! including collections at the top level, is rejected before it can reach
//! the engine.

use crate::mercator;
use geo_types::{Coord, Geometry, LineString, Point, Polygon};
use mapcarve_core::GeomError;

fn project_position(pos: &[f64]) -> Result<Coord<f64>, GeomError> {
    if pos.len() < 2 || !pos[0].is_finite() || !pos[1].is_finite() {
        return Err(GeomError::CoordinateOutOfRange {
            lon: pos.first().copied().unwrap_or(f64::NAN),
            lat: pos.get(1).copied().unwrap_or(f64::NAN),
        });
    }
    Ok(mercator::project(pos[0], pos[1]))
}

fn project_ring(ring: &[Vec<f64>]) -> Result<LineString<f64>, GeomError> {
    ring.iter()
        .map(|p| project_position(p))
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::from)
}

/// Convert a persisted GeoJSON geometry into the planar working
/// representation.
pub fn to_planar(geographic: &geojson::Geometry) -> Result<Geometry<f64>, GeomError> {
    use geojson::Value;
    match &geographic.value {
        Value::Point(pos) => Ok(Geometry::Point(Point(project_position(pos)?))),
        Value::LineString(line) => Ok(Geometry::LineString(project_ring(line)?)),
        Value::Polygon(rings) => {
            let mut projected = rings
                .iter()
                .map(|r| project_ring(r))
                .collect::<Result<Vec<_>, _>>()?;
            if projected.is_empty() {
                return Ok(Geometry::Polygon(Polygon::new(LineString::new(vec![]), vec![])));
            }
            let exterior = projected.remove(0);
            Ok(Geometry::Polygon(Polygon::new(exterior, projected)))
        }
        other => Err(GeomError::UnsupportedGeometryKind {
            found: other.type_name().to_string(),
        }),
    }
}

fn unproject_ring(line: &LineString<f64>) -> Vec<Vec<f64>> {
    line.coords()
        .map(|c| {
            let (lon, lat) = mercator::unproject(*c);
            vec![lon, lat]
        })
        .collect()
}

/// Convert a planar geometry back to persisted GeoJSON form.
pub fn to_geographic(planar: &Geometry<f64>) -> Result<geojson::Geometry, GeomError> {
    use geojson::Value;
    let value = match planar {
        Geometry::Point(p) => {
            let (lon, lat) = mercator::unproject(p.0);
            Value::Point(vec![lon, lat])
        }
        Geometry::LineString(line) => Value::LineString(unproject_ring(line)),
        Geometry::Polygon(poly) => {
            let mut rings = vec![unproject_ring(poly.exterior())];
            rings.extend(poly.interiors().iter().map(unproject_ring));
            Value::Polygon(rings)
        }
        other => {
            return Err(GeomError::UnsupportedGeometryKind {
                found: planar_kind_name(other).to_string(),
            })
        }
    };
    Ok(geojson::Geometry::new(value))
}

fn planar_kind_name(g: &Geometry<f64>) -> &'static str {
    match g {
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

/// Human-readable "lat, lon" labels at 5 decimals for a geographic
/// geometry: one per point, vertex, or outer-ring vertex.
pub fn lat_lon_labels(geographic: &geojson::Geometry) -> Vec<String> {
    use geojson::Value;
    let fmt = |p: &Vec<f64>| -> Option<String> {
        let lon = *p.first()?;
        let lat = *p.get(1)?;
        Some(format!("{lat:.5}, {lon:.5}"))
    };
    match &geographic.value {
        Value::Point(p) => fmt(p).into_iter().collect(),
        Value::LineString(line) => line.iter().filter_map(fmt).collect(),
        Value::Polygon(rings) => rings
            .first()
            .map(|outer| outer.iter().filter_map(fmt).collect())
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_4326() -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::Polygon(vec![vec![
            vec![29.0, 41.0],
            vec![29.1, 41.0],
            vec![29.1, 41.1],
            vec![29.0, 41.1],
            vec![29.0, 41.0],
        ]]))
    }

    #[test]
    fn test_polygon_round_trip() {
        let geographic = square_4326();
        let planar = to_planar(&geographic).unwrap();
        let back = to_geographic(&planar).unwrap();
        let (orig, restored) = match (&geographic.value, &back.value) {
            (geojson::Value::Polygon(a), geojson::Value::Polygon(b)) => (a, b),
            _ => panic!("expected polygons"),
        };
        for (pa, pb) in orig[0].iter().zip(&restored[0]) {
            assert!((pa[0] - pb[0]).abs() < 1e-9);
            assert!((pa[1] - pb[1]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rejects_collections_and_multis() {
        let mp = geojson::Geometry::new(geojson::Value::MultiPolygon(vec![]));
        let err = to_planar(&mp).unwrap_err();
        assert_eq!(
            err,
            GeomError::UnsupportedGeometryKind { found: "MultiPolygon".to_string() }
        );

        let gc = geojson::Geometry::new(geojson::Value::GeometryCollection(vec![]));
        assert!(matches!(
            to_planar(&gc),
            Err(GeomError::UnsupportedGeometryKind { .. })
        ));
    }

    #[test]
    fn test_rejects_planar_multipolygon() {
        let mp = Geometry::MultiPolygon(geo_types::MultiPolygon::new(vec![]));
        assert!(matches!(
            to_geographic(&mp),
            Err(GeomError::UnsupportedGeometryKind { .. })
        ));
    }

    #[test]
    fn test_wire_geojson_parses_into_planar() {
        let geographic: geojson::Geometry = serde_json::from_str(
            r#"{"type":"Polygon","coordinates":[[[29.0,41.0],[29.1,41.0],[29.1,41.1],[29.0,41.1],[29.0,41.0]]]}"#,
        )
        .unwrap();
        let planar = to_planar(&geographic).unwrap();
        assert!(matches!(planar, Geometry::Polygon(_)));
    }

    #[test]
    fn test_non_finite_coordinate_is_rejected() {
        let bad = geojson::Geometry::new(geojson::Value::Point(vec![f64::NAN, 1.0]));
        assert!(matches!(
            to_planar(&bad),
            Err(GeomError::CoordinateOutOfRange { .. })
        ));
    }

    #[test]
    fn test_lat_lon_labels_use_outer_ring() {
        let labels = lat_lon_labels(&square_4326());
        assert_eq!(labels.len(), 5);
        assert_eq!(labels[0], "41.00000, 29.00000");

        let pt = geojson::Geometry::new(geojson::Value::Point(vec![29.02345678, 41.0]));
        assert_eq!(lat_lon_labels(&pt), vec!["41.00000, 29.02346".to_string()]);
    }
}

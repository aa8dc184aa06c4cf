//! Spherical web-mercator projection (EPSG:4326 ↔ EPSG:3857)
//!
//! The overlay engine does all area and boolean math in planar mercator
//! meters; only the persistence boundary speaks lon/lat.

use geo_types::Coord;

/// WGS84 semi-major axis, meters.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude bound of the square mercator world.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Project lon/lat degrees to planar meters. Latitude is clamped to the
/// projectable domain.
pub fn project(lon: f64, lat: f64) -> Coord<f64> {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let x = EARTH_RADIUS * lon.to_radians();
    let y = EARTH_RADIUS
        * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0)
            .tan()
            .ln();
    Coord { x, y }
}

/// Inverse projection: planar meters back to (lon, lat) degrees.
pub fn unproject(c: Coord<f64>) -> (f64, f64) {
    let lon = (c.x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (c.y / EARTH_RADIUS).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    (lon, lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_projects_to_origin() {
        let c = project(0.0, 0.0);
        assert!(c.x.abs() < 1e-9);
        assert!(c.y.abs() < 1e-9);
    }

    #[test]
    fn test_round_trip() {
        for &(lon, lat) in &[(29.0, 41.0), (-122.4, 37.8), (151.2, -33.9), (0.0, 84.9)] {
            let (lon2, lat2) = unproject(project(lon, lat));
            assert!((lon - lon2).abs() < 1e-9, "lon {lon} -> {lon2}");
            assert!((lat - lat2).abs() < 1e-9, "lat {lat} -> {lat2}");
        }
    }

    #[test]
    fn test_latitude_is_clamped() {
        let top = project(0.0, 90.0);
        let edge = project(0.0, MAX_LATITUDE);
        assert!((top.y - edge.y).abs() < 1e-6);
    }
}

//! Dissolve cache
//!
//! A purely derived overlay: the union of all currently visible polygon
//! pieces, used only for border rendering (interior cut seams disappear in
//! the union). The cache is dropped and rebuilt whenever the visible
//! polygon set changes; it is never incrementally patched, so its content
//! is always fully recomputable from the current shape set.

use geo_types::{Geometry, MultiPolygon, Polygon};
use mapcarve_core::Shape;
use mapcarve_geom::{boolops, split};

/// Holds the dissolved border regions between recomputes.
#[derive(Default)]
pub struct DissolveCache {
    regions: Vec<Polygon<f64>>,
}

impl DissolveCache {
    pub fn new() -> Self {
        DissolveCache::default()
    }

    /// Drop all regions (polygons filtered out of view).
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    /// Rebuild from the currently visible polygon pieces: a left-to-right
    /// union fold (order does not affect the final region). Output may be
    /// several disjoint regions; separate polygon clusters stay separate.
    pub fn rebuild<I>(&mut self, visible: I)
    where
        I: IntoIterator<Item = MultiPolygon<f64>>,
    {
        let mut acc: Option<MultiPolygon<f64>> = None;
        for region in visible {
            if region.0.is_empty() {
                continue;
            }
            acc = Some(match acc {
                None => region,
                Some(sum) => boolops::union(&sum, &region, 0.0),
            });
        }
        self.regions = acc.map(split::split).unwrap_or_default();
    }

    /// The dissolved regions, one polygon per disjoint cluster.
    pub fn regions(&self) -> &[Polygon<f64>] {
        &self.regions
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// The regions wrapped as overlay-derived shapes: no id, never
    /// persisted, never selectable for edit.
    pub fn shapes(&self) -> Vec<Shape> {
        self.regions
            .iter()
            .map(|p| Shape::overlay(Geometry::Polygon(p.clone())))
            .collect()
    }
}

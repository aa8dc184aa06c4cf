//! Render view
//!
//! What the overlay engine exposes to the rendering surface after each
//! recompute: the renderable pieces (filtered by kind visibility) and the
//! dissolved border region set. Boolean-operation intermediates never
//! cross this boundary.

use mapcarve_core::{Shape, ShapeKind};

/// Which shape kinds are currently visible on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleKinds {
    pub point: bool,
    pub line: bool,
    pub polygon: bool,
}

impl Default for VisibleKinds {
    fn default() -> Self {
        VisibleKinds { point: true, line: true, polygon: true }
    }
}

impl VisibleKinds {
    pub fn all() -> Self {
        VisibleKinds::default()
    }

    pub fn none() -> Self {
        VisibleKinds { point: false, line: false, polygon: false }
    }

    pub fn contains(&self, kind: ShapeKind) -> bool {
        match kind {
            ShapeKind::Point => self.point,
            ShapeKind::Line => self.line,
            ShapeKind::Polygon => self.polygon,
        }
    }

    pub fn toggle(&mut self, kind: ShapeKind) {
        match kind {
            ShapeKind::Point => self.point = !self.point,
            ShapeKind::Line => self.line = !self.line,
            ShapeKind::Polygon => self.polygon = !self.polygon,
        }
    }
}

/// A snapshot handed to the renderer. `pieces` carry shared name/id
/// metadata; `dissolved` is the only source of polygon borders (individual
/// piece borders are never drawn, hiding internal cut seams).
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub pieces: Vec<Shape>,
    pub dissolved: Vec<Shape>,
}

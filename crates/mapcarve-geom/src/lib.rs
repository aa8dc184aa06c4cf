//! # Mapcarve Geom
//!
//! Planar geometry machinery: the geographic↔planar codec, precision
//! normalization, the robust boolean-operation engine with its layered
//! fallback strategy, and the multi-part piece splitter.
//!
//! Everything here is pure: functions over (operands, tolerance) → result.
//! Numeric failure is absorbed as an empty region, never a fatal error.

pub mod boolops;
pub mod codec;
pub mod locate;
pub mod mercator;
pub mod precision;
pub mod split;

pub use boolops::{difference, union, SLIVER_AREA};
pub use codec::{lat_lon_labels, to_geographic, to_planar};
pub use locate::{point_in_planar_polygon, point_in_ring};
pub use precision::{normalize, DEFAULT_SCALE};
pub use split::split;

//! # Mapcarve Overlay
//!
//! The polygon overlay consistency engine. Orchestrates insertion, editing
//! and deletion of named shapes against an external persistence service,
//! keeping two guarantees at all times:
//!
//! - no two rendered polygon pieces overlap in area, and
//! - local topology is never mutated ahead of a successful durable write.
//!
//! ## Architecture
//!
//! ```text
//! OverlayMaintainer (insertion/edit state machine)
//!   ├── ShapeStore (durable entries + rendered pieces)
//!   ├── mapcarve-geom (codec, normalize, boolean ops, split)
//!   └── DissolveCache (derived border overlay, rebuilt on every change)
//! ```
//!
//! All mutation is single-threaded and event-driven; the only suspension
//! point is the awaited persistence call, and no state is touched until it
//! resolves. Dropping the in-flight future is equivalent to a failed
//! persist: the shape set is untouched.

pub mod dissolve;
pub mod maintain;
pub mod store;
pub mod view;

pub use dissolve::DissolveCache;
pub use maintain::{InsertOutcome, InsertState, Insertion, OverlayMaintainer};
pub use store::{DurableEntry, ShapeStore};
pub use view::{RenderOutput, VisibleKinds};

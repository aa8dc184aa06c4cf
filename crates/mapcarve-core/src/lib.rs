//! # Mapcarve Core
//!
//! Core types, traits, and utilities for Mapcarve.
//! Provides the shape data model, the error taxonomy, and the persistence
//! collaborator interface consumed by the overlay engine.

pub mod error;
pub mod memory;
pub mod service;
pub mod shape;

pub use error::{Error, GeomError, Result, ServiceError};

pub use shape::{Shape, ShapeId, ShapeKind};

pub use service::{
    GeometryListItem, GeometryRecord, GeometryService, PageQuery, PageResult, SortKey, TypeFilter,
};

pub use memory::MemoryGeometryService;

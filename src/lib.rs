//! Polygon tessellation on a reference ellipsoid
//!
//! A standalone library that turns polygon outlines (with holes, holes of
//! holes, and optional extrusion between two heights) into triangle meshes
//! suitable for any rendering engine.
//!
//! # Quick Start
//!
//! ```rust
//! use rust_polygon_geometry::*;
//!
//! let ellipsoid = Ellipsoid::wgs84();
//!
//! // Capture parameters (cheap)
//! let polygon = PolygonGeometryBuilder::new()
//!     .positions(ellipsoid.from_degrees_array(&[
//!         -1.0, -1.0, 1.0, -1.0, 1.0, 1.0, -1.0, 1.0,
//!     ]))
//!     .vertex_format(VertexFormat::POSITION_ONLY)
//!     .build()
//!     .unwrap();
//!
//! // Tessellate (pure, can run on any thread)
//! let mesh = polygon.create_geometry().unwrap().expect("non-degenerate polygon");
//! assert_eq!(mesh.vertex_count(), 13);
//! assert_eq!(mesh.triangle_count(), 16);
//!
//! // Ship the parameters across a worker boundary
//! let packed = pack::to_packed(&polygon);
//! let restored = pack::unpack(&packed, 0).unwrap();
//! assert_eq!(restored, polygon);
//! ```
//!
//! # Features
//!
//! - `parallel` (default): Tessellates batches on the rayon thread pool
//! - `serde`: Enables serialization support for options, hierarchies and meshes

// Modules
pub mod error;
pub mod config;
pub mod math;
pub mod ellipsoid;
pub mod hierarchy;
pub mod volume;
pub mod mesh;
pub mod polygon;
pub mod pack;
pub mod batch;

mod tessellation;

// Re-export core types for convenience
pub use error::{PolygonError, Result};
pub use config::{ArcType, OffsetAttribute, PolygonGeometryBuilder, PolygonOptions, VertexFormat};
pub use ellipsoid::{Cartographic, Ellipsoid};
pub use hierarchy::PolygonHierarchy;
pub use volume::{BoundingSphere, Rectangle};
pub use mesh::MeshData;
pub use polygon::PolygonGeometry;
pub use batch::create_geometries;

// Re-export glam::DVec3 for convenience
pub use glam::DVec3;

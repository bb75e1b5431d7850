//! Tessellated mesh output
//!
//! Engine-agnostic buffers produced by
//! [`PolygonGeometry::create_geometry`](crate::PolygonGeometry::create_geometry).

pub mod attributes;

pub use attributes::{compute_bitangents, compute_normals, compute_tangents};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::volume::BoundingSphere;

/// Engine-agnostic mesh data output
///
/// Contains raw vertex data suitable for any rendering engine. Optional
/// buffers are present only when the vertex format asked for them:
/// - wgpu: upload each buffer as its own vertex stream
/// - Bevy: insert the buffers as mesh attributes
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions in the ellipsoid's Cartesian frame
    pub positions: Vec<[f64; 3]>,
    /// Texture coordinates in [0, 1]
    pub st: Option<Vec<[f64; 2]>>,
    /// Unit vertex normals
    pub normals: Option<Vec<[f64; 3]>>,
    /// Unit tangents in the direction of increasing `s`
    pub tangents: Option<Vec<[f64; 3]>>,
    /// Unit bitangents (`normal x tangent`)
    pub bitangents: Option<Vec<[f64; 3]>>,
    /// One flag per vertex: 1 when the runtime height offset applies
    pub apply_offset: Option<Vec<u8>>,
    /// Triangle list indices
    pub indices: Vec<u32>,
    /// Sphere enclosing the mesh
    pub bounding_sphere: BoundingSphere,
}

impl MeshData {
    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions as a flat `[x0, y0, z0, x1, ...]` slice
    pub fn flat_positions(&self) -> &[f64] {
        self.positions.as_flattened()
    }
}

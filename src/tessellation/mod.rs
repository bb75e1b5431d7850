//! Polygon tessellation pipeline
//!
//! A tessellation runs these stages, each in its own module:
//!
//! 1. [`normalize`]: duplicate removal and canonical winding per ring
//! 2. [`flatten`]: hierarchy to independent outer-with-holes polygons
//! 3. [`triangulate`]: ear clipping in the polygon's tangent plane
//! 4. [`subdivide`]: cap refinement and wall edge subdivision
//! 5. [`extrude`]: cap placement and side walls
//! 6. [`attributes`]: texture coordinates and offset flags, then the
//!    shared surface frame utility in [`crate::mesh::attributes`]
//! 7. [`bounds`]: bounding sphere and geographic rectangle
//!
//! Every stage works on owned copies; caller positions are never modified.

pub(crate) mod attributes;
pub(crate) mod bounds;
pub(crate) mod extrude;
pub(crate) mod flatten;
pub(crate) mod normalize;
pub(crate) mod subdivide;
pub(crate) mod triangulate;

use glam::{DVec2, DVec3};
use log::debug;

use crate::config::ArcType;
use crate::ellipsoid::Ellipsoid;
use crate::error::{PolygonError, Result};
use crate::mesh::{compute_bitangents, compute_normals, compute_tangents, MeshData};
use crate::polygon::PolygonGeometry;
use crate::volume::BoundingSphere;

use attributes::{offset_values, TextureProjector};
use extrude::{Extruder, GeometryParts};
use flatten::flatten_hierarchy;
use subdivide::{ArcSubdivider, Cap};
use triangulate::triangulate;

/// Heights above the surface, only tracked with per-position heights
fn heights_of(positions: &[DVec3], ellipsoid: &Ellipsoid, per_position_height: bool) -> Vec<f64> {
    if !per_position_height {
        return vec![0.0; positions.len()];
    }
    positions
        .iter()
        .map(|p| {
            ellipsoid
                .cartesian_to_cartographic(*p)
                .map_or(0.0, |c| c.height)
        })
        .collect()
}

fn to_arrays(vectors: &[DVec3]) -> Vec<[f64; 3]> {
    vectors.iter().map(|v| v.to_array()).collect()
}

/// Tessellate `polygon` into a mesh
///
/// Returns `Ok(None)` when the input degenerates (too few distinct
/// positions, every outer ring dropped).
///
/// # Errors
///
/// Returns `InvalidArgument` if the arc type is `None` or the granularity
/// is not a positive finite angle. Both can only happen for parameters
/// that bypassed construction, such as unpacked buffers.
pub(crate) fn create_geometry(polygon: &PolygonGeometry) -> Result<Option<MeshData>> {
    if polygon.arc_type == ArcType::None {
        return Err(PolygonError::InvalidArgument(
            "arc type must be Geodesic or Rhumb".to_string(),
        ));
    }
    if !(polygon.granularity.is_finite() && polygon.granularity > 0.0) {
        return Err(PolygonError::InvalidArgument(format!(
            "granularity must be a positive angle (got {})",
            polygon.granularity
        )));
    }

    let ellipsoid = &polygon.ellipsoid;
    let per_position_height = polygon.per_position_height;

    let instances = flatten_hierarchy(&polygon.polygon_hierarchy, ellipsoid, per_position_height);
    let Some(first_instance) = instances.first() else {
        debug!("polygon hierarchy has no usable outer ring");
        return Ok(None);
    };

    let extruded = polygon.is_extruded();
    let subdivider = ArcSubdivider::new(ellipsoid, polygon.arc_type, polygon.granularity);
    let extruder = Extruder {
        ellipsoid,
        height: polygon.height,
        extruded_height: polygon.extruded_height,
        per_position_height,
        close_top: polygon.close_top,
        close_bottom: polygon.close_bottom,
    };

    let mut parts = GeometryParts::default();
    for instance in &instances {
        let Some(triangulation) = triangulate(&instance.outer, &instance.holes, ellipsoid) else {
            debug!("skipping polygon that could not be projected");
            continue;
        };

        let heights = heights_of(&triangulation.positions, ellipsoid, per_position_height);
        let cap = subdivider.refine_cap(Cap {
            positions: triangulation.positions,
            heights,
            indices: triangulation.indices,
        });

        if extruded {
            let walls: Vec<Vec<DVec3>> = instance
                .rings()
                .map(|ring| {
                    let heights = heights_of(ring, ellipsoid, per_position_height);
                    subdivider.subdivide_ring(ring, &heights)
                })
                .collect();
            extruder.add_extruded(&mut parts, &cap, &walls);
        } else {
            extruder.add_surface(&mut parts, &cap);
        }
    }

    if parts.vertex_count() == 0 {
        return Ok(None);
    }

    let format = polygon.vertex_format;

    let st: Option<Vec<DVec2>> = format.needs_texture_coordinates().then(|| {
        TextureProjector::new(&polygon.polygon_hierarchy.positions, ellipsoid, polygon.st_rotation)
            .or_else(|| TextureProjector::new(&first_instance.outer, ellipsoid, polygon.st_rotation))
            .map_or_else(
                || vec![DVec2::ZERO; parts.vertex_count()],
                |projector| parts.positions.iter().map(|p| projector.st(*p)).collect(),
            )
    });

    let normals = format
        .needs_surface_frame()
        .then(|| compute_normals(&parts.positions, &parts.indices));

    let tangents = match (&normals, &st) {
        (Some(normals), Some(st)) if format.tangent || format.bitangent => {
            Some(compute_tangents(&parts.positions, &parts.indices, st, normals))
        }
        _ => None,
    };

    let bitangents = match (&normals, &tangents) {
        (Some(normals), Some(tangents)) if format.bitangent => {
            Some(compute_bitangents(normals, tangents))
        }
        _ => None,
    };

    let bounding_sphere = if polygon.height == 0.0 && !extruded {
        BoundingSphere::from_points(&parts.positions)
    } else {
        bounds::corner_bounding_sphere(
            first_instance,
            ellipsoid,
            polygon.height,
            extruded.then_some(polygon.extruded_height),
            per_position_height,
        )
    };

    let apply_offset = polygon
        .offset_attribute
        .map(|offset| offset_values(offset, &parts.top));

    debug!(
        "tessellated {} polygon(s) into {} vertices and {} triangles",
        instances.len(),
        parts.vertex_count(),
        parts.indices.len() / 3
    );

    Ok(Some(MeshData {
        positions: to_arrays(&parts.positions),
        st: st
            .filter(|_| format.st)
            .map(|st| st.iter().map(|uv| uv.to_array()).collect()),
        normals: normals.filter(|_| format.normal).map(|n| to_arrays(&n)),
        tangents: tangents.filter(|_| format.tangent).map(|t| to_arrays(&t)),
        bitangents: bitangents.map(|b| to_arrays(&b)),
        apply_offset,
        indices: parts.indices,
        bounding_sphere,
    }))
}

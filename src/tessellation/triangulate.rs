//! Planar triangulation of a ring with holes

use glam::DVec3;
use log::trace;

use crate::ellipsoid::{Ellipsoid, TangentPlane};

/// Merged positions of an outer ring and its holes with triangle indices
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Triangulation {
    pub positions: Vec<DVec3>,
    pub indices: Vec<u32>,
}

/// Triangulate `outer` with `holes` in the outer ring's tangent plane
///
/// Holes are bridged into the outer boundary by ear clipping. The merged
/// position list is the outer ring followed by each hole in order.
/// Collinear or vertical input that clips to nothing falls back to the
/// single triangle `[0, 1, 2]`. Returns `None` if fewer than three
/// positions are available or the rings cannot be projected.
pub(crate) fn triangulate(
    outer: &[DVec3],
    holes: &[Vec<DVec3>],
    ellipsoid: &Ellipsoid,
) -> Option<Triangulation> {
    let vertex_count = outer.len() + holes.iter().map(Vec::len).sum::<usize>();
    if vertex_count < 3 {
        return None;
    }

    let plane = TangentPlane::from_points(outer, ellipsoid)?;

    // Build flat coordinate array for earcut
    let mut positions = Vec::with_capacity(vertex_count);
    let mut flat_coords: Vec<f64> = Vec::with_capacity(vertex_count * 2);
    let mut hole_indices: Vec<usize> = Vec::with_capacity(holes.len());

    for p in outer {
        let projected = plane.project_point(*p)?;
        flat_coords.push(projected.x);
        flat_coords.push(projected.y);
        positions.push(*p);
    }

    for hole in holes {
        hole_indices.push(positions.len());
        for p in hole {
            let projected = plane.project_point(*p)?;
            flat_coords.push(projected.x);
            flat_coords.push(projected.y);
            positions.push(*p);
        }
    }

    let mut indices: Vec<u32> = earcutr::earcut(&flat_coords, &hole_indices, 2)
        .unwrap_or_default()
        .into_iter()
        .map(|i| i as u32)
        .collect();

    if indices.len() < 3 {
        trace!(
            "ear clipping produced no triangles for {} positions, using fallback",
            positions.len()
        );
        indices = vec![0, 1, 2];
    }

    Some(Triangulation { positions, indices })
}

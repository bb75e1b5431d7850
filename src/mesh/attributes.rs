//! Per-vertex surface frame derived from positions and triangles
//!
//! Normals are area weighted: each triangle adds its unnormalized face
//! normal to its three corners. Tangents follow the direction of
//! increasing `s` across each triangle and are orthogonalized against the
//! vertex normal. Bitangents complete the right-handed frame.

use glam::{DVec2, DVec3};

/// Area-weighted vertex normals
///
/// Vertices that touch no triangle, or only degenerate ones, fall back to
/// the direction from the origin to the vertex.
pub fn compute_normals(positions: &[DVec3], indices: &[u32]) -> Vec<DVec3> {
    let mut normals = vec![DVec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let (Some(a), Some(b), Some(c)) = (positions.get(i0), positions.get(i1), positions.get(i2))
        else {
            continue;
        };

        let face = (*b - *a).cross(*c - *a);
        normals[i0] += face;
        normals[i1] += face;
        normals[i2] += face;
    }

    normals
        .iter()
        .zip(positions)
        .map(|(n, p)| {
            let n = n.normalize_or_zero();
            if n == DVec3::ZERO {
                p.normalize_or_zero()
            } else {
                n
            }
        })
        .collect()
}

/// Tangents from texture coordinate gradients
///
/// Triangles with no area in texture space contribute nothing; vertices
/// left without a usable tangent get an arbitrary vector perpendicular to
/// their normal.
pub fn compute_tangents(positions: &[DVec3], indices: &[u32], st: &[DVec2], normals: &[DVec3]) -> Vec<DVec3> {
    let mut tangents = vec![DVec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let (Some(p0), Some(p1), Some(p2)) = (positions.get(i0), positions.get(i1), positions.get(i2))
        else {
            continue;
        };
        let (Some(uv0), Some(uv1), Some(uv2)) = (st.get(i0), st.get(i1), st.get(i2)) else {
            continue;
        };

        let edge1 = *p1 - *p0;
        let edge2 = *p2 - *p0;
        let duv1 = *uv1 - *uv0;
        let duv2 = *uv2 - *uv0;

        let det = duv1.x * duv2.y - duv2.x * duv1.y;
        if det.abs() < 1e-12 {
            continue;
        }

        let tangent = (edge1 * duv2.y - edge2 * duv1.y) / det;
        tangents[i0] += tangent;
        tangents[i1] += tangent;
        tangents[i2] += tangent;
    }

    tangents
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let n = normals.get(i).copied().unwrap_or(DVec3::Z);
            // Gram-Schmidt: T' = T - (N . T) N
            let t = (*t - n * n.dot(*t)).normalize_or_zero();
            if t != DVec3::ZERO {
                return t;
            }
            let arbitrary = if n.x.abs() < 0.9 { DVec3::X } else { DVec3::Y };
            let fallback = n.cross(arbitrary).normalize_or_zero();
            if fallback == DVec3::ZERO {
                DVec3::X
            } else {
                fallback
            }
        })
        .collect()
}

/// Bitangents as `normal x tangent`
pub fn compute_bitangents(normals: &[DVec3], tangents: &[DVec3]) -> Vec<DVec3> {
    normals
        .iter()
        .zip(tangents)
        .map(|(n, t)| n.cross(*t).normalize_or_zero())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> (Vec<DVec3>, Vec<u32>, Vec<DVec2>) {
        let positions = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        ];
        let st = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(0.0, 1.0),
        ];
        (positions, vec![0, 1, 2, 0, 2, 3], st)
    }

    #[test]
    fn test_flat_quad_frame() {
        let (positions, indices, st) = quad();
        let normals = compute_normals(&positions, &indices);
        let tangents = compute_tangents(&positions, &indices, &st, &normals);
        let bitangents = compute_bitangents(&normals, &tangents);

        for i in 0..positions.len() {
            assert!((normals[i] - DVec3::Z).length() < 1e-12);
            assert!((tangents[i] - DVec3::X).length() < 1e-12);
            assert!((bitangents[i] - DVec3::Y).length() < 1e-12);
        }
    }

    #[test]
    fn test_unused_vertex_falls_back_to_radial() {
        let (mut positions, indices, _) = quad();
        positions.push(DVec3::new(0.0, 0.0, 5.0));
        let normals = compute_normals(&positions, &indices);
        assert_eq!(normals[4], DVec3::Z);
    }

    #[test]
    fn test_degenerate_uvs_still_give_unit_tangents() {
        let (positions, indices, _) = quad();
        let st = vec![DVec2::ZERO; positions.len()];
        let normals = compute_normals(&positions, &indices);
        let tangents = compute_tangents(&positions, &indices, &st, &normals);
        for (t, n) in tangents.iter().zip(&normals) {
            assert!((t.length() - 1.0).abs() < 1e-12);
            assert!(t.dot(*n).abs() < 1e-12);
        }
    }

    #[test]
    fn test_normals_are_area_weighted() {
        // A large triangle facing +z shares a vertex with a tiny one facing +x
        let positions = vec![
            DVec3::ZERO,
            DVec3::new(10.0, 0.0, 0.0),
            DVec3::new(0.0, 10.0, 0.0),
            DVec3::new(0.0, 0.1, 0.0),
            DVec3::new(0.0, 0.0, 0.1),
        ];
        let indices = vec![0, 1, 2, 0, 3, 4];
        let normals = compute_normals(&positions, &indices);
        assert!(normals[0].z > 0.99);
    }
}

//! Ring normalization: duplicate removal and canonical winding

use glam::DVec3;
use log::trace;

use crate::ellipsoid::tangent_plane::signed_area_2d;
use crate::ellipsoid::{Ellipsoid, TangentPlane};
use crate::math::{vec_equals_epsilon, EPSILON10};

/// Role of a ring inside a polygon, which fixes its winding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RingRole {
    /// Counter-clockwise seen from outside the ellipsoid
    Outer,
    /// Clockwise seen from outside the ellipsoid
    Hole,
}

/// Remove consecutive duplicates, including the wrap from last to first
pub(crate) fn remove_duplicates(positions: &[DVec3]) -> Vec<DVec3> {
    let mut unique: Vec<DVec3> = Vec::with_capacity(positions.len());
    for &p in positions {
        match unique.last() {
            Some(&last) if vec_equals_epsilon(last, p, EPSILON10, EPSILON10) => {}
            _ => unique.push(p),
        }
    }

    while unique.len() > 1 {
        let (first, last) = (unique[0], unique[unique.len() - 1]);
        if vec_equals_epsilon(first, last, EPSILON10, EPSILON10) {
            unique.pop();
        } else {
            break;
        }
    }

    unique
}

/// Normalize one ring into an owned copy
///
/// Without per-position heights every position is first moved to the
/// surface, so positions that differ only in height collapse. Returns
/// `None` when fewer than three distinct positions remain or the ring
/// cannot be projected to measure its winding.
pub(crate) fn normalize_ring(
    positions: &[DVec3],
    role: RingRole,
    ellipsoid: &Ellipsoid,
    per_position_height: bool,
) -> Option<Vec<DVec3>> {
    let mut ring = if per_position_height {
        remove_duplicates(positions)
    } else {
        let surface: Vec<DVec3> = positions
            .iter()
            .filter_map(|p| ellipsoid.scale_to_geodetic_surface(*p))
            .collect();
        remove_duplicates(&surface)
    };

    if ring.len() < 3 {
        trace!("ring has {} distinct positions, dropping", ring.len());
        return None;
    }

    let plane = TangentPlane::from_points(&ring, ellipsoid)?;
    let projected = plane.project_points(&ring)?;
    let area = signed_area_2d(&projected);

    let reverse = match role {
        RingRole::Outer => area < 0.0,
        RingRole::Hole => area > 0.0,
    };
    if reverse {
        ring.reverse();
    }

    Some(ring)
}

//! Cap placement and side walls for raised or extruded polygons

use glam::DVec3;

use super::subdivide::Cap;
use crate::ellipsoid::Ellipsoid;
use crate::math::{vec_equals_epsilon, EPSILON10};

/// Geometry accumulated across polygon instances, before attributes
///
/// `top` flags every vertex that belongs to the top surface: the top cap
/// and the upper edge of each wall.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct GeometryParts {
    pub positions: Vec<DVec3>,
    pub indices: Vec<u32>,
    pub top: Vec<bool>,
}

impl GeometryParts {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    fn push_cap(&mut self, positions: impl IntoIterator<Item = DVec3>, indices: &[u32], reversed: bool, top: bool) {
        let base = self.positions.len() as u32;
        self.positions.extend(positions);
        self.top.resize(self.positions.len(), top);

        for tri in indices.chunks_exact(3) {
            if reversed {
                self.indices.extend_from_slice(&[base + tri[0], base + tri[2], base + tri[1]]);
            } else {
                self.indices.extend_from_slice(&[base + tri[0], base + tri[1], base + tri[2]]);
            }
        }
    }

    /// Append a wall ribbon: all top points, then all bottom points
    fn push_wall(&mut self, edge: &[DVec3], top: Vec<DVec3>, bottom: Vec<DVec3>) {
        let count = edge.len() as u32;
        let base = self.positions.len() as u32;

        self.positions.extend(top);
        self.top.resize(self.positions.len(), true);
        self.positions.extend(bottom);
        self.top.resize(self.positions.len(), false);

        for i in 0..edge.len().saturating_sub(1) {
            if vec_equals_epsilon(edge[i], edge[i + 1], EPSILON10, EPSILON10) {
                continue;
            }
            let upper_left = base + i as u32;
            let upper_right = upper_left + 1;
            let lower_left = upper_left + count;
            let lower_right = lower_left + 1;

            self.indices.extend_from_slice(&[upper_left, lower_left, upper_right]);
            self.indices.extend_from_slice(&[upper_right, lower_left, lower_right]);
        }
    }
}

/// Places caps at their heights and builds walls between them
#[derive(Debug, Clone, Copy)]
pub(crate) struct Extruder<'a> {
    pub ellipsoid: &'a Ellipsoid,
    pub height: f64,
    pub extruded_height: f64,
    pub per_position_height: bool,
    pub close_top: bool,
    pub close_bottom: bool,
}

impl Extruder<'_> {
    fn top_position(&self, p: DVec3) -> DVec3 {
        if self.per_position_height {
            p
        } else {
            self.ellipsoid.scale_to_geodetic_height(p, self.height)
        }
    }

    fn bottom_position(&self, p: DVec3) -> DVec3 {
        self.ellipsoid.scale_to_geodetic_height(p, self.extruded_height)
    }

    /// Append a single cap at the top height (no extrusion)
    pub fn add_surface(&self, parts: &mut GeometryParts, cap: &Cap) {
        let positions = cap.positions.iter().map(|p| self.top_position(*p));
        parts.push_cap(positions, &cap.indices, false, true);
    }

    /// Append the closed caps of an extruded instance, then one wall per ring
    ///
    /// The bottom cap's triangles are reversed so it faces down. Each
    /// entry of `walls` is a subdivided ring with repeated corners.
    pub fn add_extruded(&self, parts: &mut GeometryParts, cap: &Cap, walls: &[Vec<DVec3>]) {
        if self.close_top {
            let positions = cap.positions.iter().map(|p| self.top_position(*p));
            parts.push_cap(positions, &cap.indices, false, true);
        }
        if self.close_bottom {
            let positions = cap.positions.iter().map(|p| self.bottom_position(*p));
            parts.push_cap(positions, &cap.indices, true, false);
        }

        for edge in walls {
            let top = edge.iter().map(|p| self.top_position(*p)).collect();
            let bottom = edge.iter().map(|p| self.bottom_position(*p)).collect();
            parts.push_wall(edge, top, bottom);
        }
    }
}

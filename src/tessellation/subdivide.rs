//! Arc subdivision for cap interiors and wall edges
//!
//! Both operations follow the configured arc model. Geodesic lengths are
//! chords between points pushed onto a sphere of the ellipsoid's maximum
//! radius, compared against the chord of one granularity step. Rhumb
//! lengths are surface distances along the rhumb line, compared against
//! one granularity step of arc on that sphere.

use std::collections::HashMap;

use glam::DVec3;

use crate::config::ArcType;
use crate::ellipsoid::{Cartographic, Ellipsoid, RhumbLine};
use crate::math::{chord_length, EPSILON10};

/// Edges within this relative margin of the limit are not split
const SPLIT_TOLERANCE: f64 = EPSILON10;

/// Cap on halvings per wall edge
const MAX_EDGE_HALVINGS: i32 = 24;

/// A triangulated cap: positions, their heights above the surface, and triangles
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Cap {
    pub positions: Vec<DVec3>,
    pub heights: Vec<f64>,
    pub indices: Vec<u32>,
}

/// Inserts points along edges so no step exceeds the granularity
#[derive(Debug, Clone, Copy)]
pub(crate) struct ArcSubdivider<'a> {
    ellipsoid: &'a Ellipsoid,
    arc_type: ArcType,
    radius: f64,
    max_length: f64,
}

impl<'a> ArcSubdivider<'a> {
    pub fn new(ellipsoid: &'a Ellipsoid, arc_type: ArcType, granularity: f64) -> Self {
        let radius = ellipsoid.maximum_radius();
        let max_length = match arc_type {
            ArcType::Rhumb => granularity * radius,
            _ => chord_length(granularity, radius),
        };
        Self {
            ellipsoid,
            arc_type,
            radius,
            max_length,
        }
    }

    /// Length of the edge `a`-`b` in the units of `max_length`
    fn edge_length(&self, a: DVec3, b: DVec3) -> f64 {
        match self.arc_type {
            ArcType::Rhumb => self
                .rhumb_line(a, b)
                .map_or(0.0, |line| line.surface_distance()),
            _ => {
                let a = a.normalize_or_zero() * self.radius;
                let b = b.normalize_or_zero() * self.radius;
                a.distance(b)
            }
        }
    }

    fn rhumb_line(&self, a: DVec3, b: DVec3) -> Option<RhumbLine> {
        let start = self.ellipsoid.cartesian_to_cartographic(a)?;
        let end = self.ellipsoid.cartesian_to_cartographic(b)?;
        Some(RhumbLine::new(self.ellipsoid, start, end))
    }

    fn exceeds(&self, length: f64) -> bool {
        length > self.max_length * (1.0 + SPLIT_TOLERANCE)
    }

    /// Point halfway along the edge, at the mean of the endpoint heights
    fn midpoint(&self, a: DVec3, height_a: f64, b: DVec3, height_b: f64) -> DVec3 {
        let height = (height_a + height_b) * 0.5;
        if self.arc_type == ArcType::Rhumb {
            if let Some(line) = self.rhumb_line(a, b) {
                let mid = line.interpolate_using_fraction(0.5);
                return self
                    .ellipsoid
                    .cartographic_to_cartesian(&Cartographic { height, ..mid });
            }
        }
        self.ellipsoid
            .scale_to_geodetic_height((a + b) * 0.5, height)
    }

    /// Refine a triangulated cap until no triangle edge exceeds the granularity
    ///
    /// The longest edge of each oversized triangle is split and both halves
    /// are revisited. Midpoints are shared between neighbouring triangles,
    /// and the original vertices keep their indices.
    pub fn refine_cap(&self, cap: Cap) -> Cap {
        let Cap {
            mut positions,
            mut heights,
            indices,
        } = cap;

        let mut pending = indices;
        let mut refined = Vec::with_capacity(pending.len());
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();

        while pending.len() >= 3 {
            let start = pending.len() - 3;
            let (i0, i1, i2) = (pending[start], pending[start + 1], pending[start + 2]);
            pending.truncate(start);

            let (v0, v1, v2) = (
                positions[i0 as usize],
                positions[i1 as usize],
                positions[i2 as usize],
            );
            let s0 = self.edge_length(v0, v1);
            let s1 = self.edge_length(v1, v2);
            let s2 = self.edge_length(v2, v0);
            let longest = s0.max(s1).max(s2);

            if !self.exceeds(longest) {
                refined.extend_from_slice(&[i0, i1, i2]);
                continue;
            }

            // Split the longest edge (a, b); `c` is the opposite corner
            let (a, b, c) = if s0 == longest {
                (i0, i1, i2)
            } else if s1 == longest {
                (i1, i2, i0)
            } else {
                (i2, i0, i1)
            };

            let key = (a.min(b), a.max(b));
            let mid = *midpoints.entry(key).or_insert_with(|| {
                let (pa, pb) = (positions[a as usize], positions[b as usize]);
                let (ha, hb) = (heights[a as usize], heights[b as usize]);
                positions.push(self.midpoint(pa, ha, pb, hb));
                heights.push((ha + hb) * 0.5);
                (positions.len() - 1) as u32
            });

            pending.extend_from_slice(&[a, mid, c]);
            pending.extend_from_slice(&[mid, b, c]);
        }

        Cap {
            positions,
            heights,
            indices: refined,
        }
    }

    /// Number of evenly spaced steps needed along one wall edge (a power of two)
    fn edge_step_count(&self, length: f64) -> usize {
        let ratio = length / (self.max_length * (1.0 + SPLIT_TOLERANCE));
        if !(ratio.is_finite() && ratio > 1.0) {
            return 1;
        }
        let halvings = (ratio.log2().ceil() as i32).clamp(0, MAX_EDGE_HALVINGS);
        1usize << halvings
    }

    /// Subdivide every edge of a closed ring for the side walls
    ///
    /// Each edge contributes its evenly spaced points starting at its first
    /// endpoint, followed by its second endpoint, so consecutive edges
    /// repeat the shared corner. Heights are interpolated linearly.
    pub fn subdivide_ring(&self, ring: &[DVec3], heights: &[f64]) -> Vec<DVec3> {
        let n = ring.len();
        let mut points = Vec::with_capacity(n * 3);

        for i in 0..n {
            let j = (i + 1) % n;
            let (a, b) = (ring[i], ring[j]);
            let (ha, hb) = (heights[i], heights[j]);

            match self.arc_type {
                ArcType::Rhumb => self.subdivide_rhumb_edge(a, ha, b, hb, &mut points),
                _ => self.subdivide_geodesic_edge(a, ha, b, hb, &mut points),
            }
            points.push(b);
        }

        points
    }

    fn subdivide_geodesic_edge(&self, a: DVec3, ha: f64, b: DVec3, hb: f64, out: &mut Vec<DVec3>) {
        let count = self.edge_step_count(self.edge_length(a, b));
        out.push(a);
        for step in 1..count {
            let t = step as f64 / count as f64;
            let height = ha + (hb - ha) * t;
            out.push(self.ellipsoid.scale_to_geodetic_height(a.lerp(b, t), height));
        }
    }

    fn subdivide_rhumb_edge(&self, a: DVec3, ha: f64, b: DVec3, hb: f64, out: &mut Vec<DVec3>) {
        out.push(a);
        let Some(line) = self.rhumb_line(a, b) else {
            return;
        };
        let distance = line.surface_distance();
        let count = self.edge_step_count(distance);
        for step in 1..count {
            let t = step as f64 / count as f64;
            let point = line.interpolate_using_surface_distance(distance * t);
            let height = ha + (hb - ha) * t;
            out.push(
                self.ellipsoid
                    .cartographic_to_cartesian(&Cartographic { height, ..point }),
            );
        }
    }
}

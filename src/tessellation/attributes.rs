//! Texture coordinates, texture rotation reference points and offset flags

use glam::{DMat2, DVec2, DVec3};

use crate::config::OffsetAttribute;
use crate::ellipsoid::{Ellipsoid, TangentPlane};

/// Axis-aligned 2D bounds
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds2 {
    min: DVec2,
    max: DVec2,
}

impl Bounds2 {
    fn from_points(points: impl IntoIterator<Item = DVec2>) -> Option<Self> {
        points.into_iter().fold(None, |bounds, p| {
            Some(match bounds {
                None => Self { min: p, max: p },
                Some(b) => Self {
                    min: b.min.min(p),
                    max: b.max.max(p),
                },
            })
        })
    }

    fn extent(&self) -> DVec2 {
        self.max - self.min
    }

    /// Position of `p` inside the bounds, in [0, 1] on each axis
    fn normalize(&self, p: DVec2) -> DVec2 {
        let extent = self.extent();
        let u = if extent.x > 0.0 { (p.x - self.min.x) / extent.x } else { 0.0 };
        let v = if extent.y > 0.0 { (p.y - self.min.y) / extent.y } else { 0.0 };
        DVec2::new(u, v).clamp(DVec2::ZERO, DVec2::ONE)
    }
}

/// Maps positions to texture coordinates
///
/// Positions are moved to the surface, projected into the tangent plane of
/// the outer ring, rotated by the texture rotation, and normalized against
/// the bounds of the equally rotated outer ring.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TextureProjector<'a> {
    ellipsoid: &'a Ellipsoid,
    plane: TangentPlane,
    rotation: DMat2,
    bounds: Bounds2,
}

impl<'a> TextureProjector<'a> {
    pub fn new(outer: &[DVec3], ellipsoid: &'a Ellipsoid, st_rotation: f64) -> Option<Self> {
        let plane = TangentPlane::from_points(outer, ellipsoid)?;
        let rotation = DMat2::from_angle(st_rotation);
        let rotated = project_to_surface_plane(outer, &plane, ellipsoid)
            .into_iter()
            .map(|p| rotation * p);
        let bounds = Bounds2::from_points(rotated)?;
        Some(Self {
            ellipsoid,
            plane,
            rotation,
            bounds,
        })
    }

    pub fn st(&self, position: DVec3) -> DVec2 {
        let surface = self
            .ellipsoid
            .scale_to_geodetic_surface(position)
            .unwrap_or(position);
        match self.plane.project_point(surface) {
            Some(p) => self.bounds.normalize(self.rotation * p),
            None => DVec2::ZERO,
        }
    }
}

fn project_to_surface_plane(positions: &[DVec3], plane: &TangentPlane, ellipsoid: &Ellipsoid) -> Vec<DVec2> {
    positions
        .iter()
        .filter_map(|p| {
            let surface = ellipsoid.scale_to_geodetic_surface(*p)?;
            plane.project_point(surface)
        })
        .collect()
}

/// Texture rotation reference points for an outer ring
///
/// Three corners of the rotated texture frame, `[min, max-v, max-u]`,
/// expressed in the unrotated frame's [0, 1] coordinates, flattened to
/// `[u0, v0, u1, v1, u2, v2]`. A consumer can rotate texture coordinates
/// after the fact without retessellating.
pub(crate) fn texture_rotation_points(outer: &[DVec3], ellipsoid: &Ellipsoid, st_rotation: f64) -> [f64; 6] {
    let unrotated_frame = [0.0, 0.0, 0.0, 1.0, 1.0, 0.0];

    let Some(plane) = TangentPlane::from_points(outer, ellipsoid) else {
        return unrotated_frame;
    };
    let projected = project_to_surface_plane(outer, &plane, ellipsoid);
    let Some(bounds) = Bounds2::from_points(projected.iter().copied()) else {
        return unrotated_frame;
    };

    let rotation = DMat2::from_angle(st_rotation);
    let Some(rotated) = Bounds2::from_points(projected.iter().map(|p| rotation * *p)) else {
        return unrotated_frame;
    };

    let inverse = DMat2::from_angle(-st_rotation);
    let corners = [
        rotated.min,
        DVec2::new(rotated.min.x, rotated.max.y),
        DVec2::new(rotated.max.x, rotated.min.y),
    ];

    let mut points = [0.0; 6];
    for (i, corner) in corners.into_iter().enumerate() {
        let uv = unclamped(&bounds, inverse * corner);
        points[i * 2] = uv.x;
        points[i * 2 + 1] = uv.y;
    }
    points
}

fn unclamped(bounds: &Bounds2, p: DVec2) -> DVec2 {
    let extent = bounds.extent();
    let u = if extent.x > 0.0 { (p.x - bounds.min.x) / extent.x } else { 0.0 };
    let v = if extent.y > 0.0 { (p.y - bounds.min.y) / extent.y } else { 0.0 };
    DVec2::new(u, v)
}

/// One offset flag per vertex
pub(crate) fn offset_values(offset: OffsetAttribute, top: &[bool]) -> Vec<u8> {
    top.iter().map(|is_top| offset.value_for(*is_top)).collect()
}

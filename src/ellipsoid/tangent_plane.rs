//! Local tangent plane used to flatten rings for winding, triangulation and texturing

use glam::{DVec2, DVec3};

use super::Ellipsoid;
use crate::math::EPSILON15;

/// A plane tangent to the ellipsoid with an east/north/up frame
///
/// Points are projected along the ray from the ellipsoid center through the
/// point, so positions that differ only in height land on the same 2D
/// coordinate.
#[derive(Debug, Clone, Copy)]
pub struct TangentPlane {
    origin: DVec3,
    x_axis: DVec3,
    y_axis: DVec3,
    normal: DVec3,
}

impl TangentPlane {
    /// Tangent plane at the surface point nearest `origin`
    pub fn new(origin: DVec3, ellipsoid: &Ellipsoid) -> Option<Self> {
        let origin = ellipsoid.scale_to_geodetic_surface(origin)?;
        let normal = ellipsoid.geodetic_surface_normal(origin);

        let east = if origin.x.abs() < EPSILON15 && origin.y.abs() < EPSILON15 {
            // Polar degeneracy: pick a fixed east direction
            DVec3::Y
        } else {
            DVec3::new(-origin.y, origin.x, 0.0).normalize()
        };
        let north = normal.cross(east);

        Some(Self {
            origin,
            x_axis: east,
            y_axis: north,
            normal,
        })
    }

    /// Tangent plane centered on the axis-aligned bounds of `points`
    pub fn from_points(points: &[DVec3], ellipsoid: &Ellipsoid) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p)));
        Self::new((min + max) * 0.5, ellipsoid)
    }

    #[inline]
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    #[inline]
    pub fn normal(&self) -> DVec3 {
        self.normal
    }

    /// Project one point onto the plane, in plane coordinates
    pub fn project_point(&self, cartesian: DVec3) -> Option<DVec2> {
        let direction = cartesian.normalize_or_zero();
        let denominator = self.normal.dot(direction);
        if denominator.abs() < EPSILON15 {
            return None;
        }

        let t = self.normal.dot(self.origin - cartesian) / denominator;
        let offset = cartesian + direction * t - self.origin;
        Some(DVec2::new(self.x_axis.dot(offset), self.y_axis.dot(offset)))
    }

    /// Project every point; `None` if any point cannot be projected
    pub fn project_points(&self, points: &[DVec3]) -> Option<Vec<DVec2>> {
        points.iter().map(|p| self.project_point(*p)).collect()
    }
}

/// Twice the signed area of a 2D ring (positive when counter-clockwise)
pub fn signed_area_2d(points: &[DVec2]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum()
}

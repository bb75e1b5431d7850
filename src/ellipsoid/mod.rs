//! Reference ellipsoid and geodetic conversions
//!
//! Positions throughout the crate live in an Earth-centered Cartesian frame
//! anchored to an [`Ellipsoid`]. This module provides the conversions between
//! that frame and longitude/latitude/height, plus the surface projections the
//! tessellator relies on.

pub mod rhumb;
pub mod tangent_plane;

pub use rhumb::RhumbLine;
pub use tangent_plane::TangentPlane;

use glam::DVec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::math::EPSILON15;

/// Maximum Newton iterations when scaling a point onto the surface
const MAX_SURFACE_ITERATIONS: usize = 64;

/// A geodetic position: longitude and latitude in radians, height in meters
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cartographic {
    pub longitude: f64,
    pub latitude: f64,
    pub height: f64,
}

impl Cartographic {
    pub fn new(longitude: f64, latitude: f64, height: f64) -> Self {
        Self {
            longitude,
            latitude,
            height,
        }
    }

    /// Build from degrees (height stays in meters)
    pub fn from_degrees(longitude: f64, latitude: f64, height: f64) -> Self {
        Self::new(longitude.to_radians(), latitude.to_radians(), height)
    }
}

/// A triaxial ellipsoid centered at the origin
///
/// Only the radii are stored by value in packed form; the reciprocal
/// terms are derived on construction.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    radii: DVec3,
    radii_squared: DVec3,
    one_over_radii: DVec3,
    one_over_radii_squared: DVec3,
    center_tolerance_squared: f64,
}

impl Ellipsoid {
    /// Create an ellipsoid from its three radii
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        let radii = DVec3::new(x, y, z);
        Self {
            radii,
            radii_squared: radii * radii,
            one_over_radii: DVec3::ONE / radii,
            one_over_radii_squared: DVec3::ONE / (radii * radii),
            center_tolerance_squared: crate::math::EPSILON1,
        }
    }

    /// The WGS84 ellipsoid
    pub fn wgs84() -> Self {
        Self::new(6_378_137.0, 6_378_137.0, 6_356_752.314_245_179_3)
    }

    /// A sphere of radius one
    pub fn unit_sphere() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    #[inline]
    pub fn radii(&self) -> DVec3 {
        self.radii
    }

    #[inline]
    pub fn maximum_radius(&self) -> f64 {
        self.radii.max_element()
    }

    #[inline]
    pub fn minimum_radius(&self) -> f64 {
        self.radii.min_element()
    }

    /// First eccentricity of the meridian ellipse (equatorial vs polar radius)
    pub fn eccentricity(&self) -> f64 {
        let a = self.radii.x;
        let b = self.radii.z;
        ((a * a - b * b).max(0.0)).sqrt() / a
    }

    /// Outward surface normal at a Cartesian position
    pub fn geodetic_surface_normal(&self, cartesian: DVec3) -> DVec3 {
        (cartesian * self.one_over_radii_squared).normalize()
    }

    /// Outward surface normal at a geodetic position
    pub fn geodetic_surface_normal_cartographic(&self, cartographic: &Cartographic) -> DVec3 {
        let cos_latitude = cartographic.latitude.cos();
        DVec3::new(
            cos_latitude * cartographic.longitude.cos(),
            cos_latitude * cartographic.longitude.sin(),
            cartographic.latitude.sin(),
        )
        .normalize()
    }

    /// Project a point onto the surface along the geodetic normal
    ///
    /// Returns `None` for points too close to the center for the
    /// projection to be defined.
    pub fn scale_to_geodetic_surface(&self, cartesian: DVec3) -> Option<DVec3> {
        let scaled = cartesian * self.one_over_radii;
        let x2 = scaled.x * scaled.x;
        let y2 = scaled.y * scaled.y;
        let z2 = scaled.z * scaled.z;

        let squared_norm = x2 + y2 + z2;
        let ratio = (1.0 / squared_norm).sqrt();
        let intersection = cartesian * ratio;

        if squared_norm < self.center_tolerance_squared {
            return ratio.is_finite().then_some(intersection);
        }

        let inv2 = self.one_over_radii_squared;
        let gradient = intersection * inv2 * 2.0;

        let mut lambda = (1.0 - ratio) * cartesian.length() / (0.5 * gradient.length());
        let mut correction = 0.0;
        let mut multiplier = DVec3::ONE;

        for _ in 0..MAX_SURFACE_ITERATIONS {
            lambda -= correction;

            multiplier = DVec3::ONE / (DVec3::ONE + lambda * inv2);
            let m2 = multiplier * multiplier;
            let m3 = m2 * multiplier;

            // Iterate until the residual is down to rounding
            let func = x2 * m2.x + y2 * m2.y + z2 * m2.z - 1.0;
            if func.abs() <= EPSILON15 {
                break;
            }

            let denominator = x2 * m3.x * inv2.x + y2 * m3.y * inv2.y + z2 * m3.z * inv2.z;
            let derivative = -2.0 * denominator;
            correction = func / derivative;
        }

        Some(cartesian * multiplier)
    }

    /// Convert a Cartesian position to longitude/latitude/height
    pub fn cartesian_to_cartographic(&self, cartesian: DVec3) -> Option<Cartographic> {
        let surface = self.scale_to_geodetic_surface(cartesian)?;
        let normal = self.geodetic_surface_normal(surface);
        let offset = cartesian - surface;

        let longitude = normal.y.atan2(normal.x);
        let latitude = normal.z.clamp(-1.0, 1.0).asin();
        let height = offset.dot(cartesian).signum() * offset.length();

        Some(Cartographic::new(longitude, latitude, height))
    }

    /// Convert longitude/latitude/height to a Cartesian position
    pub fn cartographic_to_cartesian(&self, cartographic: &Cartographic) -> DVec3 {
        let normal = self.geodetic_surface_normal_cartographic(cartographic);
        let k = self.radii_squared * normal;
        let gamma = normal.dot(k).sqrt();
        k / gamma + normal * cartographic.height
    }

    /// Cartesian position from degrees of longitude and latitude
    pub fn from_degrees(&self, longitude: f64, latitude: f64, height: f64) -> DVec3 {
        self.cartographic_to_cartesian(&Cartographic::from_degrees(longitude, latitude, height))
    }

    /// Positions from a flat `[lon, lat, lon, lat, ...]` list in degrees
    pub fn from_degrees_array(&self, coordinates: &[f64]) -> Vec<DVec3> {
        coordinates
            .chunks_exact(2)
            .map(|c| self.from_degrees(c[0], c[1], 0.0))
            .collect()
    }

    /// Positions from a flat `[lon, lat, height, ...]` list in degrees and meters
    pub fn from_degrees_array_heights(&self, coordinates: &[f64]) -> Vec<DVec3> {
        coordinates
            .chunks_exact(3)
            .map(|c| self.from_degrees(c[0], c[1], c[2]))
            .collect()
    }

    /// Move a position onto the surface, then raise it by `height`
    ///
    /// Positions that cannot be projected are returned unchanged.
    pub fn scale_to_geodetic_height(&self, cartesian: DVec3, height: f64) -> DVec3 {
        let Some(surface) = self.scale_to_geodetic_surface(cartesian) else {
            return cartesian;
        };
        if height == 0.0 {
            return surface;
        }
        surface + self.geodetic_surface_normal(surface) * height
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::wgs84()
    }
}

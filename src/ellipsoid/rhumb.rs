//! Rhumb lines (loxodromes) on an ellipsoid of revolution
//!
//! A rhumb line crosses every meridian at the same heading. Distances use the
//! meridian arc length series in the first eccentricity; positions along the
//! line are recovered through the isometric latitude.

use std::f64::consts::FRAC_PI_2;

use super::{Cartographic, Ellipsoid};
use crate::math::{negative_pi_to_pi, EPSILON12};

/// Latitudes are kept this far from the poles when computing the isometric latitude
const POLE_GUARD: f64 = 1e-12;

/// Constant-heading path between two geodetic positions
#[derive(Debug, Clone, Copy)]
pub struct RhumbLine {
    start: Cartographic,
    end: Cartographic,
    heading: f64,
    distance: f64,
    semi_major: f64,
    eccentricity: f64,
}

impl RhumbLine {
    /// Build the rhumb line from `start` to `end` on `ellipsoid`
    ///
    /// Heights of the endpoints are ignored; the line lies on the surface.
    pub fn new(ellipsoid: &Ellipsoid, start: Cartographic, end: Cartographic) -> Self {
        let semi_major = ellipsoid.radii().x;
        let eccentricity = ellipsoid.eccentricity();

        let delta_longitude = negative_pi_to_pi(end.longitude - start.longitude);
        let delta_psi = isometric_latitude(end.latitude, eccentricity)
            - isometric_latitude(start.latitude, eccentricity);
        let heading = delta_longitude.atan2(delta_psi);

        let distance = if (end.latitude - start.latitude).abs() < EPSILON12 {
            // Along a parallel: radius of curvature of the parallel times the longitude span
            delta_longitude.abs() * parallel_radius(start.latitude, semi_major, eccentricity)
        } else {
            let meridian_span = meridian_arc_length(end.latitude, semi_major, eccentricity)
                - meridian_arc_length(start.latitude, semi_major, eccentricity);
            (meridian_span / heading.cos()).abs()
        };

        Self {
            start,
            end,
            heading,
            distance,
            semi_major,
            eccentricity,
        }
    }

    #[inline]
    pub fn start(&self) -> Cartographic {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Cartographic {
        self.end
    }

    /// Heading in radians, clockwise from north
    #[inline]
    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Length of the line along the surface in meters
    #[inline]
    pub fn surface_distance(&self) -> f64 {
        self.distance
    }

    /// Point at `fraction` of the way from start to end (height 0)
    pub fn interpolate_using_fraction(&self, fraction: f64) -> Cartographic {
        self.interpolate_using_surface_distance(fraction * self.distance)
    }

    /// Point `distance` meters along the line from the start (height 0)
    pub fn interpolate_using_surface_distance(&self, distance: f64) -> Cartographic {
        let e = self.eccentricity;
        let a = self.semi_major;

        if (self.end.latitude - self.start.latitude).abs() < EPSILON12 {
            let radius = parallel_radius(self.start.latitude, a, e);
            let delta = if radius > 0.0 { distance / radius } else { 0.0 };
            let sign = if self.heading < 0.0 { -1.0 } else { 1.0 };
            return Cartographic::new(
                negative_pi_to_pi(self.start.longitude + sign * delta),
                self.start.latitude,
                0.0,
            );
        }

        let start_arc = meridian_arc_length(self.start.latitude, a, e);
        let target_arc = start_arc + distance * self.heading.cos();
        let latitude = inverse_meridian_arc_length(target_arc, a, e);

        let delta_psi =
            isometric_latitude(latitude, e) - isometric_latitude(self.start.latitude, e);
        let longitude = self.start.longitude + self.heading.tan() * delta_psi;

        Cartographic::new(negative_pi_to_pi(longitude), latitude, 0.0)
    }
}

/// Isometric latitude of a geodetic latitude
fn isometric_latitude(latitude: f64, eccentricity: f64) -> f64 {
    let latitude = latitude.clamp(-FRAC_PI_2 + POLE_GUARD, FRAC_PI_2 - POLE_GUARD);
    let e_sin = eccentricity * latitude.sin();
    (0.5 * (FRAC_PI_2 + latitude)).tan().ln()
        - 0.5 * eccentricity * ((1.0 + e_sin) / (1.0 - e_sin)).ln()
}

/// Radius of the parallel circle at `latitude`
fn parallel_radius(latitude: f64, semi_major: f64, eccentricity: f64) -> f64 {
    let sin = latitude.sin();
    semi_major * latitude.cos() / (1.0 - eccentricity * eccentricity * sin * sin).sqrt()
}

/// Distance along the meridian from the equator to `latitude`
fn meridian_arc_length(latitude: f64, semi_major: f64, eccentricity: f64) -> f64 {
    let e2 = eccentricity * eccentricity;
    let e4 = e2 * e2;
    let e6 = e4 * e2;

    semi_major
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * latitude
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * latitude).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * latitude).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * latitude).sin())
}

/// Latitude whose meridian arc length equals `arc_length` (footpoint latitude series)
fn inverse_meridian_arc_length(arc_length: f64, semi_major: f64, eccentricity: f64) -> f64 {
    let e2 = eccentricity * eccentricity;
    let e4 = e2 * e2;
    let e6 = e4 * e2;

    let mu = arc_length / (semi_major * (1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));
    let root = (1.0 - e2).sqrt();
    let e1 = (1.0 - root) / (1.0 + root);
    let e1_2 = e1 * e1;
    let e1_3 = e1_2 * e1;
    let e1_4 = e1_3 * e1;

    mu + (3.0 * e1 / 2.0 - 27.0 * e1_3 / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1_2 / 16.0 - 55.0 * e1_4 / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1_3 / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1_4 / 512.0) * (8.0 * mu).sin()
}

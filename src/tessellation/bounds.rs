//! Bounding sphere and geographic rectangle

use std::f64::consts::{FRAC_PI_2, PI};

use glam::DVec3;

use super::flatten::PolygonInstance;
use crate::ellipsoid::{Cartographic, Ellipsoid};
use crate::math::negative_pi_to_pi;
use crate::volume::{BoundingSphere, Rectangle};

/// Bounding sphere of an elevated or extruded polygon
///
/// Uses only the first instance's outer ring at the top heights, plus the
/// bottom height when extruded, rather than the tessellated vertices.
pub(crate) fn corner_bounding_sphere(
    instance: &PolygonInstance,
    ellipsoid: &Ellipsoid,
    height: f64,
    extruded_height: Option<f64>,
    per_position_height: bool,
) -> BoundingSphere {
    let mut corners: Vec<DVec3> = instance
        .outer
        .iter()
        .map(|p| {
            if per_position_height {
                *p
            } else {
                ellipsoid.scale_to_geodetic_height(*p, height)
            }
        })
        .collect();

    if let Some(bottom) = extruded_height {
        corners.extend(
            instance
                .outer
                .iter()
                .map(|p| ellipsoid.scale_to_geodetic_height(*p, bottom)),
        );
    }

    BoundingSphere::from_points(&corners)
}

/// Geographic extent of a ring's vertices
///
/// Longitudes are unwrapped along consecutive edges, so a ring crossing the
/// antimeridian keeps a narrow extent with `west > east`. A ring that winds
/// all the way around a pole covers every longitude and reaches that pole.
pub(crate) fn compute_rectangle(positions: &[DVec3], ellipsoid: &Ellipsoid) -> Rectangle {
    let cartographics: Vec<Cartographic> = positions
        .iter()
        .filter_map(|p| ellipsoid.cartesian_to_cartographic(*p))
        .collect();

    let Some(first) = cartographics.first() else {
        return Rectangle::default();
    };

    let mut south = first.latitude;
    let mut north = first.latitude;
    let mut unwrapped = first.longitude;
    let (mut west_unwrapped, mut east_unwrapped) = (unwrapped, unwrapped);
    let (mut west, mut east) = (first.longitude, first.longitude);

    for pair in cartographics.windows(2) {
        let (previous, current) = (pair[0], pair[1]);
        south = south.min(current.latitude);
        north = north.max(current.latitude);

        unwrapped += negative_pi_to_pi(current.longitude - previous.longitude);
        if unwrapped < west_unwrapped {
            west_unwrapped = unwrapped;
            west = current.longitude;
        }
        if unwrapped > east_unwrapped {
            east_unwrapped = unwrapped;
            east = current.longitude;
        }
    }

    let last = cartographics[cartographics.len() - 1];
    let winding = unwrapped + negative_pi_to_pi(first.longitude - last.longitude) - first.longitude;

    if winding.abs() > PI {
        // The ring encloses a pole
        west = -PI;
        east = PI;
        if north + south >= 0.0 {
            north = FRAC_PI_2;
        } else {
            south = -FRAC_PI_2;
        }
    }

    Rectangle::new(west, south, east, north)
}

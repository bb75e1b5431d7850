//! Bounding volumes attached to tessellated polygons

use glam::DVec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A sphere enclosing a set of positions
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingSphere {
    pub center: DVec3,
    pub radius: f64,
}

impl BoundingSphere {
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Fit a sphere around `points`
    ///
    /// Runs Ritter's algorithm and a naive box-centered sphere, then keeps
    /// whichever is smaller. An empty slice gives a zero sphere at the origin.
    pub fn from_points(points: &[DVec3]) -> Self {
        let Some(&first) = points.first() else {
            return Self::default();
        };

        let mut x_min = first;
        let mut y_min = first;
        let mut z_min = first;
        let mut x_max = first;
        let mut y_max = first;
        let mut z_max = first;

        for &p in points {
            if p.x < x_min.x {
                x_min = p;
            }
            if p.x > x_max.x {
                x_max = p;
            }
            if p.y < y_min.y {
                y_min = p;
            }
            if p.y > y_max.y {
                y_max = p;
            }
            if p.z < z_min.z {
                z_min = p;
            }
            if p.z > z_max.z {
                z_max = p;
            }
        }

        // Pick the axis with the widest spread as the initial diameter
        let x_span = (x_max - x_min).length_squared();
        let y_span = (y_max - y_min).length_squared();
        let z_span = (z_max - z_min).length_squared();

        let (mut diameter1, mut diameter2, mut max_span) = (x_min, x_max, x_span);
        if y_span > max_span {
            (diameter1, diameter2, max_span) = (y_min, y_max, y_span);
        }
        if z_span > max_span {
            (diameter1, diameter2) = (z_min, z_max);
        }

        let mut ritter_center = (diameter1 + diameter2) * 0.5;
        let mut radius_squared = (diameter2 - ritter_center).length_squared();
        let mut ritter_radius = radius_squared.sqrt();

        let min_box = DVec3::new(x_min.x, y_min.y, z_min.z);
        let max_box = DVec3::new(x_max.x, y_max.y, z_max.z);
        let naive_center = (min_box + max_box) * 0.5;
        let mut naive_radius: f64 = 0.0;

        for &p in points {
            naive_radius = naive_radius.max((p - naive_center).length());

            let old_center_to_point_squared = (p - ritter_center).length_squared();
            if old_center_to_point_squared > radius_squared {
                let old_center_to_point = old_center_to_point_squared.sqrt();
                ritter_radius = (ritter_radius + old_center_to_point) * 0.5;
                radius_squared = ritter_radius * ritter_radius;
                let old_to_new = old_center_to_point - ritter_radius;
                ritter_center =
                    (ritter_center * ritter_radius + p * old_to_new) / old_center_to_point;
            }
        }

        if ritter_radius < naive_radius {
            Self::new(ritter_center, ritter_radius)
        } else {
            Self::new(naive_center, naive_radius)
        }
    }

    /// Fit a sphere around a flat `[x, y, z, ...]` buffer
    pub fn from_vertices(values: &[f64]) -> Self {
        let points: Vec<DVec3> = values
            .chunks_exact(3)
            .map(|c| DVec3::new(c[0], c[1], c[2]))
            .collect();
        Self::from_points(&points)
    }

    /// Whether `point` lies inside or on the sphere, with a relative slack
    pub fn contains(&self, point: DVec3, slack: f64) -> bool {
        (point - self.center).length() <= self.radius * (1.0 + slack)
    }
}

/// A geographic extent in radians
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rectangle {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Rectangle {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    pub fn from_degrees(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self::new(
            west.to_radians(),
            south.to_radians(),
            east.to_radians(),
            north.to_radians(),
        )
    }

    /// Longitude span, accounting for rectangles that cross the antimeridian
    pub fn width(&self) -> f64 {
        let mut east = self.east;
        if east < self.west {
            east += std::f64::consts::TAU;
        }
        east - self.west
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }
}

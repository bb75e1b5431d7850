//! Flattening a polygon hierarchy into independently triangulated polygons

use std::collections::VecDeque;

use glam::DVec3;
use log::debug;

use super::normalize::{normalize_ring, RingRole};
use crate::ellipsoid::Ellipsoid;
use crate::hierarchy::PolygonHierarchy;

/// One outer ring with its direct holes, all normalized
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PolygonInstance {
    pub outer: Vec<DVec3>,
    pub holes: Vec<Vec<DVec3>>,
}

impl PolygonInstance {
    /// All rings in wall order: outer first, then holes
    pub fn rings(&self) -> impl Iterator<Item = &[DVec3]> {
        std::iter::once(self.outer.as_slice()).chain(self.holes.iter().map(Vec::as_slice))
    }
}

/// Walk `hierarchy` breadth-first into a list of polygon instances
///
/// Holes of holes become new outer rings one level deeper. A degenerate
/// outer ring drops its whole node; a degenerate hole drops the hole and
/// everything nested inside it.
pub(crate) fn flatten_hierarchy(
    hierarchy: &PolygonHierarchy,
    ellipsoid: &Ellipsoid,
    per_position_height: bool,
) -> Vec<PolygonInstance> {
    let mut instances = Vec::new();
    let mut queue: VecDeque<(&PolygonHierarchy, usize)> = VecDeque::new();
    queue.push_back((hierarchy, 0));

    while let Some((node, depth)) = queue.pop_front() {
        let Some(outer) =
            normalize_ring(&node.positions, RingRole::Outer, ellipsoid, per_position_height)
        else {
            debug!("dropping degenerate outer ring at depth {}", depth);
            continue;
        };

        let mut holes = Vec::with_capacity(node.holes.len());
        for hole in &node.holes {
            let Some(ring) =
                normalize_ring(&hole.positions, RingRole::Hole, ellipsoid, per_position_height)
            else {
                debug!("dropping degenerate hole at depth {}", depth);
                continue;
            };
            holes.push(ring);
            for island in &hole.holes {
                queue.push_back((island, depth + 1));
            }
        }

        instances.push(PolygonInstance { outer, holes });
    }

    instances
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested() -> PolygonHierarchy {
        let e = Ellipsoid::wgs84();
        PolygonHierarchy::with_holes(
            e.from_degrees_array(&[-124.0, 35.0, -110.0, 35.0, -110.0, 40.0, -124.0, 40.0]),
            vec![PolygonHierarchy::with_holes(
                e.from_degrees_array(&[-122.0, 36.0, -122.0, 39.0, -112.0, 39.0, -112.0, 36.0]),
                vec![PolygonHierarchy::new(e.from_degrees_array(&[
                    -120.0, 36.5, -114.0, 36.5, -114.0, 38.5, -120.0, 38.5,
                ]))],
            )],
        )
    }

    #[test]
    fn test_holes_of_holes_become_outer_rings() {
        let instances = flatten_hierarchy(&nested(), &Ellipsoid::wgs84(), false);
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].holes.len(), 1);
        assert!(instances[1].holes.is_empty());
        assert_eq!(instances[0].rings().count(), 2);
    }

    #[test]
    fn test_degenerate_hole_drops_descendants() {
        let e = Ellipsoid::wgs84();
        let mut hierarchy = nested();
        hierarchy.holes[0].positions = e.from_degrees_array(&[-122.0, 36.0, -122.0, 36.0]);

        let instances = flatten_hierarchy(&hierarchy, &e, false);
        assert_eq!(instances.len(), 1);
        assert!(instances[0].holes.is_empty());
    }

    #[test]
    fn test_degenerate_outer_drops_node() {
        let e = Ellipsoid::wgs84();
        let mut hierarchy = nested();
        hierarchy.positions = e.from_degrees_array(&[1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
        assert!(flatten_hierarchy(&hierarchy, &e, false).is_empty());
    }

    #[test]
    fn test_deep_nesting_is_iterative() {
        let e = Ellipsoid::wgs84();
        let mut node = PolygonHierarchy::new(e.from_degrees_array(&[0.0, 0.0, 0.001, 0.0, 0.001, 0.001]));
        for level in 1..200 {
            let inset = level as f64 * 1e-6;
            let ring = e.from_degrees_array(&[
                inset, inset, 1.0 - inset, inset, 1.0 - inset, 1.0 - inset, inset, 1.0 - inset,
            ]);
            node = PolygonHierarchy::with_holes(ring, vec![node]);
        }
        let instances = flatten_hierarchy(&node, &e, false);
        assert!(instances.len() > 1);
    }
}

//! Polygon hierarchy: an outer ring with nested holes

use glam::DVec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An outer boundary plus holes
///
/// A hole's own holes are treated as new outer boundaries one level deeper,
/// so islands inside lakes inside a polygon are filled again.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolygonHierarchy {
    /// Boundary positions in the ellipsoid's Cartesian frame
    pub positions: Vec<DVec3>,
    /// Nested holes
    pub holes: Vec<PolygonHierarchy>,
}

impl PolygonHierarchy {
    /// A single ring without holes
    pub fn new(positions: Vec<DVec3>) -> Self {
        Self {
            positions,
            holes: Vec::new(),
        }
    }

    pub fn with_holes(positions: Vec<DVec3>, holes: Vec<PolygonHierarchy>) -> Self {
        Self { positions, holes }
    }

    /// Number of hierarchy nodes, this one included
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.holes.iter());
        }
        count
    }

    /// Number of positions across every ring in the hierarchy
    pub fn position_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += node.positions.len();
            stack.extend(node.holes.iter());
        }
        count
    }
}

impl From<Vec<DVec3>> for PolygonHierarchy {
    fn from(positions: Vec<DVec3>) -> Self {
        Self::new(positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_walk_nested_holes() {
        let ring = |n: usize| vec![DVec3::X; n];
        let hierarchy = PolygonHierarchy::with_holes(
            ring(4),
            vec![PolygonHierarchy::with_holes(
                ring(3),
                vec![PolygonHierarchy::new(ring(5))],
            )],
        );

        assert_eq!(hierarchy.node_count(), 3);
        assert_eq!(hierarchy.position_count(), 12);
    }

    #[test]
    fn test_from_positions() {
        let hierarchy: PolygonHierarchy = vec![DVec3::X, DVec3::Y, DVec3::Z].into();
        assert_eq!(hierarchy.positions.len(), 3);
        assert!(hierarchy.holes.is_empty());
    }
}

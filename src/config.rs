//! Polygon construction options and builder
//!
//! This module provides the option types that describe how a polygon is
//! tessellated: which vertex attributes are produced, how edges are
//! interpolated, and how the polygon is raised or extruded.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use glam::DVec3;

use crate::ellipsoid::Ellipsoid;
use crate::error::{PolygonError, Result};
use crate::hierarchy::PolygonHierarchy;
use crate::math::RADIANS_PER_DEGREE;
use crate::polygon::PolygonGeometry;

/// Selects which vertex attribute buffers a mesh carries
///
/// Each flag is independent. `color` is accepted and packed for
/// compatibility, but polygon meshes never produce a color buffer.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexFormat {
    pub position: bool,
    pub normal: bool,
    pub st: bool,
    pub tangent: bool,
    pub bitangent: bool,
    pub color: bool,
}

impl VertexFormat {
    /// Positions only
    pub const POSITION_ONLY: Self = Self {
        position: true,
        normal: false,
        st: false,
        tangent: false,
        bitangent: false,
        color: false,
    };

    /// Positions and normals
    pub const POSITION_AND_NORMAL: Self = Self {
        normal: true,
        ..Self::POSITION_ONLY
    };

    /// Positions and texture coordinates
    pub const POSITION_AND_ST: Self = Self {
        st: true,
        ..Self::POSITION_ONLY
    };

    /// Positions, normals and texture coordinates
    pub const DEFAULT: Self = Self {
        normal: true,
        st: true,
        ..Self::POSITION_ONLY
    };

    /// Every attribute a polygon can produce, plus the color flag
    pub const ALL: Self = Self {
        position: true,
        normal: true,
        st: true,
        tangent: true,
        bitangent: true,
        color: true,
    };

    /// Whether any surface frame attribute (normal, tangent, bitangent) is requested
    #[inline]
    pub fn needs_surface_frame(&self) -> bool {
        self.normal || self.tangent || self.bitangent
    }

    /// Whether texture coordinates must be computed, even if not returned
    #[inline]
    pub fn needs_texture_coordinates(&self) -> bool {
        self.st || self.tangent || self.bitangent
    }
}

impl Default for VertexFormat {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// How points are interpolated along polygon edges
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArcType {
    /// No interpolation; rejected for polygons
    None,
    /// Great-circle style arcs
    #[default]
    Geodesic,
    /// Constant-heading arcs
    Rhumb,
}

impl ArcType {
    /// Numeric code used in packed buffers
    pub fn code(self) -> u8 {
        match self {
            ArcType::None => 0,
            ArcType::Geodesic => 1,
            ArcType::Rhumb => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(ArcType::None),
            1 => Some(ArcType::Geodesic),
            2 => Some(ArcType::Rhumb),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ArcType::None => "None",
            ArcType::Geodesic => "Geodesic",
            ArcType::Rhumb => "Rhumb",
        }
    }
}

/// Which vertices receive a runtime height offset
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OffsetAttribute {
    /// No vertex is offset (the buffer is all zeros)
    None,
    /// Only vertices on the top surface
    Top,
    /// Every vertex
    All,
}

impl OffsetAttribute {
    /// Numeric code used in packed buffers (absent packs as -1)
    pub fn code(self) -> i8 {
        match self {
            OffsetAttribute::None => 0,
            OffsetAttribute::Top => 1,
            OffsetAttribute::All => 2,
        }
    }

    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            0 => Some(OffsetAttribute::None),
            1 => Some(OffsetAttribute::Top),
            2 => Some(OffsetAttribute::All),
            _ => None,
        }
    }

    /// Offset value for a vertex, given whether it lies on the top surface
    #[inline]
    pub fn value_for(self, is_top: bool) -> u8 {
        match self {
            OffsetAttribute::None => 0,
            OffsetAttribute::Top => is_top as u8,
            OffsetAttribute::All => 1,
        }
    }
}

/// Raw construction options for a [`PolygonGeometry`]
///
/// Most callers go through [`PolygonGeometryBuilder`]. The struct is public
/// so options can be stored and reused, for example to compute a
/// rectangle with [`PolygonGeometry::compute_rectangle`] without
/// constructing the geometry.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonOptions {
    /// Outer ring and holes; required
    pub polygon_hierarchy: Option<PolygonHierarchy>,

    /// Reference ellipsoid the positions are anchored to
    pub ellipsoid: Ellipsoid,

    /// Attribute buffers to produce
    pub vertex_format: VertexFormat,

    /// Maximum angle in radians between neighbouring interpolated points
    pub granularity: f64,

    /// Texture rotation in radians, counter-clockwise
    pub st_rotation: f64,

    /// Height of the top surface in meters (defaults to 0)
    ///
    /// Must not be set together with `per_position_height`.
    pub height: Option<f64>,

    /// Height of the bottom surface; extrudes the polygon when it differs from `height`
    pub extruded_height: Option<f64>,

    /// Keep each input position's own height for the top surface
    pub per_position_height: bool,

    /// Emit the top cap of an extruded polygon
    pub close_top: bool,

    /// Emit the bottom cap of an extruded polygon
    pub close_bottom: bool,

    /// Edge interpolation model
    pub arc_type: ArcType,

    /// Optional per-vertex offset flag buffer
    pub offset_attribute: Option<OffsetAttribute>,
}

impl Default for PolygonOptions {
    fn default() -> Self {
        Self {
            polygon_hierarchy: None,
            ellipsoid: Ellipsoid::wgs84(),
            vertex_format: VertexFormat::DEFAULT,
            granularity: RADIANS_PER_DEGREE,
            st_rotation: 0.0,
            height: None,
            extruded_height: None,
            per_position_height: false,
            close_top: true,
            close_bottom: true,
            arc_type: ArcType::Geodesic,
            offset_attribute: None,
        }
    }
}

impl PolygonOptions {
    /// Check the options that can be rejected without tessellating
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when the hierarchy is missing, when a
    /// height is given together with per-position heights, when the arc
    /// type is `None`, or when the granularity is not a positive finite
    /// angle.
    pub fn validate(&self) -> Result<()> {
        if self.polygon_hierarchy.is_none() {
            return Err(PolygonError::InvalidArgument(
                "polygon hierarchy is required".to_string(),
            ));
        }
        if self.per_position_height && self.height.is_some() {
            return Err(PolygonError::InvalidArgument(
                "cannot use height together with per-position heights".to_string(),
            ));
        }
        if self.arc_type == ArcType::None {
            return Err(PolygonError::InvalidArgument(
                "arc type must be Geodesic or Rhumb".to_string(),
            ));
        }
        if !(self.granularity.is_finite() && self.granularity > 0.0) {
            return Err(PolygonError::InvalidArgument(format!(
                "granularity must be a positive angle (got {})",
                self.granularity
            )));
        }
        Ok(())
    }
}

/// Builder for creating a [`PolygonGeometry`] with validation
///
/// # Example
///
/// ```rust
/// use rust_polygon_geometry::*;
///
/// let ellipsoid = Ellipsoid::wgs84();
/// let polygon = PolygonGeometryBuilder::new()
///     .positions(ellipsoid.from_degrees_array(&[
///         -1.0, -1.0, 1.0, -1.0, 1.0, 1.0, -1.0, 1.0,
///     ]))
///     .vertex_format(VertexFormat::POSITION_ONLY)
///     .extruded_height(30_000.0)
///     .build()
///     .unwrap();
///
/// let mesh = polygon.create_geometry().unwrap().unwrap();
/// assert_eq!(mesh.vertex_count(), 50);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PolygonGeometryBuilder {
    options: PolygonOptions,
}

impl PolygonGeometryBuilder {
    /// Create a new builder with default options
    ///
    /// Defaults:
    /// - ellipsoid: WGS84
    /// - vertex_format: position, normal and st
    /// - granularity: one degree
    /// - height: 0, not extruded
    /// - both caps closed, geodesic arcs, no offset attribute
    pub fn new() -> Self {
        Self {
            options: PolygonOptions::default(),
        }
    }

    /// Start from existing options
    pub fn from_options(options: PolygonOptions) -> Self {
        Self { options }
    }

    /// Set the outer ring and holes
    pub fn polygon_hierarchy(mut self, hierarchy: PolygonHierarchy) -> Self {
        self.options.polygon_hierarchy = Some(hierarchy);
        self
    }

    /// Use a single ring without holes
    pub fn positions(mut self, positions: Vec<DVec3>) -> Self {
        self.options.polygon_hierarchy = Some(PolygonHierarchy::new(positions));
        self
    }

    pub fn ellipsoid(mut self, ellipsoid: Ellipsoid) -> Self {
        self.options.ellipsoid = ellipsoid;
        self
    }

    pub fn vertex_format(mut self, vertex_format: VertexFormat) -> Self {
        self.options.vertex_format = vertex_format;
        self
    }

    /// Set the maximum angle between interpolated points
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the angle is not positive and finite
    pub fn granularity(mut self, granularity: f64) -> Result<Self> {
        if !(granularity.is_finite() && granularity > 0.0) {
            return Err(PolygonError::InvalidArgument(format!(
                "granularity must be a positive angle (got {})",
                granularity
            )));
        }
        self.options.granularity = granularity;
        Ok(self)
    }

    pub fn st_rotation(mut self, st_rotation: f64) -> Self {
        self.options.st_rotation = st_rotation;
        self
    }

    pub fn height(mut self, height: f64) -> Self {
        self.options.height = Some(height);
        self
    }

    pub fn extruded_height(mut self, extruded_height: f64) -> Self {
        self.options.extruded_height = Some(extruded_height);
        self
    }

    pub fn per_position_height(mut self, per_position_height: bool) -> Self {
        self.options.per_position_height = per_position_height;
        self
    }

    pub fn close_top(mut self, close_top: bool) -> Self {
        self.options.close_top = close_top;
        self
    }

    pub fn close_bottom(mut self, close_bottom: bool) -> Self {
        self.options.close_bottom = close_bottom;
        self
    }

    pub fn arc_type(mut self, arc_type: ArcType) -> Self {
        self.options.arc_type = arc_type;
        self
    }

    pub fn offset_attribute(mut self, offset_attribute: OffsetAttribute) -> Self {
        self.options.offset_attribute = Some(offset_attribute);
        self
    }

    /// The options collected so far
    pub fn options(&self) -> &PolygonOptions {
        &self.options
    }

    /// Build the geometry
    ///
    /// # Errors
    ///
    /// See [`PolygonOptions::validate`]
    pub fn build(self) -> Result<PolygonGeometry> {
        PolygonGeometry::new(self.options)
    }
}
